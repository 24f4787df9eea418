use blacklabel_engine::coords::Viewport;
use blacklabel_engine::gfx::{
    EngineError, PerspectiveCamera, RendererId, Resource, SharedEngine,
};
use blacklabel_engine::host::{ContainerId, FrameRequestId, HostHandle, ListenerId};

use super::motion;
use super::{BackdropConfig, BackdropError, Prerequisite, ResourceLedger, SceneRig};

/// Outcome of [`BackgroundAnimation::activate`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Activation {
    Started,
    /// Already mounted; nothing was created.
    AlreadyActive,
    /// A prerequisite was missing; nothing was created.
    Skipped(Prerequisite),
}

/// State that exists only between activation and deactivation.
struct Mounted {
    engine: SharedEngine,
    container: ContainerId,
    renderer: RendererId,
    rig: SceneRig,
    ledger: ResourceLedger,
    frame: Option<FrameRequestId>,
    resize: ListenerId,
}

/// The backdrop animation bound to one host container.
pub struct BackgroundAnimation {
    host: HostHandle,
    engine: Option<SharedEngine>,
    container: Option<ContainerId>,
    config: BackdropConfig,
    mounted: Option<Mounted>,
}

impl BackgroundAnimation {
    pub fn new(
        host: HostHandle,
        engine: Option<SharedEngine>,
        container: Option<ContainerId>,
        config: BackdropConfig,
    ) -> Self {
        Self { host, engine, container, config, mounted: None }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Sets the pixel ratio the next surface is created with. Ratios that are
    /// not finite and positive are ignored.
    pub fn set_device_pixel_ratio(&mut self, ratio: f32) {
        if ratio.is_finite() && ratio > 0.0 {
            self.config.renderer.pixel_ratio = ratio;
        } else {
            log::debug!("ignoring device pixel ratio {ratio}");
        }
    }

    /// Builds the scene, attaches the surface to the container and starts the
    /// frame loop.
    ///
    /// A missing container or engine is logged and reported as
    /// [`Activation::Skipped`]. Engine failures release whatever was created
    /// before the error is returned, and leave the container untouched.
    pub fn activate(&mut self) -> Result<Activation, BackdropError> {
        if self.mounted.is_some() {
            return Ok(Activation::AlreadyActive);
        }
        log::info!("backdrop init (dark env)");

        let (engine, container) = match self.prerequisites() {
            Ok(found) => found,
            Err(BackdropError::PrerequisiteMissing(missing)) => {
                log::warn!("backdrop: no {missing}, skipping");
                return Ok(Activation::Skipped(missing));
            }
            Err(err) => return Err(err),
        };

        let size = self.surface_size(container);
        let mut ledger = ResourceLedger::new();
        let built = {
            let mut eng = engine.borrow_mut();
            mount_scene(&mut *eng, &self.config, size, &mut ledger)
        };
        let (renderer, rig) = match built {
            Ok(built) => built,
            Err(err) => {
                let released = ledger.release_all(&mut *engine.borrow_mut());
                log::error!("backdrop: {err}; rolled back {released} resources");
                return Err(err.into());
            }
        };

        let (frame, resize) = {
            let mut host = self.host.borrow_mut();
            if let Some(c) = host.container_mut(container) {
                let replaced = c.clear_children();
                if !replaced.is_empty() {
                    log::debug!("backdrop: replacing {} surfaces in container", replaced.len());
                }
                c.append_child(renderer);
            }
            (host.frames.request_frame(), host.resize.subscribe())
        };

        log::debug!("backdrop: mounted {renderer:?} at {size:?}, {} resources", ledger.len());
        self.mounted = Some(Mounted {
            engine,
            container,
            renderer,
            rig,
            ledger,
            frame: Some(frame),
            resize,
        });
        Ok(Activation::Started)
    }

    fn prerequisites(&self) -> Result<(SharedEngine, ContainerId), BackdropError> {
        let container = self
            .container
            .filter(|&id| self.host.borrow().container(id).is_some())
            .ok_or(Prerequisite::Container)?;
        let engine = self.engine.clone().ok_or(Prerequisite::Engine)?;
        Ok((engine, container))
    }

    /// Container's measured size, or the viewport scaled by the configured
    /// height ratio when the container is gone.
    fn surface_size(&self, container: ContainerId) -> Viewport {
        let host = self.host.borrow();
        match host.container(container) {
            Some(c) => c.measured_size(),
            None => host.viewport().with_height_ratio(self.config.height_ratio),
        }
    }

    /// Advances the animation for a scheduled frame and schedules the next.
    ///
    /// Returns `false` when `id` is not this component's pending request, in
    /// which case nothing happens. Render failures are logged and the loop
    /// keeps going.
    pub fn on_animation_frame(&mut self, id: FrameRequestId, timestamp_ms: f64) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };
        if m.frame != Some(id) {
            return false;
        }
        m.frame = None;

        let t = motion::time_parameter(timestamp_ms, self.config.motion.time_scale);
        m.rig.apply(&motion::sample(&self.config, t));

        let rendered = m
            .engine
            .borrow_mut()
            .render(m.renderer, &m.rig.scene, &m.rig.camera);
        if let Err(err) = rendered {
            log::warn!("backdrop: frame failed: {err}");
        }

        m.frame = Some(self.host.borrow_mut().frames.request_frame());
        true
    }

    /// Resizes the surface to the container and updates the camera aspect.
    ///
    /// Zero-height sizes still reach the surface but leave the aspect as it
    /// was.
    pub fn on_resize(&mut self, listener: ListenerId) -> bool {
        let Some(container) = self
            .mounted
            .as_ref()
            .filter(|m| m.resize == listener)
            .map(|m| m.container)
        else {
            return false;
        };
        let size = self.surface_size(container);
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };

        if let Err(err) = m.engine.borrow_mut().set_size(m.renderer, size) {
            log::warn!("backdrop: resize to {size:?} failed: {err}");
            return false;
        }
        m.rig.resize(size);
        true
    }

    /// Stops the frame loop, detaches the surface and releases every
    /// resource activation created. Safe to call any number of times.
    ///
    /// Returns `false` when nothing was mounted, or when the host or engine
    /// is borrowed elsewhere. In the second case the mount is left intact so
    /// a later call can finish the teardown.
    pub fn deactivate(&mut self) -> bool {
        let Some(m) = self.mounted.as_mut() else {
            return false;
        };

        let released = {
            let (Ok(mut host), Ok(mut engine)) =
                (self.host.try_borrow_mut(), m.engine.try_borrow_mut())
            else {
                log::warn!("backdrop cleanup deferred: host or engine is in use");
                return false;
            };

            if let Some(frame) = m.frame.take() {
                host.frames.cancel_frame(frame);
            }
            host.resize.unsubscribe(m.resize);
            if let Some(c) = host.container_mut(m.container) {
                c.clear_children();
            }
            m.ledger.release_all(&mut *engine)
        };

        self.mounted = None;
        log::info!("backdrop cleanup (dark env): released {released}");
        true
    }

    pub fn is_active(&self) -> bool {
        self.mounted.is_some()
    }

    pub fn renderer(&self) -> Option<RendererId> {
        self.mounted.as_ref().map(|m| m.renderer)
    }

    pub fn camera(&self) -> Option<&PerspectiveCamera> {
        self.mounted.as_ref().map(|m| &m.rig.camera)
    }

    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.mounted.as_ref().and_then(|m| m.frame)
    }

    pub fn resize_listener(&self) -> Option<ListenerId> {
        self.mounted.as_ref().map(|m| m.resize)
    }

    /// Resources held by the current mount.
    pub fn live_resources(&self) -> &[Resource] {
        self.mounted.as_ref().map_or(&[][..], |m| m.ledger.resources())
    }
}

impl Drop for BackgroundAnimation {
    fn drop(&mut self) {
        if self.mounted.is_some() && !self.deactivate() {
            let leaked = self.mounted.as_ref().map_or(0, |m| m.ledger.len());
            log::warn!("backdrop dropped while in use, {leaked} resources leaked");
        }
    }
}

fn mount_scene(
    engine: &mut dyn blacklabel_engine::gfx::Engine,
    config: &BackdropConfig,
    size: Viewport,
    ledger: &mut ResourceLedger,
) -> Result<(RendererId, SceneRig), EngineError> {
    let renderer = engine.create_renderer(config.renderer)?;
    ledger.record(renderer);
    engine.set_size(renderer, size)?;
    let rig = SceneRig::compose(engine, config, size, ledger)?;
    Ok((renderer, rig))
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use blacklabel_engine::coords::Rect;
    use blacklabel_engine::gfx::HeadlessEngine;
    use blacklabel_engine::host::Host;

    struct Fixture {
        host: HostHandle,
        engine: Rc<RefCell<HeadlessEngine>>,
        container: ContainerId,
    }

    impl Fixture {
        fn new() -> Self {
            Self::with_engine(HeadlessEngine::new())
        }

        fn with_engine(engine: HeadlessEngine) -> Self {
            let host = Host::shared(Viewport::new(1024.0, 768.0));
            let container = host
                .borrow_mut()
                .insert_container(Rect::new(0.0, 72.0, 1024.0, 614.4));
            Self { host, engine: engine.into_shared(), container }
        }

        fn component(&self) -> BackgroundAnimation {
            let engine: SharedEngine = self.engine.clone();
            BackgroundAnimation::new(
                self.host.clone(),
                Some(engine),
                Some(self.container),
                BackdropConfig::default(),
            )
        }

        fn children(&self) -> Vec<RendererId> {
            self.host.borrow().container(self.container).unwrap().children().to_vec()
        }

        /// Runs every due frame through `anim`, like one display refresh.
        fn tick(&self, anim: &mut BackgroundAnimation, timestamp_ms: f64) -> usize {
            let due = self.host.borrow_mut().frames.take_due();
            due.into_iter()
                .filter(|&id| anim.on_animation_frame(id, timestamp_ms))
                .count()
        }

        fn resize(&self, anim: &mut BackgroundAnimation, viewport: Viewport, rect: Rect) {
            let listeners = {
                let mut host = self.host.borrow_mut();
                host.container_mut(self.container).unwrap().set_rect(rect);
                host.set_viewport(viewport)
            };
            for l in listeners {
                anim.on_resize(l);
            }
        }
    }

    // ── activation ──

    #[test]
    fn activation_mounts_one_sized_surface() {
        let fx = Fixture::new();
        let mut anim = fx.component();

        assert_eq!(anim.activate(), Ok(Activation::Started));
        let renderer = anim.renderer().unwrap();
        assert_eq!(fx.children(), vec![renderer]);
        assert_eq!(fx.engine.borrow().renderer_size(renderer), Some(Viewport::new(1024.0, 614.4)));
        let aspect = anim.camera().unwrap().aspect;
        assert!((aspect - 1024.0 / 614.4).abs() < 1e-5);
        assert!(anim.pending_frame().is_some());
        assert_eq!(fx.host.borrow().resize.listener_count(), 1);
    }

    #[test]
    fn activation_replaces_prior_children() {
        let fx = Fixture::new();
        let mut first = fx.component();
        let mut second = fx.component();
        first.activate().unwrap();
        second.activate().unwrap();

        assert_eq!(fx.children(), vec![second.renderer().unwrap()]);
    }

    #[test]
    fn device_pixel_ratio_reaches_the_surface() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.set_device_pixel_ratio(2.0);
        anim.set_device_pixel_ratio(f32::NAN);
        anim.set_device_pixel_ratio(0.0);
        anim.activate().unwrap();

        let options = fx.engine.borrow().renderer_options(anim.renderer().unwrap()).unwrap();
        assert_eq!(options.pixel_ratio, 2.0);
        assert!(options.antialias);
    }

    #[test]
    fn second_activation_is_a_no_op() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let created = fx.engine.borrow().created_count();

        assert_eq!(anim.activate(), Ok(Activation::AlreadyActive));
        assert_eq!(fx.engine.borrow().created_count(), created);
        assert_eq!(fx.host.borrow().frames.pending_count(), 1);
    }

    #[test]
    fn missing_container_skips_without_side_effects() {
        let fx = Fixture::new();
        let engine: SharedEngine = fx.engine.clone();
        let mut anim =
            BackgroundAnimation::new(fx.host.clone(), Some(engine), None, BackdropConfig::default());

        assert_eq!(anim.activate(), Ok(Activation::Skipped(Prerequisite::Container)));
        assert!(!anim.is_active());
        assert_eq!(fx.engine.borrow().created_count(), 0);
        assert_eq!(fx.host.borrow().frames.pending_count(), 0);
        assert_eq!(fx.host.borrow().resize.listener_count(), 0);
    }

    #[test]
    fn removed_container_counts_as_missing() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        fx.host.borrow_mut().remove_container(fx.container);

        assert_eq!(anim.activate(), Ok(Activation::Skipped(Prerequisite::Container)));
        assert_eq!(fx.engine.borrow().created_count(), 0);
    }

    #[test]
    fn missing_engine_skips_and_leaves_container_alone() {
        let fx = Fixture::new();
        let mut anim = BackgroundAnimation::new(
            fx.host.clone(),
            None,
            Some(fx.container),
            BackdropConfig::default(),
        );

        assert_eq!(anim.activate(), Ok(Activation::Skipped(Prerequisite::Engine)));
        assert!(fx.children().is_empty());
        assert_eq!(fx.host.borrow().frames.pending_count(), 0);
    }

    #[test]
    fn engine_failure_rolls_back_everything() {
        let fx = Fixture::with_engine(HeadlessEngine::failing_after(3));
        let mut prior = fx.component();
        // Occupy the container through a second engine so the failure has
        // something to leave untouched.
        let other = HeadlessEngine::new().into_shared();
        let other_shared: SharedEngine = other.clone();
        prior.engine = Some(other_shared);
        prior.activate().unwrap();

        let mut anim = fx.component();
        let err = anim.activate().unwrap_err();

        assert!(matches!(err, BackdropError::Engine(EngineError::CreationFailed(_))));
        assert!(!anim.is_active());
        let engine = fx.engine.borrow();
        assert_eq!(engine.live_count(), 0);
        let mut reversed = engine.created().to_vec();
        reversed.reverse();
        assert_eq!(engine.disposed(), reversed.as_slice());
        assert_eq!(fx.children(), vec![prior.renderer().unwrap()]);
        assert_eq!(fx.host.borrow().resize.listener_count(), 1);
    }

    // ── frames ──

    #[test]
    fn each_frame_renders_and_schedules_the_next() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();

        assert_eq!(fx.tick(&mut anim, 16.0), 1);
        assert_eq!(fx.tick(&mut anim, 32.0), 1);
        assert_eq!(fx.engine.borrow().frames_rendered(), 2);
        assert_eq!(fx.host.borrow().frames.pending_count(), 1);

        let record = fx.engine.borrow().last_render().cloned().unwrap();
        let expected = motion::sample(
            anim.config(),
            motion::time_parameter(32.0, anim.config().motion.time_scale),
        );
        assert_eq!(record.camera_position, expected.camera_position);
        assert_eq!(record.renderer, anim.renderer().unwrap());
    }

    #[test]
    fn stale_frame_ids_are_ignored() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let first = anim.pending_frame().unwrap();
        fx.tick(&mut anim, 16.0);

        assert!(!anim.on_animation_frame(first, 48.0));
        assert_eq!(fx.engine.borrow().frames_rendered(), 1);
    }

    #[test]
    fn no_frames_after_deactivate() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let pending = anim.pending_frame().unwrap();
        anim.deactivate();

        assert!(!fx.host.borrow().frames.is_pending(pending));
        assert_eq!(fx.tick(&mut anim, 16.0), 0);
        assert!(!anim.on_animation_frame(pending, 16.0));
        assert_eq!(fx.engine.borrow().frames_rendered(), 0);
    }

    // ── resize ──

    #[test]
    fn resize_tracks_the_container() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let renderer = anim.renderer().unwrap();

        for (w, h) in [(800.0, 600.0), (1920.0, 1080.0), (375.0, 812.0)] {
            let rect = Rect::new(0.0, 72.0, w, h * 0.8);
            fx.resize(&mut anim, Viewport::new(w, h), rect);
            assert_eq!(fx.engine.borrow().renderer_size(renderer), Some(rect.viewport()));
            let aspect = anim.camera().unwrap().aspect;
            assert!((aspect - w / (h * 0.8)).abs() < 1e-5);
        }
    }

    #[test]
    fn zero_height_keeps_the_aspect() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let renderer = anim.renderer().unwrap();
        let aspect = anim.camera().unwrap().aspect;

        fx.resize(&mut anim, Viewport::new(1024.0, 0.0), Rect::new(0.0, 72.0, 1024.0, 0.0));

        assert_eq!(fx.engine.borrow().renderer_size(renderer), Some(Viewport::new(1024.0, 0.0)));
        assert_eq!(anim.camera().unwrap().aspect, aspect);
    }

    #[test]
    fn foreign_listener_is_ignored() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let other = fx.host.borrow_mut().resize.subscribe();

        assert!(!anim.on_resize(other));
    }

    // ── teardown ──

    #[test]
    fn deactivate_releases_exactly_what_was_created() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        fx.tick(&mut anim, 16.0);

        assert!(anim.deactivate());
        let engine = fx.engine.borrow();
        assert_eq!(engine.live_count(), 0);
        let mut reversed = engine.created().to_vec();
        reversed.reverse();
        assert_eq!(engine.disposed(), reversed.as_slice());
        assert!(fx.children().is_empty());
        assert_eq!(fx.host.borrow().resize.listener_count(), 0);
    }

    #[test]
    fn deactivate_twice_is_harmless() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();

        assert!(anim.deactivate());
        let disposed = fx.engine.borrow().disposed_count();
        assert!(!anim.deactivate());
        assert_eq!(fx.engine.borrow().disposed_count(), disposed);
    }

    #[test]
    fn busy_engine_defers_teardown_until_released() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let live = fx.engine.borrow().live_count();
        let listener = anim.resize_listener().unwrap();

        {
            let _in_use = fx.engine.borrow();
            assert!(!anim.deactivate());
        }
        assert!(anim.is_active());
        assert_eq!(fx.engine.borrow().live_count(), live);
        assert_eq!(fx.host.borrow().resize.listener_count(), 1);
        assert_eq!(anim.resize_listener(), Some(listener));

        assert!(anim.deactivate());
        assert!(!anim.is_active());
        assert_eq!(fx.engine.borrow().live_count(), 0);
        assert_eq!(fx.host.borrow().resize.listener_count(), 0);
        assert!(fx.children().is_empty());
    }

    #[test]
    fn busy_host_defers_teardown_until_released() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        let live = fx.engine.borrow().live_count();

        {
            let _in_use = fx.host.borrow();
            assert!(!anim.deactivate());
        }
        assert!(anim.is_active());
        assert_eq!(fx.engine.borrow().live_count(), live);
        assert_eq!(fx.host.borrow().frames.pending_count(), 1);

        assert!(anim.deactivate());
        assert_eq!(fx.engine.borrow().live_count(), 0);
        assert_eq!(fx.host.borrow().frames.pending_count(), 0);
    }

    #[test]
    fn deactivate_without_activation_is_harmless() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        assert!(!anim.deactivate());
        assert_eq!(fx.engine.borrow().disposed_count(), 0);
    }

    #[test]
    fn reactivation_after_teardown_starts_fresh() {
        let fx = Fixture::new();
        let mut anim = fx.component();
        anim.activate().unwrap();
        anim.deactivate();

        assert_eq!(anim.activate(), Ok(Activation::Started));
        assert_eq!(fx.children(), vec![anim.renderer().unwrap()]);
        assert_eq!(fx.host.borrow().frames.pending_count(), 1);
    }

    #[test]
    fn drop_deactivates() {
        let fx = Fixture::new();
        {
            let mut anim = fx.component();
            anim.activate().unwrap();
        }
        assert_eq!(fx.engine.borrow().live_count(), 0);
        assert!(fx.children().is_empty());
        assert_eq!(fx.host.borrow().frames.pending_count(), 0);
    }
}
