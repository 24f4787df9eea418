use std::cell::RefCell;
use std::rc::Rc;

use winit::dpi::LogicalSize;

use blacklabel_engine::coords::Viewport;
use blacklabel_engine::core::{App as EngineApp, AppControl, FrameCtx};
use blacklabel_engine::device::GpuInit;
use blacklabel_engine::draw::DrawList;
use blacklabel_engine::gfx::SharedEngine;
use blacklabel_engine::host::{ContainerId, Host, HostHandle};
use blacklabel_engine::render::mesh::{MeshRenderer, WgpuEngine};
use blacklabel_engine::render::shapes::rect::RectRenderer;
use blacklabel_engine::render::shapes::text::TextRenderer;
use blacklabel_engine::text::{FontId, FontSystem};
use blacklabel_engine::window::{Runtime, RuntimeConfig};

use crate::backdrop::{Activation, BackdropConfig, BackgroundAnimation};
use crate::shell::{PageLayout, PageShell, estimate_text, paint_page};

// ── Application ───────────────────────────────────────────────────────────

/// Top-level builder: configure the window, fonts, page and backdrop, then
/// [`run`](Self::run).
///
/// ```rust,ignore
/// Application::new()
///     .title("EXOTIC BLACK")
///     .font("body", load_font())
///     .page(include_str!("../ui/landing.blm"))
///     .run();
/// ```
pub struct Application {
    title:    String,
    width:    f64,
    height:   f64,
    fonts:    Vec<(String, Vec<u8>)>,
    page_src: Option<String>,
    backdrop: BackdropConfig,
    engine:   bool,
}

impl Application {
    pub fn new() -> Self {
        Self {
            title:    "EXOTIC BLACK".to_string(),
            width:    1280.0,
            height:   800.0,
            fonts:    Vec::new(),
            page_src: None,
            backdrop: BackdropConfig::default(),
            engine:   true,
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width  = width;
        self.height = height;
        self
    }

    /// Registers a font. The first one that loads is used for all copy.
    pub fn font(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        self.fonts.push((name.into(), data));
        self
    }

    /// `.blm` page source. Without one, or if it fails to parse, the built-in
    /// page is shown.
    pub fn page(mut self, src: impl Into<String>) -> Self {
        self.page_src = Some(src.into());
        self
    }

    pub fn backdrop(mut self, config: BackdropConfig) -> Self {
        self.backdrop = config;
        self
    }

    /// Runs with no 3D engine; the hero shows without its animation.
    pub fn without_engine(mut self) -> Self {
        self.engine = false;
        self
    }

    /// Opens the window and runs until it closes. Never returns.
    pub fn run(self) -> ! {
        let config = RuntimeConfig {
            title:        self.title.clone(),
            initial_size: LogicalSize::new(self.width, self.height),
        };
        let state = PageAppState::new(self);
        if let Err(e) = Runtime::run(config, GpuInit::default(), state) {
            log::error!("blacklabel runtime error: {e:#}");
            std::process::exit(1);
        }
        std::process::exit(0);
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

fn load_shell(src: Option<&str>) -> PageShell {
    let Some(src) = src else {
        return PageShell::default();
    };
    match PageShell::from_markup(src) {
        Ok(shell) => shell,
        Err(e) => {
            log::error!("page markup rejected, showing the built-in page: {e}");
            PageShell::default()
        }
    }
}

// ── PageAppState ──────────────────────────────────────────────────────────

/// Implements the engine's `App`: owns the host, the page and the backdrop.
struct PageAppState {
    shell:     PageShell,
    layout:    Option<PageLayout>,
    host:      HostHandle,
    container: Option<ContainerId>,
    engine:    Option<Rc<RefCell<WgpuEngine>>>,
    backdrop:  BackgroundAnimation,
    started:   bool,

    fonts:     FontSystem,
    font:      Option<FontId>,
    draw_list: DrawList,

    mesh_renderer: MeshRenderer,
    rect_renderer: RectRenderer,
    text_renderer: TextRenderer,
}

impl PageAppState {
    fn new(app: Application) -> Self {
        let shell = load_shell(app.page_src.as_deref());

        let mut fonts = FontSystem::new();
        let mut font = None;
        for (name, bytes) in &app.fonts {
            match fonts.load_font(bytes) {
                Ok(id) => {
                    font.get_or_insert(id);
                }
                Err(e) => log::warn!("failed to load font '{name}': {e}"),
            }
        }
        if font.is_none() {
            log::warn!("no font loaded; page copy will not be drawn");
        }

        let viewport = Viewport::new(app.width as f32, app.height as f32);
        let host = Host::shared(viewport);
        let container = shell
            .backdrop
            .map(|_| host.borrow_mut().insert_container(Default::default()));

        let engine = app.engine.then(|| Rc::new(RefCell::new(WgpuEngine::new())));
        let shared = engine.clone().map(|e| -> SharedEngine { e });

        let mut config = app.backdrop;
        if let Some(slot) = shell.backdrop {
            config.height_ratio = slot.height_ratio;
        }
        let backdrop = BackgroundAnimation::new(host.clone(), shared, container, config);

        let mut state = Self {
            shell,
            layout: None,
            host,
            container,
            engine,
            backdrop,
            started: false,
            fonts,
            font,
            draw_list: DrawList::new(),
            mesh_renderer: MeshRenderer::new(),
            rect_renderer: RectRenderer::new(),
            text_renderer: TextRenderer::new(),
        };
        state.relayout(viewport);
        state
    }

    /// Recomputes the layout and moves the backdrop container to match.
    fn relayout(&mut self, viewport: Viewport) {
        let layout = match self.font {
            Some(font) => PageLayout::compute(&self.shell, viewport, |text, size, max| {
                self.fonts.measure_text(text, font, size, max)
            }),
            None => PageLayout::compute(&self.shell, viewport, estimate_text),
        };

        if let (Some(id), Some(rect)) = (self.container, layout.backdrop)
            && let Some(container) = self.host.borrow_mut().container_mut(id)
        {
            container.set_rect(rect);
        }

        self.draw_list.clear();
        paint_page(&mut self.draw_list, &self.shell, &layout, self.font);
        self.layout = Some(layout);
    }

    fn start_backdrop(&mut self, device_pixel_ratio: f32) {
        self.started = true;
        self.backdrop.set_device_pixel_ratio(device_pixel_ratio);
        match self.backdrop.activate() {
            Ok(Activation::Started) => {}
            Ok(other) => log::info!("backdrop not started: {other:?}"),
            Err(e) => log::error!("backdrop failed to start: {e}"),
        }
    }

    fn dispatch_frames(&mut self, timestamp_ms: f64) {
        let due = self.host.borrow_mut().frames.take_due();
        for id in due {
            if !self.backdrop.on_animation_frame(id, timestamp_ms) {
                log::trace!("frame {id:?} had no receiver");
            }
        }
    }
}

impl EngineApp for PageAppState {
    fn on_resize(&mut self, viewport: Viewport) {
        self.relayout(viewport);
        let listeners = self.host.borrow_mut().set_viewport(viewport);
        for listener in listeners {
            self.backdrop.on_resize(listener);
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if !self.started {
            self.start_backdrop(ctx.window.scale_factor());
        }
        self.dispatch_frames(ctx.time.elapsed_ms());

        let clear = self.shell.theme.background;
        let host = &self.host;
        let engine = self.engine.as_ref();
        let dl = &mut self.draw_list;
        let fs = &self.fonts;
        let r_m = &mut self.mesh_renderer;
        let r_r = &mut self.rect_renderer;
        let r_t = &mut self.text_renderer;

        ctx.render(clear, |rctx, target| {
            if let Some(engine) = engine {
                r_m.render(rctx, target, &mut engine.borrow_mut(), |id| {
                    host.borrow().surface_region(id)
                });
            }
            r_r.render(rctx, target, dl);
            r_t.render(rctx, target, dl, fs);
        })
    }

    fn on_exit(&mut self) {
        self.backdrop.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── page loading ──

    #[test]
    fn missing_page_uses_built_in_copy() {
        assert_eq!(load_shell(None), PageShell::default());
    }

    #[test]
    fn broken_page_falls_back() {
        assert_eq!(load_shell(Some("Page {")), PageShell::default());
    }

    // ── state wiring ──

    #[test]
    fn backdrop_container_follows_the_layout() {
        let mut state = PageAppState::new(Application::new().size(1024.0, 768.0));
        let id = state.container.unwrap();
        let rect = state.host.borrow().container(id).unwrap().rect();
        assert_eq!(Some(rect), state.layout.as_ref().unwrap().backdrop);

        state.on_resize(Viewport::new(800.0, 600.0));
        let size = state.host.borrow().container(id).unwrap().measured_size();
        assert_eq!(size, Viewport::new(800.0, 480.0));
    }

    #[test]
    fn engine_backed_backdrop_mounts_and_tears_down() {
        let mut state = PageAppState::new(Application::new().size(1024.0, 768.0));
        state.start_backdrop(1.0);
        assert!(state.backdrop.is_active());
        let engine = state.engine.clone().unwrap();
        assert!(engine.borrow().live_count() > 0);

        state.dispatch_frames(16.0);
        assert_eq!(engine.borrow_mut().take_frames().len(), 1);

        state.on_exit();
        assert_eq!(engine.borrow().live_count(), 0);
    }

    #[test]
    fn backdrop_surface_uses_the_window_scale() {
        let mut state = PageAppState::new(Application::new().size(1024.0, 768.0));
        state.start_backdrop(1.5);
        let engine = state.engine.clone().unwrap();
        let renderer = state.backdrop.renderer().unwrap();
        let options = engine.borrow().renderer_options(renderer);
        assert_eq!(options.map(|o| o.pixel_ratio), Some(1.5));

        state.dispatch_frames(16.0);
        let frames = engine.borrow_mut().take_frames();
        assert_eq!(frames[0].options.pixel_ratio, 1.5);
    }

    #[test]
    fn without_engine_the_backdrop_stays_idle() {
        let mut state = PageAppState::new(Application::new().without_engine());
        state.start_backdrop(1.0);
        assert!(!state.backdrop.is_active());
        assert!(state.engine.is_none());
        assert!(!state.draw_list.is_empty());
    }

    #[test]
    fn page_without_slot_has_no_container() {
        let src = r#"Page { Header "X" Hero { Title "Y" } }"#;
        let mut state = PageAppState::new(Application::new().page(src));
        assert_eq!(state.container, None);
        state.start_backdrop(1.0);
        assert!(!state.backdrop.is_active());
    }
}
