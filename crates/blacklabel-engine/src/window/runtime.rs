use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App as CoreApp, AppControl, FrameCtx, WindowCtx, logical_viewport};
use crate::device::{Gpu, GpuInit};
use crate::time::FrameClock;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "Black Label".to_string(),
            initial_size: LogicalSize::new(1280.0, 800.0),
        }
    }
}

/// Runtime context passed to the application during a frame.
///
/// Requests are applied after the callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    exit: bool,
}

impl RuntimeCtx {
    pub fn exit(&mut self) {
        self.exit = true;
    }

    pub fn exit_requested(&self) -> bool {
        self.exit
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window and drives `app` until the window closes.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = PageLoop::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// The page window and the GPU surface that borrows it.
#[self_referencing]
struct PageWindow {
    clock: FrameClock,
    window: Window,
    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl PageWindow {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop.create_window(attrs).context("failed to create window")?;

        PageWindowTryBuilder {
            clock: FrameClock::default(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, init)),
        }
        .try_build()
        .context("GPU initialization failed")
    }

    fn viewport(&self) -> Viewport {
        self.with_window(|w| logical_viewport(w))
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Reconfigures the surface to the window's current physical size.
    fn sync_surface(&mut self) -> Viewport {
        let physical = self.with_window(|w| w.inner_size());
        self.with_gpu_mut(|gpu| gpu.resize(physical));
        self.viewport()
    }
}

struct PageLoop<A: CoreApp + 'static> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    window: Option<PageWindow>,
    exit_notified: bool,
    fatal: Option<anyhow::Error>,
}

impl<A: CoreApp + 'static> PageLoop<A> {
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self { config, gpu_init, app, window: None, exit_notified: false, fatal: None }
    }

    fn notify_exit(&mut self) {
        if !std::mem::replace(&mut self.exit_notified, true) {
            self.app.on_exit();
        }
    }

    /// Runs the exit hook once, then drops the surface before the window.
    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.notify_exit();
        self.window = None;
        event_loop.exit();
    }

    fn resized(&mut self) {
        let Some(window) = self.window.as_mut() else { return };
        let viewport = window.sync_surface();
        window.request_redraw();
        self.app.on_resize(viewport);
    }

    fn redraw(&mut self, window_id: WindowId, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.as_mut() else { return };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        let control = window.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx { id: window_id, window: fields.window },
                time: fields.clock.tick(),
                gpu: fields.gpu,
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });

        if control == AppControl::Exit || runtime.exit_requested() {
            self.shutdown(event_loop);
        }
    }
}

impl<A: CoreApp + 'static> ApplicationHandler for PageLoop<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match PageWindow::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(window) => {
                let viewport = window.viewport();
                log::info!("window ready at {}x{}", viewport.width, viewport.height);
                window.request_redraw();
                self.window = Some(window);
                self.app.on_resize(viewport);
            }
            Err(err) => {
                log::error!("{err:#}");
                self.fatal = Some(err);
                self.shutdown(event_loop);
            }
        }
    }

    /// Keeps one redraw queued per display refresh so the animation-frame
    /// scheduler always has a tick to run on.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                log::info!("window closed");
                self.shutdown(event_loop);
            }
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resized(),
            WindowEvent::RedrawRequested => self.redraw(window_id, event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.notify_exit();
    }
}
