use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{clamp_pixel_size, Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::time::FrameClock;

/// Window options for [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Upper bound on physical pixels per logical pixel for the drawable.
    /// Values `<= 0` disable the clamp.
    pub max_pixel_ratio: f64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "parallax".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            max_pixel_ratio: 2.0,
        }
    }
}

/// Requests an app can make from inside [`App::on_frame`].
///
/// Applied once the callback has returned. To stop, return
/// [`AppControl::Exit`] from the callback instead.
#[derive(Default)]
pub struct RuntimeCtx {
    title: Option<String>,
}

impl RuntimeCtx {
    /// Replaces the window title. The last call in a frame wins.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }
}

/// Opens one window and drives an [`App`] until the window closes or the app
/// asks to exit.
pub struct Runtime;

impl Runtime {
    /// Blocks on the event loop. Returns the window/GPU setup error if startup
    /// failed, otherwise `Ok(())` once the loop ends.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut shell = Shell { config, gpu_init, app, surface: None, startup_error: None };

        event_loop
            .run_app(&mut shell)
            .context("winit event loop terminated with error")?;

        shell.startup_error.map_or(Ok(()), Err)
    }
}

// The GPU surface borrows the window, so both live in one self-referencing
// cell together with the per-window frame clock.
#[self_referencing]
struct WindowSurface {
    clock: FrameClock,
    max_pixel_ratio: f64,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

impl WindowSurface {
    fn open(event_loop: &ActiveEventLoop, config: &RuntimeConfig, gpu_init: GpuInit) -> Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);
        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let max_pixel_ratio = config.max_pixel_ratio;
        WindowSurfaceTryBuilder {
            clock: FrameClock::default(),
            max_pixel_ratio,
            window,
            gpu_builder: |w| {
                pollster::block_on(Gpu::new(w, drawable_size(w, max_pixel_ratio), gpu_init))
                    .context("GPU initialization failed")
            },
        }
        .try_build()
    }

    fn id(&self) -> WindowId {
        self.with_window(|w| w.id())
    }

    fn request_redraw(&self) {
        self.with_window(|w| w.request_redraw());
    }

    /// Re-reads the window size and scale and resizes the drawable.
    fn sync_size(&mut self) {
        self.with_mut(|f| {
            f.gpu.resize(drawable_size(f.window, *f.max_pixel_ratio));
            f.window.request_redraw();
        });
    }
}

/// Drawable size for `window` with the pixel ratio capped.
fn drawable_size(window: &Window, max_pixel_ratio: f64) -> PhysicalSize<u32> {
    let scale = window.scale_factor();
    let logical: LogicalSize<f64> = window.inner_size().to_logical(scale);
    clamp_pixel_size(logical, scale, max_pixel_ratio)
}

struct Shell<A: App> {
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,
    surface: Option<WindowSurface>,
    startup_error: Option<anyhow::Error>,
}

impl<A: App> Shell<A> {
    /// Translates `event` and hands it to the app.
    fn dispatch_input(&mut self, event: &WindowEvent) -> AppControl {
        let Some(surface) = self.surface.as_ref() else {
            return AppControl::Continue;
        };

        match surface.with_window(|w| translate_window_event(w, event)) {
            Some(ev) => self.app.on_input(&ev),
            None => AppControl::Continue,
        }
    }

    /// Runs one app frame, then applies whatever the app requested.
    fn redraw(&mut self) -> AppControl {
        let Some(surface) = self.surface.as_mut() else {
            return AppControl::Continue;
        };
        let app = &mut self.app;
        let mut runtime = RuntimeCtx::default();

        let control = surface.with_mut(|f| {
            let mut ctx = FrameCtx {
                window: WindowCtx { window: f.window },
                gpu: f.gpu,
                time: f.clock.tick(),
                runtime: &mut runtime,
            };
            app.on_frame(&mut ctx)
        });

        if let Some(title) = runtime.title {
            surface.with_window(|w| w.set_title(&title));
        }

        control
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        // Drop the surface before the window goes away with the loop.
        self.surface = None;
        event_loop.exit();
    }
}

impl<A: App> ApplicationHandler for Shell<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.surface.is_some() {
            return;
        }

        match WindowSurface::open(event_loop, &self.config, self.gpu_init.clone()) {
            Ok(mut surface) => {
                let size = surface.borrow_gpu().size();
                log::info!("window ready: {}x{} drawable", size.width, size.height);
                surface.with_clock_mut(|c| c.reset());
                surface.request_redraw();
                self.surface = Some(surface);
            }
            Err(err) => {
                log::error!("failed to open window: {err:#}");
                self.startup_error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // The scene animates continuously; FIFO presentation paces the loop.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(surface) = &self.surface {
            surface.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.surface.as_ref().map(WindowSurface::id) != Some(window_id) {
            return;
        }

        if self.dispatch_input(&event) == AppControl::Exit {
            self.shutdown(event_loop);
            return;
        }

        let control = match event {
            WindowEvent::CloseRequested => AppControl::Exit,
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(surface) = self.surface.as_mut() {
                    surface.sync_size();
                }
                AppControl::Continue
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => AppControl::Continue,
        };

        if control == AppControl::Exit {
            self.shutdown(event_loop);
        }
    }
}
