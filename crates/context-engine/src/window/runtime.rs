use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::{Vec2, Viewport};
use crate::core::Engine;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::platform::winit::translate_window_event;
use crate::render::{FrameRenderer, RenderCtx, RenderTarget};
use crate::time::FrameClock;

/// Runs `engine` in a single window until it stops.
pub(crate) fn run(mut engine: Engine) -> Result<()> {
    engine.load_default_font();

    let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
    let mut state = AppState::new(engine);

    event_loop
        .run_app(&mut state)
        .context("winit event loop terminated with error")?;

    match state.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[self_referencing]
struct WindowEntry {
    clock: FrameClock,

    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState {
    engine: Engine,
    renderer: FrameRenderer,
    window: Option<WindowEntry>,
    next_frame: Instant,
    /// First unrecoverable error; returned from `run`.
    fatal: Option<anyhow::Error>,
}

impl AppState {
    fn new(engine: Engine) -> Self {
        Self {
            engine,
            renderer: FrameRenderer::new(),
            window: None,
            next_frame: Instant::now(),
            fatal: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let cfg = self.engine.config();
        let attrs = Window::default_attributes()
            .with_title(cfg.title.clone())
            .with_inner_size(LogicalSize::new(cfg.width as f64, cfg.height as f64))
            .with_resizable(cfg.resizable);
        let gpu_init = cfg.gpu.clone();

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;
        log::info!(
            "window created: '{}' {}x{}",
            cfg.title,
            cfg.width,
            cfg.height
        );

        let entry = WindowEntryTryBuilder {
            clock: FrameClock::new(),
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        self.window = Some(entry);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.engine.quit();
        event_loop.exit();
    }

    /// One frame: update, record, render, present.
    fn redraw(&mut self) -> Result<()> {
        let Some(entry) = self.window.as_mut() else { return Ok(()); };
        let (engine, renderer) = (&mut self.engine, &mut self.renderer);

        entry.with_mut(|fields| {
            let time = fields.clock.tick();
            let size = logical_size(fields.window);

            engine.update(time, size);
            engine.render();

            let result = present(fields.window, fields.gpu, renderer, engine, size);
            engine.end_frame();
            result
        })
    }
}

fn present(
    window: &Window,
    gpu: &mut Gpu<'_>,
    renderer: &mut FrameRenderer,
    engine: &Engine,
    size: Vec2,
) -> Result<()> {
    let viewport = Viewport::from(size);
    if !viewport.is_valid() {
        // Minimized.
        return Ok(());
    }

    let mut frame = match gpu.begin_frame() {
        Ok(f) => f,
        Err(err) => {
            return match gpu.handle_surface_error(err) {
                SurfaceErrorAction::Fatal => Err(anyhow::anyhow!("surface lost: out of memory")),
                action => {
                    log::debug!("frame skipped: {action:?}");
                    Ok(())
                }
            };
        }
    };

    let canvas = engine.canvas();
    let rctx = RenderCtx::new(
        gpu.device(),
        gpu.queue(),
        gpu.surface_format(),
        viewport,
        window.scale_factor() as f32,
    );

    {
        let mut target = RenderTarget::new(&mut frame.encoder, &frame.view);
        renderer.render(
            &rctx,
            &mut target,
            canvas.draw_list(),
            canvas.fonts(),
            canvas.clear_color(),
        );
    }

    window.pre_present_notify();
    gpu.submit(frame);
    Ok(())
}

fn logical_size(window: &Window) -> Vec2 {
    let logical: LogicalSize<f64> = window.inner_size().to_logical(window.scale_factor());
    Vec2::new(logical.width as f32, logical.height as f32)
}

/// Next frame deadline on a fixed cadence. A loop that fell behind restarts
/// the cadence from `now` instead of bursting to catch up.
fn next_deadline(prev: Instant, now: Instant, interval: Duration) -> Instant {
    let next = prev + interval;
    if next <= now { now + interval } else { next }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
            return;
        }

        self.next_frame = Instant::now();
        if let Some(entry) = self.window.as_mut() {
            entry.with_clock_mut(|c| c.reset());
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !self.engine.is_running() {
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        if now >= self.next_frame {
            if let Some(entry) = self.window.as_ref() {
                entry.with_window(|w| w.request_redraw());
            }
            let interval = self.engine.config().frame_interval;
            self.next_frame = next_deadline(self.next_frame, now, interval);
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(entry) = self.window.as_mut() else { return; };

        let translated =
            entry.with_window(|w| translate_window_event(w, self.engine.input(), &event));
        if let Some(ev) = translated {
            self.engine.dispatch_event(ev);
        }

        match &event {
            WindowEvent::Resized(new_size) => {
                entry.with_gpu_mut(|gpu| gpu.resize(*new_size));
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = entry.with_window(|w| w.inner_size());
                entry.with_gpu_mut(|gpu| gpu.resize(new_size));
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw() {
                    self.fail(event_loop, err);
                    return;
                }
            }

            _ => {}
        }

        if !self.engine.is_running() {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Surface must go before the window it borrows; the entry drops both in order.
        self.window = None;
        log::info!("engine stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlines_advance_by_interval() {
        let t0 = Instant::now();
        let iv = Duration::from_millis(16);
        assert_eq!(next_deadline(t0, t0, iv), t0 + iv);
        assert_eq!(next_deadline(t0 + iv, t0 + iv, iv), t0 + iv * 2);
    }

    #[test]
    fn late_loop_restarts_cadence_from_now() {
        let t0 = Instant::now();
        let iv = Duration::from_millis(16);
        let late = t0 + Duration::from_millis(100);
        assert_eq!(next_deadline(t0, late, iv), late + iv);
    }
}
