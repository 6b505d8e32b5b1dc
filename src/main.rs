use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use scroll_backdrop::cli::Cli;
use scroll_backdrop::core::{Interval, Viewport};
use scroll_backdrop::gpu::WgpuBackend;
use scroll_backdrop::{create_backdrop, Backdrop, BackdropConfig};

const FPS_LOG_INTERVAL: f32 = 5.0;
/// Pixels scrolled per wheel line
const LINE_HEIGHT: f32 = 60.0;
/// Simulated page length in viewport heights
const PAGE_VIEWPORTS: f32 = 6.0;

/// Stands in for the page's scroll handler: wheel input becomes progress
/// and velocity samples
#[derive(Debug, Default)]
struct ScrollSimulator {
    offset: f32,
}

impl ScrollSimulator {
    /// Apply a wheel delta, returns (progress, velocity)
    fn scroll(&mut self, delta: MouseScrollDelta, viewport_height: f32) -> (f32, f32) {
        let pixels = match delta {
            MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => -y as f32,
        };
        let max_offset = (viewport_height * (PAGE_VIEWPORTS - 1.0)).max(1.0);
        let previous = self.offset;
        self.offset = (self.offset + pixels).clamp(0.0, max_offset);
        (self.offset / max_offset, self.offset - previous)
    }
}

struct App {
    cli: Cli,
    config: BackdropConfig,
    window: Option<Arc<Window>>,
    backdrop: Option<Box<dyn Backdrop>>,
    viewport: Viewport,
    scroll: ScrollSimulator,
    fps_timer: Interval,
    last_frame: std::time::Instant,
    frames_since_log: u32,
    frame_count: u64,
}

impl App {
    fn new(cli: Cli, config: BackdropConfig) -> Self {
        Self {
            viewport: Viewport::new(cli.width, cli.height),
            cli,
            config,
            window: None,
            backdrop: None,
            scroll: ScrollSimulator::default(),
            fps_timer: Interval::new(FPS_LOG_INTERVAL),
            last_frame: std::time::Instant::now(),
            frames_since_log: 0,
            frame_count: 0,
        }
    }

    fn create_backend(&self, window: Arc<Window>) -> Option<WgpuBackend> {
        if self.cli.disable_gpu {
            log::info!("gpu disabled from the command line");
            return None;
        }
        match WgpuBackend::new(window) {
            Ok(backend) => Some(backend),
            Err(e) => {
                log::warn!("failed to initialize renderer: {}", e);
                None
            }
        }
    }

    fn track_fps(&mut self) {
        let now = std::time::Instant::now();
        let delta = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames_since_log += 1;

        if let Some(elapsed) = self.fps_timer.tick(delta) {
            log::info!("FPS: {:.1}", self.frames_since_log as f32 / elapsed);
            self.frames_since_log = 0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Scroll Backdrop")
                .with_inner_size(winit::dpi::LogicalSize::new(self.cli.width, self.cli.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.viewport = Viewport::new(size.width.max(1), size.height.max(1));

        let backend = self.create_backend(window.clone());
        self.backdrop = Some(create_backdrop(backend, self.config.clone(), self.viewport));
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(backdrop) = self.backdrop.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.viewport = Viewport::new(size.width, size.height);
                backdrop.resize(size.width, size.height);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let x = position.x as f32 / self.viewport.width.max(1) as f32 * 2.0 - 1.0;
                let y = position.y as f32 / self.viewport.height.max(1) as f32 * 2.0 - 1.0;
                backdrop.set_pointer(x, y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (progress, velocity) = self.scroll.scroll(delta, self.viewport.height as f32);
                backdrop.set_scroll(progress);
                backdrop.set_scroll_velocity(velocity);
            }
            WindowEvent::RedrawRequested => {
                backdrop.update();
                self.frame_count += 1;
                self.track_fps();

                if self.cli.frames.is_some_and(|limit| self.frame_count >= limit) {
                    log::info!("rendered {} frames, exiting", self.frame_count);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if !wants_redraw(self.backdrop.as_deref()) {
            if self.backdrop.is_some() && self.cli.frames.is_some() {
                log::info!("backdrop disabled, nothing to render, exiting");
                event_loop.exit();
            }
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Only a rendering backdrop needs continuous frames
fn wants_redraw(backdrop: Option<&dyn Backdrop>) -> bool {
    backdrop.is_some_and(|b| b.is_active())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BackdropConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BackdropConfig::default(),
    };

    let event_loop = EventLoop::new().context("creating event loop")?;
    let mut app = App::new(cli, config);

    log::info!("Scroll Backdrop - move the pointer and scroll, Escape to quit");
    event_loop.run_app(&mut app).context("running event loop")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scroll_backdrop::DisabledBackdrop;

    #[test]
    fn disabled_backdrop_does_not_request_frames() {
        assert!(!wants_redraw(None));
        let disabled: &dyn Backdrop = &DisabledBackdrop;
        assert!(!wants_redraw(Some(disabled)));
    }

    #[test]
    fn scroll_simulator_clamps_to_page() {
        let mut scroll = ScrollSimulator::default();
        let (progress, velocity) = scroll.scroll(MouseScrollDelta::LineDelta(0.0, 5.0), 720.0);
        assert_eq!(progress, 0.0);
        assert_eq!(velocity, 0.0);

        let (progress, velocity) = scroll.scroll(MouseScrollDelta::LineDelta(0.0, -2.0), 720.0);
        assert!(progress > 0.0);
        assert_eq!(velocity, 2.0 * LINE_HEIGHT);
    }
}
