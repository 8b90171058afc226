//! Native window backed by winit and the wgpu frame pipeline.
//!
//! The event loop is pumped on demand instead of handed control, so the
//! session keeps a plain blocking loop: [`Display::next_event`] pumps until
//! the window produced at least one [`InputEvent`].

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbaImage;
use quicklabel_gpu::{FramePipeline, GpuContext};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key as WinitKey, NamedKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowId};

use super::{Display, DisplayError, InputEvent, Key};
use crate::constants::WINDOW_POSITION;
use crate::model::Point;

/// A single non-resizable window sized to the frame it shows.
pub struct NativeDisplay {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl NativeDisplay {
    pub fn new() -> Result<Self, DisplayError> {
        let event_loop = EventLoop::new()?;
        Ok(Self {
            event_loop,
            state: WindowState::default(),
        })
    }

    fn pump(&mut self, timeout: Option<Duration>) -> Result<(), DisplayError> {
        match self.event_loop.pump_app_events(timeout, &mut self.state) {
            PumpStatus::Continue => {}
            PumpStatus::Exit(code) => return Err(DisplayError::Closed(code)),
        }
        match self.state.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Display for NativeDisplay {
    fn show(&mut self, frame: &RgbaImage, title: &str) -> Result<(), DisplayError> {
        self.state.set_frame(frame, title);
        self.pump(Some(Duration::ZERO))
    }

    fn next_event(&mut self) -> Result<InputEvent, DisplayError> {
        loop {
            if let Some(event) = self.state.events.pop_front() {
                return Ok(event);
            }
            self.pump(None)?;
        }
    }

    fn hold(
        &mut self,
        frame: &RgbaImage,
        title: &str,
        duration: Duration,
    ) -> Result<(), DisplayError> {
        self.state.set_frame(frame, title);
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.pump(Some(deadline - now))?;
        }
        self.state.events.clear();
        Ok(())
    }
}

struct PendingFrame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

struct GpuState {
    ctx: GpuContext,
    pipeline: FramePipeline,
}

#[derive(Default)]
struct WindowState {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    pending: Option<PendingFrame>,
    size: (u32, u32),
    title: String,
    events: VecDeque<InputEvent>,
    cursor: Point,
    error: Option<DisplayError>,
}

impl WindowState {
    fn set_frame(&mut self, frame: &RgbaImage, title: &str) {
        let (width, height) = frame.dimensions();
        self.pending = Some(PendingFrame {
            pixels: frame.as_raw().clone(),
            width,
            height,
        });
        self.title = title.to_string();
        self.size = (width.max(1), height.max(1));

        if let Some(window) = &self.window {
            window.set_title(&self.title);
            let requested = PhysicalSize::new(self.size.0, self.size.1);
            if let Some(applied) = window.request_inner_size(requested) {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.ctx.resize(applied.width, applied.height);
                }
            }
            window.request_redraw();
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), DisplayError> {
        let attributes = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(PhysicalSize::new(self.size.0.max(1), self.size.1.max(1)))
            .with_position(PhysicalPosition::new(WINDOW_POSITION.0, WINDOW_POSITION.1))
            .with_resizable(false);
        let window = Arc::new(event_loop.create_window(attributes)?);

        let ctx = pollster::block_on(GpuContext::new(Arc::clone(&window)))?;
        let pipeline = FramePipeline::new(&ctx);
        log::debug!(
            "Window created: {}x{} surface",
            ctx.width(),
            ctx.height()
        );

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(GpuState { ctx, pipeline });
        Ok(())
    }

    fn redraw(&mut self) -> Result<(), DisplayError> {
        let Some(gpu) = self.gpu.as_mut() else {
            return Ok(());
        };
        if let Some(frame) = self.pending.take() {
            gpu.pipeline
                .upload(&gpu.ctx, &frame.pixels, frame.width, frame.height)?;
        }
        match gpu.pipeline.present(&gpu.ctx) {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (gpu.ctx.width(), gpu.ctx.height());
                gpu.ctx.resize(width, height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.create_window(event_loop) {
            log::error!("Failed to open window: {}", e);
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.events.push_back(InputEvent::CloseRequested);
            }
            WindowEvent::Resized(size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.ctx.resize(size.width, size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    self.error = Some(e);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    self.events
                        .push_back(InputEvent::KeyPressed(map_key(&event.logical_key)));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Point::new(position.x as i32, position.y as i32);
                self.events.push_back(InputEvent::PointerMoved(self.cursor));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerPressed(self.cursor),
                    ElementState::Released => InputEvent::PointerReleased(self.cursor),
                };
                self.events.push_back(event);
            }
            _ => {}
        }
    }
}

fn map_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::ArrowLeft) => Key::Left,
        WinitKey::Named(NamedKey::ArrowRight) => Key::Right,
        WinitKey::Named(NamedKey::ArrowUp) => Key::Up,
        WinitKey::Named(NamedKey::ArrowDown) => Key::Down,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::Backspace) => Key::Backspace,
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Character(text) => text
            .chars()
            .next()
            .map(|c| Key::Char(c.to_ascii_lowercase()))
            .unwrap_or(Key::Other),
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_map_named_keys() {
        assert_eq!(map_key(&WinitKey::Named(NamedKey::ArrowUp)), Key::Up);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Escape)), Key::Escape);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Tab)), Key::Other);
    }

    #[test]
    fn test_map_characters_lowercase() {
        assert_eq!(map_key(&WinitKey::Character(SmolStr::new("7"))), Key::Char('7'));
        assert_eq!(map_key(&WinitKey::Character(SmolStr::new("Q"))), Key::Char('q'));
    }
}
