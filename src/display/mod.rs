//! Display collaborator: shows frames and yields operator input.
//!
//! The session controller drives a [`Display`] synchronously. It shows one
//! frame, then pulls [`InputEvent`]s one at a time until something changes
//! what should be on screen. Implementations convert their native window
//! events into that queue.

mod native;
mod scripted;

use std::time::Duration;

use image::RgbaImage;
use thiserror::Error;

pub use native::NativeDisplay;
pub use scripted::ScriptedDisplay;

use crate::model::Point;

/// Keyboard keys the labeling session distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Escape,
    Backspace,
    Enter,
    Up,
    Down,
    Left,
    Right,
    /// Any key without a dedicated variant
    Other,
}

/// Input events in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Key pressed (repeats included).
    KeyPressed(Key),
    /// Primary pointer button pressed.
    PointerPressed(Point),
    /// Pointer moved.
    PointerMoved(Point),
    /// Primary pointer button released.
    PointerReleased(Point),
    /// The window was asked to close.
    CloseRequested,
}

impl InputEvent {
    /// Same event with its pointer position moved by `(dx, dy)`.
    pub fn translated(self, dx: i32, dy: i32) -> Self {
        let shift = |p: Point| Point::new(p.x + dx, p.y + dy);
        match self {
            InputEvent::PointerPressed(p) => InputEvent::PointerPressed(shift(p)),
            InputEvent::PointerMoved(p) => InputEvent::PointerMoved(shift(p)),
            InputEvent::PointerReleased(p) => InputEvent::PointerReleased(shift(p)),
            other => other,
        }
    }

    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerPressed(p)
            | InputEvent::PointerMoved(p)
            | InputEvent::PointerReleased(p) => Some(*p),
            _ => None,
        }
    }
}

/// Errors raised by a display.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU error: {0}")]
    Gpu(#[from] quicklabel_gpu::GpuError),

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    /// The window system ended the event loop
    #[error("Display closed (exit code {0})")]
    Closed(i32),
}

/// Window that shows frames and produces operator input.
pub trait Display {
    /// Replace the visible frame and the window title.
    fn show(&mut self, frame: &RgbaImage, title: &str) -> Result<(), DisplayError>;

    /// Block until the next input event arrives.
    fn next_event(&mut self) -> Result<InputEvent, DisplayError>;

    /// Show a frame for a fixed duration, ignoring input.
    fn hold(&mut self, frame: &RgbaImage, title: &str, duration: Duration)
    -> Result<(), DisplayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_moves_pointer_events_only() {
        let moved = InputEvent::PointerPressed(Point::new(10, 40)).translated(0, -30);
        assert_eq!(moved, InputEvent::PointerPressed(Point::new(10, 10)));
        assert_eq!(moved.position(), Some(Point::new(10, 10)));

        let key = InputEvent::KeyPressed(Key::Left);
        assert_eq!(key.translated(5, 5), key);
        assert_eq!(key.position(), None);
    }
}
