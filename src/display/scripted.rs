//! Display that replays a fixed event script.

use std::collections::VecDeque;
use std::time::Duration;

use image::RgbaImage;

use super::{Display, DisplayError, InputEvent};

/// Headless display fed from a queue of events.
///
/// Every shown frame is recorded along with its title. Once the script runs
/// out the display reports [`InputEvent::CloseRequested`], like an operator
/// closing the window.
#[derive(Debug, Default)]
pub struct ScriptedDisplay {
    events: VecDeque<InputEvent>,
    shown: Vec<(String, RgbaImage)>,
    held: Vec<(String, Duration)>,
}

impl ScriptedDisplay {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Titles of every frame shown so far, in order.
    pub fn titles(&self) -> Vec<&str> {
        self.shown.iter().map(|(t, _)| t.as_str()).collect()
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    /// Frames shown with [`Display::hold`], with their durations.
    pub fn held(&self) -> &[(String, Duration)] {
        &self.held
    }
}

impl Display for ScriptedDisplay {
    fn show(&mut self, frame: &RgbaImage, title: &str) -> Result<(), DisplayError> {
        self.shown.push((title.to_string(), frame.clone()));
        Ok(())
    }

    fn next_event(&mut self) -> Result<InputEvent, DisplayError> {
        Ok(self
            .events
            .pop_front()
            .unwrap_or(InputEvent::CloseRequested))
    }

    fn hold(
        &mut self,
        frame: &RgbaImage,
        title: &str,
        duration: Duration,
    ) -> Result<(), DisplayError> {
        self.shown.push((title.to_string(), frame.clone()));
        self.held.push((title.to_string(), duration));
        Ok(())
    }
}
