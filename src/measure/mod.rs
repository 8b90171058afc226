//! Line measurement overlay.
//!
//! The engine turns pointer drags on the displayed frame into
//! [`Measurement`]s. A press starts a line, moves update a live preview and a
//! release commits it. Each committed line is stroked onto the frame together
//! with a rotated length label. Lengths are in source-image pixels (times the
//! configured calibration) even though the operator draws on a resized frame.
//!
//! ```text
//! Idle --press--> Dragging { start } --release--> Idle (line committed)
//!                     |  ^
//!                     +--+ move (preview only)
//! ```

mod geometry;
mod render;
mod text;

pub use geometry::{
    DisplayScale, TextBucket, TextPlacement, format_length, line_angle, normalize_angle,
};
pub use render::{OverlayStyle, composite_masked, draw_line, label_layer, with_pixmap};
pub use text::TextRenderer;

use image::RgbaImage;

use crate::config::MeasureConfig;
use crate::display::InputEvent;
use crate::model::{Measurement, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { start: Point, current: Point },
}

/// Measurement state for the item on screen.
#[derive(Debug)]
pub struct MeasurementEngine {
    calibration: f64,
    unit: String,
    keep_degenerate: bool,
    style: OverlayStyle,
    text: TextRenderer,
    scale: DisplayScale,
    /// Display-size image without any overlay
    pristine: RgbaImage,
    /// Pristine image plus committed lines
    annotated: RgbaImage,
    /// What should be on screen right now
    view: RgbaImage,
    lines: Vec<Measurement>,
    drag: DragState,
}

impl MeasurementEngine {
    pub fn new(config: &MeasureConfig, text: TextRenderer) -> Self {
        Self {
            calibration: config.calibration,
            unit: config.unit.clone(),
            keep_degenerate: config.keep_degenerate,
            style: OverlayStyle::default(),
            text,
            scale: DisplayScale::default(),
            pristine: RgbaImage::new(1, 1),
            annotated: RgbaImage::new(1, 1),
            view: RgbaImage::new(1, 1),
            lines: Vec::new(),
            drag: DragState::Idle,
        }
    }

    /// Start over on a new item.
    ///
    /// `source_size` is the decoded image size, `display` the resized frame
    /// the operator draws on. Lines of the previous item are discarded.
    pub fn prepare(&mut self, source_size: (u32, u32), display: RgbaImage) {
        self.scale = DisplayScale::new(source_size, display.dimensions());
        log::trace!(
            "Measurement scale x={:.4} y={:.4}",
            self.scale.x_scale,
            self.scale.y_scale
        );
        self.annotated = display.clone();
        self.view = display.clone();
        self.pristine = display;
        self.lines.clear();
        self.drag = DragState::Idle;
    }

    /// Feed a pointer event in frame coordinates.
    ///
    /// Returns `true` when the frame changed and should be shown again.
    pub fn handle_pointer(&mut self, event: InputEvent) -> bool {
        match (self.drag, event) {
            (_, InputEvent::PointerPressed(p)) => {
                self.drag = DragState::Dragging {
                    start: p,
                    current: p,
                };
                false
            }
            (DragState::Dragging { start, .. }, InputEvent::PointerMoved(p)) => {
                self.drag = DragState::Dragging { start, current: p };
                self.view = self.annotated.clone();
                let preview = self.measure(start, p);
                self.annotate(ViewTarget::View, &preview);
                true
            }
            (DragState::Dragging { start, .. }, InputEvent::PointerReleased(p)) => {
                self.drag = DragState::Idle;
                self.commit(start, p);
                true
            }
            _ => false,
        }
    }

    fn commit(&mut self, start: Point, end: Point) {
        let line = self.measure(start, end);
        if line.is_degenerate() && !self.keep_degenerate {
            log::debug!("Discarded zero-length line at {}", start);
            self.view = self.annotated.clone();
            return;
        }
        log::debug!(
            "Line {} -> {}: {}",
            start,
            end,
            format_length(line.length, &self.unit)
        );
        self.annotate(ViewTarget::Annotated, &line);
        self.lines.push(line);
        self.view = self.annotated.clone();
    }

    /// Remove the most recent line and redraw from the pristine frame.
    pub fn undo(&mut self) -> Option<Measurement> {
        let removed = self.lines.pop()?;
        self.drag = DragState::Idle;
        self.annotated = self.pristine.clone();
        let lines = std::mem::take(&mut self.lines);
        for line in &lines {
            self.annotate(ViewTarget::Annotated, line);
        }
        self.lines = lines;
        self.view = self.annotated.clone();
        log::debug!("Undid line {}", removed.coords());
        Some(removed)
    }

    fn measure(&self, start: Point, end: Point) -> Measurement {
        Measurement::new(start, end, self.scale.length(start, end, self.calibration))
    }

    fn annotate(&mut self, target: ViewTarget, line: &Measurement) {
        let text = format_length(line.length, &self.unit);
        let placement = TextPlacement::for_line(line.start, line.end);
        let img = match target {
            ViewTarget::View => &mut self.view,
            ViewTarget::Annotated => &mut self.annotated,
        };
        with_pixmap(img, |pixmap| draw_line(pixmap, line.start, line.end, &self.style));
        if let Some(layer) = label_layer(img.dimensions(), &placement, &text, &self.text, &self.style)
        {
            composite_masked(img, &layer);
        }
    }

    /// Frame to show: committed lines plus the line being dragged.
    pub fn frame(&self) -> &RgbaImage {
        &self.view
    }

    /// Display image with committed lines only.
    pub fn composite(&self) -> &RgbaImage {
        &self.annotated
    }

    /// Committed lines, oldest first.
    pub fn lines(&self) -> &[Measurement] {
        &self.lines
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum ViewTarget {
    View,
    Annotated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn engine(keep_degenerate: bool) -> MeasurementEngine {
        let config = MeasureConfig {
            enabled: true,
            keep_degenerate,
            ..Default::default()
        };
        MeasurementEngine::new(&config, TextRenderer::without_font())
    }

    fn gray(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))
    }

    fn drag(engine: &mut MeasurementEngine, from: Point, to: Point) {
        engine.handle_pointer(InputEvent::PointerPressed(from));
        engine.handle_pointer(InputEvent::PointerMoved(to));
        engine.handle_pointer(InputEvent::PointerReleased(to));
    }

    #[test]
    fn test_half_scale_line_measures_in_source_pixels() {
        let mut engine = engine(true);
        engine.prepare((400, 400), gray(200, 200));
        drag(&mut engine, Point::new(10, 10), Point::new(110, 10));

        assert_eq!(engine.lines().len(), 1);
        assert!((engine.lines()[0].length - 200.0).abs() < 1e-9);
        assert_ne!(engine.composite(), &gray(200, 200));
    }

    #[test]
    fn test_moves_preview_without_committing() {
        let mut engine = engine(true);
        engine.prepare((100, 100), gray(100, 100));
        engine.handle_pointer(InputEvent::PointerPressed(Point::new(10, 50)));
        assert!(engine.handle_pointer(InputEvent::PointerMoved(Point::new(80, 50))));

        assert!(engine.is_dragging());
        assert!(engine.lines().is_empty());
        assert_ne!(engine.frame(), engine.composite());
        assert_eq!(engine.composite(), &gray(100, 100));
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut engine = engine(true);
        engine.prepare((100, 100), gray(100, 100));
        assert!(!engine.handle_pointer(InputEvent::PointerMoved(Point::new(5, 5))));
        assert!(!engine.handle_pointer(InputEvent::PointerReleased(Point::new(5, 5))));
        assert!(engine.lines().is_empty());
    }

    #[test]
    fn test_undo_restores_previous_frame() {
        let mut engine = engine(true);
        engine.prepare((100, 100), gray(100, 100));
        drag(&mut engine, Point::new(10, 80), Point::new(90, 80));
        let after_one = engine.composite().clone();
        drag(&mut engine, Point::new(50, 10), Point::new(50, 60));
        assert_eq!(engine.lines().len(), 2);

        let removed = engine.undo().unwrap();
        assert_eq!(removed.start, Point::new(50, 10));
        assert_eq!(engine.lines().len(), 1);
        assert_eq!(engine.composite(), &after_one);
        assert_eq!(engine.frame(), &after_one);

        engine.undo();
        assert_eq!(engine.composite(), &gray(100, 100));
        assert!(engine.undo().is_none());
    }

    #[test]
    fn test_degenerate_lines_follow_config() {
        let mut keep = engine(true);
        keep.prepare((10, 10), gray(10, 10));
        drag(&mut keep, Point::new(3, 3), Point::new(3, 3));
        assert_eq!(keep.lines().len(), 1);
        assert_eq!(keep.lines()[0].length, 0.0);

        let mut discard = engine(false);
        discard.prepare((10, 10), gray(10, 10));
        drag(&mut discard, Point::new(3, 3), Point::new(3, 3));
        assert!(discard.lines().is_empty());
    }

    #[test]
    fn test_prepare_clears_lines() {
        let mut engine = engine(true);
        engine.prepare((100, 100), gray(50, 50));
        drag(&mut engine, Point::new(1, 1), Point::new(20, 20));
        engine.prepare((30, 30), gray(30, 30));
        assert!(engine.lines().is_empty());
        assert_eq!(engine.scale(), DisplayScale::default());
    }
}
