//! Label records and line measurements.

use std::fmt;

/// Integer pixel position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A committed line segment with its length in source-image units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub start: Point,
    pub end: Point,
    pub length: f64,
}

impl Measurement {
    pub fn new(start: Point, end: Point, length: f64) -> Self {
        Self { start, end, length }
    }

    /// Whether press and release happened on the same pixel.
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Endpoint text as stored in the structured label file, e.g. `(10, 10) -> (110, 10)`.
    pub fn coords(&self) -> String {
        format!("{} -> {}", self.start, self.end)
    }

    /// Parse the endpoint text produced by [`Measurement::coords`].
    pub fn parse_coords(text: &str) -> Option<(Point, Point)> {
        let (start, end) = text.split_once("->")?;
        Some((parse_point(start)?, parse_point(end)?))
    }
}

fn parse_point(text: &str) -> Option<Point> {
    let inner = text.trim().strip_prefix('(')?.strip_suffix(')')?;
    let (x, y) = inner.split_once(',')?;
    Some(Point::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// The operator's decision for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    /// File name of the labeled image, including extension
    pub image_name: String,
    /// Digit label in `0..=9`
    pub label: u8,
    /// Human-readable class for the label
    pub class_name: String,
    /// Lines drawn on the image before it was labeled
    pub measurements: Vec<Measurement>,
}

impl LabelRecord {
    pub fn new(image_name: impl Into<String>, label: u8, class_name: impl Into<String>) -> Self {
        Self {
            image_name: image_name.into(),
            label,
            class_name: class_name.into(),
            measurements: Vec::new(),
        }
    }

    pub fn with_measurements(mut self, measurements: Vec<Measurement>) -> Self {
        self.measurements = measurements;
        self
    }

    /// Label-store key of this record.
    pub fn identity(&self) -> String {
        super::image_identity(&self.image_name)
    }
}

impl fmt::Display for LabelRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{image_name: {}, label: {}, class: {}",
            self.image_name, self.label, self.class_name
        )?;
        if !self.measurements.is_empty() {
            write!(f, ", measurements: {}", self.measurements.len())?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coords_round_trip_with_negative_values() {
        let m = Measurement::new(Point::new(-3, 7), Point::new(110, -10), 1.0);
        assert_eq!(m.coords(), "(-3, 7) -> (110, -10)");
        assert_eq!(
            Measurement::parse_coords(&m.coords()),
            Some((Point::new(-3, 7), Point::new(110, -10)))
        );
    }

    #[test]
    fn test_parse_coords_rejects_garbage() {
        assert_eq!(Measurement::parse_coords("10,10 110,10"), None);
        assert_eq!(Measurement::parse_coords("(a, 1) -> (2, 3)"), None);
        assert_eq!(Measurement::parse_coords("(1, 1) -> "), None);
    }

    #[test]
    fn test_degenerate() {
        let p = Point::new(4, 4);
        assert!(Measurement::new(p, p, 0.0).is_degenerate());
    }

    #[test]
    fn test_record_identity_and_display() {
        let record = LabelRecord::new("img_001.png", 3, "ring");
        assert_eq!(record.identity(), "img_001");
        assert_eq!(
            record.to_string(),
            "{image_name: img_001.png, label: 3, class: ring}"
        );
    }
}
