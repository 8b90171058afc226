//! Measurement geometry: scaling, lengths and label placement.

use crate::model::Point;

/// Ratio between source-image pixels and display pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayScale {
    pub x_scale: f64,
    pub y_scale: f64,
}

impl Default for DisplayScale {
    fn default() -> Self {
        Self {
            x_scale: 1.0,
            y_scale: 1.0,
        }
    }
}

impl DisplayScale {
    /// Scale from a source size and the size it is displayed at.
    pub fn new(source: (u32, u32), display: (u32, u32)) -> Self {
        let ratio = |src: u32, disp: u32| f64::from(src) / f64::from(disp.max(1));
        Self {
            x_scale: ratio(source.0, display.0),
            y_scale: ratio(source.1, display.1),
        }
    }

    /// Length of a display-space segment in source pixels times `calibration`.
    pub fn length(&self, start: Point, end: Point, calibration: f64) -> f64 {
        let dx = f64::from(end.x - start.x) * self.x_scale;
        let dy = f64::from(end.y - start.y) * self.y_scale;
        dx.hypot(dy) * calibration
    }
}

/// Fold an angle in degrees into `[-90, 90]` by reflection.
pub fn normalize_angle(degrees: f64) -> f64 {
    if degrees > 90.0 {
        180.0 - degrees
    } else if degrees < -90.0 {
        -180.0 - degrees
    } else {
        degrees
    }
}

/// Normalized angle of the segment from `start` to `end`, in degrees.
pub fn line_angle(start: Point, end: Point) -> f64 {
    let dx = f64::from(end.x - start.x);
    let dy = f64::from(end.y - start.y);
    normalize_angle(dy.atan2(dx).to_degrees())
}

/// Where a length label goes relative to its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBucket {
    /// Near vertical: anchored at the topmost endpoint, beside the line
    Straight,
    /// Near horizontal or rising: anchored at the leftmost endpoint, above the line
    Left,
    /// Falling: anchored at the leftmost endpoint, below the line
    Right,
}

impl TextBucket {
    pub fn for_angle(normalized: f64) -> Self {
        if normalized.abs() >= 80.0 {
            TextBucket::Straight
        } else if normalized < 10.0 {
            TextBucket::Left
        } else {
            TextBucket::Right
        }
    }
}

/// Rotation and anchor for one length label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    pub bucket: TextBucket,
    /// Rotation in degrees, clockwise on screen
    pub angle: f32,
    /// Rotation center and start of the label's baseline
    pub anchor: Point,
}

impl TextPlacement {
    pub fn for_line(start: Point, end: Point) -> Self {
        let angle = line_angle(start, end);
        let bucket = TextBucket::for_angle(angle);
        let anchor = match bucket {
            TextBucket::Straight => {
                if start.y <= end.y {
                    start
                } else {
                    end
                }
            }
            TextBucket::Left | TextBucket::Right => {
                if start.x <= end.x {
                    start
                } else {
                    end
                }
            }
        };
        Self {
            bucket,
            angle: angle as f32,
            anchor,
        }
    }

    /// Top-left corner of a `width` x `height` label box before rotation.
    ///
    /// The box starts at the anchor and runs along the unrotated x axis,
    /// separated from the line by `gap`.
    pub fn box_origin(&self, height: f32, gap: f32) -> (f32, f32) {
        let x = self.anchor.x as f32 + gap;
        let y = match self.bucket {
            TextBucket::Straight | TextBucket::Left => self.anchor.y as f32 - gap - height,
            TextBucket::Right => self.anchor.y as f32 + gap,
        };
        (x, y)
    }
}

/// Label text for a length.
pub fn format_length(length: f64, unit: &str) -> String {
    format!("{length:.2} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_half_scale_doubles_length() {
        let scale = DisplayScale::new((400, 400), (200, 200));
        assert_eq!(scale.x_scale, 2.0);
        let length = scale.length(p(10, 10), p(110, 10), 1.0);
        assert!((length - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_axes_scale_independently() {
        let scale = DisplayScale::new((300, 100), (100, 100));
        assert!((scale.length(p(0, 0), p(10, 0), 1.0) - 30.0).abs() < 1e-9);
        assert!((scale.length(p(0, 0), p(0, 10), 1.0) - 10.0).abs() < 1e-9);
        assert!((scale.length(p(0, 0), p(10, 0), 0.5) - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_is_symmetric() {
        let scale = DisplayScale::new((640, 480), (321, 123));
        let pairs = [(p(3, 9), p(120, -40)), (p(0, 0), p(7, 7)), (p(50, 2), p(1, 99))];
        for (a, b) in pairs {
            assert_eq!(scale.length(a, b, 1.0), scale.length(b, a, 1.0));
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(135.0), 45.0);
        assert_eq!(normalize_angle(180.0), 0.0);
        assert_eq!(normalize_angle(-135.0), -45.0);
        assert_eq!(normalize_angle(90.0), 90.0);
        assert_eq!(normalize_angle(-30.0), -30.0);
    }

    #[test]
    fn test_buckets() {
        assert_eq!(TextBucket::for_angle(0.0), TextBucket::Left);
        assert_eq!(TextBucket::for_angle(-45.0), TextBucket::Left);
        assert_eq!(TextBucket::for_angle(9.9), TextBucket::Left);
        assert_eq!(TextBucket::for_angle(10.0), TextBucket::Right);
        assert_eq!(TextBucket::for_angle(45.0), TextBucket::Right);
        assert_eq!(TextBucket::for_angle(80.0), TextBucket::Straight);
        assert_eq!(TextBucket::for_angle(-85.0), TextBucket::Straight);
    }

    #[test]
    fn test_placement_anchors() {
        let horizontal = TextPlacement::for_line(p(110, 10), p(10, 10));
        assert_eq!(horizontal.bucket, TextBucket::Left);
        assert_eq!(horizontal.anchor, p(10, 10));

        let vertical = TextPlacement::for_line(p(5, 90), p(5, 10));
        assert_eq!(vertical.bucket, TextBucket::Straight);
        assert_eq!(vertical.anchor, p(5, 10));

        let falling = TextPlacement::for_line(p(0, 0), p(30, 30));
        assert_eq!(falling.bucket, TextBucket::Right);
        assert_eq!(falling.anchor, p(0, 0));
        assert!((falling.angle - 45.0).abs() < 1e-4);
    }

    #[test]
    fn test_box_sides() {
        let left = TextPlacement::for_line(p(10, 50), p(60, 50));
        assert_eq!(left.box_origin(12.0, 4.0), (14.0, 34.0));

        let right = TextPlacement::for_line(p(10, 50), p(60, 100));
        assert_eq!(right.box_origin(12.0, 4.0), (14.0, 54.0));
    }

    #[test]
    fn test_format_length() {
        assert_eq!(format_length(200.0, "px"), "200.00 px");
        assert_eq!(format_length(1.005_1, "mm"), "1.01 mm");
    }
}
