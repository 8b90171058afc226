//! Description banner stacked above each image.

use image::{Rgba, RgbaImage, imageops};

use crate::constants::{COMPLETION_FRAME_SIZE, banner};
use crate::measure::{TextRenderer, with_pixmap};

/// Rows of help text drawn on a white strip above the image.
#[derive(Debug, Clone)]
pub struct Banner {
    rows: Vec<(String, [u8; 4])>,
    text: TextRenderer,
}

impl Banner {
    /// Banner with the navigation help line and, if given, a class legend.
    pub fn new(help: String, legend: &[String], text: TextRenderer) -> Self {
        let mut rows = Vec::new();
        if !legend.is_empty() {
            rows.push((legend.join(" | "), banner::LEGEND_COLOR));
        }
        rows.push((help, banner::HELP_COLOR));
        Self { rows, text }
    }

    /// Height in pixels; pointer positions are offset by this much.
    pub fn height(&self) -> u32 {
        self.rows.len() as u32 * banner::ROW_HEIGHT
    }

    /// Stack the banner on top of `image`.
    pub fn compose(&self, image: &RgbaImage) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(
            image.width(),
            image.height() + self.height(),
            Rgba(banner::BACKGROUND),
        );
        self.draw_rows(&mut frame);
        imageops::replace(&mut frame, image, 0, i64::from(self.height()));
        frame
    }

    fn draw_rows(&self, frame: &mut RgbaImage) {
        with_pixmap(frame, |pixmap| {
            for (i, (row, color)) in self.rows.iter().enumerate() {
                let (_, h) = self.text.measure(row, banner::FONT_SIZE);
                let top = (i as u32 * banner::ROW_HEIGHT) as f32
                    + (banner::ROW_HEIGHT as f32 - h).max(0.0) / 2.0;
                self.text.draw(
                    pixmap,
                    row,
                    banner::FONT_SIZE,
                    banner::PADDING_X as f32,
                    top,
                    *color,
                );
            }
        });
    }
}

/// Plain frame carrying a single message, shown when labeling is complete.
pub fn message_frame(message: &str, text: &TextRenderer) -> RgbaImage {
    let (w, h) = COMPLETION_FRAME_SIZE;
    let mut frame = RgbaImage::from_pixel(w, h, Rgba(banner::BACKGROUND));
    with_pixmap(&mut frame, |pixmap| {
        let (_, text_h) = text.measure(message, banner::FONT_SIZE);
        let top = (h as f32 - text_h).max(0.0) / 2.0;
        text.draw(
            pixmap,
            message,
            banner::FONT_SIZE,
            banner::PADDING_X as f32,
            top,
            banner::HELP_COLOR,
        );
    });
    frame
}
