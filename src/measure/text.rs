//! Glyph rasterization onto pixmaps.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

/// Fonts tried when no explicit font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/Carlito-Regular.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Approximate metrics used when no font could be loaded.
const FALLBACK_CHAR_WIDTH_RATIO: f32 = 0.6;
const FALLBACK_LINE_HEIGHT_RATIO: f32 = 1.2;

/// Draws single-line text. Without a font only sizes are available and
/// [`TextRenderer::draw`] is a no-op.
#[derive(Clone, Default)]
pub struct TextRenderer {
    font: Option<FontArc>,
}

impl std::fmt::Debug for TextRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRenderer")
            .field("has_font", &self.font.is_some())
            .finish()
    }
}

impl TextRenderer {
    /// Load `explicit` if given, otherwise the first readable system font.
    ///
    /// Logs a single warning when nothing could be loaded.
    pub fn load(explicit: Option<&Path>) -> Self {
        let candidates: Vec<PathBuf> = match explicit {
            Some(path) => vec![path.to_path_buf()],
            None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
        };

        for path in &candidates {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            match FontVec::try_from_vec_and_index(data, 0) {
                Ok(font) => {
                    log::debug!("Using font {:?}", path);
                    return Self::from_font(FontArc::new(font));
                }
                Err(e) => log::warn!("Failed to parse font {:?}: {}", path, e),
            }
        }

        match explicit {
            Some(path) => log::warn!(
                "Font {:?} could not be loaded; text will be drawn as blank boxes",
                path
            ),
            None => log::warn!(
                "No system fonts found; text will be drawn as blank boxes. Use --font to pick one."
            ),
        }
        Self::without_font()
    }

    pub fn from_font(font: FontArc) -> Self {
        Self { font: Some(font) }
    }

    pub fn without_font() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width and height of `text` at `size` pixels.
    pub fn measure(&self, text: &str, size: f32) -> (f32, f32) {
        let Some(font) = &self.font else {
            let chars = text.chars().count() as f32;
            return (
                chars * size * FALLBACK_CHAR_WIDTH_RATIO,
                size * FALLBACK_LINE_HEIGHT_RATIO,
            );
        };
        let scaled = font.as_scaled(PxScale::from(size));
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        (width, scaled.ascent() - scaled.descent())
    }

    /// Draw `text` with its top-left corner at `(x, top)`.
    ///
    /// Coverage is blended over whatever the pixmap already holds.
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, size: f32, x: f32, top: f32, color: [u8; 4]) {
        let Some(font) = &self.font else {
            return;
        };
        let scaled = font.as_scaled(PxScale::from(size));
        let baseline = top + scaled.ascent();
        let (pw, ph) = (pixmap.width() as i32, pixmap.height() as i32);
        let pixels = pixmap.pixels_mut();

        let mut cursor = x;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                cursor += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(PxScale::from(size), point(cursor, baseline));
            cursor += scaled.h_advance(id);
            prev = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x as i32 + gx as i32;
                let py = bounds.min.y as i32 + gy as i32;
                if px < 0 || py < 0 || px >= pw || py >= ph {
                    return;
                }
                let idx = (py * pw + px) as usize;
                pixels[idx] = blend(pixels[idx], color, coverage);
            });
        }
    }
}

/// Source-over blend of a straight-alpha color with coverage onto a premultiplied pixel.
fn blend(dst: PremultipliedColorU8, color: [u8; 4], coverage: f32) -> PremultipliedColorU8 {
    let a = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - a;
    let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let out_a = mix(255, dst.alpha());
    let r = mix(color[0], dst.red()).min(out_a);
    let g = mix(color[1], dst.green()).min(out_a);
    let b = mix(color[2], dst.blue()).min(out_a);
    PremultipliedColorU8::from_rgba(r, g, b, out_a).unwrap_or(dst)
}
