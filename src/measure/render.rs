//! Overlay rendering with tiny-skia.
//!
//! Lines are stroked straight onto the frame. Length labels are drawn on a
//! transparent layer, rotated around their anchor and then copied onto the
//! frame wherever the rotated layer is not transparent.

use image::RgbaImage;
use tiny_skia::{
    FilterQuality, IntSize, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke, Transform,
};

use super::geometry::TextPlacement;
use super::text::TextRenderer;
use crate::constants::overlay;
use crate::model::Point;

/// Colors and sizes of the measurement overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub line_color: [u8; 4],
    pub line_width: f32,
    pub font_size: f32,
    pub text_color: [u8; 4],
    pub text_background: [u8; 4],
    pub padding: f32,
    pub gap: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_color: overlay::LINE_COLOR,
            line_width: overlay::LINE_WIDTH,
            font_size: overlay::FONT_SIZE,
            text_color: overlay::TEXT_COLOR,
            text_background: overlay::TEXT_BACKGROUND,
            padding: overlay::TEXT_PADDING,
            gap: overlay::TEXT_OFFSET,
        }
    }
}

/// Run `f` on a pixmap view of an opaque frame and copy the result back.
///
/// Frames from `codec::decode` are flattened, so straight and premultiplied
/// alpha coincide.
pub fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = img.dimensions();
    let Some(size) = IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    img.copy_from_slice(pixmap.data());
}

fn paint_for(color: [u8; 4], anti_alias: bool) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
    paint.anti_alias = anti_alias;
    paint
}

/// Stroke a line segment.
pub fn draw_line(pixmap: &mut Pixmap, start: Point, end: Point, style: &OverlayStyle) {
    let mut pb = PathBuilder::new();
    pb.move_to(start.x as f32, start.y as f32);
    pb.line_to(end.x as f32, end.y as f32);
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width: style.line_width,
        line_cap: LineCap::Round,
        ..Default::default()
    };
    pixmap.stroke_path(
        &path,
        &paint_for(style.line_color, true),
        &stroke,
        Transform::identity(),
        None,
    );
}

/// Draw a length label on a transparent layer of `size`, rotated into place.
///
/// The label box is rendered on its own and then mapped onto the layer with
/// a rotation around the anchor, so boxes near the frame edge are not clipped
/// before they are turned.
pub fn label_layer(
    size: (u32, u32),
    placement: &TextPlacement,
    text: &str,
    renderer: &TextRenderer,
    style: &OverlayStyle,
) -> Option<Pixmap> {
    let (text_w, text_h) = renderer.measure(text, style.font_size);
    let box_w = (text_w + style.padding * 2.0).ceil().max(1.0);
    let box_h = (text_h + style.padding * 2.0).ceil().max(1.0);

    let mut label = Pixmap::new(box_w as u32, box_h as u32)?;
    let background = style.text_background;
    label.fill(tiny_skia::Color::from_rgba8(
        background[0],
        background[1],
        background[2],
        background[3],
    ));
    renderer.draw(
        &mut label,
        text,
        style.font_size,
        style.padding,
        style.padding,
        style.text_color,
    );

    let (x, y) = placement.box_origin(box_h, style.gap);
    let transform = Transform::from_rotate_at(
        placement.angle,
        placement.anchor.x as f32,
        placement.anchor.y as f32,
    )
    .pre_translate(x, y);

    let mut layer = Pixmap::new(size.0, size.1)?;
    let paint = PixmapPaint {
        quality: FilterQuality::Nearest,
        ..Default::default()
    };
    layer.draw_pixmap(0, 0, label.as_ref(), &paint, transform, None);
    Some(layer)
}

/// Copy every non-transparent pixel of `layer` onto `frame`.
///
/// Pixels are overwritten, not blended, and land fully opaque.
pub fn composite_masked(frame: &mut RgbaImage, layer: &Pixmap) {
    let width = layer.width().min(frame.width());
    let height = layer.height().min(frame.height());
    let pixels = layer.pixels();
    for y in 0..height {
        for x in 0..width {
            let src = pixels[(y * layer.width() + x) as usize];
            if src.alpha() == 0 {
                continue;
            }
            let c = src.demultiply();
            frame.put_pixel(x, y, image::Rgba([c.red(), c.green(), c.blue(), 255]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn style() -> OverlayStyle {
        OverlayStyle {
            line_color: [255, 0, 0, 255],
            line_width: 2.0,
            font_size: 10.0,
            text_color: [255, 255, 255, 255],
            text_background: [0, 0, 255, 255],
            padding: 2.0,
            gap: 3.0,
        }
    }

    #[test]
    fn test_draw_line_marks_pixels_along_segment() {
        let mut frame = RgbaImage::from_pixel(50, 20, Rgba([0, 0, 0, 255]));
        with_pixmap(&mut frame, |pixmap| {
            draw_line(pixmap, Point::new(5, 10), Point::new(45, 10), &style());
        });
        assert_eq!(frame.get_pixel(25, 10)[0], 255);
        assert_eq!(frame.get_pixel(25, 2), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_masked_composite_leaves_transparent_pixels_alone() {
        let mut frame = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        let mut layer = Pixmap::new(4, 4).unwrap();
        layer.fill_rect(
            tiny_skia::Rect::from_xywh(0.0, 0.0, 2.0, 4.0).unwrap(),
            &paint_for([0, 200, 0, 255], false),
            Transform::identity(),
            None,
        );
        composite_masked(&mut frame, &layer);
        assert_eq!(frame.get_pixel(0, 0), &Rgba([0, 200, 0, 255]));
        assert_eq!(frame.get_pixel(3, 3), &Rgba([9, 9, 9, 255]));
    }

    #[test]
    fn test_horizontal_label_sits_above_line() {
        let renderer = TextRenderer::without_font();
        let placement = TextPlacement::for_line(Point::new(10, 60), Point::new(90, 60));
        let layer = label_layer((120, 80), &placement, "80.00 px", &renderer, &style()).unwrap();

        let alpha_at = |x: u32, y: u32| layer.pixels()[(y * 120 + x) as usize].alpha();
        // Box spans upward from 3px above the line
        assert_eq!(alpha_at(20, 55), 255);
        assert_eq!(alpha_at(20, 62), 0);
    }

    #[test]
    fn test_vertical_label_is_rotated_beside_line() {
        let renderer = TextRenderer::without_font();
        let placement = TextPlacement::for_line(Point::new(40, 10), Point::new(40, 70));
        assert_eq!(placement.angle, 90.0);
        let layer = label_layer((100, 100), &placement, "60.00 px", &renderer, &style()).unwrap();

        let alpha_at = |x: u32, y: u32| layer.pixels()[(y * 100 + x) as usize].alpha();
        // Rotated a quarter turn clockwise the box runs down the right side
        assert_eq!(alpha_at(46, 30), 255);
        assert_eq!(alpha_at(34, 30), 0);
    }
}
