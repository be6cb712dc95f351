//! Text watermark tiles.
//!
//! A tile is the shaped text drawn once into the smallest box that holds
//! it, plus padding, with a one pixel outline around every glyph so the
//! mark stays readable on both dark and light photos.

use super::blend::mix;
use super::shaping::shape_for_display;
use super::WatermarkError;
use ab_glyph::{point, Font, FontArc, Glyph, PxScale, Rect, ScaleFont};
use image::{Rgba, RgbaImage};

/// The eight neighbours the outline is stamped at.
const OUTLINE_OFFSETS: [(f32, f32); 8] = [
    (-1.0, -1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (1.0, 1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (0.0, -1.0),
    (0.0, 1.0),
];

#[derive(Debug, Clone)]
pub struct TextTileOptions {
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    pub fill: Rgba<u8>,
    pub outline: Rgba<u8>,
    /// Total padding added around the text box, split evenly between sides.
    pub padding: u32,
}

impl Default for TextTileOptions {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 60.0,
            fill: Rgba([0, 0, 0, 180]),
            outline: Rgba([255, 255, 255, 200]),
            padding: 20,
        }
    }
}

/// Lay out `text` on a single line starting at the origin baseline.
fn layout(font: &FontArc, scale: PxScale, text: &str) -> Vec<Glyph> {
    let scaled_font = font.as_scaled(scale);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor_x = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);
        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }
        glyphs.push(glyph_id.with_scale_and_position(scale, point(cursor_x, 0.0)));
        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    glyphs
}

/// Union of the pixel bounds of every visible glyph.
fn ink_bounds(font: &FontArc, glyphs: &[Glyph]) -> Option<Rect> {
    glyphs
        .iter()
        .filter_map(|g| font.outline_glyph(g.clone()))
        .map(|outlined| outlined.px_bounds())
        .reduce(|a, b| Rect {
            min: point(a.min.x.min(b.min.x), a.min.y.min(b.min.y)),
            max: point(a.max.x.max(b.max.x), a.max.y.max(b.max.y)),
        })
}

fn draw_glyphs(
    canvas: &mut RgbaImage,
    font: &FontArc,
    glyphs: &[Glyph],
    origin: (f32, f32),
    color: Rgba<u8>,
) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);

    for glyph in glyphs {
        let mut glyph = glyph.clone();
        glyph.position = point(glyph.position.x + origin.0, glyph.position.y + origin.1);

        let outlined = match font.outline_glyph(glyph) {
            Some(outlined) => outlined,
            None => continue,
        };
        let bounds = outlined.px_bounds();

        outlined.draw(|px, py, coverage| {
            let x = px as i32 + bounds.min.x as i32;
            let y = py as i32 + bounds.min.y as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }

            let weight = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            *pixel = mix(*pixel, color, weight);
        });
    }
}

/// Render one outlined text tile with `font`.
pub fn render_text_tile(
    font: &FontArc,
    options: &TextTileOptions,
) -> Result<RgbaImage, WatermarkError> {
    let text = shape_for_display(&options.text);
    let scale = PxScale::from(options.font_size);
    let glyphs = layout(font, scale, &text);

    let bounds = ink_bounds(font, &glyphs).ok_or_else(|| {
        WatermarkError::Composite(format!(
            "watermark text {:?} has no visible glyphs",
            options.text
        ))
    })?;

    let text_width = (bounds.max.x - bounds.min.x).ceil() as u32;
    let text_height = (bounds.max.y - bounds.min.y).ceil() as u32;
    let mut tile = RgbaImage::new(
        (text_width + options.padding).max(1),
        (text_height + options.padding).max(1),
    );

    // Shift the ink box so its top-left corner lands at the padding offset
    let half_padding = options.padding as f32 / 2.0;
    let origin = (half_padding - bounds.min.x, half_padding - bounds.min.y);

    for (dx, dy) in OUTLINE_OFFSETS {
        draw_glyphs(
            &mut tile,
            font,
            &glyphs,
            (origin.0 + dx, origin.1 + dy),
            options.outline,
        );
    }
    draw_glyphs(&mut tile, font, &glyphs, origin, options.fill);

    Ok(tile)
}
