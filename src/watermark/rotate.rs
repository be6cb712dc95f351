//! Rotation with canvas expansion.

use image::{Rgba, RgbaImage};

/// Rotate `image` by `degrees` counter-clockwise about its centre.
///
/// The canvas grows to the rotated bounding box so no corner is clipped;
/// area outside the source becomes transparent. Sampling is bilinear on
/// premultiplied colour so transparent neighbours do not darken edges.
pub fn rotate_expand(image: &RgbaImage, degrees: f32) -> RgbaImage {
    if degrees == 0.0 || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }

    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();

    let src_w = image.width() as f32;
    let src_h = image.height() as f32;

    let dst_w = (src_w * cos.abs() + src_h * sin.abs()).ceil().max(1.0) as u32;
    let dst_h = (src_w * sin.abs() + src_h * cos.abs()).ceil().max(1.0) as u32;

    let mut rotated = RgbaImage::new(dst_w, dst_h);

    let src_cx = src_w / 2.0;
    let src_cy = src_h / 2.0;
    let dst_cx = dst_w as f32 / 2.0;
    let dst_cy = dst_h as f32 / 2.0;

    for dy in 0..dst_h {
        for dx in 0..dst_w {
            // Pixel centre relative to the destination centre, y pointing down
            let rx = dx as f32 + 0.5 - dst_cx;
            let ry = dy as f32 + 0.5 - dst_cy;

            // Inverse of a counter-clockwise rotation in screen coordinates
            let sx = rx * cos - ry * sin + src_cx - 0.5;
            let sy = rx * sin + ry * cos + src_cy - 0.5;

            if let Some(pixel) = sample_bilinear(image, sx, sy) {
                rotated.put_pixel(dx, dy, pixel);
            }
        }
    }

    rotated
}

fn sample_bilinear(image: &RgbaImage, sx: f32, sy: f32) -> Option<Rgba<u8>> {
    let (w, h) = (image.width() as i32, image.height() as i32);
    if sx <= -1.0 || sy <= -1.0 || sx >= w as f32 || sy >= h as f32 {
        return None;
    }

    let x0 = sx.floor() as i32;
    let y0 = sy.floor() as i32;
    let fx = sx - x0 as f32;
    let fy = sy - y0 as f32;

    let fetch = |x: i32, y: i32| -> [f32; 4] {
        if x < 0 || y < 0 || x >= w || y >= h {
            return [0.0; 4];
        }
        let p = image.get_pixel(x as u32, y as u32);
        let a = p[3] as f32 / 255.0;
        [p[0] as f32 * a, p[1] as f32 * a, p[2] as f32 * a, p[3] as f32]
    };

    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1, y0);
    let p01 = fetch(x0, y0 + 1);
    let p11 = fetch(x0 + 1, y0 + 1);

    let mut out = [0.0f32; 4];
    for c in 0..4 {
        out[c] = p00[c] * (1.0 - fx) * (1.0 - fy)
            + p10[c] * fx * (1.0 - fy)
            + p01[c] * (1.0 - fx) * fy
            + p11[c] * fx * fy;
    }

    let alpha = out[3];
    if alpha < 0.5 {
        return None;
    }
    let unpremultiply = |v: f32| (v * 255.0 / alpha).round().clamp(0.0, 255.0) as u8;

    Some(Rgba([
        unpremultiply(out[0]),
        unpremultiply(out[1]),
        unpremultiply(out[2]),
        alpha.round().clamp(0.0, 255.0) as u8,
    ]))
}
