//! Pixel-level blending primitives.

use image::{Rgba, RgbaImage};

/// Porter-Duff "over": `top` drawn on top of `bottom`.
pub fn blend_over(bottom: Rgba<u8>, top: Rgba<u8>) -> Rgba<u8> {
    let top_alpha = top[3] as f32 / 255.0;
    let bottom_alpha = bottom[3] as f32 / 255.0;

    let out_alpha = top_alpha + bottom_alpha * (1.0 - top_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |t: u8, b: u8| -> u8 {
        let t = t as f32 / 255.0;
        let b = b as f32 / 255.0;
        let result = (t * top_alpha + b * bottom_alpha * (1.0 - top_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(top[0], bottom[0]),
        blend(top[1], bottom[1]),
        blend(top[2], bottom[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Move every channel of `dst`, alpha included, towards `src` by
/// `weight` out of 255.
pub fn mix(dst: Rgba<u8>, src: Rgba<u8>, weight: u8) -> Rgba<u8> {
    let weight = weight as u32;
    let mut out = dst;
    for c in 0..4 {
        let mixed = src[c] as u32 * weight + dst[c] as u32 * (255 - weight);
        out[c] = ((mixed + 127) / 255) as u8;
    }
    out
}

/// Paste `tile` into `layer` with its top-left corner at `(x, y)`, using the
/// tile's own alpha as the mask.
///
/// Every channel, alpha included, moves towards the tile's value in
/// proportion to the tile's alpha, so transparent tile pixels leave the
/// layer untouched. Parts of the tile outside the layer are clipped.
pub fn paste_masked(layer: &mut RgbaImage, tile: &RgbaImage, x: i32, y: i32) {
    let layer_width = layer.width() as i32;
    let layer_height = layer.height() as i32;

    let x_start = x.max(0);
    let y_start = y.max(0);
    let x_end = (x + tile.width() as i32).min(layer_width);
    let y_end = (y + tile.height() as i32).min(layer_height);

    for ly in y_start..y_end {
        for lx in x_start..x_end {
            let src = *tile.get_pixel((lx - x) as u32, (ly - y) as u32);
            if src[3] == 0 {
                continue;
            }

            let dst = layer.get_pixel_mut(lx as u32, ly as u32);
            *dst = mix(*dst, src, src[3]);
        }
    }
}

/// Multiply every alpha value in `layer` by `factor`.
pub fn scale_alpha(layer: &mut RgbaImage, factor: f32) {
    let factor = factor.clamp(0.0, 1.0);
    for pixel in layer.pixels_mut() {
        pixel[3] = (pixel[3] as f32 * factor).round() as u8;
    }
}

/// Composite `layer` over `base` in place. Both must have the same size.
pub fn composite_over(base: &mut RgbaImage, layer: &RgbaImage) {
    for (bottom, top) in base.pixels_mut().zip(layer.pixels()) {
        if top[3] == 0 {
            continue;
        }
        *bottom = blend_over(*bottom, *top);
    }
}
