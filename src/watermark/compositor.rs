//! Tile-and-composite watermarking.
//!
//! A watermark tile (outlined text or a pre-rendered graphic) is stamped
//! over the whole image on a jittered grid, each copy turned by its own
//! random angle. All copies land on one transparent layer whose alpha is
//! then scaled once, so overlapping tiles never get darker than the rest,
//! and that layer is blended over the photo and encoded as JPEG.

use super::asset::{fit_to_base, load_asset};
use super::blend::{composite_over, paste_masked, scale_alpha};
use super::font::FontChain;
use super::rotate::rotate_expand;
use super::text::{render_text_tile, TextTileOptions};
use super::tiling::{scatter, TileGrid, TilingOptions};
use super::{NamedColor, WatermarkError};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::time::Instant;

/// What gets tiled across the image.
#[derive(Debug, Clone)]
pub enum WatermarkSpec {
    /// Text drawn with the first loadable font of `fonts`, filled with the
    /// requested palette colour and outlined with `outline`.
    Text {
        text: String,
        fonts: FontChain,
        font_size: f32,
        outline: Rgba<u8>,
        padding: u32,
    },
    /// A PNG picked from `asset_dir` by colour name, resized so its width
    /// is `scale` times the photo's width.
    Image { asset_dir: PathBuf, scale: f32 },
}

/// Everything about a composite except what is tiled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeOptions {
    pub tiling: TilingOptions,
    /// Applied once to the whole watermark layer; must lie strictly
    /// between 0 and 1 so the photo always shows through.
    pub opacity: f32,
    pub jpeg_quality: u8,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            tiling: TilingOptions::default(),
            opacity: 0.5,
            jpeg_quality: 95,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Compositor {
    spec: WatermarkSpec,
    options: CompositeOptions,
}

impl Compositor {
    pub fn new(spec: WatermarkSpec, options: CompositeOptions) -> Result<Self, WatermarkError> {
        validate(&spec, &options)?;
        Ok(Self { spec, options })
    }

    pub fn spec(&self) -> &WatermarkSpec {
        &self.spec
    }

    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    /// Watermark the encoded image in `bytes` and return JPEG bytes.
    ///
    /// With a `seed` the output is byte-for-byte reproducible; without one
    /// every call scatters the tiles differently.
    pub fn composite(
        &self,
        bytes: &[u8],
        color: NamedColor,
        seed: Option<u64>,
    ) -> Result<Vec<u8>, WatermarkError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.composite_with_rng(bytes, color, &mut rng)
    }

    pub fn composite_with_rng<R: Rng>(
        &self,
        bytes: &[u8],
        color: NamedColor,
        rng: &mut R,
    ) -> Result<Vec<u8>, WatermarkError> {
        let start = Instant::now();

        let mut base = decode_image(bytes)?.to_rgba8();
        let tile = self.render_tile(color, base.dimensions())?;
        let (layer, tiles) = self.watermark_layer(&tile, base.dimensions(), rng);

        composite_over(&mut base, &layer);
        let output = encode_jpeg(base, self.options.jpeg_quality)?;

        debug!(
            "Watermarked {}x{} image with {} tiles in {:?}",
            layer.width(),
            layer.height(),
            tiles,
            start.elapsed()
        );
        Ok(output)
    }

    /// The single, unrotated watermark tile for `color`.
    pub fn render_tile(
        &self,
        color: NamedColor,
        base_size: (u32, u32),
    ) -> Result<RgbaImage, WatermarkError> {
        match &self.spec {
            WatermarkSpec::Text {
                text,
                fonts,
                font_size,
                outline,
                padding,
            } => {
                let font = fonts.load()?;
                let options = TextTileOptions {
                    text: text.clone(),
                    font_size: *font_size,
                    fill: color.rgba(),
                    outline: *outline,
                    padding: *padding,
                };
                render_text_tile(&font, &options)
            }
            WatermarkSpec::Image { asset_dir, scale } => {
                let asset = load_asset(asset_dir, color)?;
                Ok(fit_to_base(&asset, base_size, *scale))
            }
        }
    }

    /// Scatter `tile` over a transparent layer of `size` and scale its
    /// alpha by the configured opacity. Returns the layer and tile count.
    fn watermark_layer<R: Rng>(
        &self,
        tile: &RgbaImage,
        size: (u32, u32),
        rng: &mut R,
    ) -> (RgbaImage, usize) {
        let tiling = &self.options.tiling;
        let grid = TileGrid::new(size, tile.dimensions(), tiling.margin);
        let placements = scatter(&grid, tile.dimensions(), tiling, rng);

        let mut layer = RgbaImage::new(size.0, size.1);
        for placement in &placements {
            let rotated = rotate_expand(tile, placement.angle);
            paste_masked(&mut layer, &rotated, placement.x, placement.y);
        }
        scale_alpha(&mut layer, self.options.opacity);

        (layer, placements.len())
    }
}

fn validate(spec: &WatermarkSpec, options: &CompositeOptions) -> Result<(), WatermarkError> {
    let invalid = |msg: String| -> Result<(), WatermarkError> {
        Err(WatermarkError::InvalidSettings(msg))
    };

    if !(options.opacity > 0.0 && options.opacity < 1.0) {
        return invalid(format!(
            "opacity must be between 0 and 1 (exclusive), got {}",
            options.opacity
        ));
    }
    if !(0.0..1.0).contains(&options.tiling.jitter) {
        return invalid(format!(
            "jitter must be in [0, 1), got {}",
            options.tiling.jitter
        ));
    }
    if !options.tiling.max_rotation.is_finite() {
        return invalid("max_rotation must be finite".to_string());
    }
    if !(1..=100).contains(&options.jpeg_quality) {
        return invalid(format!(
            "jpeg quality must be within 1..=100, got {}",
            options.jpeg_quality
        ));
    }

    match spec {
        WatermarkSpec::Text {
            text, font_size, ..
        } => {
            if text.trim().is_empty() {
                return invalid("watermark text is empty".to_string());
            }
            if !(*font_size > 0.0 && font_size.is_finite()) {
                return invalid(format!("font size must be positive, got {}", font_size));
            }
        }
        WatermarkSpec::Image { scale, .. } => {
            if !(*scale > 0.0 && scale.is_finite()) {
                return invalid(format!("image scale must be positive, got {}", scale));
            }
        }
    }

    Ok(())
}

/// Decode user-supplied bytes into an image with a non-zero size.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, WatermarkError> {
    if bytes.is_empty() {
        return Err(WatermarkError::Decode("input is empty".to_string()));
    }

    let image = if image::guess_format(bytes).ok() == Some(ImageFormat::WebP) {
        webp::Decoder::new(bytes)
            .decode()
            .ok_or_else(|| WatermarkError::Decode("invalid WebP image".to_string()))?
            .to_image()
    } else {
        image::load_from_memory(bytes).map_err(|e| WatermarkError::Decode(e.to_string()))?
    };

    if image.width() == 0 || image.height() == 0 {
        return Err(WatermarkError::Decode(format!(
            "image has no pixels ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(image)
}

/// Drop the alpha channel and encode as JPEG.
fn encode_jpeg(image: RgbaImage, quality: u8) -> Result<Vec<u8>, WatermarkError> {
    let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
    let mut output = Vec::new();
    JpegEncoder::new_with_quality(&mut output, quality).encode(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ColorType::Rgb8,
    )?;
    Ok(output)
}
