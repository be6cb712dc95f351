//! Pre-rendered watermark graphics, one PNG per palette colour.

use super::{NamedColor, WatermarkError};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Asset used when there is no graphic for the requested colour.
pub const FALLBACK_ASSET: &str = "default.png";

/// Candidate files for `color` inside `dir`, most specific first.
pub fn asset_candidates(dir: &Path, color: NamedColor) -> Vec<PathBuf> {
    vec![
        dir.join(format!("{}.png", color.key())),
        dir.join(FALLBACK_ASSET),
    ]
}

/// Load the watermark graphic for `color` from `dir`.
pub fn load_asset(dir: &Path, color: NamedColor) -> Result<RgbaImage, WatermarkError> {
    let candidates = asset_candidates(dir, color);
    for path in &candidates {
        match image::open(path) {
            Ok(asset) => {
                debug!("Using watermark asset {}", path.display());
                return Ok(asset.to_rgba8());
            }
            Err(e) => warn!("Could not load watermark asset {}: {}", path.display(), e),
        }
    }

    Err(WatermarkError::AssetMissing {
        kind: "watermark asset",
        tried: candidates,
    })
}

/// Resize `asset` to fit inside `scale` times the base image on both axes,
/// keeping the aspect ratio.
pub fn fit_to_base(asset: &RgbaImage, base_size: (u32, u32), scale: f32) -> RgbaImage {
    let bound = |side: u32| ((side as f32 * scale).round()).max(1.0);
    let ratio = (bound(base_size.0) / asset.width().max(1) as f32)
        .min(bound(base_size.1) / asset.height().max(1) as f32);
    let target_width = ((asset.width() as f32 * ratio).round() as u32).max(1);
    let target_height = ((asset.height() as f32 * ratio).round() as u32).max(1);

    imageops::resize(asset, target_width, target_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn write_asset(dir: &Path, name: &str, color: Rgba<u8>) {
        RgbaImage::from_pixel(40, 20, color)
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn test_loads_colour_specific_asset() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "red.png", Rgba([200, 0, 0, 255]));
        write_asset(dir.path(), "default.png", Rgba([0, 0, 0, 255]));

        let asset = load_asset(dir.path(), NamedColor::Red).unwrap();
        assert_eq!(asset.get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_falls_back_to_default_asset() {
        let dir = tempfile::tempdir().unwrap();
        write_asset(dir.path(), "default.png", Rgba([0, 0, 0, 255]));

        let asset = load_asset(dir.path(), NamedColor::Blue).unwrap();
        assert_eq!(asset.dimensions(), (40, 20));
    }

    #[test]
    fn test_missing_assets_report_every_candidate() {
        let dir = tempfile::tempdir().unwrap();

        match load_asset(dir.path(), NamedColor::Green) {
            Err(WatermarkError::AssetMissing { tried, .. }) => {
                assert_eq!(tried, asset_candidates(dir.path(), NamedColor::Green));
            }
            other => panic!("expected AssetMissing, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_fit_to_base_keeps_aspect_ratio() {
        let asset = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));

        let fitted = fit_to_base(&asset, (1000, 1000), 0.2);
        assert_eq!(fitted.dimensions(), (200, 100));

        let fitted = fit_to_base(&asset, (500, 500), 0.2);
        assert_eq!(fitted.dimensions(), (100, 50));
    }

    #[test]
    fn test_fit_to_base_never_collapses() {
        let asset = RgbaImage::from_pixel(200, 10, Rgba([0, 0, 0, 255]));
        let fitted = fit_to_base(&asset, (2, 2), 0.2);
        assert_eq!(fitted.dimensions(), (1, 1));
    }

    #[test]
    fn test_fit_to_base_bounds_tall_asset_on_short_photo() {
        let asset = RgbaImage::from_pixel(10, 500, Rgba([0, 0, 0, 255]));

        let fitted = fit_to_base(&asset, (4000, 100), 0.2);
        assert_eq!(fitted.dimensions(), (1, 20));
    }

    #[test]
    fn test_fit_to_base_uses_the_tighter_axis() {
        let asset = RgbaImage::from_pixel(200, 100, Rgba([0, 0, 0, 255]));

        let fitted = fit_to_base(&asset, (4000, 100), 0.2);
        assert_eq!(fitted.dimensions(), (40, 20));
    }
}
