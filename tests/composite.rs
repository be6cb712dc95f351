use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use watermark_bot::config::WatermarkSettings;
use watermark_bot::watermark::{
    CompositeOptions, Compositor, FontChain, FontSource, NamedColor, TilingOptions,
    WatermarkError, WatermarkSpec,
};

fn jpeg_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 90)
        .encode(image.as_raw(), width, height, ColorType::Rgb8)
        .unwrap();
    bytes
}

fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let image = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn text_compositor(opacity: f32) -> Compositor {
    let spec = WatermarkSpec::Text {
        text: "صياد العروض".to_string(),
        fonts: FontChain::default(),
        font_size: 32.0,
        outline: Rgba([255, 255, 255, 200]),
        padding: 20,
    };
    let options = CompositeOptions {
        opacity,
        ..Default::default()
    };
    Compositor::new(spec, options).unwrap()
}

fn webp_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb(color));
    webp::Encoder::from_rgb(image.as_raw(), width, height)
        .encode(80.0)
        .to_vec()
}

fn decode(bytes: &[u8]) -> RgbImage {
    image::load_from_memory(bytes).unwrap().to_rgb8()
}

#[test]
fn output_keeps_input_dimensions() {
    let compositor = text_compositor(0.5);
    for (width, height) in [(1, 1), (17, 300), (320, 240), (640, 100)] {
        let output = compositor
            .composite(&jpeg_bytes(width, height, [90, 90, 90]), NamedColor::Black, None)
            .unwrap();
        let decoded = decode(&output);
        assert_eq!(decoded.dimensions(), (width, height));
    }
}

#[test]
fn transparent_png_input_becomes_opaque_jpeg() {
    let compositor = text_compositor(0.5);
    let output = compositor
        .composite(&png_bytes(120, 80, [10, 20, 30, 0]), NamedColor::White, Some(5))
        .unwrap();

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
    let decoded = image::load_from_memory(&output).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (120, 80));
}

#[test]
fn base_image_stays_visible_for_any_opacity() {
    let input = jpeg_bytes(200, 150, [0, 200, 0]);
    for opacity in [0.1, 0.5, 0.9, 0.99] {
        let compositor = text_compositor(opacity);
        for color in [NamedColor::Black, NamedColor::White] {
            let output = compositor.composite(&input, color, Some(11)).unwrap();
            for pixel in decode(&output).pixels() {
                let [r, g, b] = pixel.0;
                assert!(
                    g as i32 > r as i32 + 20 && g as i32 > b as i32 + 20,
                    "green base lost under opacity {}: {:?}",
                    opacity,
                    pixel
                );
            }
        }
    }
}

#[test]
fn watermark_changes_the_image() {
    let compositor = text_compositor(0.5);
    let output = compositor
        .composite(&jpeg_bytes(300, 200, [255, 255, 255]), NamedColor::Black, Some(2))
        .unwrap();
    let darkest = decode(&output).pixels().map(|p| p[0]).min().unwrap();
    assert!(darkest < 230, "no watermark visible, darkest pixel {}", darkest);
}

#[test]
fn processed_output_can_be_processed_again() {
    let compositor = text_compositor(0.5);
    let first = compositor
        .composite(&jpeg_bytes(256, 128, [40, 80, 120]), NamedColor::Red, None)
        .unwrap();
    let second = compositor.composite(&first, NamedColor::Blue, None).unwrap();
    assert_eq!(decode(&second).dimensions(), (256, 128));
}

#[test]
fn missing_primary_font_still_produces_output() {
    let spec = WatermarkSpec::Text {
        text: "Protected".to_string(),
        fonts: FontChain::with_builtin_fallback(vec![
            PathBuf::from("/nonexistent/fonts/Amiri-Regular.ttf"),
            PathBuf::from("/nonexistent/fonts/Arial.ttf"),
        ]),
        font_size: 40.0,
        outline: Rgba([255, 255, 255, 200]),
        padding: 20,
    };
    let compositor = Compositor::new(spec, CompositeOptions::default()).unwrap();

    let output = compositor
        .composite(&jpeg_bytes(240, 160, [255, 255, 255]), NamedColor::Black, None)
        .unwrap();
    assert_eq!(decode(&output).dimensions(), (240, 160));
}

#[test]
fn exhausted_font_chain_fails_without_output() {
    let spec = WatermarkSpec::Text {
        text: "Protected".to_string(),
        fonts: FontChain::new(vec![FontSource::File(PathBuf::from(
            "/nonexistent/fonts/Amiri-Regular.ttf",
        ))]),
        font_size: 40.0,
        outline: Rgba([255, 255, 255, 200]),
        padding: 20,
    };
    let compositor = Compositor::new(spec, CompositeOptions::default()).unwrap();

    let result = compositor.composite(&jpeg_bytes(64, 64, [0, 0, 0]), NamedColor::Black, None);
    assert!(matches!(result, Err(WatermarkError::AssetMissing { .. })));
}

#[test]
fn corrupt_or_empty_input_is_a_decode_error() {
    let compositor = text_compositor(0.5);

    for input in [&b""[..], &b"\xff\xd8\xff garbage"[..], &[0u8; 512][..]] {
        match compositor.composite(input, NamedColor::Black, None) {
            Err(WatermarkError::Decode(_)) => {}
            other => panic!("expected Decode error, got {:?}", other.map(|b| b.len())),
        }
    }
}

#[test]
fn same_seed_gives_identical_bytes() {
    let compositor = text_compositor(0.5);
    let input = jpeg_bytes(300, 200, [200, 180, 160]);

    let a = compositor.composite(&input, NamedColor::Orange, Some(1234)).unwrap();
    let b = compositor.composite(&input, NamedColor::Orange, Some(1234)).unwrap();
    assert_eq!(a, b);

    let c = compositor.composite(&input, NamedColor::Orange, Some(4321)).unwrap();
    assert_ne!(a, c);
}

#[test]
fn unseeded_runs_differ() {
    let compositor = text_compositor(0.5);
    let input = jpeg_bytes(300, 200, [200, 180, 160]);

    let a = compositor.composite(&input, NamedColor::Black, None).unwrap();
    let b = compositor.composite(&input, NamedColor::Black, None).unwrap();
    assert_ne!(a, b);
    assert_eq!(decode(&a).dimensions(), decode(&b).dimensions());
}

#[test]
fn concurrent_calls_are_independent() {
    let compositor = Arc::new(text_compositor(0.5));
    let input = Arc::new(jpeg_bytes(200, 120, [30, 60, 90]));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let compositor = Arc::clone(&compositor);
            let input = Arc::clone(&input);
            thread::spawn(move || compositor.composite(&input, NamedColor::Green, Some(9)))
        })
        .collect();

    let outputs: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn full_hd_black_watermark_with_defaults() {
    let compositor = WatermarkSettings::default().compositor().unwrap();
    let input = jpeg_bytes(1920, 1080, [255, 255, 255]);

    let output = compositor.composite(&input, NamedColor::Black, Some(2024)).unwrap();

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
    let decoded = decode(&output);
    assert_eq!(decoded.dimensions(), (1920, 1080));

    // Every quarter-by-quarter block carries part of the watermark
    for by in 0..4 {
        for bx in 0..4 {
            let marked = (0..270).any(|y| {
                (0..480).any(|x| decoded.get_pixel(bx * 480 + x, by * 270 + y)[0] < 220)
            });
            assert!(marked, "block ({}, {}) has no watermark", bx, by);
        }
    }
}

#[test]
fn image_watermark_from_asset_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut asset = RgbaImage::new(100, 40);
    for x in 10..90 {
        for y in 10..30 {
            asset.put_pixel(x, y, Rgba([200, 0, 0, 255]));
        }
    }
    asset.save(dir.path().join("red.png")).unwrap();

    let spec = WatermarkSpec::Image {
        asset_dir: dir.path().to_path_buf(),
        scale: 0.25,
    };
    let options = CompositeOptions {
        tiling: TilingOptions {
            margin: 10,
            ..Default::default()
        },
        ..Default::default()
    };
    let compositor = Compositor::new(spec, options).unwrap();

    let tile = compositor.render_tile(NamedColor::Red, (400, 300)).unwrap();
    assert_eq!(tile.dimensions(), (100, 40));

    let output = compositor
        .composite(&jpeg_bytes(400, 300, [255, 255, 255]), NamedColor::Red, Some(3))
        .unwrap();
    let decoded = decode(&output);
    assert_eq!(decoded.dimensions(), (400, 300));
    assert!(decoded.pixels().any(|p| p[1] < 200 && p[0] > 200));

    let missing = compositor.composite(&jpeg_bytes(400, 300, [255, 255, 255]), NamedColor::Blue, None);
    assert!(matches!(missing, Err(WatermarkError::AssetMissing { .. })));
}

#[test]
fn webp_input_is_watermarked() {
    let compositor = text_compositor(0.5);
    let input = webp_bytes(120, 80, [40, 160, 40]);
    assert_eq!(image::guess_format(&input).unwrap(), ImageFormat::WebP);

    let output = compositor.composite(&input, NamedColor::Black, Some(1)).unwrap();
    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
    assert_eq!(decode(&output).dimensions(), (120, 80));
}

#[test]
fn broken_webp_payload_is_a_decode_error() {
    let payload = [0xffu8; 16];
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(4 + 8 + payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(b"WEBP");
    bytes.extend_from_slice(b"VP8 ");
    bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    bytes.extend_from_slice(&payload);

    let result = text_compositor(0.5).composite(&bytes, NamedColor::Black, Some(1));
    assert!(matches!(result, Err(WatermarkError::Decode(_))));
}

#[test]
fn tall_asset_on_wide_photo_stays_within_the_photo() {
    let dir = tempfile::tempdir().unwrap();
    RgbaImage::from_pixel(100, 500, Rgba([0, 0, 200, 255]))
        .save(dir.path().join("default.png"))
        .unwrap();

    let spec = WatermarkSpec::Image {
        asset_dir: dir.path().to_path_buf(),
        scale: 0.2,
    };
    let compositor = Compositor::new(spec, CompositeOptions::default()).unwrap();

    let tile = compositor.render_tile(NamedColor::Blue, (4000, 100)).unwrap();
    assert!(tile.width() <= 800 && tile.height() <= 20, "{:?}", tile.dimensions());

    let output = compositor
        .composite(&jpeg_bytes(4000, 100, [255, 255, 255]), NamedColor::Blue, Some(5))
        .unwrap();
    assert_eq!(decode(&output).dimensions(), (4000, 100));
}
