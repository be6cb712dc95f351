//! Tiled watermarking of user photos.
//!
//! The public entry point is [`Compositor::composite`], which takes the
//! encoded photo, the palette colour the user picked and an optional seed,
//! and returns JPEG bytes of the same size with the watermark scattered
//! across it.
//!
//! ```ignore
//! use watermark_bot::watermark::{Compositor, CompositeOptions, FontChain, NamedColor, WatermarkSpec};
//! use image::Rgba;
//!
//! let spec = WatermarkSpec::Text {
//!     text: "صياد العروض".to_string(),
//!     fonts: FontChain::with_builtin_fallback(vec!["fonts/Amiri-Regular.ttf".into()]),
//!     font_size: 60.0,
//!     outline: Rgba([255, 255, 255, 200]),
//!     padding: 20,
//! };
//! let compositor = Compositor::new(spec, CompositeOptions::default())?;
//! let jpeg = compositor.composite(&photo, NamedColor::Black, None)?;
//! ```

pub mod asset;
pub mod blend;
pub mod color;
pub mod compositor;
pub mod error;
pub mod font;
pub mod rotate;
pub mod shaping;
pub mod text;
pub mod tiling;

pub use color::{NamedColor, UnknownColor};
pub use compositor::{decode_image, CompositeOptions, Compositor, WatermarkSpec};
pub use error::WatermarkError;
pub use font::{FontChain, FontSource};
pub use tiling::TilingOptions;
