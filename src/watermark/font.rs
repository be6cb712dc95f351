//! Font loading with an ordered fallback chain.
//!
//! A missing or unreadable font never fails a watermark on its own: the
//! chain moves on to the next candidate and only gives up once every
//! candidate, including the embedded one, has been tried.

use super::WatermarkError;
use ab_glyph::FontArc;
use log::{debug, warn};
use std::path::PathBuf;

/// DejaVu Sans, shipped inside the binary so the chain always has a last resort.
const EMBEDDED_FONT_DATA: &[u8] = include_bytes!("../../resources/fonts/DejaVuSans.ttf");

/// One place a font can come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Builtin,
}

impl FontSource {
    fn load(&self) -> Result<FontArc, String> {
        match self {
            FontSource::File(path) => {
                let data = std::fs::read(path).map_err(|e| e.to_string())?;
                FontArc::try_from_vec(data).map_err(|e| e.to_string())
            }
            FontSource::Builtin => {
                FontArc::try_from_slice(EMBEDDED_FONT_DATA).map_err(|e| e.to_string())
            }
        }
    }

    fn describe(&self) -> PathBuf {
        match self {
            FontSource::File(path) => path.clone(),
            FontSource::Builtin => PathBuf::from("<builtin>"),
        }
    }
}

/// Candidates tried in order; the first one that parses wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChain {
    sources: Vec<FontSource>,
}

impl FontChain {
    pub fn new(sources: Vec<FontSource>) -> Self {
        Self { sources }
    }

    /// Configured files first, then the embedded font.
    pub fn with_builtin_fallback<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut sources: Vec<_> = paths.into_iter().map(FontSource::File).collect();
        sources.push(FontSource::Builtin);
        Self { sources }
    }

    pub fn sources(&self) -> &[FontSource] {
        &self.sources
    }

    pub fn load(&self) -> Result<FontArc, WatermarkError> {
        for source in &self.sources {
            match source.load() {
                Ok(font) => {
                    debug!("Loaded font from {}", source.describe().display());
                    return Ok(font);
                }
                Err(e) => warn!(
                    "Could not load font {}: {}, trying next candidate",
                    source.describe().display(),
                    e
                ),
            }
        }

        Err(WatermarkError::AssetMissing {
            kind: "font",
            tried: self.sources.iter().map(FontSource::describe).collect(),
        })
    }
}

impl Default for FontChain {
    fn default() -> Self {
        Self::new(vec![FontSource::Builtin])
    }
}
