//! The fixed palette users can pick watermark colours from.

use crate::util::compatibility_case_fold;
use image::Rgba;
use serde_derive::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Alpha every palette colour is drawn with before the global opacity applies.
pub const FILL_ALPHA: u8 = 180;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown colour '{0}', expected one of: {}", NamedColor::names())]
pub struct UnknownColor(pub String);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Black,
    White,
    Red,
    Blue,
    Green,
    Orange,
}

impl Default for NamedColor {
    fn default() -> Self {
        NamedColor::Black
    }
}

impl NamedColor {
    pub const ALL: [NamedColor; 6] = [
        NamedColor::Black,
        NamedColor::White,
        NamedColor::Red,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Orange,
    ];

    /// Fill colour used for text watermarks.
    pub fn rgba(self) -> Rgba<u8> {
        use NamedColor::*;
        let [r, g, b] = match self {
            Black => [0, 0, 0],
            White => [255, 255, 255],
            Red => [200, 0, 0],
            Blue => [0, 0, 200],
            Green => [0, 128, 0],
            Orange => [255, 140, 0],
        };
        Rgba([r, g, b, FILL_ALPHA])
    }

    /// Key used to pick pre-rendered watermark assets, e.g. `red.png`.
    pub fn key(self) -> &'static str {
        use NamedColor::*;
        match self {
            Black => "black",
            White => "white",
            Red => "red",
            Blue => "blue",
            Green => "green",
            Orange => "orange",
        }
    }

    pub fn emoji(self) -> &'static str {
        use NamedColor::*;
        match self {
            Black => "⚫",
            White => "⚪",
            Red => "🔴",
            Blue => "🔵",
            Green => "🟢",
            Orange => "🟠",
        }
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(|c| c.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for NamedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for NamedColor {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use NamedColor::*;
        let folded = compatibility_case_fold(s.trim());
        let folded = folded.strip_prefix("color_").unwrap_or(&folded);
        // Arabic names are accepted with or without the definite article
        let folded = folded
            .strip_prefix(&*compatibility_case_fold("ال"))
            .unwrap_or(folded);

        let arabic = |name: &str| compatibility_case_fold(name) == folded;
        match folded {
            "black" => Ok(Black),
            "white" => Ok(White),
            "red" => Ok(Red),
            "blue" => Ok(Blue),
            "green" => Ok(Green),
            "orange" => Ok(Orange),
            _ if arabic("أسود") => Ok(Black),
            _ if arabic("أبيض") => Ok(White),
            _ if arabic("أحمر") => Ok(Red),
            _ if arabic("أزرق") => Ok(Blue),
            _ if arabic("أخضر") => Ok(Green),
            _ if arabic("برتقالي") => Ok(Orange),
            _ => Err(UnknownColor(s.to_string())),
        }
    }
}
