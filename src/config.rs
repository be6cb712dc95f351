use crate::watermark::{
    CompositeOptions, Compositor, FontChain, NamedColor, TilingOptions, WatermarkError,
    WatermarkSpec,
};
use anyhow::{Context, Result};
use dotenv::dotenv;
use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;
use image::Rgba;
use serde_derive::Deserialize;
use std::path::PathBuf;
use try_traits::default::TryDefault;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub discord_api_key: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub watermark: WatermarkSettings,
}

fn default_prefix() -> String {
    "~".to_string()
}

impl Config {
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file("WatermarkBot.toml"))
            .merge(Env::prefixed("WATERMARKBOT_").split("__"))
            .merge(Json::file("WatermarkBot.json"))
            .merge(Yaml::file("WatermarkBot.yaml"))
            .merge(Yaml::file("WatermarkBot.yml"))
    }
}

impl TryDefault for Config {
    type Error = anyhow::Error;

    fn try_default() -> Result<Self> {
        dotenv().ok();

        Self::figment()
            .extract()
            .context("Failed to load configuration")
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkMode {
    Text,
    Image,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WatermarkSettings {
    pub mode: WatermarkMode,
    pub text: String,
    /// Font files tried in order before the embedded font.
    pub fonts: Vec<PathBuf>,
    pub font_size: f32,
    pub padding: u32,
    pub outline_color: [u8; 4],
    pub asset_dir: PathBuf,
    pub image_scale: f32,
    pub default_color: NamedColor,
    pub opacity: f32,
    pub margin: u32,
    pub max_rotation: f32,
    pub jitter: f32,
    pub jpeg_quality: u8,
    pub caption: String,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        Self {
            mode: WatermarkMode::Text,
            text: "صياد العروض".to_string(),
            fonts: vec![PathBuf::from("fonts/Amiri-Regular.ttf")],
            font_size: 60.0,
            padding: 20,
            outline_color: [255, 255, 255, 200],
            asset_dir: PathBuf::from("resources/watermarks"),
            image_scale: 0.2,
            default_color: NamedColor::Black,
            opacity: 0.5,
            margin: 0,
            max_rotation: 45.0,
            jitter: 0.25,
            jpeg_quality: 95,
            caption: "✅ Watermark added!".to_string(),
        }
    }
}

impl WatermarkSettings {
    pub fn spec(&self) -> WatermarkSpec {
        match self.mode {
            WatermarkMode::Text => WatermarkSpec::Text {
                text: self.text.clone(),
                fonts: FontChain::with_builtin_fallback(self.fonts.iter().cloned()),
                font_size: self.font_size,
                outline: Rgba(self.outline_color),
                padding: self.padding,
            },
            WatermarkMode::Image => WatermarkSpec::Image {
                asset_dir: self.asset_dir.clone(),
                scale: self.image_scale,
            },
        }
    }

    pub fn options(&self) -> CompositeOptions {
        CompositeOptions {
            tiling: TilingOptions {
                margin: self.margin,
                max_rotation: self.max_rotation,
                jitter: self.jitter,
            },
            opacity: self.opacity,
            jpeg_quality: self.jpeg_quality,
        }
    }

    /// Build a compositor, rejecting settings that would break its guarantees.
    pub fn compositor(&self) -> Result<Compositor, WatermarkError> {
        Compositor::new(self.spec(), self.options())
    }
}
