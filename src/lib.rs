pub mod config;
pub mod preferences;
pub mod util;
pub mod watermark;

pub use config::Config;
