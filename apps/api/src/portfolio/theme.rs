//! Named visual themes. Presentation itself lives in the frontend; the API
//! only stores and echoes the selector.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Default,
    Pink,
    Dark,
    Light,
    Retro,
    Modern,
    Minimal,
    Gradient,
    Neon,
    Matrix,
    Aurora,
    MinimalWhite,
    Midnight,
}

impl Theme {
    /// Parses a stored theme value. Unrecognized values fall back to the
    /// default theme rather than failing — old rows must keep rendering.
    pub fn parse(value: &str) -> Theme {
        serde_json::from_value(serde_json::Value::String(value.to_string())).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Pink => "pink",
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Retro => "retro",
            Theme::Modern => "modern",
            Theme::Minimal => "minimal",
            Theme::Gradient => "gradient",
            Theme::Neon => "neon",
            Theme::Matrix => "matrix",
            Theme::Aurora => "aurora",
            Theme::MinimalWhite => "minimal-white",
            Theme::Midnight => "midnight",
        }
    }
}
