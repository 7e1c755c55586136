//! Style preset names and the built-in preset table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::color::Rgb;
use crate::metadata::SessionMetadata;

/// A style name after normalization (trimmed, lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct StyleName(String);

impl StyleName {
    /// Normalize a user-supplied style name.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name can be used as a single path component.
    ///
    /// Names with separators, `..`, or nothing at all never address the
    /// preset store.
    pub fn is_safe_file_stem(&self) -> bool {
        !self.0.is_empty()
            && !self.0.contains(['/', '\\', '\0'])
            && self.0 != "."
            && !self.0.contains("..")
    }
}

impl fmt::Display for StyleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Presets compiled into the binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum BuiltinStyle {
    /// White palette, Helvetica, chill soundtrack
    Minimalist,
    /// Dark palette, gold serif text, corporate soundtrack
    Luxury,
    /// Warm red palette, bold sans, energetic soundtrack
    Energetic,
}

impl BuiltinStyle {
    pub const ALL: &'static [BuiltinStyle] = &[
        BuiltinStyle::Minimalist,
        BuiltinStyle::Luxury,
        BuiltinStyle::Energetic,
    ];

    /// Universal fallback for unknown names.
    pub const FALLBACK: BuiltinStyle = BuiltinStyle::Minimalist;

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinStyle::Minimalist => "minimalist",
            BuiltinStyle::Luxury => "luxury",
            BuiltinStyle::Energetic => "energetic",
        }
    }

    /// A fresh copy of the preset's attributes.
    pub fn preset(&self) -> SessionMetadata {
        let (color, text_color, font, font_size, music) = match self {
            BuiltinStyle::Minimalist => (
                Rgb::new(255, 255, 255),
                "white",
                "Helvetica-Bold",
                60,
                "assets/audio/chill.mp3",
            ),
            BuiltinStyle::Luxury => (
                Rgb::new(30, 30, 30),
                "#f5d742",
                "Times-Bold",
                70,
                "assets/audio/corporate.mp3",
            ),
            BuiltinStyle::Energetic => (
                Rgb::new(255, 80, 80),
                "white",
                "Arial-Bold",
                65,
                "assets/audio/energetic.mp3",
            ),
        };

        SessionMetadata {
            color_primary: Some(color),
            text_color: Some(text_color.to_string()),
            font: Some(font.to_string()),
            font_size: Some(font_size),
            music: Some(music.to_string()),
            ..Default::default()
        }
    }
}

impl fmt::Display for BuiltinStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BuiltinStyle {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match StyleName::normalize(s).as_str() {
            "minimalist" => Ok(BuiltinStyle::Minimalist),
            "luxury" => Ok(BuiltinStyle::Luxury),
            "energetic" => Ok(BuiltinStyle::Energetic),
            _ => Err(StyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown style: {0}")]
pub struct StyleParseError(String);
