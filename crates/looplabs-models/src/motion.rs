//! Motion effect names.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Motion applied to the background layer of a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum Motion {
    /// Per-frame brightness modulation
    Pulse,
    /// One-second fade in and fade out
    Fade,
    /// Static background
    #[default]
    None,
}

impl Motion {
    pub const ALL: &'static [Motion] = &[Motion::Pulse, Motion::Fade, Motion::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Motion::Pulse => "pulse",
            Motion::Fade => "fade",
            Motion::None => "none",
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Motion {
    type Err = MotionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pulse" => Ok(Motion::Pulse),
            "fade" => Ok(Motion::Fade),
            "none" => Ok(Motion::None),
            _ => Err(MotionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown motion: {0}")]
pub struct MotionParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Pulse".parse::<Motion>().unwrap(), Motion::Pulse);
        assert_eq!(" fade ".parse::<Motion>().unwrap(), Motion::Fade);
        assert_eq!("NONE".parse::<Motion>().unwrap(), Motion::None);
        assert!("spin".parse::<Motion>().is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        for motion in Motion::ALL {
            let wire = serde_json::to_string(motion).unwrap();
            assert_eq!(wire, format!("\"{}\"", motion));
        }
    }
}
