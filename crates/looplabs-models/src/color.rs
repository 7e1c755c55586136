//! RGB color triples.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// An RGB color with 8-bit components.
///
/// Serialized as a three-element JSON array, `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, JsonSchema)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);
    pub const WHITE: Rgb = Rgb([255, 255, 255]);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Scale every channel by `factor`, saturating at the channel bounds.
    pub fn scaled(&self, factor: f64) -> Rgb {
        let scale = |c: u8| (c as f64 * factor).clamp(0.0, 255.0) as u8;
        Rgb([scale(self.0[0]), scale(self.0[1]), scale(self.0[2])])
    }

    /// Relative luma (ITU-R BT.601 weights).
    pub fn luma(&self) -> f64 {
        0.299 * self.0[0] as f64 + 0.587 * self.0[1] as f64 + 0.114 * self.0[2] as f64
    }

    /// Parse a JSON value of the form `[r, g, b]`.
    ///
    /// Components may be integers or floats; floats are rounded. Each
    /// component must land in `0..=255`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ColorError> {
        let items = value.as_array().ok_or(ColorError::NotAnArray)?;
        if items.len() != 3 {
            return Err(ColorError::WrongLength(items.len()));
        }

        let mut out = [0u8; 3];
        for (slot, item) in out.iter_mut().zip(items) {
            let n = item
                .as_f64()
                .ok_or_else(|| ColorError::NotANumber(item.to_string()))?
                .round();
            if !(0.0..=255.0).contains(&n) {
                return Err(ColorError::OutOfRange(n));
            }
            *slot = n as u8;
        }
        Ok(Rgb(out))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.0[0], self.0[1], self.0[2])
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(value: [u8; 3]) -> Self {
        Rgb(value)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Rgb::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ColorError {
    #[error("color must be an array of three numbers")]
    NotAnArray,

    #[error("color must have exactly 3 components, got {0}")]
    WrongLength(usize),

    #[error("color component is not a number: {0}")]
    NotANumber(String),

    #[error("color component out of range 0-255: {0}")]
    OutOfRange(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_integer_triple() {
        let color = Rgb::from_json(&json!([255, 200, 100])).unwrap();
        assert_eq!(color, Rgb::new(255, 200, 100));
    }

    #[test]
    fn test_parse_float_components_round() {
        let color = Rgb::from_json(&json!([10.4, 10.6, 0.0])).unwrap();
        assert_eq!(color, Rgb::new(10, 11, 0));
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert_eq!(Rgb::from_json(&json!("blue")), Err(ColorError::NotAnArray));
        assert_eq!(Rgb::from_json(&json!([1, 2])), Err(ColorError::WrongLength(2)));
        assert!(matches!(
            Rgb::from_json(&json!([1, "x", 3])),
            Err(ColorError::NotANumber(_))
        ));
        assert!(matches!(
            Rgb::from_json(&json!([1, 2, 300])),
            Err(ColorError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_serde_roundtrip_as_array() {
        let color = Rgb::new(0, 0, 255);
        let encoded = serde_json::to_value(color).unwrap();
        assert_eq!(encoded, json!([0, 0, 255]));
    }

    #[test]
    fn test_scaled_and_luma() {
        let color = Rgb::new(200, 100, 50);
        assert_eq!(color.scaled(0.5), Rgb::new(100, 50, 25));
        assert_eq!(color.scaled(2.0), Rgb::new(255, 200, 100));
        assert_eq!(Rgb::BLACK.luma(), 0.0);
        assert!((Rgb::WHITE.luma() - 255.0).abs() < 1e-9);
    }
}
