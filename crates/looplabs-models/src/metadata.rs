//! Session metadata: the flat attribute record that drives rendering and captioning.
//!
//! The same record type carries three things:
//! - the concept returned by the text service,
//! - a style preset,
//! - the merged result of both ([`merge`]).
//!
//! Values coming from outside the process (service responses, preset files)
//! are parsed field by field with [`SessionMetadata::from_json_object`]. A
//! field with the wrong shape is dropped and reported; it never reaches the
//! renderer half-typed.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::color::Rgb;
use crate::motion::Motion;

/// Attribute names with a typed slot in [`SessionMetadata`].
pub const KNOWN_FIELDS: &[&str] = &[
    "color",
    "color_primary",
    "text",
    "text_color",
    "font",
    "font_size",
    "mood",
    "motion",
    "keywords",
    "theme",
    "music",
];

/// Flat attribute mapping for one session.
///
/// A field is "present" when it holds a value. Unknown attributes are kept
/// verbatim in `extra` so that preset files may carry keys this crate does
/// not interpret.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct SessionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<Rgb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<Motion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music: Option<String>,
    /// Attributes without a typed slot.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A field that was present in untrusted input but had the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub reason: String,
}

impl FieldIssue {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl SessionMetadata {
    /// Parse an untrusted JSON object field by field.
    ///
    /// `null` values count as absent. Malformed known fields are dropped and
    /// returned as issues; the rest of the object is still used.
    pub fn from_json_object(object: Map<String, Value>) -> (Self, Vec<FieldIssue>) {
        let mut meta = SessionMetadata::default();
        let mut issues = Vec::new();

        for (key, value) in object {
            if value.is_null() {
                continue;
            }
            if let Err(reason) = meta.set_field(&key, value) {
                issues.push(FieldIssue::new(&key, reason));
            }
        }

        (meta, issues)
    }

    /// Parse an untrusted JSON value that must be an object.
    pub fn from_json_value(value: Value) -> Result<(Self, Vec<FieldIssue>), String> {
        match value {
            Value::Object(object) => Ok(Self::from_json_object(object)),
            other => Err(format!("expected a JSON object, got {}", json_kind(&other))),
        }
    }

    fn set_field(&mut self, key: &str, value: Value) -> Result<(), String> {
        match key {
            "color" => self.color = Some(Rgb::from_json(&value).map_err(|e| e.to_string())?),
            "color_primary" => {
                self.color_primary = Some(Rgb::from_json(&value).map_err(|e| e.to_string())?)
            }
            "text" => self.text = Some(expect_string(value)?),
            "text_color" => self.text_color = Some(expect_string(value)?),
            "font" => self.font = Some(expect_string(value)?),
            "font_size" => self.font_size = Some(expect_font_size(&value)?),
            "mood" => self.mood = Some(expect_string(value)?),
            "motion" => {
                let name = expect_string(value)?;
                self.motion = Some(name.parse::<Motion>().map_err(|e| e.to_string())?);
            }
            "keywords" => self.keywords = Some(expect_string_list(value)?),
            "theme" => self.theme = Some(expect_string(value)?),
            "music" => self.music = Some(expect_string(value)?),
            _ => {
                self.extra.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    /// Names of every present attribute.
    pub fn keys(&self) -> BTreeSet<String> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.into_iter().map(|(k, _)| k).collect(),
            _ => BTreeSet::new(),
        }
    }

    /// Value of one attribute as JSON, if present.
    pub fn get(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Overlay text, if any and non-empty.
    pub fn overlay_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn motion_or_default(&self) -> Motion {
        self.motion.unwrap_or_default()
    }

    pub fn keywords_or_empty(&self) -> &[String] {
        self.keywords.as_deref().unwrap_or(&[])
    }
}

/// Combine a concept with a style preset.
///
/// Every attribute present in `concept` keeps its value. Attributes of
/// `style` are added only where `concept` has none. Values are taken whole,
/// never merged inside.
pub fn merge(concept: SessionMetadata, style: &SessionMetadata) -> SessionMetadata {
    let mut extra = concept.extra;
    for (key, value) in &style.extra {
        extra.entry(key.clone()).or_insert_with(|| value.clone());
    }

    SessionMetadata {
        color: concept.color.or(style.color),
        color_primary: concept.color_primary.or(style.color_primary),
        text: concept.text.or_else(|| style.text.clone()),
        text_color: concept.text_color.or_else(|| style.text_color.clone()),
        font: concept.font.or_else(|| style.font.clone()),
        font_size: concept.font_size.or(style.font_size),
        mood: concept.mood.or_else(|| style.mood.clone()),
        motion: concept.motion.or(style.motion),
        keywords: concept.keywords.or_else(|| style.keywords.clone()),
        theme: concept.theme.or_else(|| style.theme.clone()),
        music: concept.music.or_else(|| style.music.clone()),
        extra,
    }
}

fn expect_string(value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(format!("expected a string, got {}", json_kind(&other))),
    }
}

fn expect_font_size(value: &Value) -> Result<u32, String> {
    let n = value
        .as_f64()
        .ok_or_else(|| format!("expected a number, got {}", json_kind(value)))?;
    if n.fract() != 0.0 || n < 1.0 || n > u32::MAX as f64 {
        return Err(format!("expected a positive integer, got {}", n));
    }
    Ok(n as u32)
}

fn expect_string_list(value: Value) -> Result<Vec<String>, String> {
    match value {
        Value::Array(items) => items.into_iter().map(expect_string).collect(),
        other => Err(format!("expected an array, got {}", json_kind(&other))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
