//! Session identifiers.

use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Time-derived unique identifier for one pipeline run.
///
/// Format: `YYYYMMDD_HHMMSS_xxxxxxxx`, where the suffix is random hex so
/// that sessions started within the same second never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate an id for a session starting now.
    pub fn new() -> Self {
        Self::at(Local::now())
    }

    /// Generate an id for a session starting at `started`.
    pub fn at(started: DateTime<Local>) -> Self {
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{}_{}", started.format("%Y%m%d_%H%M%S"), &suffix[..8]))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Directory name for this session's artifacts.
    pub fn dir_name(&self) -> String {
        format!("pack_{}", self.0)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format() {
        let started = Local.with_ymd_and_hms(2025, 12, 31, 23, 59, 1).unwrap();
        let id = SessionId::at(started);
        assert!(id.as_str().starts_with("20251231_235901_"));
        assert_eq!(id.as_str().len(), "20251231_235901_".len() + 8);
        assert!(id.dir_name().starts_with("pack_20251231_235901_"));
    }

    #[test]
    fn test_ids_in_same_second_differ() {
        let started = Local::now();
        assert_ne!(SessionId::at(started), SessionId::at(started));
    }
}
