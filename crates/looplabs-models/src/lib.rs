//! Shared data models for the LoopLabs content pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Session metadata and the concept/style merge rule
//! - Built-in style presets
//! - Caption results and the session manifest
//! - Render and encoding configuration

pub mod caption;
pub mod color;
pub mod encoding;
pub mod manifest;
pub mod metadata;
pub mod motion;
pub mod session;
pub mod style;

// Re-export common types
pub use caption::CaptionResult;
pub use color::{ColorError, Rgb};
pub use encoding::{EncodingConfig, RenderConfig};
pub use manifest::{Manifest, ManifestAssets};
pub use metadata::{merge, FieldIssue, SessionMetadata};
pub use motion::Motion;
pub use session::SessionId;
pub use style::{BuiltinStyle, StyleName};
