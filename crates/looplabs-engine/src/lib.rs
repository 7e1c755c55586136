//! LoopLabs content pipeline.
//!
//! This crate provides:
//! - Style resolution against a preset directory and the built-in table
//! - The session pipeline (concept, style, merge, render, caption)
//! - Session directories and artifact writing
//! - Configuration and structured session logging

pub mod artifacts;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod style;

pub use artifacts::{ArtifactWriter, SessionDir};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use logging::{init_tracing, SessionLogger};
pub use looplabs_models::merge;
pub use pipeline::{Pipeline, SessionOutcome, SessionRequest};
pub use style::{DirectoryStyleStore, ResolvedStyle, StyleResolver, StyleSource, StyleStore};
