//! Generative text service client and the resolvers built on it.
//!
//! Every resolver degrades to a fixed fallback instead of failing, so the
//! pipeline keeps going when the service is down or answers nonsense.

pub mod caption;
pub mod client;
pub mod concept;
pub mod enrich;
pub mod error;
pub mod types;

pub use caption::{parse_caption, CaptionResolver};
pub use client::{OfflineGenerator, OpenAiClient, OpenAiConfig, TextGenerator};
pub use concept::{fallback_concept, parse_concept, ConceptResolver};
pub use enrich::PromptEnricher;
pub use error::{AiError, AiResult};
pub use types::CompletionRequest;
