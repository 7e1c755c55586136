//! Structured session logging and subscriber setup.

use tracing::{error, info, warn, Span};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use looplabs_models::SessionId;

/// Logger carrying the session id and current pipeline stage.
#[derive(Debug, Clone)]
pub struct SessionLogger {
    session_id: String,
    stage: String,
}

impl SessionLogger {
    pub fn new(session_id: &SessionId) -> Self {
        Self {
            session_id: session_id.to_string(),
            stage: "session".to_string(),
        }
    }

    /// The same session, tagged with another stage.
    pub fn for_stage(&self, stage: &str) -> Self {
        Self {
            session_id: self.session_id.clone(),
            stage: stage.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Session started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            stage = %self.stage,
            "{}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            session_id = %self.session_id,
            stage = %self.stage,
            "{}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Session failed: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            session_id = %self.session_id,
            stage = %self.stage,
            "Session completed: {}", message
        );
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    /// Span wrapping the whole session.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("session", session_id = %self.session_id)
    }
}

/// Install the global subscriber: colored text by default, JSON when
/// `LOG_FORMAT=json`.
pub fn init_tracing(default_directive: &str) {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let mut env_filter = EnvFilter::from_default_env();
    match default_directive.parse() {
        Ok(directive) => env_filter = env_filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log directive {:?}: {}", default_directive, e),
    }

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_logger_creation() {
        let id = SessionId::from_string("20250301_090507_abcd1234");
        let logger = SessionLogger::new(&id);

        assert_eq!(logger.session_id(), "20250301_090507_abcd1234");
        assert_eq!(logger.stage(), "session");
    }

    #[test]
    fn test_for_stage_keeps_session() {
        let logger = SessionLogger::new(&SessionId::from_string("s1")).for_stage("render");
        assert_eq!(logger.session_id(), "s1");
        assert_eq!(logger.stage(), "render");
    }
}
