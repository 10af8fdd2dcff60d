//! Error types for the platform core.
//!
//! Two contracts coexist and must not be conflated: operations return
//! `Result<T, PlatformError>` and fail fast, while
//! [`initialize_platform`](crate::orchestration::PlatformOrchestrator::initialize_platform)
//! reports subsystem failures inside its
//! [`InitializationResult`](crate::orchestration::InitializationResult).

use crate::config::ConfigurationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlatformError {
    /// Configuration rejected at construction time. Never recovered.
    #[error("Configuration validation error: {0}")]
    ConfigValidation(String),

    /// A subsystem failed to come up.
    #[error("Subsystem initialization failed for {component}: {reason}")]
    SubsystemInit { component: String, reason: String },

    /// A subsystem operation failed outside of initialization.
    #[error("Subsystem {component} failed during {operation}: {reason}")]
    Subsystem {
        component: String,
        operation: String,
        reason: String,
    },

    #[error("Report template not found: {0}")]
    TemplateNotFound(String),

    /// A report or dashboard pipeline stage failed.
    #[error("Pipeline {pipeline} failed at stage {stage}: {reason}")]
    PipelineStage {
        pipeline: String,
        stage: String,
        reason: String,
    },

    /// A background job tick failed. Only ever logged, never returned to callers.
    #[error("Background job {job} failed: {reason}")]
    BackgroundJob { job: String, reason: String },

    /// One or more subsystems refused to shut down.
    #[error("Shutdown failed for {} subsystem(s): {}", failures.len(), format_failures(failures))]
    Shutdown { failures: Vec<(String, String)> },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Event error: {0}")]
    EventError(String),
}

fn format_failures(failures: &[(String, String)]) -> String {
    failures
        .iter()
        .map(|(component, reason)| format!("{component}: {reason}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl PlatformError {
    /// Build a subsystem operation error
    pub fn subsystem(
        component: impl Into<String>,
        operation: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Subsystem {
            component: component.into(),
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Build a pipeline stage error
    pub fn pipeline_stage(
        pipeline: impl Into<String>,
        stage: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::PipelineStage {
            pipeline: pipeline.into(),
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// True for errors a caller can never recover from by retrying
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigValidation(_) | Self::InvalidState(_))
    }
}

impl From<ConfigurationError> for PlatformError {
    fn from(error: ConfigurationError) -> Self {
        PlatformError::ConfigValidation(error.to_string())
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(error: serde_json::Error) -> Self {
        PlatformError::InvalidInput(format!("JSON serialization error: {error}"))
    }
}

pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_error_lists_every_failure() {
        let error = PlatformError::Shutdown {
            failures: vec![
                ("alerting-system".to_string(), "timeout".to_string()),
                ("backup-manager".to_string(), "busy".to_string()),
            ],
        };

        let message = error.to_string();
        assert!(message.contains("2 subsystem(s)"));
        assert!(message.contains("alerting-system: timeout"));
        assert!(message.contains("backup-manager: busy"));
    }

    #[test]
    fn test_configuration_error_converts_to_validation_error() {
        let error: PlatformError =
            ConfigurationError::validation_error("organization.name is empty").into();
        assert!(matches!(error, PlatformError::ConfigValidation(_)));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_stage_error_is_not_fatal() {
        let error = PlatformError::pipeline_stage("report", "collect", "source offline");
        assert_eq!(
            error.to_string(),
            "Pipeline report failed at stage collect: source offline"
        );
        assert!(!error.is_fatal());
    }
}
