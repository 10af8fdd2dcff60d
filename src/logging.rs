//! # Structured Logging Module
//!
//! Environment-aware structured logging for the platform core. Console output
//! is human-readable by default and switches to JSON lines when
//! `PLATFORM_LOG_FORMAT=json`. `PLATFORM_LOG` takes an `EnvFilter` directive
//! and overrides the environment-derived level.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = std::env::var("PLATFORM_LOG").unwrap_or_else(|_| get_log_level(&environment));
        let json = std::env::var("PLATFORM_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let console_layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .json()
                .with_filter(EnvFilter::new(&filter))
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(EnvFilter::new(&filter))
                .boxed()
        };

        // Another subscriber may already be installed by the embedding process
        if tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .is_err()
        {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            filter = %filter,
            json = json,
            "STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("PLATFORM_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Log structured data for a top-level platform operation
pub fn log_platform_operation(operation: &str, status: &str, details: Option<&str>) {
    tracing::info!(
        operation = %operation,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "PLATFORM_OPERATION"
    );
}

/// Log structured data for a single pipeline stage
pub fn log_pipeline_stage(pipeline: &str, stage: &str, subject: &str, elapsed_ms: u128) {
    tracing::debug!(
        pipeline = %pipeline,
        stage = %stage,
        subject = %subject,
        elapsed_ms = elapsed_ms as u64,
        "PIPELINE_STAGE"
    );
}

/// Log structured data for a background job tick
pub fn log_job_tick(job: &str, tick: u64, outcome: &str, details: Option<&str>) {
    tracing::debug!(
        job = %job,
        tick = tick,
        outcome = %outcome,
        details = details,
        "BACKGROUND_JOB"
    );
}
