#![allow(clippy::doc_markdown)] // Allow technical terms like TechOps, n8n in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # TechOps Platform
//!
//! Orchestration core for a business-intelligence and technical-operations
//! platform.
//!
//! ## Overview
//!
//! A single [`PlatformOrchestrator`] coordinates eleven independently-owned
//! subsystems (data integration, analytics, dashboards, reports, alerting,
//! enterprise APIs, n8n workflows, security, backups, insights, forecasting)
//! through async trait contracts. It sequences multi-step pipelines over
//! them, keeps four periodic background jobs running, and publishes a named
//! event for every significant operation.
//!
//! ## Module Organization
//!
//! - [`config`] - Layered configuration loading and validation
//! - [`error`] - Structured error handling
//! - [`events`] - Platform event catalogue and publisher
//! - [`logging`] - Structured logging setup
//! - [`models`] - Value types exchanged with subsystems
//! - [`orchestration`] - The orchestrator, its pipelines and the scheduler
//! - [`subsystems`] - Subsystem contracts and in-memory implementations
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use techops_platform::config::PlatformConfig;
//! use techops_platform::models::{DashboardOptions, ReportTemplate};
//! use techops_platform::PlatformOrchestrator;
//!
//! # async fn example() -> techops_platform::Result<()> {
//! let config = PlatformConfig::for_organization("Acme")
//!     .with_report_template(ReportTemplate::new("weekly", "Weekly KPIs").with_forecast(true));
//! let platform = PlatformOrchestrator::new(config)?;
//!
//! let init = platform.initialize_platform().await;
//! assert!(init.success, "{:?}", init.errors);
//!
//! let report = platform
//!     .generate_enterprise_report("weekly", &Default::default(), &[])
//!     .await?;
//! println!("{} sections, {} forecasts", report.sections.len(), report.forecasts.len());
//!
//! platform
//!     .automate_real_time_dashboard("executive", &DashboardOptions::default())
//!     .await?;
//! platform.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod subsystems;

pub use config::{ConfigManager, ConfigurationError, PlatformConfig};
pub use error::{PlatformError, Result};
pub use events::{EventPublisher, PlatformEvent, PublishedEvent};
pub use orchestration::{InitializationResult, PlatformOrchestrator, PlatformStatus};
pub use subsystems::{PlatformSubsystems, Subsystem, SubsystemKind};
