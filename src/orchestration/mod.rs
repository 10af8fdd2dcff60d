//! # Platform Orchestration
//!
//! [`PlatformOrchestrator`] is the single entry point of the platform. It
//! owns the subsystem handles and drives them through:
//!
//! - lifecycle: `initialize_platform`, `shutdown`, `platform_status`
//! - pipelines: `generate_enterprise_report`, `automate_real_time_dashboard`
//! - setup: data integration, enterprise APIs, n8n workflows, real-time
//!   analytics, security compliance, backup and recovery
//! - rollout: `deploy_bi_platform`, `generate_strategic_insights`
//!
//! Once initialized, a [`BackgroundScheduler`] keeps analytics, alerts,
//! dashboards and scheduled reports ticking until shutdown.

pub mod compliance;
pub mod core;
pub mod dashboard_pipeline;
pub mod deployment;
pub mod integration;
pub mod report_pipeline;
pub mod scheduler;
pub mod types;

pub use self::core::PlatformOrchestrator;
pub use scheduler::{BackgroundJob, BackgroundScheduler, JobStatus};
pub use types::{
    BiPlatformDeployment, DeploymentOptions, InitializationResult, OperationCounts,
    PlatformStatus, StrategicInsights,
};
