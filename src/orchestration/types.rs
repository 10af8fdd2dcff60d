//! Result types returned by the orchestrator.

use crate::models::{
    AutomatedDashboard, BusinessInsight, DashboardOptions, DataIntegrationSetup, InsightImpact,
    PlatformMetrics,
};
use crate::orchestration::scheduler::JobStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of [`initialize_platform`](super::PlatformOrchestrator::initialize_platform).
///
/// Subsystem failures are reported here instead of being returned as errors.
/// `initialized_components` lists every component that came up, in
/// initialization order, up to the first failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitializationResult {
    pub success: bool,
    pub initialized_components: Vec<String>,
    pub errors: Vec<String>,
    /// Metrics snapshot taken after a successful initialization
    pub metrics: Option<PlatformMetrics>,
}

/// Ranked strategic insights with their impact histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicInsights {
    pub insights: Vec<BusinessInsight>,
    pub impact_counts: BTreeMap<InsightImpact, usize>,
    pub recommendations: Vec<String>,
}

/// Options for a full BI platform deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentOptions {
    pub dashboards: DashboardOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiPlatformDeployment {
    pub environment: String,
    pub initialization: InitializationResult,
    pub data_integration: DataIntegrationSetup,
    pub dashboards: Vec<AutomatedDashboard>,
}

/// Counters of completed foreground operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationCounts {
    pub reports_generated: u64,
    pub dashboards_automated: u64,
    pub pipelines_started: u64,
    pub apis_connected: u64,
    pub workflows_deployed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformStatus {
    pub organization: String,
    pub environment: String,
    pub initialized: bool,
    pub scheduler_running: bool,
    pub jobs: Vec<JobStatus>,
    pub operations: OperationCounts,
    pub events_published: u64,
}
