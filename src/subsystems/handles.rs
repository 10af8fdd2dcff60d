//! The set of subsystem handles owned by the orchestrator.
//!
//! Handles are created once, when the orchestrator is constructed, and are
//! never re-created. Swapping a handle is only possible before the set is
//! moved into the orchestrator.

use super::in_memory::{
    InMemoryAlertingSystem, InMemoryAnalyticsEngine, InMemoryApiConnector, InMemoryBackupManager,
    InMemoryDashboardManager, InMemoryDataIntegrator, InMemoryForecastingEngine,
    InMemoryInsightEngine, InMemoryReportGenerator, InMemorySecurityManager,
    InMemoryWorkflowConnector,
};
use super::{
    AlertingSystem, AnalyticsEngine, ApiConnector, BackupManager, DashboardManager,
    DataIntegrator, ForecastingEngine, InsightEngine, ReportGenerator, SecurityManager, Subsystem,
    WorkflowConnector,
};
use crate::config::PlatformConfig;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Identifies one subsystem handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubsystemKind {
    DataIntegration,
    AnalyticsEngine,
    DashboardManager,
    ReportGenerator,
    AlertingSystem,
    ApiConnector,
    WorkflowConnector,
    SecurityManager,
    BackupManager,
    InsightEngine,
    ForecastingEngine,
}

impl SubsystemKind {
    /// Fixed dependency order used by platform initialization
    pub const INITIALIZATION_ORDER: [SubsystemKind; 9] = [
        SubsystemKind::DataIntegration,
        SubsystemKind::AnalyticsEngine,
        SubsystemKind::DashboardManager,
        SubsystemKind::ReportGenerator,
        SubsystemKind::AlertingSystem,
        SubsystemKind::ApiConnector,
        SubsystemKind::WorkflowConnector,
        SubsystemKind::SecurityManager,
        SubsystemKind::BackupManager,
    ];

    /// Every handle, in the order shutdown results are reported
    pub const ALL: [SubsystemKind; 11] = [
        SubsystemKind::DataIntegration,
        SubsystemKind::AnalyticsEngine,
        SubsystemKind::DashboardManager,
        SubsystemKind::ReportGenerator,
        SubsystemKind::AlertingSystem,
        SubsystemKind::ApiConnector,
        SubsystemKind::WorkflowConnector,
        SubsystemKind::SecurityManager,
        SubsystemKind::BackupManager,
        SubsystemKind::InsightEngine,
        SubsystemKind::ForecastingEngine,
    ];

    /// Component name reported in initialization results
    pub fn component_name(&self) -> &'static str {
        match self {
            SubsystemKind::DataIntegration => "data-integration",
            SubsystemKind::AnalyticsEngine => "analytics-engine",
            SubsystemKind::DashboardManager => "dashboard-manager",
            SubsystemKind::ReportGenerator => "report-generator",
            SubsystemKind::AlertingSystem => "alerting-system",
            SubsystemKind::ApiConnector => "api-connector",
            SubsystemKind::WorkflowConnector => "n8n-connector",
            SubsystemKind::SecurityManager => "security-manager",
            SubsystemKind::BackupManager => "backup-manager",
            SubsystemKind::InsightEngine => "insight-engine",
            SubsystemKind::ForecastingEngine => "forecasting-engine",
        }
    }
}

impl fmt::Display for SubsystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.component_name())
    }
}

/// One handle per subsystem type
#[derive(Clone)]
pub struct PlatformSubsystems {
    pub data_integrator: Arc<dyn DataIntegrator>,
    pub analytics_engine: Arc<dyn AnalyticsEngine>,
    pub dashboard_manager: Arc<dyn DashboardManager>,
    pub report_generator: Arc<dyn ReportGenerator>,
    pub alerting_system: Arc<dyn AlertingSystem>,
    pub api_connector: Arc<dyn ApiConnector>,
    pub workflow_connector: Arc<dyn WorkflowConnector>,
    pub security_manager: Arc<dyn SecurityManager>,
    pub backup_manager: Arc<dyn BackupManager>,
    pub insight_engine: Arc<dyn InsightEngine>,
    pub forecasting_engine: Arc<dyn ForecastingEngine>,
}

impl fmt::Debug for PlatformSubsystems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(SubsystemKind::ALL.iter().map(|kind| kind.component_name()))
            .finish()
    }
}

impl PlatformSubsystems {
    /// Deterministic in-memory subsystems seeded from the configuration
    pub fn in_memory(config: &PlatformConfig) -> Self {
        Self {
            data_integrator: Arc::new(InMemoryDataIntegrator::new(config)),
            analytics_engine: Arc::new(InMemoryAnalyticsEngine::new()),
            dashboard_manager: Arc::new(InMemoryDashboardManager::new(config)),
            report_generator: Arc::new(InMemoryReportGenerator::new(config)),
            alerting_system: Arc::new(InMemoryAlertingSystem::new(config)),
            api_connector: Arc::new(InMemoryApiConnector::new()),
            workflow_connector: Arc::new(InMemoryWorkflowConnector::new()),
            security_manager: Arc::new(InMemorySecurityManager::new()),
            backup_manager: Arc::new(InMemoryBackupManager::new()),
            insight_engine: Arc::new(InMemoryInsightEngine::new()),
            forecasting_engine: Arc::new(InMemoryForecastingEngine::new()),
        }
    }

    pub fn with_data_integrator(mut self, handle: Arc<dyn DataIntegrator>) -> Self {
        self.data_integrator = handle;
        self
    }

    pub fn with_analytics_engine(mut self, handle: Arc<dyn AnalyticsEngine>) -> Self {
        self.analytics_engine = handle;
        self
    }

    pub fn with_dashboard_manager(mut self, handle: Arc<dyn DashboardManager>) -> Self {
        self.dashboard_manager = handle;
        self
    }

    pub fn with_report_generator(mut self, handle: Arc<dyn ReportGenerator>) -> Self {
        self.report_generator = handle;
        self
    }

    pub fn with_alerting_system(mut self, handle: Arc<dyn AlertingSystem>) -> Self {
        self.alerting_system = handle;
        self
    }

    pub fn with_api_connector(mut self, handle: Arc<dyn ApiConnector>) -> Self {
        self.api_connector = handle;
        self
    }

    pub fn with_workflow_connector(mut self, handle: Arc<dyn WorkflowConnector>) -> Self {
        self.workflow_connector = handle;
        self
    }

    pub fn with_security_manager(mut self, handle: Arc<dyn SecurityManager>) -> Self {
        self.security_manager = handle;
        self
    }

    pub fn with_backup_manager(mut self, handle: Arc<dyn BackupManager>) -> Self {
        self.backup_manager = handle;
        self
    }

    pub fn with_insight_engine(mut self, handle: Arc<dyn InsightEngine>) -> Self {
        self.insight_engine = handle;
        self
    }

    pub fn with_forecasting_engine(mut self, handle: Arc<dyn ForecastingEngine>) -> Self {
        self.forecasting_engine = handle;
        self
    }

    /// Run `initialize()` on one handle
    pub async fn initialize(&self, kind: SubsystemKind) -> Result<()> {
        match kind {
            SubsystemKind::DataIntegration => self.data_integrator.initialize().await,
            SubsystemKind::AnalyticsEngine => self.analytics_engine.initialize().await,
            SubsystemKind::DashboardManager => self.dashboard_manager.initialize().await,
            SubsystemKind::ReportGenerator => self.report_generator.initialize().await,
            SubsystemKind::AlertingSystem => self.alerting_system.initialize().await,
            SubsystemKind::ApiConnector => self.api_connector.initialize().await,
            SubsystemKind::WorkflowConnector => self.workflow_connector.initialize().await,
            SubsystemKind::SecurityManager => self.security_manager.initialize().await,
            SubsystemKind::BackupManager => self.backup_manager.initialize().await,
            SubsystemKind::InsightEngine => self.insight_engine.initialize().await,
            SubsystemKind::ForecastingEngine => self.forecasting_engine.initialize().await,
        }
    }

    /// Run `shutdown()` on one handle
    pub async fn shutdown(&self, kind: SubsystemKind) -> Result<()> {
        match kind {
            SubsystemKind::DataIntegration => self.data_integrator.shutdown().await,
            SubsystemKind::AnalyticsEngine => self.analytics_engine.shutdown().await,
            SubsystemKind::DashboardManager => self.dashboard_manager.shutdown().await,
            SubsystemKind::ReportGenerator => self.report_generator.shutdown().await,
            SubsystemKind::AlertingSystem => self.alerting_system.shutdown().await,
            SubsystemKind::ApiConnector => self.api_connector.shutdown().await,
            SubsystemKind::WorkflowConnector => self.workflow_connector.shutdown().await,
            SubsystemKind::SecurityManager => self.security_manager.shutdown().await,
            SubsystemKind::BackupManager => self.backup_manager.shutdown().await,
            SubsystemKind::InsightEngine => self.insight_engine.shutdown().await,
            SubsystemKind::ForecastingEngine => self.forecasting_engine.shutdown().await,
        }
    }
}
