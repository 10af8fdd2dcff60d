//! # Subsystem Contracts
//!
//! The orchestrator consumes eleven independently-owned subsystems through
//! these traits. Concrete analytics, cloud and workflow logic lives behind
//! them; the crate ships deterministic [`in_memory`] implementations so the
//! platform runs end to end without external services.
//!
//! Every contract extends [`Subsystem`], which carries the lifecycle calls the
//! orchestrator drives during initialization and shutdown. Every method is an
//! async boundary; the core imposes no timeout of its own.

pub mod handles;
pub mod in_memory;

use crate::error::Result;
use crate::models::{
    AccessControlPolicy, AlertingMetrics, AnalyticsMetrics, AnomalyDetection, ApiConnection,
    ApiEndpointConfig, ApiMonitoring, AuditTrail, BackupRequirements, BackupSchedule,
    BusinessInsight, CachePolicy, ComplianceReport, DashboardAlert, DashboardConfig,
    DashboardMetrics, DashboardPerformance, DataIntegrationMetrics, DataSourceConfig,
    DeployedWorkflow, DisasterRecoveryPlan, EncryptionPolicy, EtlPipeline, Forecast,
    KpiMeasurement, KpiTemplate, LineageTracking, PointInTimeRecovery, QualityMonitor,
    RealtimeBatch, ReplicationPolicy, Report, ReportData, ReportMetrics, ReportParameters,
    ReportTemplate, ScheduledReportSweep, ShareLink, StrategicScope, StreamConfig,
    StreamProcessor, ThreatDetection, WorkflowDefinition, WorkflowMonitoring,
};
use async_trait::async_trait;
use std::time::Duration;
use uuid::Uuid;

pub use handles::{PlatformSubsystems, SubsystemKind};

/// Lifecycle contract shared by every subsystem
#[async_trait]
pub trait Subsystem: Send + Sync {
    /// Component name used in initialization results and logs
    fn name(&self) -> &'static str;

    async fn initialize(&self) -> Result<()>;

    async fn shutdown(&self) -> Result<()>;
}

/// ETL pipelines, data-quality monitoring, lineage and report data collection
#[async_trait]
pub trait DataIntegrator: Subsystem {
    async fn create_etl_pipeline(&self, source: &DataSourceConfig) -> Result<EtlPipeline>;

    async fn validate_pipeline(&self, pipeline: &EtlPipeline) -> Result<()>;

    /// Start a validated pipeline, returning it in its running state
    async fn start_pipeline(&self, pipeline: &EtlPipeline) -> Result<EtlPipeline>;

    async fn setup_quality_monitoring(&self, pipelines: &[EtlPipeline]) -> Result<QualityMonitor>;

    async fn setup_lineage_tracking(&self, pipelines: &[EtlPipeline]) -> Result<LineageTracking>;

    async fn collect_report_data(
        &self,
        template: &ReportTemplate,
        parameters: &ReportParameters,
    ) -> Result<ReportData>;

    async fn metrics(&self) -> Result<DataIntegrationMetrics>;
}

/// Real-time processing, KPI measurement and stream analytics
#[async_trait]
pub trait AnalyticsEngine: Subsystem {
    /// One tick of the real-time processing job
    async fn process_real_time_data(&self) -> Result<RealtimeBatch>;

    async fn measure_kpi(&self, kpi: &KpiTemplate) -> Result<KpiMeasurement>;

    async fn create_stream_processor(&self, stream: &StreamConfig) -> Result<StreamProcessor>;

    async fn enable_anomaly_detection(
        &self,
        processors: &[StreamProcessor],
        sensitivity: f64,
    ) -> Result<AnomalyDetection>;

    async fn metrics(&self) -> Result<AnalyticsMetrics>;
}

#[async_trait]
pub trait DashboardManager: Subsystem {
    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Option<DashboardConfig>>;

    async fn setup_realtime_streams(&self, dashboard: &DashboardConfig) -> Result<()>;

    async fn enable_caching(&self, dashboard: &DashboardConfig) -> Result<CachePolicy>;

    /// Drop the dashboard's cache policy; a no-op when none is set
    async fn disable_caching(&self, dashboard: &DashboardConfig) -> Result<()>;

    async fn enable_sharing(&self, dashboard: &DashboardConfig) -> Result<ShareLink>;

    async fn sample_performance(&self, dashboard: &DashboardConfig)
        -> Result<DashboardPerformance>;

    async fn start_auto_refresh(&self, dashboard: &DashboardConfig, interval: Duration)
        -> Result<()>;

    /// One tick of the dashboard refresh job; returns the number refreshed
    async fn update_dashboards(&self) -> Result<usize>;

    async fn metrics(&self) -> Result<DashboardMetrics>;
}

#[async_trait]
pub trait ReportGenerator: Subsystem {
    async fn get_template(&self, template_id: &str) -> Result<Option<ReportTemplate>>;

    async fn store_report(&self, report: &Report) -> Result<()>;

    async fn distribute_report(&self, report: &Report, recipients: &[String]) -> Result<()>;

    /// One tick of the scheduled-report sweep
    async fn process_scheduled_reports(&self) -> Result<ScheduledReportSweep>;

    async fn metrics(&self) -> Result<ReportMetrics>;
}

#[async_trait]
pub trait AlertingSystem: Subsystem {
    /// Register an alert rule, replacing any rule with the same id
    async fn register_alert(&self, alert: &DashboardAlert) -> Result<()>;

    /// Withdraw a rule; a no-op for unknown ids
    async fn remove_alert(&self, alert_id: Uuid) -> Result<()>;

    /// One tick of the alert evaluation job; returns the number of alerts fired
    async fn check_alerts(&self) -> Result<usize>;

    async fn metrics(&self) -> Result<AlertingMetrics>;
}

/// Connector for enterprise APIs (ERP, CRM, HRIS, ...)
#[async_trait]
pub trait ApiConnector: Subsystem {
    async fn connect(&self, endpoint: &ApiEndpointConfig) -> Result<ApiConnection>;

    async fn test_connection(&self, connection: &ApiConnection) -> Result<()>;

    async fn setup_monitoring(&self, connections: &[ApiConnection]) -> Result<ApiMonitoring>;
}

/// Connector for n8n workflow automation
#[async_trait]
pub trait WorkflowConnector: Subsystem {
    async fn deploy_workflow(&self, workflow: &WorkflowDefinition) -> Result<DeployedWorkflow>;

    async fn test_workflow(&self, workflow: &DeployedWorkflow) -> Result<()>;

    async fn setup_monitoring(&self, workflows: &[DeployedWorkflow])
        -> Result<WorkflowMonitoring>;
}

#[async_trait]
pub trait SecurityManager: Subsystem {
    async fn enable_audit_trail(&self) -> Result<AuditTrail>;

    async fn configure_encryption(&self) -> Result<EncryptionPolicy>;

    async fn configure_access_control(&self) -> Result<AccessControlPolicy>;

    async fn enable_threat_detection(&self) -> Result<ThreatDetection>;

    async fn assess_compliance(&self, frameworks: &[String]) -> Result<ComplianceReport>;
}

#[async_trait]
pub trait BackupManager: Subsystem {
    async fn create_backup_schedule(&self, requirements: &BackupRequirements)
        -> Result<BackupSchedule>;

    async fn configure_replication(&self) -> Result<ReplicationPolicy>;

    async fn enable_point_in_time_recovery(&self) -> Result<PointInTimeRecovery>;

    async fn create_disaster_recovery_plan(&self) -> Result<DisasterRecoveryPlan>;
}

#[async_trait]
pub trait InsightEngine: Subsystem {
    async fn generate_insights(&self, data: &ReportData) -> Result<Vec<BusinessInsight>>;

    async fn generate_strategic_insights(
        &self,
        scope: &StrategicScope,
    ) -> Result<Vec<BusinessInsight>>;
}

#[async_trait]
pub trait ForecastingEngine: Subsystem {
    async fn generate_forecasts(
        &self,
        template: &ReportTemplate,
        data: &ReportData,
    ) -> Result<Vec<Forecast>>;
}
