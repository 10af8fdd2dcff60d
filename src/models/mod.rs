//! # Platform Data Model
//!
//! Value types exchanged between the orchestrator and its subsystems. None of
//! these are persisted by the core; persistence is a subsystem concern.

pub mod compliance;
pub mod dashboard;
pub mod insight;
pub mod integration;
pub mod kpi;
pub mod metrics;
pub mod report;

pub use compliance::{
    AccessControlPolicy, AuditTrail, BackupRequirements, BackupSchedule, BackupSetup,
    ComplianceReport, ComplianceRequirements, ComplianceSetup, DisasterRecoveryPlan,
    EncryptionPolicy, FrameworkAssessment, PointInTimeRecovery, ReplicationPolicy,
    ThreatDetection,
};
pub use dashboard::{
    AlertSeverity, AutomatedDashboard, CachePolicy, DashboardAlert, DashboardConfig,
    DashboardOptions, DashboardPerformance, ShareLink,
};
pub use insight::{BusinessInsight, InsightImpact, InsightType, StrategicScope};
pub use integration::{
    AnomalyDetection, ApiConnection, ApiEndpointConfig, ApiMonitoring, DataIntegrationSetup,
    DataSourceConfig, DeployedWorkflow, EnterpriseApiSetup, EtlPipeline, IntegrationMetrics,
    LineageTracking, PipelineStatus, QualityMonitor, RealtimeAnalyticsSetup, RealtimeBatch,
    StreamConfig, StreamProcessor, WorkflowDefinition, WorkflowIntegration, WorkflowMonitoring,
};
pub use kpi::{Kpi, KpiColor, KpiMeasurement, KpiTemplate, KpiThresholds, KpiTrend, KPI_CATALOGUE};
pub use metrics::{
    AlertingMetrics, AnalyticsMetrics, DashboardMetrics, DataIntegrationMetrics, PlatformMetrics,
    ReportMetrics,
};
pub use report::{
    Forecast, Report, ReportData, ReportMetadata, ReportParameters, ReportSection,
    ReportTemplate, ScheduledReportSweep, SectionContent, SectionKind,
};
