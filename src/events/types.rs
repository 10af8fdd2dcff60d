//! Platform event catalogue.
//!
//! Every significant orchestrator operation emits exactly one of these. The
//! wire name (`platform:initialized`, `report:generated`, ...) is stable and
//! is what listeners filter on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod names {
    pub const PLATFORM_INITIALIZED: &str = "platform:initialized";
    pub const PLATFORM_SHUTDOWN: &str = "platform:shutdown";
    pub const REPORT_GENERATED: &str = "report:generated";
    pub const DASHBOARD_AUTOMATED: &str = "dashboard:automated";
    pub const DATA_INTEGRATION_SETUP: &str = "data-integration:setup";
    pub const SECURITY_COMPLIANCE_AUTOMATED: &str = "security-compliance:automated";
    pub const BACKUP_RECOVERY_SETUP: &str = "backup-recovery:setup";
    pub const BI_PLATFORM_DEPLOYED: &str = "bi-platform:deployed";
    pub const N8N_INTEGRATED: &str = "n8n:integrated";
    pub const ENTERPRISE_APIS_CONNECTED: &str = "enterprise-apis:connected";
    pub const REALTIME_ANALYTICS_SETUP: &str = "realtime-analytics:setup";
    pub const STRATEGIC_INSIGHTS_GENERATED: &str = "strategic-insights:generated";
    pub const BACKGROUND_JOB_FAILED: &str = "background-job:failed";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum PlatformEvent {
    PlatformInitialized {
        component_count: usize,
        initialized_at: DateTime<Utc>,
    },
    PlatformShutdown {
        failed_components: usize,
    },
    ReportGenerated {
        report_id: Uuid,
        template_id: String,
        section_count: usize,
        forecast_count: usize,
        recipient_count: usize,
    },
    DashboardAutomated {
        dashboard_id: String,
        kpi_count: usize,
        alert_count: usize,
    },
    DataIntegrationSetup {
        pipeline_count: usize,
    },
    SecurityComplianceAutomated {
        frameworks: Vec<String>,
        auditing: bool,
        encryption: bool,
        access_control: bool,
        threat_detection: bool,
    },
    BackupRecoverySetup {
        cross_region: bool,
        point_in_time: bool,
        disaster_recovery: bool,
    },
    BiPlatformDeployed {
        environment: String,
        pipeline_count: usize,
        dashboard_count: usize,
    },
    N8nIntegrated {
        workflow_count: usize,
    },
    EnterpriseApisConnected {
        connection_count: usize,
    },
    RealtimeAnalyticsSetup {
        processor_count: usize,
        anomaly_detection: bool,
    },
    StrategicInsightsGenerated {
        insight_count: usize,
    },
    BackgroundJobFailed {
        job: String,
        error: String,
    },
}

impl PlatformEvent {
    /// Stable wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            PlatformEvent::PlatformInitialized { .. } => names::PLATFORM_INITIALIZED,
            PlatformEvent::PlatformShutdown { .. } => names::PLATFORM_SHUTDOWN,
            PlatformEvent::ReportGenerated { .. } => names::REPORT_GENERATED,
            PlatformEvent::DashboardAutomated { .. } => names::DASHBOARD_AUTOMATED,
            PlatformEvent::DataIntegrationSetup { .. } => names::DATA_INTEGRATION_SETUP,
            PlatformEvent::SecurityComplianceAutomated { .. } => {
                names::SECURITY_COMPLIANCE_AUTOMATED
            }
            PlatformEvent::BackupRecoverySetup { .. } => names::BACKUP_RECOVERY_SETUP,
            PlatformEvent::BiPlatformDeployed { .. } => names::BI_PLATFORM_DEPLOYED,
            PlatformEvent::N8nIntegrated { .. } => names::N8N_INTEGRATED,
            PlatformEvent::EnterpriseApisConnected { .. } => names::ENTERPRISE_APIS_CONNECTED,
            PlatformEvent::RealtimeAnalyticsSetup { .. } => names::REALTIME_ANALYTICS_SETUP,
            PlatformEvent::StrategicInsightsGenerated { .. } => {
                names::STRATEGIC_INSIGHTS_GENERATED
            }
            PlatformEvent::BackgroundJobFailed { .. } => names::BACKGROUND_JOB_FAILED,
        }
    }
}

/// Event as recorded in the history and delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedEvent {
    /// Monotonic position in the event log
    pub sequence: u64,
    pub name: String,
    pub event: PlatformEvent,
    pub published_at: DateTime<Utc>,
}
