//! Per-subsystem metric snapshots and the aggregated platform view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataIntegrationMetrics {
    pub active_pipelines: usize,
    pub records_processed: u64,
    pub failed_runs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMetrics {
    pub stream_processors: usize,
    pub realtime_batches: u64,
    pub events_processed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub dashboards: usize,
    pub auto_refreshing: usize,
    pub refresh_cycles: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub templates: usize,
    pub reports_stored: usize,
    pub reports_distributed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertingMetrics {
    pub alert_rules: usize,
    pub checks_run: u64,
    pub alerts_fired: u64,
}

/// Aggregated view returned by `get_platform_metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformMetrics {
    pub data_integration: DataIntegrationMetrics,
    pub analytics: AnalyticsMetrics,
    pub dashboards: DashboardMetrics,
    pub reports: ReportMetrics,
    pub alerting: AlertingMetrics,
    pub collected_at: DateTime<Utc>,
}
