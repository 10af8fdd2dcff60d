//! Dashboard configuration, activation options and activation results.

use crate::models::kpi::Kpi;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 300;

/// Dashboard definition as declared in configuration or held by the dashboard manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub widgets: Vec<String>,
    /// Data source ids streamed into the dashboard
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
}

fn default_refresh_interval_seconds() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECONDS
}

impl DashboardConfig {
    /// Fallback used when a dashboard id is not known to the dashboard manager
    pub fn default_for(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Dashboard {id}"),
            id,
            widgets: vec!["kpi-overview".to_string(), "trend-chart".to_string()],
            data_sources: Vec::new(),
            refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECONDS,
        }
    }
}

/// Caller options for dashboard activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub alerting: bool,
    pub caching: bool,
    pub sharing: bool,
    #[serde(with = "duration_seconds")]
    pub refresh_interval: Duration,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            alerting: true,
            caching: true,
            sharing: false,
            refresh_interval: Duration::from_secs(DEFAULT_REFRESH_INTERVAL_SECONDS),
        }
    }
}

mod duration_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

/// Alert rule derived from a KPI snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAlert {
    pub id: Uuid,
    pub dashboard_id: String,
    pub kpi_id: String,
    pub severity: AlertSeverity,
    pub message: String,
    /// Value below which the alert fires
    pub threshold: f64,
}

impl DashboardAlert {
    /// Stable rule id for a dashboard/KPI pair. Re-registering the same pair
    /// replaces the earlier rule.
    pub fn rule_id(dashboard_id: &str, kpi_id: &str) -> Uuid {
        Uuid::new_v5(
            &Uuid::NAMESPACE_OID,
            format!("dashboard-alert/{dashboard_id}/{kpi_id}").as_bytes(),
        )
    }

    /// Critical alert for a KPI in the red band
    pub fn critical_for(dashboard_id: &str, kpi: &Kpi) -> Self {
        Self {
            id: Self::rule_id(dashboard_id, &kpi.id),
            dashboard_id: dashboard_id.to_string(),
            kpi_id: kpi.id.clone(),
            severity: AlertSeverity::Critical,
            message: format!(
                "{} is at {:.2} {}, below {:.2} (target {:.2})",
                kpi.name, kpi.value, kpi.unit, kpi.thresholds.yellow, kpi.target
            ),
            threshold: kpi.thresholds.yellow,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachePolicy {
    pub dashboard_id: String,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareLink {
    pub dashboard_id: String,
    pub url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardPerformance {
    pub load_time_ms: f64,
    pub render_time_ms: f64,
    pub data_fetch_time_ms: f64,
    /// 0.0 - 1.0
    pub cache_hit_ratio: f64,
}

/// Result of a dashboard activation. `kpis`, `alerts` and `performance` are
/// always present; `alerts` is empty when alerting was not requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatedDashboard {
    pub dashboard: DashboardConfig,
    pub kpis: Vec<Kpi>,
    pub alerts: Vec<DashboardAlert>,
    pub performance: DashboardPerformance,
    pub cache: Option<CachePolicy>,
    pub share: Option<ShareLink>,
}
