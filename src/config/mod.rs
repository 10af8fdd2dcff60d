//! # Platform Configuration
//!
//! The platform is driven by a single validated [`PlatformConfig`] tree. It is
//! immutable once the orchestrator is constructed and is shared read-only with
//! the subsystems that need it.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use techops_platform::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Loads config/platform.yaml, config/platform.<env>.yaml and PLATFORM__* variables
//! let manager = ConfigManager::load()?;
//!
//! let organization = &manager.config().organization.name;
//! let refresh = manager.config().scheduler.dashboard_refresh_seconds;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use crate::models::{DashboardConfig, DataSourceConfig, ReportTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring platform.yaml
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlatformConfig {
    /// Organization metadata
    pub organization: OrganizationConfig,

    /// Data sources feeding the integration pipelines
    #[serde(default)]
    pub data_sources: Vec<DataSourceConfig>,

    /// Dashboards known at startup
    #[serde(default)]
    pub dashboards: Vec<DashboardConfig>,

    /// Report templates known at startup
    #[serde(default)]
    pub report_templates: Vec<ReportTemplate>,

    /// Analytics feature toggles
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Notification channels used for report distribution and alerts
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Background job cadences
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Event bus sizing
    #[serde(default)]
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OrganizationConfig {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub real_time: bool,
    pub predictive: bool,
    pub anomaly_detection: bool,
    /// Standard deviations used by anomaly detection
    pub anomaly_sensitivity: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            real_time: true,
            predictive: true,
            anomaly_detection: true,
            anomaly_sensitivity: 3.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub channels: Vec<NotificationChannel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationChannel {
    /// "email", "slack", "teams", "webhook", ...
    pub kind: String,
    pub target: String,
}

/// Cadences of the four background jobs, in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub real_time_processing_seconds: u64,
    pub alert_evaluation_seconds: u64,
    pub dashboard_refresh_seconds: u64,
    pub scheduled_reports_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            real_time_processing_seconds: 30,
            alert_evaluation_seconds: 60,
            dashboard_refresh_seconds: 300,
            scheduled_reports_seconds: 3600,
        }
    }
}

impl SchedulerConfig {
    pub fn real_time_processing_interval(&self) -> Duration {
        Duration::from_secs(self.real_time_processing_seconds)
    }

    pub fn alert_evaluation_interval(&self) -> Duration {
        Duration::from_secs(self.alert_evaluation_seconds)
    }

    pub fn dashboard_refresh_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_refresh_seconds)
    }

    pub fn scheduled_reports_interval(&self) -> Duration {
        Duration::from_secs(self.scheduled_reports_seconds)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Capacity of the broadcast channel for async subscribers
    pub buffer_size: usize,
    /// Number of events retained in the in-memory history
    pub history_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            history_capacity: 10_000,
        }
    }
}

impl PlatformConfig {
    /// Minimal valid configuration for the given organization
    pub fn for_organization(name: impl Into<String>) -> Self {
        Self {
            organization: OrganizationConfig {
                name: name.into(),
                industry: None,
                size: None,
                timezone: default_timezone(),
            },
            ..Self::default()
        }
    }

    pub fn with_data_source(mut self, source: DataSourceConfig) -> Self {
        self.data_sources.push(source);
        self
    }

    pub fn with_dashboard(mut self, dashboard: DashboardConfig) -> Self {
        self.dashboards.push(dashboard);
        self
    }

    pub fn with_report_template(mut self, template: ReportTemplate) -> Self {
        self.report_templates.push(template);
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Validate the configuration tree
    pub fn validate(&self) -> ConfigResult<()> {
        if self.organization.name.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "organization.name",
                "organization configuration",
            ));
        }

        check_ids(
            "data source",
            self.data_sources.iter().map(|s| s.id.as_str()),
        )?;
        for source in &self.data_sources {
            if source.source_type.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    format!("data_sources[{}].type", source.id),
                    "data source configuration",
                ));
            }
        }

        check_ids("dashboard", self.dashboards.iter().map(|d| d.id.as_str()))?;
        for dashboard in &self.dashboards {
            if dashboard.refresh_interval_seconds == 0 {
                return Err(ConfigurationError::invalid_value(
                    format!("dashboards[{}].refresh_interval_seconds", dashboard.id),
                    "0",
                    "refresh interval must be greater than 0",
                ));
            }
        }

        check_ids(
            "report template",
            self.report_templates.iter().map(|t| t.id.as_str()),
        )?;

        for channel in &self.notifications.channels {
            if channel.target.trim().is_empty() {
                return Err(ConfigurationError::missing_required_field(
                    format!("notifications.channels[{}].target", channel.kind),
                    "notification channel configuration",
                ));
            }
        }

        let intervals = [
            (
                "scheduler.real_time_processing_seconds",
                self.scheduler.real_time_processing_seconds,
            ),
            (
                "scheduler.alert_evaluation_seconds",
                self.scheduler.alert_evaluation_seconds,
            ),
            (
                "scheduler.dashboard_refresh_seconds",
                self.scheduler.dashboard_refresh_seconds,
            ),
            (
                "scheduler.scheduled_reports_seconds",
                self.scheduler.scheduled_reports_seconds,
            ),
        ];
        for (field, seconds) in intervals {
            if seconds == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    "0",
                    "job interval must be greater than 0",
                ));
            }
        }

        if self.events.buffer_size == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.buffer_size",
                "0",
                "buffer size must be greater than 0",
            ));
        }

        let sensitivity = self.analytics.anomaly_sensitivity;
        if sensitivity.is_nan() || sensitivity <= 0.0 {
            return Err(ConfigurationError::invalid_value(
                "analytics.anomaly_sensitivity",
                sensitivity.to_string(),
                "sensitivity must be a positive number",
            ));
        }

        Ok(())
    }
}

fn check_ids<'a>(kind: &str, ids: impl Iterator<Item = &'a str>) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id.trim().is_empty() {
            return Err(ConfigurationError::missing_required_field(
                "id",
                format!("{kind} configuration"),
            ));
        }
        if !seen.insert(id) {
            return Err(ConfigurationError::duplicate_id(kind, id));
        }
    }
    Ok(())
}
