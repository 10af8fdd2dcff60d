//! Shared test doubles for orchestrator integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use techops_platform::config::PlatformConfig;
use techops_platform::error::{PlatformError, Result};
use techops_platform::events::PublishedEvent;
use techops_platform::models::{
    AlertingMetrics, BackupRequirements, BackupSchedule, BusinessInsight, CachePolicy,
    DashboardAlert, DashboardConfig, DashboardMetrics, DashboardPerformance,
    DisasterRecoveryPlan, Forecast, PointInTimeRecovery, ReplicationPolicy, ReportData,
    ReportTemplate, ShareLink, StrategicScope,
};
use techops_platform::subsystems::in_memory::{InMemoryBackupManager, InMemoryDashboardManager};
use techops_platform::subsystems::{
    AlertingSystem, BackupManager, DashboardManager, ForecastingEngine, InsightEngine, Subsystem,
};
use techops_platform::PlatformOrchestrator;

pub fn acme_config() -> PlatformConfig {
    PlatformConfig::for_organization("Acme Analytics")
}

/// Record the name of every published event
pub fn record_events(orchestrator: &PlatformOrchestrator) -> Arc<Mutex<Vec<String>>> {
    let names = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&names);
    orchestrator.add_event_listener(Arc::new(move |event: &PublishedEvent| {
        sink.lock().push(event.name.clone());
    }));
    names
}

/// Which lifecycle or operation calls a double should fail
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
    pub initialize: bool,
    pub operation: bool,
    pub shutdown: bool,
}

impl Faults {
    pub fn on_initialize() -> Self {
        Self {
            initialize: true,
            ..Self::default()
        }
    }

    pub fn on_operation() -> Self {
        Self {
            operation: true,
            ..Self::default()
        }
    }

    pub fn on_shutdown() -> Self {
        Self {
            shutdown: true,
            ..Self::default()
        }
    }
}

fn fail(component: &str, call: &str) -> PlatformError {
    PlatformError::subsystem(component, call, format!("{component} injected {call} failure"))
}

/// Alerting system whose calls can be made to fail
#[derive(Debug, Default)]
pub struct FlakyAlertingSystem {
    pub faults: Faults,
    pub checks: AtomicU64,
    pub registered: Mutex<Vec<DashboardAlert>>,
}

impl FlakyAlertingSystem {
    pub fn new(faults: Faults) -> Self {
        Self {
            faults,
            ..Self::default()
        }
    }
}

#[async_trait]
impl Subsystem for FlakyAlertingSystem {
    fn name(&self) -> &'static str {
        "alerting-system"
    }

    async fn initialize(&self) -> Result<()> {
        if self.faults.initialize {
            return Err(fail(self.name(), "initialize"));
        }
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        if self.faults.shutdown {
            return Err(fail(self.name(), "shutdown"));
        }
        Ok(())
    }
}

#[async_trait]
impl AlertingSystem for FlakyAlertingSystem {
    async fn register_alert(&self, alert: &DashboardAlert) -> Result<()> {
        let mut registered = self.registered.lock();
        registered.retain(|existing| existing.id != alert.id);
        registered.push(alert.clone());
        Ok(())
    }

    async fn remove_alert(&self, alert_id: Uuid) -> Result<()> {
        self.registered.lock().retain(|existing| existing.id != alert_id);
        Ok(())
    }

    async fn check_alerts(&self) -> Result<usize> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        if self.faults.operation {
            return Err(fail(self.name(), "check_alerts"));
        }
        Ok(0)
    }

    async fn metrics(&self) -> Result<AlertingMetrics> {
        if self.faults.operation {
            return Err(fail(self.name(), "metrics"));
        }
        Ok(AlertingMetrics {
            alert_rules: self.registered.lock().len(),
            checks_run: self.checks.load(Ordering::SeqCst),
            alerts_fired: 0,
        })
    }
}

/// Dashboard manager that fails on demand and otherwise delegates
#[derive(Debug, Default)]
pub struct FaultyDashboardManager {
    pub faults: Faults,
    pub inner: InMemoryDashboardManager,
}

impl FaultyDashboardManager {
    pub fn new(faults: Faults) -> Self {
        Self {
            faults,
            inner: InMemoryDashboardManager::default(),
        }
    }
}

#[async_trait]
impl Subsystem for FaultyDashboardManager {
    fn name(&self) -> &'static str {
        "dashboard-manager"
    }

    async fn initialize(&self) -> Result<()> {
        if self.faults.initialize {
            return Err(fail(self.name(), "initialize"));
        }
        self.inner.initialize().await
    }

    async fn shutdown(&self) -> Result<()> {
        if self.faults.shutdown {
            return Err(fail(self.name(), "shutdown"));
        }
        self.inner.shutdown().await
    }
}

#[async_trait]
impl DashboardManager for FaultyDashboardManager {
    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Option<DashboardConfig>> {
        self.inner.get_dashboard(dashboard_id).await
    }

    async fn setup_realtime_streams(&self, dashboard: &DashboardConfig) -> Result<()> {
        self.inner.setup_realtime_streams(dashboard).await
    }

    async fn enable_caching(&self, dashboard: &DashboardConfig) -> Result<CachePolicy> {
        self.inner.enable_caching(dashboard).await
    }

    async fn disable_caching(&self, dashboard: &DashboardConfig) -> Result<()> {
        self.inner.disable_caching(dashboard).await
    }

    async fn enable_sharing(&self, dashboard: &DashboardConfig) -> Result<ShareLink> {
        if self.faults.operation {
            return Err(fail(self.name(), "enable_sharing"));
        }
        self.inner.enable_sharing(dashboard).await
    }

    async fn sample_performance(
        &self,
        dashboard: &DashboardConfig,
    ) -> Result<DashboardPerformance> {
        self.inner.sample_performance(dashboard).await
    }

    async fn start_auto_refresh(
        &self,
        dashboard: &DashboardConfig,
        interval: Duration,
    ) -> Result<()> {
        self.inner.start_auto_refresh(dashboard, interval).await
    }

    async fn update_dashboards(&self) -> Result<usize> {
        if self.faults.operation {
            return Err(fail(self.name(), "update_dashboards"));
        }
        self.inner.update_dashboards().await
    }

    async fn metrics(&self) -> Result<DashboardMetrics> {
        self.inner.metrics().await
    }
}

/// Backup manager that fails on demand and otherwise delegates
#[derive(Debug, Default)]
pub struct FaultyBackupManager {
    pub faults: Faults,
    pub inner: InMemoryBackupManager,
}

impl FaultyBackupManager {
    pub fn new(faults: Faults) -> Self {
        Self {
            faults,
            inner: InMemoryBackupManager::default(),
        }
    }
}

#[async_trait]
impl Subsystem for FaultyBackupManager {
    fn name(&self) -> &'static str {
        "backup-manager"
    }

    async fn initialize(&self) -> Result<()> {
        if self.faults.initialize {
            return Err(fail(self.name(), "initialize"));
        }
        self.inner.initialize().await
    }

    async fn shutdown(&self) -> Result<()> {
        if self.faults.shutdown {
            return Err(fail(self.name(), "shutdown"));
        }
        self.inner.shutdown().await
    }
}

#[async_trait]
impl BackupManager for FaultyBackupManager {
    async fn create_backup_schedule(
        &self,
        requirements: &BackupRequirements,
    ) -> Result<BackupSchedule> {
        self.inner.create_backup_schedule(requirements).await
    }

    async fn configure_replication(&self) -> Result<ReplicationPolicy> {
        if self.faults.operation {
            return Err(fail(self.name(), "configure_replication"));
        }
        self.inner.configure_replication().await
    }

    async fn enable_point_in_time_recovery(&self) -> Result<PointInTimeRecovery> {
        self.inner.enable_point_in_time_recovery().await
    }

    async fn create_disaster_recovery_plan(&self) -> Result<DisasterRecoveryPlan> {
        self.inner.create_disaster_recovery_plan().await
    }
}

/// Insight engine returning a fixed list of insights
#[derive(Debug, Default)]
pub struct StubInsightEngine {
    pub insights: Vec<BusinessInsight>,
}

impl StubInsightEngine {
    pub fn new(insights: Vec<BusinessInsight>) -> Self {
        Self { insights }
    }
}

#[async_trait]
impl Subsystem for StubInsightEngine {
    fn name(&self) -> &'static str {
        "insight-engine"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl InsightEngine for StubInsightEngine {
    async fn generate_insights(&self, _data: &ReportData) -> Result<Vec<BusinessInsight>> {
        Ok(self.insights.clone())
    }

    async fn generate_strategic_insights(
        &self,
        _scope: &StrategicScope,
    ) -> Result<Vec<BusinessInsight>> {
        Ok(self.insights.clone())
    }
}

/// Forecasting engine that succeeds without producing anything
#[derive(Debug, Default)]
pub struct SilentForecastingEngine;

#[async_trait]
impl Subsystem for SilentForecastingEngine {
    fn name(&self) -> &'static str {
        "forecasting-engine"
    }

    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl ForecastingEngine for SilentForecastingEngine {
    async fn generate_forecasts(
        &self,
        _template: &ReportTemplate,
        _data: &ReportData,
    ) -> Result<Vec<Forecast>> {
        Ok(Vec::new())
    }
}
