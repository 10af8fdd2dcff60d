//! # Platform Orchestrator Core
//!
//! Owns the validated configuration, the eleven subsystem handles, the event
//! publisher and the background scheduler. Pipelines and setup operations are
//! implemented in sibling modules as further `impl PlatformOrchestrator`
//! blocks.

use crate::config::{ConfigManager, PlatformConfig};
use crate::error::{PlatformError, Result};
use crate::events::{EventListener, EventPublisher, PlatformEvent, PublishedEvent};
use crate::logging::log_platform_operation;
use crate::models::PlatformMetrics;
use crate::orchestration::scheduler::BackgroundScheduler;
use crate::orchestration::types::{InitializationResult, OperationCounts, PlatformStatus};
use crate::subsystems::{
    AlertingSystem, AnalyticsEngine, DashboardManager, DataIntegrator, PlatformSubsystems,
    ReportGenerator, SubsystemKind,
};
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Default)]
pub(crate) struct OperationCounters {
    pub(crate) reports_generated: AtomicU64,
    pub(crate) dashboards_automated: AtomicU64,
    pub(crate) pipelines_started: AtomicU64,
    pub(crate) apis_connected: AtomicU64,
    pub(crate) workflows_deployed: AtomicU64,
}

impl OperationCounters {
    fn snapshot(&self) -> OperationCounts {
        OperationCounts {
            reports_generated: self.reports_generated.load(Ordering::Relaxed),
            dashboards_automated: self.dashboards_automated.load(Ordering::Relaxed),
            pipelines_started: self.pipelines_started.load(Ordering::Relaxed),
            apis_connected: self.apis_connected.load(Ordering::Relaxed),
            workflows_deployed: self.workflows_deployed.load(Ordering::Relaxed),
        }
    }
}

/// Central coordinator of the BI platform
#[derive(Debug)]
pub struct PlatformOrchestrator {
    pub(crate) config: Arc<PlatformConfig>,
    pub(crate) environment: String,
    pub(crate) subsystems: PlatformSubsystems,
    pub(crate) events: Arc<EventPublisher>,
    scheduler: Mutex<Option<Arc<BackgroundScheduler>>>,
    initialized: AtomicBool,
    pub(crate) counters: OperationCounters,
}

impl PlatformOrchestrator {
    /// Build an orchestrator over deterministic in-memory subsystems.
    ///
    /// A rejected configuration is returned as
    /// [`PlatformError::ConfigValidation`].
    pub fn new(config: PlatformConfig) -> Result<Self> {
        let subsystems = PlatformSubsystems::in_memory(&config);
        Self::with_subsystems(config, subsystems)
    }

    /// Build an orchestrator over caller-supplied subsystem handles.
    ///
    /// This is the single place configuration is validated.
    pub fn with_subsystems(config: PlatformConfig, subsystems: PlatformSubsystems) -> Result<Self> {
        config.validate()?;

        let events = Arc::new(EventPublisher::new(
            config.events.buffer_size,
            config.events.history_capacity,
        ));

        info!(
            organization = %config.organization.name,
            data_sources = config.data_sources.len(),
            dashboards = config.dashboards.len(),
            report_templates = config.report_templates.len(),
            "🏗️ PLATFORM: Orchestrator created"
        );

        Ok(Self {
            config: Arc::new(config),
            environment: ConfigManager::detect_environment(),
            subsystems,
            events,
            scheduler: Mutex::new(None),
            initialized: AtomicBool::new(false),
            counters: OperationCounters::default(),
        })
    }

    /// Build an orchestrator from a loaded configuration manager
    pub fn from_config_manager(manager: &ConfigManager) -> Result<Self> {
        let mut orchestrator = Self::new(manager.config().clone())?;
        orchestrator.environment = manager.environment().to_string();
        Ok(orchestrator)
    }

    /// Override the deployment environment name reported in events and status
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn subsystems(&self) -> &PlatformSubsystems {
        &self.subsystems
    }

    pub fn events(&self) -> &Arc<EventPublisher> {
        &self.events
    }

    pub fn add_event_listener(&self, listener: Arc<dyn EventListener>) {
        self.events.add_listener(listener);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PublishedEvent> {
        self.events.subscribe()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn is_scheduler_running(&self) -> bool {
        self.scheduler
            .lock()
            .as_ref()
            .is_some_and(|scheduler| scheduler.is_running())
    }

    pub(crate) fn emit(&self, event: PlatformEvent) {
        self.events.publish(event);
    }

    /// Initialize every subsystem in dependency order.
    ///
    /// Stops at the first failure and reports it in the returned result rather
    /// than as an error. On full success the background scheduler is started,
    /// once, and `platform:initialized` is emitted.
    #[instrument(skip(self), fields(organization = %self.config.organization.name))]
    pub async fn initialize_platform(&self) -> InitializationResult {
        log_platform_operation("initialize_platform", "started", None);

        let mut initialized_components = Vec::new();
        let mut errors = Vec::new();

        for kind in SubsystemKind::INITIALIZATION_ORDER {
            match self.subsystems.initialize(kind).await {
                Ok(()) => initialized_components.push(kind.component_name().to_string()),
                Err(e) => {
                    let failure = PlatformError::SubsystemInit {
                        component: kind.component_name().to_string(),
                        reason: e.to_string(),
                    };
                    error!(component = %kind, error = %e, "Subsystem initialization failed");
                    errors.push(failure.to_string());
                    break;
                }
            }
        }

        if !errors.is_empty() {
            log_platform_operation(
                "initialize_platform",
                "failed",
                errors.first().map(String::as_str),
            );
            return InitializationResult {
                success: false,
                initialized_components,
                errors,
                metrics: None,
            };
        }

        self.initialized.store(true, Ordering::SeqCst);
        self.ensure_scheduler_started();

        let metrics = match self.get_platform_metrics().await {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                warn!(error = %e, "Metrics snapshot unavailable after initialization");
                None
            }
        };

        self.emit(PlatformEvent::PlatformInitialized {
            component_count: initialized_components.len(),
            initialized_at: Utc::now(),
        });
        log_platform_operation("initialize_platform", "completed", None);
        info!(
            components = initialized_components.len(),
            "✅ PLATFORM: Initialization complete"
        );

        InitializationResult {
            success: true,
            initialized_components,
            errors,
            metrics,
        }
    }

    fn ensure_scheduler_started(&self) {
        let mut slot = self.scheduler.lock();
        if slot.is_some() {
            info!("Background scheduler already running; not starting another");
            return;
        }
        *slot = Some(Arc::new(BackgroundScheduler::start(
            self.subsystems.clone(),
            &self.config.scheduler,
            Arc::clone(&self.events),
        )));
    }

    /// Collect metrics from the five reporting subsystems concurrently.
    ///
    /// The first failing subsystem aborts the collection.
    #[instrument(skip(self))]
    pub async fn get_platform_metrics(&self) -> Result<PlatformMetrics> {
        let (data_integration, analytics, dashboards, reports, alerting) = tokio::try_join!(
            self.subsystems.data_integrator.metrics(),
            self.subsystems.analytics_engine.metrics(),
            self.subsystems.dashboard_manager.metrics(),
            self.subsystems.report_generator.metrics(),
            self.subsystems.alerting_system.metrics(),
        )?;

        Ok(PlatformMetrics {
            data_integration,
            analytics,
            dashboards,
            reports,
            alerting,
            collected_at: Utc::now(),
        })
    }

    /// Snapshot of lifecycle state, job counters and operation counters
    pub fn platform_status(&self) -> PlatformStatus {
        let (scheduler_running, jobs) = match self.scheduler.lock().as_ref() {
            Some(scheduler) => (scheduler.is_running(), scheduler.statuses()),
            None => (false, Vec::new()),
        };

        PlatformStatus {
            organization: self.config.organization.name.clone(),
            environment: self.environment.clone(),
            initialized: self.is_initialized(),
            scheduler_running,
            jobs,
            operations: self.counters.snapshot(),
            events_published: self.events.published_count(),
        }
    }

    /// Stop the scheduler, then shut every subsystem down concurrently.
    ///
    /// Every subsystem is asked to shut down even if some fail; all failures
    /// are reported together in [`PlatformError::Shutdown`].
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<()> {
        log_platform_operation("shutdown", "started", None);

        let scheduler = self.scheduler.lock().take();
        if let Some(scheduler) = scheduler {
            scheduler.stop().await;
        }

        let outcomes = futures::future::join_all(
            SubsystemKind::ALL
                .iter()
                .map(|kind| self.subsystems.shutdown(*kind)),
        )
        .await;

        let failures: Vec<(String, String)> = SubsystemKind::ALL
            .iter()
            .zip(outcomes)
            .filter_map(|(kind, outcome)| {
                outcome
                    .err()
                    .map(|e| (kind.component_name().to_string(), e.to_string()))
            })
            .collect();

        self.initialized.store(false, Ordering::SeqCst);
        self.emit(PlatformEvent::PlatformShutdown {
            failed_components: failures.len(),
        });

        if failures.is_empty() {
            log_platform_operation("shutdown", "completed", None);
            info!("🛑 PLATFORM: Shutdown complete");
            Ok(())
        } else {
            let error = PlatformError::Shutdown { failures };
            log_platform_operation("shutdown", "failed", Some(&error.to_string()));
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use crate::events::names;

    fn config() -> PlatformConfig {
        PlatformConfig::for_organization("Acme")
    }

    #[test]
    fn test_invalid_config_is_rejected_by_every_constructor() {
        let invalid = PlatformConfig::for_organization("");

        let result = PlatformOrchestrator::new(invalid.clone());
        assert!(matches!(result, Err(PlatformError::ConfigValidation(_))));

        let subsystems = PlatformSubsystems::in_memory(&invalid);
        let result = PlatformOrchestrator::with_subsystems(invalid, subsystems);
        assert!(matches!(result, Err(PlatformError::ConfigValidation(_))));
    }

    #[tokio::test]
    async fn test_initialize_reports_every_component_in_order() {
        let orchestrator = PlatformOrchestrator::new(config()).expect("orchestrator");
        let result = orchestrator.initialize_platform().await;

        assert!(result.success);
        assert_eq!(result.initialized_components.len(), 9);
        assert_eq!(result.initialized_components[0], "data-integration");
        assert_eq!(result.initialized_components[8], "backup-manager");
        assert!(result.metrics.is_some());
        assert!(orchestrator.is_initialized());
        assert!(orchestrator.is_scheduler_running());
        assert_eq!(orchestrator.events().events_named(names::PLATFORM_INITIALIZED).len(), 1);

        orchestrator.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn test_reinitialization_keeps_single_scheduler() {
        let orchestrator = PlatformOrchestrator::new(config()).expect("orchestrator");
        assert!(orchestrator.initialize_platform().await.success);
        let first = orchestrator.scheduler.lock().clone().expect("scheduler");

        assert!(orchestrator.initialize_platform().await.success);
        let second = orchestrator.scheduler.lock().clone().expect("scheduler");
        assert!(Arc::ptr_eq(&first, &second));

        orchestrator.shutdown().await.expect("shutdown");
    }

    #[tokio::test]
    async fn test_shutdown_stops_scheduler() {
        let orchestrator = PlatformOrchestrator::new(config().with_scheduler(SchedulerConfig {
            real_time_processing_seconds: 1,
            ..SchedulerConfig::default()
        }))
        .expect("orchestrator");
        orchestrator.initialize_platform().await;

        orchestrator.shutdown().await.expect("shutdown");

        let status = orchestrator.platform_status();
        assert!(!status.initialized);
        assert!(!status.scheduler_running);
        assert!(status.jobs.is_empty());
        assert_eq!(orchestrator.events().events_named(names::PLATFORM_SHUTDOWN).len(), 1);
    }

    #[tokio::test]
    async fn test_metrics_snapshot_from_fresh_platform() {
        let orchestrator = PlatformOrchestrator::new(config()).expect("orchestrator");
        let metrics = orchestrator.get_platform_metrics().await.expect("metrics");
        assert_eq!(metrics.data_integration.active_pipelines, 0);
        assert_eq!(metrics.alerting.alert_rules, 0);
    }
}
