//! # Background Scheduler
//!
//! Four periodic jobs keep the platform live once it is initialized:
//!
//! | Job | Default cadence | Subsystem call |
//! |---|---|---|
//! | `real-time-processing` | 30s | `AnalyticsEngine::process_real_time_data` |
//! | `alert-evaluation` | 60s | `AlertingSystem::check_alerts` |
//! | `dashboard-refresh` | 300s | `DashboardManager::update_dashboards` |
//! | `scheduled-reports` | 3600s | `ReportGenerator::process_scheduled_reports` |
//!
//! Each job runs in its own tokio task. A failed tick is logged, counted and
//! published as a `background-job:failed` event; the job then waits for its
//! next tick. Jobs never observe each other's failures. The first tick of
//! every job fires one full period after start.

use crate::config::SchedulerConfig;
use crate::error::{PlatformError, Result};
use crate::events::{EventPublisher, PlatformEvent};
use crate::logging::log_job_tick;
use crate::subsystems::{
    AlertingSystem, AnalyticsEngine, DashboardManager, PlatformSubsystems, ReportGenerator,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// The four periodic jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundJob {
    RealTimeProcessing,
    AlertEvaluation,
    DashboardRefresh,
    ScheduledReports,
}

impl BackgroundJob {
    pub const ALL: [BackgroundJob; 4] = [
        BackgroundJob::RealTimeProcessing,
        BackgroundJob::AlertEvaluation,
        BackgroundJob::DashboardRefresh,
        BackgroundJob::ScheduledReports,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BackgroundJob::RealTimeProcessing => "real-time-processing",
            BackgroundJob::AlertEvaluation => "alert-evaluation",
            BackgroundJob::DashboardRefresh => "dashboard-refresh",
            BackgroundJob::ScheduledReports => "scheduled-reports",
        }
    }

    pub fn period(&self, config: &SchedulerConfig) -> Duration {
        match self {
            BackgroundJob::RealTimeProcessing => config.real_time_processing_interval(),
            BackgroundJob::AlertEvaluation => config.alert_evaluation_interval(),
            BackgroundJob::DashboardRefresh => config.dashboard_refresh_interval(),
            BackgroundJob::ScheduledReports => config.scheduled_reports_interval(),
        }
    }

    /// Run a single tick, returning a short description of what was done
    async fn run_once(&self, subsystems: &PlatformSubsystems) -> Result<String> {
        match self {
            BackgroundJob::RealTimeProcessing => {
                let batch = subsystems.analytics_engine.process_real_time_data().await?;
                Ok(format!(
                    "{} events, {} anomalies",
                    batch.events_processed, batch.anomalies
                ))
            }
            BackgroundJob::AlertEvaluation => {
                let fired = subsystems.alerting_system.check_alerts().await?;
                Ok(format!("{fired} alerts fired"))
            }
            BackgroundJob::DashboardRefresh => {
                let refreshed = subsystems.dashboard_manager.update_dashboards().await?;
                Ok(format!("{refreshed} dashboards refreshed"))
            }
            BackgroundJob::ScheduledReports => {
                let sweep = subsystems
                    .report_generator
                    .process_scheduled_reports()
                    .await?;
                Ok(format!("{} due, {} queued", sweep.due, sweep.queued))
            }
        }
    }
}

impl fmt::Display for BackgroundJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Default)]
struct JobCounters {
    ticks: AtomicU64,
    failures: AtomicU64,
}

/// Point-in-time view of one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub job: String,
    pub period_seconds: u64,
    pub ticks: u64,
    pub failures: u64,
}

struct ScheduledJob {
    job: BackgroundJob,
    period: Duration,
    counters: Arc<JobCounters>,
}

/// Owner of the background job tasks
pub struct BackgroundScheduler {
    jobs: Vec<ScheduledJob>,
    stop_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl fmt::Debug for BackgroundScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundScheduler")
            .field("jobs", &self.statuses())
            .field("running", &self.is_running())
            .finish()
    }
}

impl BackgroundScheduler {
    /// Spawn every job. Must be called from within a tokio runtime.
    pub fn start(
        subsystems: PlatformSubsystems,
        config: &SchedulerConfig,
        events: Arc<EventPublisher>,
    ) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut jobs = Vec::with_capacity(BackgroundJob::ALL.len());
        let mut handles = Vec::with_capacity(BackgroundJob::ALL.len());

        for job in BackgroundJob::ALL {
            let period = job.period(config);
            let counters = Arc::new(JobCounters::default());

            handles.push(tokio::spawn(run_job(
                job,
                period,
                subsystems.clone(),
                Arc::clone(&events),
                Arc::clone(&counters),
                stop_rx.clone(),
            )));
            jobs.push(ScheduledJob {
                job,
                period,
                counters,
            });
        }

        info!(jobs = jobs.len(), "🕒 SCHEDULER: Background jobs started");
        Self {
            jobs,
            stop_tx,
            handles: Mutex::new(handles),
        }
    }

    /// Cancel every job and wait for its task to exit
    pub async fn stop(&self) {
        self.stop_tx.send_replace(true);
        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock());
        if handles.is_empty() {
            return;
        }

        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "Background job task ended abnormally");
            }
        }
        info!("🕒 SCHEDULER: Background jobs stopped");
    }

    pub fn is_running(&self) -> bool {
        !*self.stop_tx.borrow() && self.handles.lock().iter().any(|h| !h.is_finished())
    }

    pub fn statuses(&self) -> Vec<JobStatus> {
        self.jobs
            .iter()
            .map(|scheduled| JobStatus {
                job: scheduled.job.name().to_string(),
                period_seconds: scheduled.period.as_secs(),
                ticks: scheduled.counters.ticks.load(Ordering::SeqCst),
                failures: scheduled.counters.failures.load(Ordering::SeqCst),
            })
            .collect()
    }

    pub fn status(&self, job: BackgroundJob) -> Option<JobStatus> {
        self.statuses().into_iter().find(|s| s.job == job.name())
    }
}

impl Drop for BackgroundScheduler {
    /// Jobs of a scheduler dropped without `stop()` exit at their next poll.
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

async fn run_job(
    job: BackgroundJob,
    period: Duration,
    subsystems: PlatformSubsystems,
    events: Arc<EventPublisher>,
    counters: Arc<JobCounters>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
                continue;
            }
            _ = timer.tick() => {}
        }

        let tick = counters.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = tokio::select! {
            biased;
            _ = stop_rx.changed() => break,
            outcome = job.run_once(&subsystems) => outcome,
        };

        match outcome {
            Ok(details) => log_job_tick(job.name(), tick, "ok", Some(&details)),
            Err(e) => {
                counters.failures.fetch_add(1, Ordering::SeqCst);
                let failure = PlatformError::BackgroundJob {
                    job: job.name().to_string(),
                    reason: e.to_string(),
                };
                error!(job = %job, tick = tick, error = %failure, "Background job tick failed");
                log_job_tick(job.name(), tick, "failed", Some(&e.to_string()));
                events.publish(PlatformEvent::BackgroundJobFailed {
                    job: job.name().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    debug!(job = %job, "Background job exited");
}
