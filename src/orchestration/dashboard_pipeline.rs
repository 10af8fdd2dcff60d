//! # Real-Time Dashboard Activation
//!
//! Resolves the dashboard (falling back to a default one for unknown ids),
//! attaches streams, measures the KPI catalogue, derives alerts for red KPIs
//! and then applies the optional caching and sharing steps before starting
//! the dashboard's auto-refresh loop. A failed activation withdraws the
//! alert rules and cache policy it registered.

use crate::error::{PlatformError, Result};
use crate::events::PlatformEvent;
use crate::logging::{log_pipeline_stage, log_platform_operation};
use crate::models::{
    AutomatedDashboard, CachePolicy, DashboardAlert, DashboardConfig, DashboardOptions,
    DashboardPerformance, Kpi, ShareLink, KPI_CATALOGUE,
};
use crate::orchestration::PlatformOrchestrator;
use crate::subsystems::{AlertingSystem, AnalyticsEngine, DashboardManager};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

const PIPELINE: &str = "dashboard";

fn at_stage<T>(stage: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        PlatformError::PipelineStage { .. } => e,
        other => PlatformError::pipeline_stage(PIPELINE, stage, other.to_string()),
    })
}

impl PlatformOrchestrator {
    /// Activate a real-time dashboard.
    ///
    /// Unknown dashboard ids are not an error: a default dashboard is built
    /// for the id. `alerts` is empty when alerting is disabled, and `cache` /
    /// `share` are `None` when their option is off. A zero refresh interval is
    /// rejected as [`PlatformError::InvalidInput`] before anything is touched.
    #[instrument(skip(self, options))]
    pub async fn automate_real_time_dashboard(
        &self,
        dashboard_id: &str,
        options: &DashboardOptions,
    ) -> Result<AutomatedDashboard> {
        log_platform_operation("automate_real_time_dashboard", "started", Some(dashboard_id));
        if options.refresh_interval.is_zero() {
            return Err(PlatformError::InvalidInput(format!(
                "dashboard {dashboard_id} requested a zero refresh interval"
            )));
        }
        let manager = &self.subsystems.dashboard_manager;

        let stage_start = Instant::now();
        let dashboard = match at_stage("resolve", manager.get_dashboard(dashboard_id).await)? {
            Some(dashboard) => dashboard,
            None => {
                debug!(dashboard_id = %dashboard_id, "Unknown dashboard; using default layout");
                DashboardConfig::default_for(dashboard_id)
            }
        };
        at_stage("streams", manager.setup_realtime_streams(&dashboard).await)?;
        log_pipeline_stage(PIPELINE, "setup", dashboard_id, stage_start.elapsed().as_millis());

        let stage_start = Instant::now();
        let mut kpis = Vec::with_capacity(KPI_CATALOGUE.len());
        for template in &KPI_CATALOGUE {
            let measurement = at_stage(
                "kpis",
                self.subsystems.analytics_engine.measure_kpi(template).await,
            )?;
            kpis.push(Kpi::from_measurement(template, measurement));
        }
        log_pipeline_stage(PIPELINE, "kpis", dashboard_id, stage_start.elapsed().as_millis());

        let mut registered = Registered::default();
        let activated = self
            .activate(&dashboard, &kpis, options, &mut registered)
            .await;
        let (performance, cache, share) = match activated {
            Ok(activated) => activated,
            Err(e) => {
                self.roll_back(&dashboard, registered).await;
                return Err(e);
            }
        };
        let alerts = registered.alerts;

        self.counters
            .dashboards_automated
            .fetch_add(1, Ordering::Relaxed);
        self.emit(PlatformEvent::DashboardAutomated {
            dashboard_id: dashboard.id.clone(),
            kpi_count: kpis.len(),
            alert_count: alerts.len(),
        });
        log_platform_operation("automate_real_time_dashboard", "completed", Some(dashboard_id));
        info!(
            dashboard_id = %dashboard.id,
            kpis = kpis.len(),
            alerts = alerts.len(),
            cached = cache.is_some(),
            shared = share.is_some(),
            "📈 DASHBOARD: Automated"
        );

        Ok(AutomatedDashboard {
            dashboard,
            kpis,
            alerts,
            performance,
            cache,
            share,
        })
    }

    /// Steps that leave state behind in subsystems: alert registration,
    /// caching, sharing, performance sampling and auto-refresh.
    async fn activate(
        &self,
        dashboard: &DashboardConfig,
        kpis: &[Kpi],
        options: &DashboardOptions,
        registered: &mut Registered,
    ) -> Result<(DashboardPerformance, Option<CachePolicy>, Option<ShareLink>)> {
        let manager = &self.subsystems.dashboard_manager;

        if options.alerting {
            for kpi in kpis.iter().filter(|kpi| kpi.is_red()) {
                let alert = DashboardAlert::critical_for(&dashboard.id, kpi);
                at_stage(
                    "alerts",
                    self.subsystems.alerting_system.register_alert(&alert).await,
                )?;
                registered.alerts.push(alert);
            }
        }

        let cache = if options.caching {
            let policy = at_stage("caching", manager.enable_caching(dashboard).await)?;
            registered.cached = true;
            Some(policy)
        } else {
            None
        };

        let share = if options.sharing {
            Some(at_stage("sharing", manager.enable_sharing(dashboard).await)?)
        } else {
            None
        };

        let performance = at_stage("performance", manager.sample_performance(dashboard).await)?;
        at_stage(
            "auto_refresh",
            manager
                .start_auto_refresh(dashboard, options.refresh_interval)
                .await,
        )?;

        Ok((performance, cache, share))
    }

    /// Withdraw what a failed activation registered. Failures here are logged
    /// and the original stage error is what the caller sees.
    async fn roll_back(&self, dashboard: &DashboardConfig, registered: Registered) {
        for alert in &registered.alerts {
            if let Err(e) = self.subsystems.alerting_system.remove_alert(alert.id).await {
                warn!(dashboard_id = %dashboard.id, alert_id = %alert.id, error = %e, "Failed to withdraw alert rule");
            }
        }
        if registered.cached {
            if let Err(e) = self.subsystems.dashboard_manager.disable_caching(dashboard).await {
                warn!(dashboard_id = %dashboard.id, error = %e, "Failed to drop cache policy");
            }
        }
        debug!(
            dashboard_id = %dashboard.id,
            alerts = registered.alerts.len(),
            cached = registered.cached,
            "Rolled back failed dashboard activation"
        );
    }
}

/// Side effects of an activation in progress
#[derive(Debug, Default)]
struct Registered {
    alerts: Vec<DashboardAlert>,
    cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;
    use crate::models::KpiColor;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unknown_dashboard_uses_default() {
        let orchestrator =
            PlatformOrchestrator::new(PlatformConfig::for_organization("Acme")).expect("new");
        let automated = orchestrator
            .automate_real_time_dashboard("ops-overview", &DashboardOptions::default())
            .await
            .expect("automate");

        assert_eq!(automated.dashboard, DashboardConfig::default_for("ops-overview"));
        assert_eq!(automated.kpis.len(), 4);
        assert!(automated.cache.is_some());
        assert!(automated.share.is_none());
    }

    #[tokio::test]
    async fn test_alerts_match_red_kpis() {
        let orchestrator =
            PlatformOrchestrator::new(PlatformConfig::for_organization("Acme")).expect("new");
        let automated = orchestrator
            .automate_real_time_dashboard("exec", &DashboardOptions::default())
            .await
            .expect("automate");

        let red: Vec<_> = automated
            .kpis
            .iter()
            .filter(|k| k.color == KpiColor::Red)
            .map(|k| k.id.clone())
            .collect();
        let alerted: Vec<_> = automated.alerts.iter().map(|a| a.kpi_id.clone()).collect();
        assert_eq!(alerted, red);
        assert_eq!(red, vec!["security-score".to_string()]);
    }

    #[tokio::test]
    async fn test_zero_refresh_interval_is_rejected_before_any_side_effect() {
        let orchestrator =
            PlatformOrchestrator::new(PlatformConfig::for_organization("Acme")).expect("new");
        let options = DashboardOptions {
            refresh_interval: Duration::ZERO,
            ..DashboardOptions::default()
        };

        let err = orchestrator
            .automate_real_time_dashboard("exec", &options)
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::InvalidInput(_)));

        let metrics = orchestrator.get_platform_metrics().await.expect("metrics");
        assert_eq!(metrics.alerting.alert_rules, 0);
        assert_eq!(metrics.dashboards.auto_refreshing, 0);
    }

    #[tokio::test]
    async fn test_reactivation_replaces_alert_rules() {
        let orchestrator =
            PlatformOrchestrator::new(PlatformConfig::for_organization("Acme")).expect("new");

        let mut red = 0;
        for _ in 0..3 {
            let automated = orchestrator
                .automate_real_time_dashboard("exec", &DashboardOptions::default())
                .await
                .expect("automate");
            red = automated.alerts.len();
        }

        let metrics = orchestrator.get_platform_metrics().await.expect("metrics");
        assert_eq!(red, 1);
        assert_eq!(metrics.alerting.alert_rules, red);
    }
}
