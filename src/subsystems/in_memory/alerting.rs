use super::{impl_in_memory_subsystem, Lifecycle};
use crate::config::PlatformConfig;
use crate::error::Result;
use crate::models::{AlertSeverity, AlertingMetrics, DashboardAlert};
use crate::subsystems::{AlertingSystem, SubsystemKind};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;
use uuid::Uuid;

/// Alert rule store; every registered critical rule fires on each check
#[derive(Debug, Default)]
pub struct InMemoryAlertingSystem {
    lifecycle: Lifecycle,
    rules: DashMap<Uuid, DashboardAlert>,
    notification_targets: Vec<String>,
    checks_run: AtomicU64,
    alerts_fired: AtomicU64,
}

impl_in_memory_subsystem!(InMemoryAlertingSystem, SubsystemKind::AlertingSystem);

impl InMemoryAlertingSystem {
    pub fn new(config: &PlatformConfig) -> Self {
        Self {
            notification_targets: config
                .notifications
                .channels
                .iter()
                .map(|channel| format!("{}:{}", channel.kind, channel.target))
                .collect(),
            ..Self::default()
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

#[async_trait]
impl AlertingSystem for InMemoryAlertingSystem {
    async fn register_alert(&self, alert: &DashboardAlert) -> Result<()> {
        self.rules.insert(alert.id, alert.clone());
        Ok(())
    }

    async fn remove_alert(&self, alert_id: Uuid) -> Result<()> {
        self.rules.remove(&alert_id);
        Ok(())
    }

    async fn check_alerts(&self) -> Result<usize> {
        self.checks_run.fetch_add(1, Ordering::Relaxed);

        let mut fired = 0;
        for rule in self.rules.iter() {
            if rule.severity == AlertSeverity::Critical {
                fired += 1;
                warn!(
                    dashboard_id = %rule.dashboard_id,
                    kpi_id = %rule.kpi_id,
                    targets = ?self.notification_targets,
                    "{}",
                    rule.message
                );
            }
        }

        self.alerts_fired.fetch_add(fired as u64, Ordering::Relaxed);
        Ok(fired)
    }

    async fn metrics(&self) -> Result<AlertingMetrics> {
        Ok(AlertingMetrics {
            alert_rules: self.rules.len(),
            checks_run: self.checks_run.load(Ordering::Relaxed),
            alerts_fired: self.alerts_fired.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(severity: AlertSeverity) -> DashboardAlert {
        DashboardAlert {
            id: Uuid::new_v4(),
            dashboard_id: "exec".to_string(),
            kpi_id: "security-score".to_string(),
            severity,
            message: "security score below threshold".to_string(),
            threshold: 76.0,
        }
    }

    #[tokio::test]
    async fn test_only_critical_rules_fire() {
        let alerting = InMemoryAlertingSystem::default();
        alerting
            .register_alert(&alert(AlertSeverity::Critical))
            .await
            .expect("register");
        alerting
            .register_alert(&alert(AlertSeverity::Warning))
            .await
            .expect("register");

        assert_eq!(alerting.check_alerts().await.expect("check"), 1);
        assert_eq!(alerting.check_alerts().await.expect("check"), 1);

        let metrics = alerting.metrics().await.expect("metrics");
        assert_eq!(metrics.alert_rules, 2);
        assert_eq!(metrics.checks_run, 2);
        assert_eq!(metrics.alerts_fired, 2);
    }

    #[tokio::test]
    async fn test_same_rule_id_replaces_and_removal_withdraws() {
        let alerting = InMemoryAlertingSystem::default();
        let mut rule = alert(AlertSeverity::Critical);
        rule.id = DashboardAlert::rule_id(&rule.dashboard_id, &rule.kpi_id);

        alerting.register_alert(&rule).await.expect("register");
        alerting.register_alert(&rule).await.expect("register again");
        assert_eq!(alerting.rule_count(), 1);

        alerting.remove_alert(rule.id).await.expect("remove");
        alerting.remove_alert(rule.id).await.expect("remove twice");
        assert_eq!(alerting.rule_count(), 0);
        assert_eq!(alerting.check_alerts().await.expect("check"), 0);
    }

    #[tokio::test]
    async fn test_empty_store_fires_nothing() {
        let alerting = InMemoryAlertingSystem::default();
        assert_eq!(alerting.check_alerts().await.expect("check"), 0);
        assert_eq!(alerting.rule_count(), 0);
    }
}
