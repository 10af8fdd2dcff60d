use super::{impl_in_memory_subsystem, Lifecycle};
use crate::config::PlatformConfig;
use crate::error::{PlatformError, Result};
use crate::models::{Report, ReportMetrics, ReportTemplate, ScheduledReportSweep};
use crate::subsystems::{ReportGenerator, SubsystemKind};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

const COMPONENT: &str = "report-generator";

/// Template registry and report archive
#[derive(Debug, Default)]
pub struct InMemoryReportGenerator {
    lifecycle: Lifecycle,
    templates: DashMap<String, ReportTemplate>,
    reports: DashMap<Uuid, Report>,
    /// Template ids queued by the scheduled sweep, oldest first
    queue: Mutex<Vec<String>>,
    reports_distributed: AtomicU64,
}

impl_in_memory_subsystem!(InMemoryReportGenerator, SubsystemKind::ReportGenerator);

impl InMemoryReportGenerator {
    pub fn new(config: &PlatformConfig) -> Self {
        let generator = Self::default();
        for template in &config.report_templates {
            generator.register_template(template.clone());
        }
        generator
    }

    pub fn register_template(&self, template: ReportTemplate) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn stored_report(&self, id: Uuid) -> Option<Report> {
        self.reports.get(&id).map(|r| r.clone())
    }

    /// Template ids queued for a scheduled run
    pub fn queued_runs(&self) -> Vec<String> {
        self.queue.lock().clone()
    }
}

#[async_trait]
impl ReportGenerator for InMemoryReportGenerator {
    async fn get_template(&self, template_id: &str) -> Result<Option<ReportTemplate>> {
        Ok(self.templates.get(template_id).map(|t| t.clone()))
    }

    async fn store_report(&self, report: &Report) -> Result<()> {
        self.reports.insert(report.id, report.clone());
        debug!(report_id = %report.id, template_id = %report.template_id, "Report stored");
        Ok(())
    }

    async fn distribute_report(&self, report: &Report, recipients: &[String]) -> Result<()> {
        if recipients.is_empty() {
            return Err(PlatformError::subsystem(
                COMPONENT,
                "distribute_report",
                format!("report {} has no recipients", report.id),
            ));
        }
        if let Some(blank) = recipients.iter().position(|r| r.trim().is_empty()) {
            return Err(PlatformError::subsystem(
                COMPONENT,
                "distribute_report",
                format!("recipient {blank} is blank"),
            ));
        }

        self.reports_distributed.fetch_add(1, Ordering::Relaxed);
        info!(
            report_id = %report.id,
            recipients = recipients.len(),
            "Report distributed"
        );
        Ok(())
    }

    async fn process_scheduled_reports(&self) -> Result<ScheduledReportSweep> {
        let mut due: Vec<String> = self
            .templates
            .iter()
            .filter(|t| t.schedule.is_some())
            .map(|t| t.key().clone())
            .collect();
        due.sort();

        let mut queue = self.queue.lock();
        let before = queue.len();
        for template_id in &due {
            if !queue.contains(template_id) {
                queue.push(template_id.clone());
            }
        }

        Ok(ScheduledReportSweep {
            due: due.len(),
            queued: queue.len() - before,
        })
    }

    async fn metrics(&self) -> Result<ReportMetrics> {
        Ok(ReportMetrics {
            templates: self.templates.len(),
            reports_stored: self.reports.len(),
            reports_distributed: self.reports_distributed.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportMetadata;
    use chrono::Utc;

    fn report() -> Report {
        Report {
            id: Uuid::new_v4(),
            template_id: "weekly".to_string(),
            title: "Weekly".to_string(),
            sections: Vec::new(),
            forecasts: Vec::new(),
            metadata: ReportMetadata {
                execution_time_ms: 0,
                data_points: 0,
                insight_count: 0,
                size_bytes: 0,
                generated_at: Utc::now(),
            },
            recipients: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_distribution_requires_recipients() {
        let generator = InMemoryReportGenerator::default();
        let report = report();

        assert!(generator.distribute_report(&report, &[]).await.is_err());
        assert!(generator
            .distribute_report(&report, &["  ".to_string()])
            .await
            .is_err());
        generator
            .distribute_report(&report, &["cfo@example.com".to_string()])
            .await
            .expect("distribute");

        assert_eq!(generator.metrics().await.expect("metrics").reports_distributed, 1);
    }

    #[tokio::test]
    async fn test_scheduled_sweep_queues_each_template_once() {
        let mut scheduled = ReportTemplate::new("weekly", "Weekly");
        scheduled.schedule = Some("0 8 * * MON".to_string());
        let config = PlatformConfig::for_organization("Acme")
            .with_report_template(scheduled)
            .with_report_template(ReportTemplate::new("adhoc", "Ad hoc"));
        let generator = InMemoryReportGenerator::new(&config);

        let first = generator.process_scheduled_reports().await.expect("sweep");
        let second = generator.process_scheduled_reports().await.expect("sweep");

        assert_eq!(first, ScheduledReportSweep { due: 1, queued: 1 });
        assert_eq!(second, ScheduledReportSweep { due: 1, queued: 0 });
        assert_eq!(generator.queued_runs(), vec!["weekly".to_string()]);
    }

    #[tokio::test]
    async fn test_stored_reports_are_retrievable() {
        let generator = InMemoryReportGenerator::default();
        let report = report();
        generator.store_report(&report).await.expect("store");
        assert_eq!(generator.stored_report(report.id), Some(report));
    }
}
