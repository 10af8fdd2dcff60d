//! # Enterprise Report Pipeline
//!
//! Lookup, collect, insight, compose, forecast, compile, persist, distribute.
//! Stages run strictly in order and any failure aborts the run; a partially
//! built report is never stored or distributed.

use crate::error::{PlatformError, Result};
use crate::events::PlatformEvent;
use crate::logging::{log_pipeline_stage, log_platform_operation};
use crate::models::insight::{rank_insights, top_recommendations};
use crate::models::{
    BusinessInsight, InsightImpact, Report, ReportData, ReportMetadata, ReportParameters,
    ReportSection, ReportTemplate, SectionContent, SectionKind,
};
use crate::orchestration::PlatformOrchestrator;
use crate::subsystems::{DataIntegrator, ForecastingEngine, InsightEngine, ReportGenerator};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

const PIPELINE: &str = "report";

/// Insights whose recommendations feed the recommendations section
const RECOMMENDATION_SOURCE_INSIGHTS: usize = 5;
const MAX_RECOMMENDATIONS: usize = 10;

fn at_stage<T>(stage: &str, result: Result<T>) -> Result<T> {
    result.map_err(|e| match e {
        PlatformError::TemplateNotFound(_) | PlatformError::PipelineStage { .. } => e,
        other => PlatformError::pipeline_stage(PIPELINE, stage, other.to_string()),
    })
}

/// Count insights per impact level, highest level first, skipping empty levels
pub(crate) fn impact_highlights(insights: &[BusinessInsight]) -> Vec<String> {
    InsightImpact::DESCENDING
        .iter()
        .filter_map(|impact| {
            let count = insights.iter().filter(|i| i.impact == *impact).count();
            (count > 0).then(|| {
                let plural = if count == 1 { "" } else { "s" };
                format!("{count} {} insight{plural}", impact.label())
            })
        })
        .collect()
}

pub(crate) fn impact_counts(insights: &[BusinessInsight]) -> BTreeMap<InsightImpact, usize> {
    let mut counts = BTreeMap::new();
    for insight in insights {
        *counts.entry(insight.impact).or_insert(0) += 1;
    }
    counts
}

fn compose_sections(
    template: &ReportTemplate,
    data: &ReportData,
    insights: &[BusinessInsight],
) -> Vec<ReportSection> {
    let summary_text = format!(
        "{} covers {} data point(s) from {} source(s) and surfaced {} insight(s)",
        template.name,
        data.data_points,
        data.sources.len(),
        insights.len()
    );

    let ranked: Vec<BusinessInsight> = rank_insights(insights).into_iter().cloned().collect();

    vec![
        ReportSection {
            kind: SectionKind::ExecutiveSummary,
            title: SectionKind::ExecutiveSummary.title().to_string(),
            priority: 1,
            content: SectionContent::Summary {
                text: summary_text,
                highlights: impact_highlights(insights),
            },
        },
        ReportSection {
            kind: SectionKind::Kpis,
            title: SectionKind::Kpis.title().to_string(),
            priority: 2,
            content: SectionContent::Metrics(data.metrics.clone()),
        },
        ReportSection {
            kind: SectionKind::Insights,
            title: SectionKind::Insights.title().to_string(),
            priority: 3,
            content: SectionContent::Insights(ranked),
        },
        ReportSection {
            kind: SectionKind::Recommendations,
            title: SectionKind::Recommendations.title().to_string(),
            priority: 4,
            content: SectionContent::Recommendations(top_recommendations(
                insights,
                RECOMMENDATION_SOURCE_INSIGHTS,
                MAX_RECOMMENDATIONS,
            )),
        },
    ]
}

impl PlatformOrchestrator {
    /// Generate, store and optionally distribute a report from a template.
    ///
    /// Forecasts are only produced when the template asks for them, and the
    /// report is only distributed when `recipients` is non-empty.
    #[instrument(skip(self, parameters, recipients), fields(recipients = recipients.len()))]
    pub async fn generate_enterprise_report(
        &self,
        template_id: &str,
        parameters: &ReportParameters,
        recipients: &[String],
    ) -> Result<Report> {
        let started = Instant::now();
        log_platform_operation("generate_enterprise_report", "started", Some(template_id));

        let stage_start = Instant::now();
        let template = at_stage(
            "lookup",
            self.subsystems.report_generator.get_template(template_id).await,
        )?
        .ok_or_else(|| PlatformError::TemplateNotFound(template_id.to_string()))?;
        log_pipeline_stage(PIPELINE, "lookup", template_id, stage_start.elapsed().as_millis());

        let stage_start = Instant::now();
        let data = at_stage(
            "collect",
            self.subsystems
                .data_integrator
                .collect_report_data(&template, parameters)
                .await,
        )?;
        log_pipeline_stage(PIPELINE, "collect", template_id, stage_start.elapsed().as_millis());

        let stage_start = Instant::now();
        let insights = at_stage(
            "insight",
            self.subsystems.insight_engine.generate_insights(&data).await,
        )?;
        log_pipeline_stage(PIPELINE, "insight", template_id, stage_start.elapsed().as_millis());

        let sections = compose_sections(&template, &data, &insights);

        let stage_start = Instant::now();
        let forecasts = if template.include_forecast {
            let forecasts = at_stage(
                "forecast",
                self.subsystems
                    .forecasting_engine
                    .generate_forecasts(&template, &data)
                    .await,
            )?;
            if forecasts.is_empty() {
                return Err(PlatformError::pipeline_stage(
                    PIPELINE,
                    "forecast",
                    format!("template {} requires a forecast but none was produced", template.id),
                ));
            }
            forecasts
        } else {
            Vec::new()
        };
        log_pipeline_stage(PIPELINE, "forecast", template_id, stage_start.elapsed().as_millis());

        let generated_at = Utc::now();
        let mut report = Report {
            id: Uuid::new_v4(),
            template_id: template.id.clone(),
            title: format!("{} ({})", template.name, generated_at.format("%Y-%m-%d")),
            sections,
            forecasts,
            metadata: ReportMetadata {
                execution_time_ms: 0,
                data_points: data.data_points,
                insight_count: insights.len(),
                size_bytes: 0,
                generated_at,
            },
            recipients: recipients.to_vec(),
        };
        report.metadata.execution_time_ms = started.elapsed().as_millis() as u64;
        let encoded = serde_json::to_vec(&report).map_err(PlatformError::from);
        report.metadata.size_bytes = at_stage("compile", encoded)?.len();

        let stage_start = Instant::now();
        at_stage(
            "persist",
            self.subsystems.report_generator.store_report(&report).await,
        )?;
        log_pipeline_stage(PIPELINE, "persist", template_id, stage_start.elapsed().as_millis());

        if !recipients.is_empty() {
            let stage_start = Instant::now();
            at_stage(
                "distribute",
                self.subsystems
                    .report_generator
                    .distribute_report(&report, recipients)
                    .await,
            )?;
            log_pipeline_stage(
                PIPELINE,
                "distribute",
                template_id,
                stage_start.elapsed().as_millis(),
            );
        }

        self.counters.reports_generated.fetch_add(1, Ordering::Relaxed);
        self.emit(PlatformEvent::ReportGenerated {
            report_id: report.id,
            template_id: report.template_id.clone(),
            section_count: report.sections.len(),
            forecast_count: report.forecasts.len(),
            recipient_count: recipients.len(),
        });
        log_platform_operation("generate_enterprise_report", "completed", Some(template_id));
        info!(
            report_id = %report.id,
            template_id = %template_id,
            insights = report.metadata.insight_count,
            size_bytes = report.metadata.size_bytes,
            "📊 REPORT: Generated"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InsightType;

    fn insight(impact: InsightImpact) -> BusinessInsight {
        BusinessInsight::new(InsightType::Risk, "risk", impact, 0.5)
    }

    #[test]
    fn test_highlights_count_by_impact() {
        let insights = vec![
            insight(InsightImpact::High),
            insight(InsightImpact::Critical),
            insight(InsightImpact::High),
        ];
        assert_eq!(
            impact_highlights(&insights),
            vec!["1 critical insight".to_string(), "2 high insights".to_string()]
        );
        assert_eq!(impact_counts(&insights)[&InsightImpact::High], 2);
    }

    #[test]
    fn test_sections_are_in_priority_order() {
        let template = ReportTemplate::new("weekly", "Weekly");
        let sections = compose_sections(&template, &ReportData::default(), &[]);
        let kinds: Vec<_> = sections.iter().map(|s| (s.kind, s.priority)).collect();
        assert_eq!(
            kinds,
            vec![
                (SectionKind::ExecutiveSummary, 1),
                (SectionKind::Kpis, 2),
                (SectionKind::Insights, 3),
                (SectionKind::Recommendations, 4),
            ]
        );
    }

    #[test]
    fn test_stage_errors_name_the_stage() {
        let err = at_stage::<()>(
            "collect",
            Err(PlatformError::subsystem("data-integration", "collect", "down")),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PlatformError::PipelineStage { ref stage, .. } if stage == "collect"
        ));

        let missing =
            at_stage::<()>("lookup", Err(PlatformError::TemplateNotFound("x".to_string())))
                .unwrap_err();
        assert_eq!(missing, PlatformError::TemplateNotFound("x".to_string()));
    }
}
