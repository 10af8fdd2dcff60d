//! Rule-based insight and forecasting engines.

use super::{impl_in_memory_subsystem, Lifecycle};
use crate::error::Result;
use crate::models::{
    BusinessInsight, Forecast, InsightImpact, InsightType, ReportData, ReportTemplate,
    StrategicScope,
};
use crate::subsystems::{ForecastingEngine, InsightEngine, SubsystemKind};
use async_trait::async_trait;

const DEFAULT_FOCUS_AREAS: [&str; 2] = ["revenue", "operations"];
const DEFAULT_HORIZON_MONTHS: u32 = 12;

/// Collections at or above this volume produce a capacity insight
const HIGH_VOLUME_DATA_POINTS: u64 = 1_000_000;

const FORECAST_HORIZON_DAYS: u32 = 30;
const FORECAST_GROWTH: f64 = 0.05;
const FORECAST_BAND: f64 = 0.10;
const FORECAST_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Default)]
pub struct InMemoryInsightEngine {
    lifecycle: Lifecycle,
}

impl_in_memory_subsystem!(InMemoryInsightEngine, SubsystemKind::InsightEngine);

impl InMemoryInsightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn strategic_insight(area: &str, horizon_months: u32) -> BusinessInsight {
        let (insight_type, impact, confidence, recommendations): (_, _, _, &[&str]) =
            match area.to_ascii_lowercase().as_str() {
                "revenue" => (
                    InsightType::Opportunity,
                    InsightImpact::High,
                    0.82,
                    &[
                        "Expand upsell motions in the top customer segment",
                        "Review pricing tiers against win-rate data",
                    ],
                ),
                "customers" => (
                    InsightType::Opportunity,
                    InsightImpact::High,
                    0.78,
                    &[
                        "Invest in onboarding for new accounts",
                        "Track churn signals weekly",
                    ],
                ),
                "security" => (
                    InsightType::Risk,
                    InsightImpact::Critical,
                    0.9,
                    &[
                        "Close open findings before the next audit",
                        "Enable threat detection on every environment",
                    ],
                ),
                "operations" => (
                    InsightType::Trend,
                    InsightImpact::Medium,
                    0.75,
                    &[
                        "Automate recurring manual workflows",
                        "Consolidate overlapping data pipelines",
                    ],
                ),
                _ => (
                    InsightType::Trend,
                    InsightImpact::Medium,
                    0.6,
                    &["Define KPIs to track this area"],
                ),
            };

        BusinessInsight::new(
            insight_type,
            format!("Strategic outlook: {area}"),
            impact,
            confidence,
        )
        .with_description(format!("{area} over the next {horizon_months} months"))
        .with_recommendations(recommendations.iter().copied())
    }
}

#[async_trait]
impl InsightEngine for InMemoryInsightEngine {
    async fn generate_insights(&self, data: &ReportData) -> Result<Vec<BusinessInsight>> {
        let mut insights = Vec::new();

        if data.data_points == 0 {
            insights.push(
                BusinessInsight::new(
                    InsightType::Risk,
                    "No data collected",
                    InsightImpact::Critical,
                    0.95,
                )
                .with_description(format!(
                    "template {} produced no data points",
                    data.template_id
                ))
                .with_recommendations([
                    "Check data source connectivity",
                    "Validate ETL pipeline schedules",
                ]),
            );
            return Ok(insights);
        }

        insights.push(
            BusinessInsight::new(
                InsightType::Trend,
                "Data volume",
                InsightImpact::Medium,
                0.85,
            )
            .with_description(format!(
                "{} data points across {} source(s)",
                data.data_points,
                data.sources.len()
            ))
            .with_recommendations(["Review volume trends against last period"]),
        );

        let collected = data.metrics.get("sources_collected").copied().unwrap_or(0.0);
        let streaming = data.metrics.get("sources_streaming").copied().unwrap_or(0.0);
        if streaming < collected {
            insights.push(
                BusinessInsight::new(
                    InsightType::Opportunity,
                    "Batch-only data sources",
                    InsightImpact::High,
                    0.7,
                )
                .with_description(format!(
                    "{} of {} sources have no running pipeline",
                    collected - streaming,
                    collected
                ))
                .with_recommendations([
                    "Start ETL pipelines for batch-only sources",
                    "Enable data-quality monitoring on new pipelines",
                ]),
            );
        }

        if data.data_points >= HIGH_VOLUME_DATA_POINTS {
            insights.push(
                BusinessInsight::new(
                    InsightType::Prediction,
                    "Capacity pressure",
                    InsightImpact::High,
                    0.65,
                )
                .with_recommendations(["Plan warehouse capacity for the next quarter"]),
            );
        }

        Ok(insights)
    }

    async fn generate_strategic_insights(
        &self,
        scope: &StrategicScope,
    ) -> Result<Vec<BusinessInsight>> {
        let horizon = if scope.horizon_months == 0 {
            DEFAULT_HORIZON_MONTHS
        } else {
            scope.horizon_months
        };

        let insights = if scope.focus_areas.is_empty() {
            DEFAULT_FOCUS_AREAS
                .iter()
                .map(|area| Self::strategic_insight(area, horizon))
                .collect()
        } else {
            scope
                .focus_areas
                .iter()
                .map(|area| Self::strategic_insight(area, horizon))
                .collect()
        };
        Ok(insights)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryForecastingEngine {
    lifecycle: Lifecycle,
}

impl_in_memory_subsystem!(InMemoryForecastingEngine, SubsystemKind::ForecastingEngine);

impl InMemoryForecastingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn project(metric: &str, current: f64) -> Forecast {
        let predicted_value = current * (1.0 + FORECAST_GROWTH);
        let band = predicted_value.abs() * FORECAST_BAND;
        Forecast {
            metric: metric.to_string(),
            horizon_days: FORECAST_HORIZON_DAYS,
            predicted_value,
            lower_bound: predicted_value - band,
            upper_bound: predicted_value + band,
            confidence: FORECAST_CONFIDENCE,
        }
    }
}

#[async_trait]
impl ForecastingEngine for InMemoryForecastingEngine {
    /// Projects every collected metric; falls back to the raw data-point count
    async fn generate_forecasts(
        &self,
        _template: &ReportTemplate,
        data: &ReportData,
    ) -> Result<Vec<Forecast>> {
        if data.metrics.is_empty() {
            return Ok(vec![Self::project("data_points", data.data_points as f64)]);
        }
        Ok(data
            .metrics
            .iter()
            .map(|(metric, value)| Self::project(metric, *value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportParameters;
    use std::collections::BTreeMap;

    fn data(data_points: u64, collected: f64, streaming: f64) -> ReportData {
        let mut metrics = BTreeMap::new();
        metrics.insert("sources_collected".to_string(), collected);
        metrics.insert("sources_streaming".to_string(), streaming);
        ReportData {
            template_id: "weekly".to_string(),
            sources: vec!["crm".to_string()],
            data_points,
            metrics,
            parameters: ReportParameters::new(),
            collected_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_collection_is_a_critical_risk() {
        let engine = InMemoryInsightEngine::new();
        let insights = engine.generate_insights(&data(0, 1.0, 0.0)).await.expect("insights");
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].impact, InsightImpact::Critical);
    }

    #[tokio::test]
    async fn test_batch_sources_produce_opportunity() {
        let engine = InMemoryInsightEngine::new();
        let insights = engine
            .generate_insights(&data(5_000, 2.0, 1.0))
            .await
            .expect("insights");
        assert!(insights
            .iter()
            .any(|i| i.insight_type == InsightType::Opportunity));
    }

    #[tokio::test]
    async fn test_strategic_defaults() {
        let engine = InMemoryInsightEngine::new();
        let insights = engine
            .generate_strategic_insights(&StrategicScope::default())
            .await
            .expect("insights");
        let titles: Vec<_> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Strategic outlook: revenue", "Strategic outlook: operations"]
        );
        assert!(insights[0].description.contains("12 months"));
    }

    #[tokio::test]
    async fn test_forecast_bounds_contain_prediction() {
        let engine = InMemoryForecastingEngine::new();
        let template = ReportTemplate::new("weekly", "Weekly");

        let empty = ReportData::default();
        let fallback = engine
            .generate_forecasts(&template, &empty)
            .await
            .expect("forecast");
        assert_eq!(fallback.len(), 1);
        assert_eq!(fallback[0].metric, "data_points");

        let forecasts = engine
            .generate_forecasts(&template, &data(100, 4.0, 2.0))
            .await
            .expect("forecast");
        assert_eq!(forecasts.len(), 2);
        for forecast in forecasts {
            assert!(forecast.lower_bound <= forecast.predicted_value);
            assert!(forecast.predicted_value <= forecast.upper_bound);
            assert_eq!(forecast.horizon_days, 30);
        }
    }
}
