//! Report templates, collected report data and compiled reports.

use crate::models::insight::BusinessInsight;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Report template as declared in the platform configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    /// Data source ids the template draws from
    #[serde(default)]
    pub data_sources: Vec<String>,
    /// Whether compiled reports carry a forecast list
    #[serde(default)]
    pub include_forecast: bool,
    /// Cron-style schedule, swept by the scheduled-report job
    #[serde(default)]
    pub schedule: Option<String>,
}

impl ReportTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            data_sources: Vec::new(),
            include_forecast: false,
            schedule: None,
        }
    }

    pub fn with_forecast(mut self, include_forecast: bool) -> Self {
        self.include_forecast = include_forecast;
        self
    }
}

/// Caller-supplied report parameters (date ranges, filters, ...)
pub type ReportParameters = BTreeMap<String, Value>;

/// Raw data gathered for one report run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportData {
    pub template_id: String,
    pub sources: Vec<String>,
    pub data_points: u64,
    /// Headline metrics keyed by name, rendered in the KPI section
    pub metrics: BTreeMap<String, f64>,
    pub parameters: ReportParameters,
    pub collected_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    ExecutiveSummary,
    Kpis,
    Insights,
    Recommendations,
}

impl SectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            SectionKind::ExecutiveSummary => "Executive Summary",
            SectionKind::Kpis => "Key Performance Indicators",
            SectionKind::Insights => "Business Insights",
            SectionKind::Recommendations => "Recommendations",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionContent {
    Summary {
        text: String,
        highlights: Vec<String>,
    },
    Metrics(BTreeMap<String, f64>),
    Insights(Vec<BusinessInsight>),
    Recommendations(Vec<String>),
}

impl SectionContent {
    /// Number of entries carried by the section
    pub fn len(&self) -> usize {
        match self {
            SectionContent::Summary { highlights, .. } => highlights.len(),
            SectionContent::Metrics(metrics) => metrics.len(),
            SectionContent::Insights(insights) => insights.len(),
            SectionContent::Recommendations(recommendations) => recommendations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub title: String,
    /// 1 is rendered first
    pub priority: u8,
    pub content: SectionContent,
}

/// Projected value for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub metric: String,
    pub horizon_days: u32,
    pub predicted_value: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub execution_time_ms: u64,
    pub data_points: u64,
    pub insight_count: usize,
    /// Serialized size of the sections and forecasts
    pub size_bytes: usize,
    pub generated_at: DateTime<Utc>,
}

/// Compiled, immutable report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub template_id: String,
    pub title: String,
    pub sections: Vec<ReportSection>,
    pub forecasts: Vec<Forecast>,
    pub metadata: ReportMetadata,
    pub recipients: Vec<String>,
}

impl Report {
    pub fn section(&self, kind: SectionKind) -> Option<&ReportSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

/// What the scheduled-report sweep did on one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduledReportSweep {
    /// Templates whose schedule was due
    pub due: usize,
    /// Report runs queued for generation
    pub queued: usize,
}
