//! Business insights produced by the insight engine and consumed read-only by
//! the report pipeline and strategic-insight generation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightType {
    Trend,
    Opportunity,
    Risk,
    Anomaly,
    Prediction,
}

/// Impact buckets, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightImpact {
    Low,
    Medium,
    High,
    Critical,
}

impl InsightImpact {
    /// Highest impact first
    pub const DESCENDING: [InsightImpact; 4] = [
        InsightImpact::Critical,
        InsightImpact::High,
        InsightImpact::Medium,
        InsightImpact::Low,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InsightImpact::Low => "low",
            InsightImpact::Medium => "medium",
            InsightImpact::High => "high",
            InsightImpact::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessInsight {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub title: String,
    pub description: String,
    pub impact: InsightImpact,
    /// 0.0 - 1.0
    pub confidence: f64,
    pub recommendations: Vec<String>,
}

impl BusinessInsight {
    pub fn new(
        insight_type: InsightType,
        title: impl Into<String>,
        impact: InsightImpact,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            insight_type,
            title: title.into(),
            description: String::new(),
            impact,
            confidence: confidence.clamp(0.0, 1.0),
            recommendations: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_recommendations<I, S>(mut self, recommendations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommendations = recommendations.into_iter().map(Into::into).collect();
        self
    }
}

/// Order insights by impact, then confidence, both descending.
///
/// The sort is stable so insights that tie keep the order the engine gave them.
pub fn rank_insights(insights: &[BusinessInsight]) -> Vec<&BusinessInsight> {
    let mut ranked: Vec<&BusinessInsight> = insights.iter().collect();
    ranked.sort_by(|a, b| {
        b.impact.cmp(&a.impact).then_with(|| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        })
    });
    ranked
}

/// Flatten the recommendations of the `top_n` highest-ranked insights, capped at `cap`
pub fn top_recommendations(insights: &[BusinessInsight], top_n: usize, cap: usize) -> Vec<String> {
    rank_insights(insights)
        .into_iter()
        .take(top_n)
        .flat_map(|insight| insight.recommendations.iter().cloned())
        .take(cap)
        .collect()
}

/// Scope handed to the insight engine for strategic analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategicScope {
    /// Business areas to analyze, e.g. "revenue", "operations"
    pub focus_areas: Vec<String>,
    /// Planning horizon in months
    pub horizon_months: u32,
}
