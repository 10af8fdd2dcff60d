//! Data-integration pipelines, enterprise API connections, n8n workflows and
//! real-time analytics streams.
//!
//! All of these follow the same shape: a list of per-item artifacts plus one
//! monitoring handle attached over the complete set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Data source as declared in the platform configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    pub id: String,
    /// Connector kind, e.g. "postgres", "salesforce", "s3"
    #[serde(rename = "type")]
    pub source_type: String,
    #[serde(default)]
    pub connection: BTreeMap<String, String>,
    /// Sync schedule; `None` means continuous
    #[serde(default)]
    pub schedule: Option<String>,
}

impl DataSourceConfig {
    pub fn new(id: impl Into<String>, source_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_type: source_type.into(),
            connection: BTreeMap::new(),
            schedule: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStatus {
    Created,
    Validated,
    Running,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtlPipeline {
    pub id: Uuid,
    pub source_id: String,
    pub source_type: String,
    pub status: PipelineStatus,
    /// Estimated records per minute once running
    pub throughput_per_minute: u64,
    pub created_at: DateTime<Utc>,
}

/// Quality monitoring attached once over a whole pipeline set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMonitor {
    pub id: Uuid,
    pub pipeline_ids: Vec<Uuid>,
    pub rules: Vec<String>,
}

/// Lineage tracking attached once over a whole pipeline set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageTracking {
    pub id: Uuid,
    pub pipeline_ids: Vec<Uuid>,
    /// (source id, pipeline id) edges
    pub edges: Vec<(String, Uuid)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntegrationMetrics {
    pub pipeline_count: usize,
    pub running_pipelines: usize,
    pub source_types: BTreeMap<String, usize>,
    pub total_throughput_per_minute: u64,
}

impl IntegrationMetrics {
    pub fn from_pipelines(pipelines: &[EtlPipeline]) -> Self {
        let mut source_types = BTreeMap::new();
        for pipeline in pipelines {
            *source_types.entry(pipeline.source_type.clone()).or_insert(0) += 1;
        }

        Self {
            pipeline_count: pipelines.len(),
            running_pipelines: pipelines
                .iter()
                .filter(|p| p.status == PipelineStatus::Running)
                .count(),
            source_types,
            total_throughput_per_minute: pipelines.iter().map(|p| p.throughput_per_minute).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataIntegrationSetup {
    pub pipelines: Vec<EtlPipeline>,
    pub quality_monitoring: QualityMonitor,
    pub lineage: LineageTracking,
    pub metrics: IntegrationMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpointConfig {
    pub name: String,
    pub base_url: String,
    /// e.g. "oauth2", "api-key"
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub rate_limit_per_minute: Option<u32>,
}

impl ApiEndpointConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            auth: None,
            rate_limit_per_minute: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConnection {
    pub id: Uuid,
    pub name: String,
    pub base_url: String,
    pub healthy: bool,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiMonitoring {
    pub id: Uuid,
    pub connection_ids: Vec<Uuid>,
    pub check_interval_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnterpriseApiSetup {
    pub connections: Vec<ApiConnection>,
    pub monitoring: ApiMonitoring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    /// Trigger kind, e.g. "webhook", "cron"
    pub trigger: String,
    #[serde(default)]
    pub nodes: Vec<Value>,
}

impl WorkflowDefinition {
    pub fn new(name: impl Into<String>, trigger: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            trigger: trigger.into(),
            nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeployedWorkflow {
    pub id: Uuid,
    pub name: String,
    pub trigger: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMonitoring {
    pub id: Uuid,
    pub workflow_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowIntegration {
    pub workflows: Vec<DeployedWorkflow>,
    pub monitoring: WorkflowMonitoring,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamConfig {
    pub name: String,
    pub source_id: String,
    /// Aggregation window
    pub window_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamProcessor {
    pub id: Uuid,
    pub stream: String,
    pub source_id: String,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetection {
    pub id: Uuid,
    pub processor_ids: Vec<Uuid>,
    /// Standard deviations from the rolling mean that count as anomalous
    pub sensitivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealtimeAnalyticsSetup {
    pub processors: Vec<StreamProcessor>,
    pub anomaly_detection: Option<AnomalyDetection>,
}

/// Result of one real-time processing tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealtimeBatch {
    pub events_processed: u64,
    pub anomalies: u64,
}
