use super::{impl_in_memory_subsystem, Lifecycle};
use crate::config::PlatformConfig;
use crate::error::{PlatformError, Result};
use crate::models::{
    DataIntegrationMetrics, DataSourceConfig, EtlPipeline, LineageTracking, PipelineStatus,
    QualityMonitor, ReportData, ReportParameters, ReportTemplate,
};
use crate::subsystems::{DataIntegrator, SubsystemKind};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "data-integration";

/// Records assumed per source when no pipeline is running for it
const BASELINE_RECORDS_PER_SOURCE: u64 = 1_000;

/// In-memory ETL pipeline registry
#[derive(Debug, Default)]
pub struct InMemoryDataIntegrator {
    lifecycle: Lifecycle,
    sources: DashMap<String, DataSourceConfig>,
    pipelines: DashMap<Uuid, EtlPipeline>,
    records_processed: AtomicU64,
    failed_runs: AtomicU64,
}

impl_in_memory_subsystem!(InMemoryDataIntegrator, SubsystemKind::DataIntegration);

impl InMemoryDataIntegrator {
    pub fn new(config: &PlatformConfig) -> Self {
        let integrator = Self::default();
        for source in &config.data_sources {
            integrator.sources.insert(source.id.clone(), source.clone());
        }
        integrator
    }

    pub fn pipeline(&self, id: Uuid) -> Option<EtlPipeline> {
        self.pipelines.get(&id).map(|p| p.clone())
    }

    fn throughput_for(source_type: &str) -> u64 {
        match source_type {
            "postgres" | "mysql" | "sqlserver" | "oracle" => 10_000,
            "salesforce" | "hubspot" | "zendesk" => 2_000,
            "s3" | "gcs" | "azure-blob" => 50_000,
            "kafka" | "kinesis" => 100_000,
            _ => 1_000,
        }
    }

    fn transition(
        &self,
        pipeline: &EtlPipeline,
        operation: &str,
        from: PipelineStatus,
        to: PipelineStatus,
    ) -> Result<EtlPipeline> {
        let mut entry = self.pipelines.get_mut(&pipeline.id).ok_or_else(|| {
            PlatformError::subsystem(
                COMPONENT,
                operation,
                format!("unknown pipeline {}", pipeline.id),
            )
        })?;

        if entry.status != from {
            self.failed_runs.fetch_add(1, Ordering::Relaxed);
            return Err(PlatformError::subsystem(
                COMPONENT,
                operation,
                format!(
                    "pipeline {} is {:?}, expected {:?}",
                    pipeline.id, entry.status, from
                ),
            ));
        }

        entry.status = to;
        Ok(entry.clone())
    }
}

#[async_trait]
impl DataIntegrator for InMemoryDataIntegrator {
    async fn create_etl_pipeline(&self, source: &DataSourceConfig) -> Result<EtlPipeline> {
        if source.id.trim().is_empty() || source.source_type.trim().is_empty() {
            return Err(PlatformError::subsystem(
                COMPONENT,
                "create_etl_pipeline",
                "data source requires an id and a type",
            ));
        }

        self.sources.insert(source.id.clone(), source.clone());
        let pipeline = EtlPipeline {
            id: Uuid::new_v4(),
            source_id: source.id.clone(),
            source_type: source.source_type.clone(),
            status: PipelineStatus::Created,
            throughput_per_minute: Self::throughput_for(&source.source_type),
            created_at: Utc::now(),
        };
        self.pipelines.insert(pipeline.id, pipeline.clone());

        debug!(pipeline_id = %pipeline.id, source = %source.id, "ETL pipeline created");
        Ok(pipeline)
    }

    async fn validate_pipeline(&self, pipeline: &EtlPipeline) -> Result<()> {
        self.transition(
            pipeline,
            "validate_pipeline",
            PipelineStatus::Created,
            PipelineStatus::Validated,
        )
        .map(|_| ())
    }

    async fn start_pipeline(&self, pipeline: &EtlPipeline) -> Result<EtlPipeline> {
        self.transition(
            pipeline,
            "start_pipeline",
            PipelineStatus::Validated,
            PipelineStatus::Running,
        )
    }

    async fn setup_quality_monitoring(&self, pipelines: &[EtlPipeline]) -> Result<QualityMonitor> {
        Ok(QualityMonitor {
            id: Uuid::new_v4(),
            pipeline_ids: pipelines.iter().map(|p| p.id).collect(),
            rules: vec![
                "completeness".to_string(),
                "freshness".to_string(),
                "schema-drift".to_string(),
            ],
        })
    }

    async fn setup_lineage_tracking(&self, pipelines: &[EtlPipeline]) -> Result<LineageTracking> {
        Ok(LineageTracking {
            id: Uuid::new_v4(),
            pipeline_ids: pipelines.iter().map(|p| p.id).collect(),
            edges: pipelines
                .iter()
                .map(|p| (p.source_id.clone(), p.id))
                .collect(),
        })
    }

    async fn collect_report_data(
        &self,
        template: &ReportTemplate,
        parameters: &ReportParameters,
    ) -> Result<ReportData> {
        let mut sources: Vec<String> = if template.data_sources.is_empty() {
            self.sources.iter().map(|s| s.key().clone()).collect()
        } else {
            template.data_sources.clone()
        };
        sources.sort();

        let mut data_points = 0;
        let mut running_sources = 0u64;
        for source in &sources {
            let hourly: u64 = self
                .pipelines
                .iter()
                .filter(|p| &p.source_id == source && p.status == PipelineStatus::Running)
                .map(|p| p.throughput_per_minute * 60)
                .sum();
            if hourly > 0 {
                running_sources += 1;
                data_points += hourly;
            } else {
                data_points += BASELINE_RECORDS_PER_SOURCE;
            }
        }
        self.records_processed
            .fetch_add(data_points, Ordering::Relaxed);

        let mut metrics = BTreeMap::new();
        metrics.insert("sources_collected".to_string(), sources.len() as f64);
        metrics.insert("sources_streaming".to_string(), running_sources as f64);
        metrics.insert("data_points".to_string(), data_points as f64);

        Ok(ReportData {
            template_id: template.id.clone(),
            sources,
            data_points,
            metrics,
            parameters: parameters.clone(),
            collected_at: Some(Utc::now()),
        })
    }

    async fn metrics(&self) -> Result<DataIntegrationMetrics> {
        Ok(DataIntegrationMetrics {
            active_pipelines: self
                .pipelines
                .iter()
                .filter(|p| p.status == PipelineStatus::Running)
                .count(),
            records_processed: self.records_processed.load(Ordering::Relaxed),
            failed_runs: self.failed_runs.load(Ordering::Relaxed),
        })
    }
}
