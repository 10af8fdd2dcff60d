//! Data, API, workflow and stream integration setup.
//!
//! Each operation provisions its items one by one and fails fast on the first
//! error, then attaches a single monitoring artifact over the whole set. The
//! monitoring step also runs for an empty input.

use crate::error::Result;
use crate::events::PlatformEvent;
use crate::logging::log_platform_operation;
use crate::models::{
    ApiEndpointConfig, DataIntegrationSetup, DataSourceConfig, EnterpriseApiSetup,
    IntegrationMetrics, RealtimeAnalyticsSetup, StreamConfig, WorkflowDefinition,
    WorkflowIntegration,
};
use crate::orchestration::PlatformOrchestrator;
use crate::subsystems::{AnalyticsEngine, ApiConnector, DataIntegrator, WorkflowConnector};
use std::sync::atomic::Ordering;
use tracing::{debug, info, instrument};

impl PlatformOrchestrator {
    /// Create, validate and start one ETL pipeline per source
    #[instrument(skip(self, sources), fields(sources = sources.len()))]
    pub async fn setup_data_integration(
        &self,
        sources: &[DataSourceConfig],
    ) -> Result<DataIntegrationSetup> {
        log_platform_operation("setup_data_integration", "started", None);
        let integrator = &self.subsystems.data_integrator;

        let mut pipelines = Vec::with_capacity(sources.len());
        for source in sources {
            let pipeline = integrator.create_etl_pipeline(source).await?;
            integrator.validate_pipeline(&pipeline).await?;
            let running = integrator.start_pipeline(&pipeline).await?;
            debug!(source = %source.id, pipeline_id = %running.id, "Pipeline running");
            self.counters.pipelines_started.fetch_add(1, Ordering::Relaxed);
            pipelines.push(running);
        }

        let quality_monitoring = integrator.setup_quality_monitoring(&pipelines).await?;
        let lineage = integrator.setup_lineage_tracking(&pipelines).await?;
        let metrics = IntegrationMetrics::from_pipelines(&pipelines);

        self.emit(PlatformEvent::DataIntegrationSetup {
            pipeline_count: pipelines.len(),
        });
        log_platform_operation("setup_data_integration", "completed", None);
        info!(
            pipelines = pipelines.len(),
            throughput_per_minute = metrics.total_throughput_per_minute,
            "🔌 INTEGRATION: Data pipelines running"
        );

        Ok(DataIntegrationSetup {
            pipelines,
            quality_monitoring,
            lineage,
            metrics,
        })
    }

    /// Connect and test each enterprise API, then monitor them together
    #[instrument(skip(self, apis), fields(apis = apis.len()))]
    pub async fn connect_enterprise_apis(
        &self,
        apis: &[ApiEndpointConfig],
    ) -> Result<EnterpriseApiSetup> {
        log_platform_operation("connect_enterprise_apis", "started", None);
        let connector = &self.subsystems.api_connector;

        let mut connections = Vec::with_capacity(apis.len());
        for api in apis {
            let connection = connector.connect(api).await?;
            connector.test_connection(&connection).await?;
            self.counters.apis_connected.fetch_add(1, Ordering::Relaxed);
            connections.push(connection);
        }
        let monitoring = connector.setup_monitoring(&connections).await?;

        self.emit(PlatformEvent::EnterpriseApisConnected {
            connection_count: connections.len(),
        });
        log_platform_operation("connect_enterprise_apis", "completed", None);

        Ok(EnterpriseApiSetup {
            connections,
            monitoring,
        })
    }

    /// Deploy and test each n8n workflow, then monitor them together
    #[instrument(skip(self, workflows), fields(workflows = workflows.len()))]
    pub async fn integrate_n8n_workflows(
        &self,
        workflows: &[WorkflowDefinition],
    ) -> Result<WorkflowIntegration> {
        log_platform_operation("integrate_n8n_workflows", "started", None);
        let connector = &self.subsystems.workflow_connector;

        let mut deployed = Vec::with_capacity(workflows.len());
        for workflow in workflows {
            let workflow = connector.deploy_workflow(workflow).await?;
            connector.test_workflow(&workflow).await?;
            self.counters.workflows_deployed.fetch_add(1, Ordering::Relaxed);
            deployed.push(workflow);
        }
        let monitoring = connector.setup_monitoring(&deployed).await?;

        self.emit(PlatformEvent::N8nIntegrated {
            workflow_count: deployed.len(),
        });
        log_platform_operation("integrate_n8n_workflows", "completed", None);

        Ok(WorkflowIntegration {
            workflows: deployed,
            monitoring,
        })
    }

    /// Create one stream processor per stream; anomaly detection is attached
    /// over all of them when the analytics configuration enables it
    #[instrument(skip(self, streams), fields(streams = streams.len()))]
    pub async fn setup_realtime_analytics(
        &self,
        streams: &[StreamConfig],
    ) -> Result<RealtimeAnalyticsSetup> {
        log_platform_operation("setup_realtime_analytics", "started", None);
        let engine = &self.subsystems.analytics_engine;

        let mut processors = Vec::with_capacity(streams.len());
        for stream in streams {
            processors.push(engine.create_stream_processor(stream).await?);
        }

        let analytics = &self.config.analytics;
        let anomaly_detection = if analytics.anomaly_detection {
            Some(
                engine
                    .enable_anomaly_detection(&processors, analytics.anomaly_sensitivity)
                    .await?,
            )
        } else {
            None
        };

        self.emit(PlatformEvent::RealtimeAnalyticsSetup {
            processor_count: processors.len(),
            anomaly_detection: anomaly_detection.is_some(),
        });
        log_platform_operation("setup_realtime_analytics", "completed", None);

        Ok(RealtimeAnalyticsSetup {
            processors,
            anomaly_detection,
        })
    }
}
