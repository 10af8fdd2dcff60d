//! Enterprise API and n8n workflow connectors.

use super::{impl_in_memory_subsystem, Lifecycle};
use crate::error::{PlatformError, Result};
use crate::models::{
    ApiConnection, ApiEndpointConfig, ApiMonitoring, DeployedWorkflow, WorkflowDefinition,
    WorkflowMonitoring,
};
use crate::subsystems::{ApiConnector, SubsystemKind, WorkflowConnector};
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

const API_COMPONENT: &str = "api-connector";
const WORKFLOW_COMPONENT: &str = "n8n-connector";

const MONITORING_INTERVAL_SECONDS: u64 = 60;
const SUPPORTED_TRIGGERS: [&str; 4] = ["webhook", "cron", "manual", "event"];

#[derive(Debug, Default)]
pub struct InMemoryApiConnector {
    lifecycle: Lifecycle,
    connections: DashMap<Uuid, ApiConnection>,
}

impl_in_memory_subsystem!(InMemoryApiConnector, SubsystemKind::ApiConnector);

impl InMemoryApiConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[async_trait]
impl ApiConnector for InMemoryApiConnector {
    async fn connect(&self, endpoint: &ApiEndpointConfig) -> Result<ApiConnection> {
        let url = endpoint.base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(PlatformError::subsystem(
                API_COMPONENT,
                "connect",
                format!("{} has unsupported base URL {:?}", endpoint.name, endpoint.base_url),
            ));
        }

        // Rate-limited endpoints are slower to answer the handshake
        let latency_ms = match endpoint.rate_limit_per_minute {
            Some(limit) if limit > 0 => 60_000.0 / f64::from(limit),
            _ => 25.0,
        };

        let connection = ApiConnection {
            id: Uuid::new_v4(),
            name: endpoint.name.clone(),
            base_url: url.to_string(),
            healthy: true,
            latency_ms,
        };
        self.connections.insert(connection.id, connection.clone());
        debug!(api = %connection.name, connection_id = %connection.id, "API connected");
        Ok(connection)
    }

    async fn test_connection(&self, connection: &ApiConnection) -> Result<()> {
        match self.connections.get(&connection.id) {
            Some(known) if known.healthy => Ok(()),
            Some(_) => Err(PlatformError::subsystem(
                API_COMPONENT,
                "test_connection",
                format!("{} is unhealthy", connection.name),
            )),
            None => Err(PlatformError::subsystem(
                API_COMPONENT,
                "test_connection",
                format!("{} was never connected", connection.name),
            )),
        }
    }

    async fn setup_monitoring(&self, connections: &[ApiConnection]) -> Result<ApiMonitoring> {
        Ok(ApiMonitoring {
            id: Uuid::new_v4(),
            connection_ids: connections.iter().map(|c| c.id).collect(),
            check_interval_seconds: MONITORING_INTERVAL_SECONDS,
        })
    }
}

#[derive(Debug, Default)]
pub struct InMemoryWorkflowConnector {
    lifecycle: Lifecycle,
    workflows: DashMap<Uuid, DeployedWorkflow>,
}

impl_in_memory_subsystem!(InMemoryWorkflowConnector, SubsystemKind::WorkflowConnector);

impl InMemoryWorkflowConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deployed_count(&self) -> usize {
        self.workflows.len()
    }
}

#[async_trait]
impl WorkflowConnector for InMemoryWorkflowConnector {
    async fn deploy_workflow(&self, workflow: &WorkflowDefinition) -> Result<DeployedWorkflow> {
        if !SUPPORTED_TRIGGERS.contains(&workflow.trigger.as_str()) {
            return Err(PlatformError::subsystem(
                WORKFLOW_COMPONENT,
                "deploy_workflow",
                format!(
                    "{} uses unsupported trigger {:?}",
                    workflow.name, workflow.trigger
                ),
            ));
        }

        let deployed = DeployedWorkflow {
            id: Uuid::new_v4(),
            name: workflow.name.clone(),
            trigger: workflow.trigger.clone(),
            active: true,
        };
        self.workflows.insert(deployed.id, deployed.clone());
        Ok(deployed)
    }

    async fn test_workflow(&self, workflow: &DeployedWorkflow) -> Result<()> {
        if self.workflows.contains_key(&workflow.id) && workflow.active {
            Ok(())
        } else {
            Err(PlatformError::subsystem(
                WORKFLOW_COMPONENT,
                "test_workflow",
                format!("{} is not an active deployment", workflow.name),
            ))
        }
    }

    async fn setup_monitoring(
        &self,
        workflows: &[DeployedWorkflow],
    ) -> Result<WorkflowMonitoring> {
        Ok(WorkflowMonitoring {
            id: Uuid::new_v4(),
            workflow_ids: workflows.iter().map(|w| w.id).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_requires_http_url() {
        let connector = InMemoryApiConnector::new();

        assert!(connector
            .connect(&ApiEndpointConfig::new("erp", "ftp://erp.internal"))
            .await
            .is_err());

        let connection = connector
            .connect(&ApiEndpointConfig::new("erp", "https://erp.internal/api"))
            .await
            .expect("connect");
        connector.test_connection(&connection).await.expect("healthy");
        assert_eq!(connector.connection_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_connection_fails_test() {
        let connector = InMemoryApiConnector::new();
        let stranger = ApiConnection {
            id: Uuid::new_v4(),
            name: "crm".to_string(),
            base_url: "https://crm".to_string(),
            healthy: true,
            latency_ms: 1.0,
        };
        assert!(connector.test_connection(&stranger).await.is_err());
    }

    #[tokio::test]
    async fn test_workflow_trigger_validation() {
        let connector = InMemoryWorkflowConnector::new();

        assert!(connector
            .deploy_workflow(&WorkflowDefinition::new("sync", "carrier-pigeon"))
            .await
            .is_err());

        let deployed = connector
            .deploy_workflow(&WorkflowDefinition::new("sync", "cron"))
            .await
            .expect("deploy");
        connector.test_workflow(&deployed).await.expect("test");

        let monitoring = WorkflowConnector::setup_monitoring(&connector, &[deployed.clone()])
            .await
            .expect("monitoring");
        assert_eq!(monitoring.workflow_ids, vec![deployed.id]);
    }
}
