//! # In-Memory Subsystems
//!
//! Deterministic implementations of every subsystem contract, backed by
//! `DashMap` stores and atomic counters. They carry no real analytics: values
//! are derived from their inputs so that the same calls always produce the
//! same results.

mod alerting;
mod analytics;
mod connectors;
mod dashboards;
mod data_integrator;
mod insight;
mod reports;
mod resilience;

pub use alerting::InMemoryAlertingSystem;
pub use analytics::InMemoryAnalyticsEngine;
pub use connectors::{InMemoryApiConnector, InMemoryWorkflowConnector};
pub use dashboards::InMemoryDashboardManager;
pub use data_integrator::InMemoryDataIntegrator;
pub use insight::{InMemoryForecastingEngine, InMemoryInsightEngine};
pub use reports::InMemoryReportGenerator;
pub use resilience::{InMemoryBackupManager, InMemorySecurityManager};

use std::sync::atomic::{AtomicU8, Ordering};
use tracing::info;

// 0 = created
const RUNNING: u8 = 1;
const STOPPED: u8 = 2;

/// Lifecycle state shared by the in-memory subsystems
#[derive(Debug, Default)]
pub(crate) struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    pub(crate) fn start(&self, component: &str) {
        let previous = self.state.swap(RUNNING, Ordering::SeqCst);
        info!(
            component = component,
            restarted = previous == STOPPED,
            "Subsystem initialized"
        );
    }

    pub(crate) fn stop(&self, component: &str) {
        self.state.store(STOPPED, Ordering::SeqCst);
        info!(component = component, "Subsystem shut down");
    }

    pub(crate) fn is_running(&self) -> bool {
        self.state.load(Ordering::SeqCst) == RUNNING
    }
}

/// Implement [`Subsystem`](crate::subsystems::Subsystem) for an in-memory type
/// with a `lifecycle: Lifecycle` field, plus an `is_running()` accessor
macro_rules! impl_in_memory_subsystem {
    ($type:ty, $kind:expr) => {
        #[async_trait::async_trait]
        impl $crate::subsystems::Subsystem for $type {
            fn name(&self) -> &'static str {
                $kind.component_name()
            }

            async fn initialize(&self) -> $crate::error::Result<()> {
                self.lifecycle.start($kind.component_name());
                Ok(())
            }

            async fn shutdown(&self) -> $crate::error::Result<()> {
                self.lifecycle.stop($kind.component_name());
                Ok(())
            }
        }

        impl $type {
            /// True between a successful `initialize()` and `shutdown()`
            pub fn is_running(&self) -> bool {
                self.lifecycle.is_running()
            }
        }
    };
}

pub(crate) use impl_in_memory_subsystem;
