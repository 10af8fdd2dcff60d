use super::{impl_in_memory_subsystem, Lifecycle};
use crate::config::PlatformConfig;
use crate::error::{PlatformError, Result};
use crate::models::{CachePolicy, DashboardConfig, DashboardMetrics, DashboardPerformance, ShareLink};
use crate::subsystems::{DashboardManager, SubsystemKind};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "dashboard-manager";
const SHARE_LINK_DAYS: i64 = 30;
const CACHED_HIT_RATIO: f64 = 0.85;

#[derive(Debug, Default)]
pub struct InMemoryDashboardManager {
    lifecycle: Lifecycle,
    dashboards: DashMap<String, DashboardConfig>,
    /// Dashboard id -> number of streams attached
    streams: DashMap<String, usize>,
    caches: DashMap<String, CachePolicy>,
    shares: DashMap<String, ShareLink>,
    refreshing: DashMap<String, Duration>,
    refresh_cycles: AtomicU64,
    cache_enable_calls: AtomicU64,
    share_enable_calls: AtomicU64,
}

impl_in_memory_subsystem!(InMemoryDashboardManager, SubsystemKind::DashboardManager);

impl InMemoryDashboardManager {
    pub fn new(config: &PlatformConfig) -> Self {
        let manager = Self::default();
        for dashboard in &config.dashboards {
            manager.register_dashboard(dashboard.clone());
        }
        manager
    }

    pub fn register_dashboard(&self, dashboard: DashboardConfig) {
        self.dashboards.insert(dashboard.id.clone(), dashboard);
    }

    /// Number of times caching was enabled, across all dashboards
    pub fn cache_enable_count(&self) -> u64 {
        self.cache_enable_calls.load(Ordering::SeqCst)
    }

    /// Number of times sharing was enabled, across all dashboards
    pub fn share_enable_count(&self) -> u64 {
        self.share_enable_calls.load(Ordering::SeqCst)
    }

    pub fn is_cached(&self, dashboard_id: &str) -> bool {
        self.caches.contains_key(dashboard_id)
    }

    /// Refresh interval of a dashboard whose auto-refresh loop is running
    pub fn refresh_interval(&self, dashboard_id: &str) -> Option<Duration> {
        self.refreshing.get(dashboard_id).map(|interval| *interval)
    }
}

#[async_trait]
impl DashboardManager for InMemoryDashboardManager {
    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Option<DashboardConfig>> {
        Ok(self.dashboards.get(dashboard_id).map(|d| d.clone()))
    }

    async fn setup_realtime_streams(&self, dashboard: &DashboardConfig) -> Result<()> {
        self.streams
            .insert(dashboard.id.clone(), dashboard.data_sources.len());
        debug!(
            dashboard_id = %dashboard.id,
            streams = dashboard.data_sources.len(),
            "Real-time streams attached"
        );
        Ok(())
    }

    async fn enable_caching(&self, dashboard: &DashboardConfig) -> Result<CachePolicy> {
        self.cache_enable_calls.fetch_add(1, Ordering::SeqCst);
        let policy = CachePolicy {
            dashboard_id: dashboard.id.clone(),
            ttl_seconds: dashboard.refresh_interval_seconds,
        };
        self.caches.insert(dashboard.id.clone(), policy.clone());
        Ok(policy)
    }

    async fn disable_caching(&self, dashboard: &DashboardConfig) -> Result<()> {
        self.caches.remove(&dashboard.id);
        Ok(())
    }

    async fn enable_sharing(&self, dashboard: &DashboardConfig) -> Result<ShareLink> {
        self.share_enable_calls.fetch_add(1, Ordering::SeqCst);
        let link = ShareLink {
            dashboard_id: dashboard.id.clone(),
            url: format!(
                "https://dashboards.local/shared/{}/{}",
                dashboard.id,
                Uuid::new_v4().simple()
            ),
            expires_at: Some(Utc::now() + chrono::Duration::days(SHARE_LINK_DAYS)),
        };
        self.shares.insert(dashboard.id.clone(), link.clone());
        Ok(link)
    }

    async fn sample_performance(
        &self,
        dashboard: &DashboardConfig,
    ) -> Result<DashboardPerformance> {
        let widgets = dashboard.widgets.len().max(1) as f64;
        let sources = dashboard.data_sources.len().max(1) as f64;
        let cached = self.caches.contains_key(&dashboard.id);

        let data_fetch_time_ms = if cached { 5.0 * sources } else { 20.0 * sources };
        let render_time_ms = 15.0 * widgets;

        Ok(DashboardPerformance {
            load_time_ms: data_fetch_time_ms + render_time_ms,
            render_time_ms,
            data_fetch_time_ms,
            cache_hit_ratio: if cached { CACHED_HIT_RATIO } else { 0.0 },
        })
    }

    async fn start_auto_refresh(
        &self,
        dashboard: &DashboardConfig,
        interval: Duration,
    ) -> Result<()> {
        if interval.is_zero() {
            return Err(PlatformError::subsystem(
                COMPONENT,
                "start_auto_refresh",
                format!("dashboard {} requested a zero refresh interval", dashboard.id),
            ));
        }
        self.refreshing.insert(dashboard.id.clone(), interval);
        Ok(())
    }

    async fn update_dashboards(&self) -> Result<usize> {
        self.refresh_cycles.fetch_add(1, Ordering::Relaxed);
        Ok(self.refreshing.len())
    }

    async fn metrics(&self) -> Result<DashboardMetrics> {
        Ok(DashboardMetrics {
            dashboards: self.dashboards.len(),
            auto_refreshing: self.refreshing.len(),
            refresh_cycles: self.refresh_cycles.load(Ordering::Relaxed),
        })
    }
}
