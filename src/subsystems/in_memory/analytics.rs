use super::{impl_in_memory_subsystem, Lifecycle};
use crate::error::{PlatformError, Result};
use crate::models::{
    AnalyticsMetrics, AnomalyDetection, KpiMeasurement, KpiTemplate, KpiTrend, RealtimeBatch,
    StreamConfig, StreamProcessor,
};
use crate::subsystems::{AnalyticsEngine, SubsystemKind};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "analytics-engine";

/// Events each stream processor contributes to one real-time tick
const EVENTS_PER_PROCESSOR_TICK: u64 = 250;

/// In-memory analytics engine holding the latest reading per KPI
#[derive(Debug, Default)]
pub struct InMemoryAnalyticsEngine {
    lifecycle: Lifecycle,
    readings: DashMap<String, KpiMeasurement>,
    processors: DashMap<Uuid, StreamProcessor>,
    realtime_batches: AtomicU64,
    events_processed: AtomicU64,
}

impl_in_memory_subsystem!(InMemoryAnalyticsEngine, SubsystemKind::AnalyticsEngine);

impl InMemoryAnalyticsEngine {
    /// Engine seeded with baseline readings for the KPI catalogue
    pub fn new() -> Self {
        let engine = Self::default();
        engine.record_kpi("revenue-growth", reading(12.5, KpiTrend::Up, 13.4));
        engine.record_kpi("customer-acquisition", reading(1_120.0, KpiTrend::Up, 1_180.0));
        engine.record_kpi("system-uptime", reading(99.95, KpiTrend::Stable, 99.95));
        engine.record_kpi("security-score", reading(71.0, KpiTrend::Down, 69.5));
        engine
    }

    /// Record the latest reading for a KPI id
    pub fn record_kpi(&self, kpi_id: impl Into<String>, measurement: KpiMeasurement) {
        self.readings.insert(kpi_id.into(), measurement);
    }
}

fn reading(value: f64, trend: KpiTrend, forecast: f64) -> KpiMeasurement {
    KpiMeasurement {
        value,
        trend,
        forecast,
    }
}

#[async_trait]
impl AnalyticsEngine for InMemoryAnalyticsEngine {
    async fn process_real_time_data(&self) -> Result<RealtimeBatch> {
        let events = self.processors.len() as u64 * EVENTS_PER_PROCESSOR_TICK;
        self.realtime_batches.fetch_add(1, Ordering::Relaxed);
        self.events_processed.fetch_add(events, Ordering::Relaxed);

        Ok(RealtimeBatch {
            events_processed: events,
            anomalies: 0,
        })
    }

    async fn measure_kpi(&self, kpi: &KpiTemplate) -> Result<KpiMeasurement> {
        // Unknown KPIs read as exactly on target
        Ok(self
            .readings
            .get(kpi.id)
            .map(|r| r.clone())
            .unwrap_or_else(|| reading(kpi.target, KpiTrend::Stable, kpi.target)))
    }

    async fn create_stream_processor(&self, stream: &StreamConfig) -> Result<StreamProcessor> {
        if stream.window_seconds == 0 {
            return Err(PlatformError::subsystem(
                COMPONENT,
                "create_stream_processor",
                format!("stream {} has a zero-length window", stream.name),
            ));
        }

        let processor = StreamProcessor {
            id: Uuid::new_v4(),
            stream: stream.name.clone(),
            source_id: stream.source_id.clone(),
            window_seconds: stream.window_seconds,
        };
        self.processors.insert(processor.id, processor.clone());
        debug!(stream = %stream.name, processor_id = %processor.id, "Stream processor created");
        Ok(processor)
    }

    async fn enable_anomaly_detection(
        &self,
        processors: &[StreamProcessor],
        sensitivity: f64,
    ) -> Result<AnomalyDetection> {
        Ok(AnomalyDetection {
            id: Uuid::new_v4(),
            processor_ids: processors.iter().map(|p| p.id).collect(),
            sensitivity,
        })
    }

    async fn metrics(&self) -> Result<AnalyticsMetrics> {
        Ok(AnalyticsMetrics {
            stream_processors: self.processors.len(),
            realtime_batches: self.realtime_batches.load(Ordering::Relaxed),
            events_processed: self.events_processed.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{KpiColor, KPI_CATALOGUE};

    #[tokio::test]
    async fn test_baseline_readings_cover_catalogue() {
        let engine = InMemoryAnalyticsEngine::new();
        let mut colors = Vec::new();
        for template in &KPI_CATALOGUE {
            let measurement = engine.measure_kpi(template).await.expect("measure");
            colors.push(KpiColor::for_value(measurement.value, template.target));
        }
        assert_eq!(
            colors,
            vec![KpiColor::Yellow, KpiColor::Green, KpiColor::Green, KpiColor::Red]
        );
    }

    #[tokio::test]
    async fn test_recorded_reading_replaces_baseline() {
        let engine = InMemoryAnalyticsEngine::new();
        engine.record_kpi("security-score", reading(97.0, KpiTrend::Up, 98.0));

        let measurement = engine.measure_kpi(&KPI_CATALOGUE[3]).await.expect("measure");
        assert_eq!(measurement.value, 97.0);
    }

    #[tokio::test]
    async fn test_realtime_tick_scales_with_processors() {
        let engine = InMemoryAnalyticsEngine::new();
        let stream = StreamConfig {
            name: "clicks".to_string(),
            source_id: "web".to_string(),
            window_seconds: 60,
        };
        engine.create_stream_processor(&stream).await.expect("processor");
        engine.create_stream_processor(&stream).await.expect("processor");

        let batch = engine.process_real_time_data().await.expect("tick");
        assert_eq!(batch.events_processed, 2 * EVENTS_PER_PROCESSOR_TICK);

        let metrics = engine.metrics().await.expect("metrics");
        assert_eq!(metrics.realtime_batches, 1);
        assert_eq!(metrics.stream_processors, 2);
    }

    #[tokio::test]
    async fn test_zero_window_is_rejected() {
        let engine = InMemoryAnalyticsEngine::new();
        let stream = StreamConfig {
            name: "broken".to_string(),
            source_id: "web".to_string(),
            window_seconds: 0,
        };
        assert!(engine.create_stream_processor(&stream).await.is_err());
    }
}
