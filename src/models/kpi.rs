//! # Key Performance Indicators
//!
//! KPIs are computed fresh for every dashboard activation from a fixed
//! catalogue of templates. The color band is derived purely from `value`
//! and `target`, so the same measurement always yields the same color.

use serde::{Deserialize, Serialize};

/// Fraction of the target at which a KPI drops from yellow to red
pub const YELLOW_BAND_RATIO: f64 = 0.8;

/// Direction a KPI has been moving in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Up,
    Down,
    Stable,
}

/// Traffic-light status of a KPI against its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KpiColor {
    Green,
    Yellow,
    Red,
}

impl KpiColor {
    /// Band a value against its target.
    ///
    /// `value >= target` is green, `value >= 0.8 * target` is yellow and
    /// anything lower is red. The three bands are exhaustive and disjoint.
    pub fn for_value(value: f64, target: f64) -> Self {
        if value >= target {
            KpiColor::Green
        } else if value >= target * YELLOW_BAND_RATIO {
            KpiColor::Yellow
        } else {
            KpiColor::Red
        }
    }
}

/// Lower bounds of the green and yellow bands
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl KpiThresholds {
    pub fn for_target(target: f64) -> Self {
        Self {
            green: target,
            yellow: target * YELLOW_BAND_RATIO,
        }
    }
}

/// Catalogue entry describing a KPI before it is measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub target: f64,
    pub unit: &'static str,
}

/// The fixed KPI catalogue every dashboard activation measures
pub const KPI_CATALOGUE: [KpiTemplate; 4] = [
    KpiTemplate {
        id: "revenue-growth",
        name: "Revenue Growth",
        category: "financial",
        target: 15.0,
        unit: "percent",
    },
    KpiTemplate {
        id: "customer-acquisition",
        name: "Customer Acquisition",
        category: "growth",
        target: 1000.0,
        unit: "customers",
    },
    KpiTemplate {
        id: "system-uptime",
        name: "System Uptime",
        category: "operations",
        target: 99.9,
        unit: "percent",
    },
    KpiTemplate {
        id: "security-score",
        name: "Security Score",
        category: "security",
        target: 95.0,
        unit: "score",
    },
];

/// Raw reading the analytics engine returns for one KPI template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMeasurement {
    pub value: f64,
    pub trend: KpiTrend,
    /// Projected next-period value
    pub forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: String,
    pub name: String,
    pub category: String,
    pub value: f64,
    pub target: f64,
    pub unit: String,
    pub trend: KpiTrend,
    pub color: KpiColor,
    pub thresholds: KpiThresholds,
    pub forecast: f64,
}

impl Kpi {
    /// Combine a catalogue template with a measurement, deriving the color band
    pub fn from_measurement(template: &KpiTemplate, measurement: KpiMeasurement) -> Self {
        Self {
            id: template.id.to_string(),
            name: template.name.to_string(),
            category: template.category.to_string(),
            value: measurement.value,
            target: template.target,
            unit: template.unit.to_string(),
            trend: measurement.trend,
            color: KpiColor::for_value(measurement.value, template.target),
            thresholds: KpiThresholds::for_target(template.target),
            forecast: measurement.forecast,
        }
    }

    pub fn is_red(&self) -> bool {
        self.color == KpiColor::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(KpiColor::for_value(100.0, 100.0), KpiColor::Green);
        assert_eq!(KpiColor::for_value(99.99, 100.0), KpiColor::Yellow);
        assert_eq!(KpiColor::for_value(80.0, 100.0), KpiColor::Yellow);
        assert_eq!(KpiColor::for_value(79.99, 100.0), KpiColor::Red);
    }

    #[test]
    fn test_from_measurement_carries_template_fields() {
        let kpi = Kpi::from_measurement(
            &KPI_CATALOGUE[2],
            KpiMeasurement {
                value: 70.0,
                trend: KpiTrend::Down,
                forecast: 68.0,
            },
        );

        assert_eq!(kpi.id, "system-uptime");
        assert_eq!(kpi.target, 99.9);
        assert!(kpi.is_red());
        assert_eq!(kpi.thresholds.green, 99.9);
    }

    #[test]
    fn test_catalogue_ids_are_unique() {
        let mut ids: Vec<_> = KPI_CATALOGUE.iter().map(|t| t.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), KPI_CATALOGUE.len());
    }

    proptest! {
        #[test]
        fn prop_bands_are_exhaustive_and_disjoint(
            target in 0.001f64..1_000_000.0,
            value in -1_000.0f64..2_000_000.0,
        ) {
            let color = KpiColor::for_value(value, target);
            let green = value >= target;
            let yellow = !green && value >= YELLOW_BAND_RATIO * target;
            let red = value < YELLOW_BAND_RATIO * target;

            prop_assert_eq!(u8::from(green) + u8::from(yellow) + u8::from(red), 1);
            match color {
                KpiColor::Green => prop_assert!(green),
                KpiColor::Yellow => prop_assert!(yellow),
                KpiColor::Red => prop_assert!(red),
            }
        }
    }
}
