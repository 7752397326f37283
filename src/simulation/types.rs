use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a window's net movement
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DerivedTrend {
    Up,
    Down,
    #[default]
    Stable,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedDataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub previous_value: f64,
    pub change: f64,
    pub change_percentage: f64,
}

impl SimulatedDataPoint {
    /// Build a point, deriving `change` and `change_percentage`.
    ///
    /// A previous value within `f64::EPSILON` of zero yields a 0% change.
    pub fn new(timestamp: DateTime<Utc>, value: f64, previous_value: f64) -> Self {
        let change = value - previous_value;
        let change_percentage = if previous_value.abs() < f64::EPSILON {
            0.0
        } else {
            change / previous_value * 100.0
        };
        Self {
            timestamp,
            value,
            previous_value,
            change,
            change_percentage,
        }
    }
}

/// One fixed-length series window plus its derived statistics
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedTimeSeriesData {
    pub id: String,
    pub name: String,
    /// Oldest first
    pub data: Vec<SimulatedDataPoint>,
    pub color: String,
    pub unit: String,
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub trend: DerivedTrend,
    /// Steps generated since creation; drives the seasonal phase
    #[serde(default)]
    pub step_index: u64,
}

impl SimulatedTimeSeriesData {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn latest(&self) -> Option<&SimulatedDataPoint> {
        self.data.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().map(|p| p.value)
    }
}
