use crate::simulation::types::{DerivedTrend, SimulatedDataPoint};
use serde::{Deserialize, Serialize};

/// Derived statistics over one series window
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct SeriesSummary {
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub trend: DerivedTrend,
}

/// Recompute statistics over `data`.
///
/// The net movement (last value minus first) is compared against
/// `±threshold`: above is `Up`, below is `Down`, anything else `Stable`.
/// An empty window summarizes to all zeros.
pub fn summarize(data: &[SimulatedDataPoint], threshold: f64) -> SeriesSummary {
    let (first, last) = match (data.first(), data.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return SeriesSummary::default(),
    };

    let mut total = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in data {
        total += point.value;
        min = min.min(point.value);
        max = max.max(point.value);
    }

    SeriesSummary {
        total,
        average: total / data.len() as f64,
        min,
        max,
        trend: classify(last.value - first.value, threshold),
    }
}

/// `Up` or `Down` when `net_change` leaves `[-threshold, threshold]`, else `Stable`
pub fn classify(net_change: f64, threshold: f64) -> DerivedTrend {
    if net_change > threshold {
        DerivedTrend::Up
    } else if net_change < -threshold {
        DerivedTrend::Down
    } else {
        DerivedTrend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn points(values: &[f64]) -> Vec<SimulatedDataPoint> {
        let now = Utc::now();
        values
            .iter()
            .map(|&v| SimulatedDataPoint::new(now, v, v))
            .collect()
    }

    #[test]
    fn test_summary_basic() {
        let s = summarize(&points(&[2.0, 8.0, 5.0]), 1.0);
        assert_eq!(s.total, 15.0);
        assert_eq!(s.average, 5.0);
        assert_eq!(s.min, 2.0);
        assert_eq!(s.max, 8.0);
        assert_eq!(s.trend, DerivedTrend::Up);
    }

    #[test]
    fn test_trend_dead_zone() {
        assert_eq!(summarize(&points(&[10.0, 0.0, 11.0]), 1.0).trend, DerivedTrend::Stable);
        assert_eq!(summarize(&points(&[10.0, 8.5]), 1.0).trend, DerivedTrend::Down);
        // Exactly at the threshold stays stable
        assert_eq!(classify(1.0, 1.0), DerivedTrend::Stable);
        assert_eq!(classify(-1.0, 1.0), DerivedTrend::Stable);
        // Zero threshold classifies any movement
        assert_eq!(classify(0.001, 0.0), DerivedTrend::Up);
        assert_eq!(classify(0.0, 0.0), DerivedTrend::Stable);
    }

    #[test]
    fn test_empty_window() {
        assert_eq!(summarize(&[], 1.0), SeriesSummary::default());
    }
}
