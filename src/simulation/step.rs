//! Bounded random-walk step.
//!
//! Composes trend, seasonality, volatility and anomaly terms onto the current
//! value and clamps the result to the configured range. All terms are
//! additive; nothing but `current` is carried between steps.

use crate::simulation::config::{SimulationConfig, TrendBias};
use rand::Rng;
use std::f64::consts::TAU;
use tracing::trace;

/// Trend step fraction used when advancing a live series by one tick
pub const UPDATE_STEP_FRACTION: f64 = 0.05;

/// Time granularity of a step, which scales the trend term
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepGranularity {
    /// Filling a fresh window: each step is `1 / point_count` of the span
    Backfill,
    /// Incremental update: fixed [`UPDATE_STEP_FRACTION`]
    Live,
}

impl StepGranularity {
    pub fn fraction(self, point_count: usize) -> f64 {
        match self {
            StepGranularity::Backfill => 1.0 / point_count.max(1) as f64,
            StepGranularity::Live => UPDATE_STEP_FRACTION,
        }
    }
}

/// Position of `step_index` within one seasonal cycle, in `[0, 1)`
pub fn seasonal_phase(step_index: u64, period: usize) -> f64 {
    let period = period.max(1) as u64;
    (step_index % period) as f64 / period as f64
}

/// Produce the next value from `current`.
///
/// `phase` is the step's position within the seasonal period; it is ignored
/// when seasonality is off.
pub fn next_value<R: Rng + ?Sized>(
    rng: &mut R,
    current: f64,
    config: &SimulationConfig,
    granularity: StepGranularity,
    phase: f64,
) -> f64 {
    let trend_factor = match config.trend {
        TrendBias::Up => config.trend_strength,
        TrendBias::Down => -config.trend_strength,
        TrendBias::Stable => 0.0,
        TrendBias::Random => symmetric(rng, config.trend_strength / 2.0),
    };
    let trend = trend_factor * config.range() * granularity.fraction(config.point_count);

    let seasonal = if config.seasonality {
        (TAU * phase).sin() * config.seasonality_amplitude
    } else {
        0.0
    };

    let noise = symmetric(rng, config.volatility);

    let anomaly = if rng.random_bool(config.anomaly_probability) {
        let spike = symmetric(rng, 1.0) * config.anomaly_magnitude * config.volatility;
        trace!(spike, "Anomaly injected.");
        spike
    } else {
        0.0
    };

    let raw = current + trend + seasonal + noise + anomaly;
    if raw.is_nan() {
        // opposing infinite terms; hold the walk where it is
        return current.clamp(config.min_value, config.max_value);
    }
    raw.clamp(config.min_value, config.max_value)
}

/// Uniform draw in `[-half_width, +half_width]`; zero width draws nothing.
fn symmetric<R: Rng + ?Sized>(rng: &mut R, half_width: f64) -> f64 {
    if half_width > 0.0 {
        half_width * rng.random_range(-1.0f64..=1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig {
            point_count: 10,
            min_value: 0.0,
            max_value: 100.0,
            volatility: 0.0,
            trend: TrendBias::Stable,
            trend_strength: 0.5,
            seasonality: false,
            anomaly_probability: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_stable_without_noise_is_constant() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = quiet_config();
        let v = next_value(&mut rng, 40.0, &config, StepGranularity::Live, 0.0);
        assert_eq!(v, 40.0);
    }

    #[test]
    fn test_trend_term_per_granularity() {
        let mut rng = StdRng::seed_from_u64(7);
        let config = SimulationConfig {
            trend: TrendBias::Up,
            ..quiet_config()
        };
        // 0.5 * 100 * (1/10)
        let v = next_value(&mut rng, 40.0, &config, StepGranularity::Backfill, 0.0);
        assert!((v - 45.0).abs() < 1e-9);
        // 0.5 * 100 * 0.05
        let v = next_value(&mut rng, 40.0, &config, StepGranularity::Live, 0.0);
        assert!((v - 42.5).abs() < 1e-9);

        let down = SimulationConfig {
            trend: TrendBias::Down,
            ..quiet_config()
        };
        let v = next_value(&mut rng, 40.0, &down, StepGranularity::Live, 0.0);
        assert!((v - 37.5).abs() < 1e-9);
    }

    #[test]
    fn test_random_trend_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = SimulationConfig {
            trend: TrendBias::Random,
            ..quiet_config()
        };
        // |factor| <= 0.25, so |delta| <= 0.25 * 100 * 0.05
        for _ in 0..500 {
            let v = next_value(&mut rng, 50.0, &config, StepGranularity::Live, 0.0);
            assert!((v - 50.0).abs() <= 1.25 + 1e-9);
        }
    }

    #[test]
    fn test_seasonality_peaks_at_quarter_phase() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = SimulationConfig {
            seasonality: true,
            seasonality_amplitude: 10.0,
            ..quiet_config()
        };
        let v = next_value(&mut rng, 50.0, &config, StepGranularity::Live, 0.25);
        assert!((v - 60.0).abs() < 1e-9);
        let v = next_value(&mut rng, 50.0, &config, StepGranularity::Live, 0.75);
        assert!((v - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_noise_and_anomaly_bounded() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = SimulationConfig {
            volatility: 2.0,
            anomaly_probability: 1.0,
            anomaly_magnitude: 3.0,
            ..quiet_config()
        };
        for _ in 0..500 {
            let v = next_value(&mut rng, 50.0, &config, StepGranularity::Live, 0.0);
            // noise <= 2, spike <= 6
            assert!((v - 50.0).abs() <= 8.0 + 1e-9);
        }
    }

    #[test]
    fn test_clamps_to_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = SimulationConfig {
            volatility: 1_000.0,
            anomaly_probability: 1.0,
            anomaly_magnitude: 10.0,
            ..quiet_config()
        };
        for _ in 0..500 {
            let v = next_value(&mut rng, 50.0, &config, StepGranularity::Backfill, 0.0);
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn test_opposing_infinite_terms_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(13);
        // bypasses validation on purpose: trend is +inf, spikes are +/-inf
        let config = SimulationConfig {
            point_count: 1,
            trend: TrendBias::Up,
            trend_strength: f64::MAX,
            volatility: 10.0,
            anomaly_probability: 1.0,
            anomaly_magnitude: f64::MAX,
            ..quiet_config()
        };
        let mut current = 50.0;
        for _ in 0..200 {
            current = next_value(&mut rng, current, &config, StepGranularity::Backfill, 0.0);
            assert!((0.0..=100.0).contains(&current), "{current} escaped [0, 100]");
        }
    }

    #[test]
    fn test_degenerate_range_collapses() {
        let mut rng = StdRng::seed_from_u64(1);
        let config = SimulationConfig {
            min_value: 5.0,
            max_value: 5.0,
            volatility: 3.0,
            trend: TrendBias::Up,
            ..quiet_config()
        };
        let v = next_value(&mut rng, 5.0, &config, StepGranularity::Backfill, 0.0);
        assert_eq!(v, 5.0);
    }

    #[test]
    fn test_seasonal_phase_wraps() {
        assert_eq!(seasonal_phase(0, 4), 0.0);
        assert_eq!(seasonal_phase(1, 4), 0.25);
        assert_eq!(seasonal_phase(5, 4), 0.25);
    }

    #[test]
    fn test_granularity_fractions() {
        assert_eq!(StepGranularity::Backfill.fraction(20), 0.05);
        assert_eq!(StepGranularity::Live.fraction(1000), UPDATE_STEP_FRACTION);
    }
}
