//! Series Engine
//!
//! Builds a full series window from a configuration (initializer) and
//! advances an existing window by one step (updater). Both run every value
//! through the same step function and recompute statistics from scratch.
//!
//! ## Window model
//!
//! ```text
//!   create:   base ──step──▶ p0 ──step──▶ p1 ── … ──▶ p(n-1)      (trailing hour)
//!   advance:  [p0, p1, …, p(n-1)]  ──▶  [p1, …, p(n-1), p(n)]     (FIFO, len fixed)
//! ```
//!
//! The updater never mutates its input; it returns a new window so readers
//! of the previous one keep a consistent snapshot.

use crate::algo::summary::summarize;
use crate::error::{Result, SimulationError};
use crate::simulation::config::{SimulationConfig, SimulationOverrides};
use crate::simulation::step::{StepGranularity, next_value, seasonal_phase};
use crate::simulation::types::{SimulatedDataPoint, SimulatedTimeSeriesData};
use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use uuid::Uuid;

/// Span covered by a freshly created window
pub const HISTORY_SPAN_MS: i64 = 3_600_000;

/// Base values are drawn from this central share of the range
const BASE_BAND: f64 = 0.4;

/// Series generator owning its random source
pub struct SeriesSimulator<R = StdRng> {
    rng: R,
}

impl SeriesSimulator<StdRng> {
    /// Seed from the OS entropy source.
    ///
    /// Fails with [`SimulationError::RandomSource`] rather than falling back
    /// to a predictable generator.
    pub fn from_entropy() -> Result<Self> {
        StdRng::try_from_os_rng()
            .map(Self::with_rng)
            .map_err(|e| SimulationError::RandomSource(e.to_string()))
    }

    /// Deterministic generator for tests and replays
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SeriesSimulator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    pub fn create(
        &mut self,
        name: &str,
        overrides: &SimulationOverrides,
    ) -> Result<SimulatedTimeSeriesData> {
        self.create_at(name, overrides, Utc::now())
    }

    pub fn create_at(
        &mut self,
        name: &str,
        overrides: &SimulationOverrides,
        now: DateTime<Utc>,
    ) -> Result<SimulatedTimeSeriesData> {
        let config = overrides.resolve()?;
        self.create_from_config(name, &config, now)
    }

    /// Build a full window ending at `now`.
    ///
    /// Points are spread evenly across the trailing hour, oldest first. The
    /// first point's `previous_value` is its own value.
    pub fn create_from_config(
        &mut self,
        name: &str,
        config: &SimulationConfig,
        now: DateTime<Utc>,
    ) -> Result<SimulatedTimeSeriesData> {
        config.validate()?;

        let n = config.point_count;
        let interval_ms = point_interval_ms(n);
        let mut current = self.base_value(config);
        let mut data = Vec::with_capacity(n);

        for i in 0..n {
            let phase = seasonal_phase(i as u64, config.seasonality_period);
            let value = next_value(
                &mut self.rng,
                current,
                config,
                StepGranularity::Backfill,
                phase,
            );
            let previous = if i == 0 { value } else { current };
            let timestamp = now - TimeDelta::milliseconds((n - i) as i64 * interval_ms);
            data.push(SimulatedDataPoint::new(timestamp, value, previous));
            current = value;
        }

        debug!(series = %name, points = n, "Series created.");

        Ok(assemble(
            Uuid::new_v4().to_string(),
            name.to_string(),
            config.color.clone(),
            config.unit.clone(),
            data,
            config,
            n as u64,
        ))
    }

    pub fn advance(
        &mut self,
        series: &SimulatedTimeSeriesData,
        overrides: &SimulationOverrides,
    ) -> Result<SimulatedTimeSeriesData> {
        self.advance_at(series, overrides, Utc::now())
    }

    pub fn advance_at(
        &mut self,
        series: &SimulatedTimeSeriesData,
        overrides: &SimulationOverrides,
        now: DateTime<Utc>,
    ) -> Result<SimulatedTimeSeriesData> {
        let config = overrides.resolve()?;
        self.advance_with_config(series, &config, now)
    }

    /// Drop the oldest point, append one new point and recompute statistics.
    ///
    /// The window keeps the series' own length; `config.point_count` only
    /// matters at creation. The new timestamp is never earlier than the
    /// previous latest point.
    pub fn advance_with_config(
        &mut self,
        series: &SimulatedTimeSeriesData,
        config: &SimulationConfig,
        now: DateTime<Utc>,
    ) -> Result<SimulatedTimeSeriesData> {
        config.validate()?;
        let last = series.data.last().ok_or(SimulationError::EmptySeries)?;

        if config.point_count != series.len() {
            debug!(
                series = %series.name,
                window = series.len(),
                configured = config.point_count,
                "Window length differs from config; keeping window length."
            );
        }

        let phase = seasonal_phase(series.step_index, config.seasonality_period);
        let value = next_value(
            &mut self.rng,
            last.value,
            config,
            StepGranularity::Live,
            phase,
        );
        let point = SimulatedDataPoint::new(now.max(last.timestamp), value, last.value);

        let mut data = Vec::with_capacity(series.len());
        data.extend(series.data.iter().skip(1).cloned());
        data.push(point);

        debug!(series = %series.name, value, step = series.step_index, "Series advanced.");

        Ok(assemble(
            series.id.clone(),
            series.name.clone(),
            series.color.clone(),
            series.unit.clone(),
            data,
            config,
            series.step_index.wrapping_add(1),
        ))
    }

    /// Create one series per name; configs pair with names by index and a
    /// name without a config gets the defaults.
    pub fn create_many_at<S: AsRef<str>>(
        &mut self,
        names: &[S],
        configs: &[SimulationOverrides],
        now: DateTime<Utc>,
    ) -> Result<Vec<SimulatedTimeSeriesData>> {
        let defaults = SimulationOverrides::default();
        names
            .iter()
            .enumerate()
            .map(|(i, name)| self.create_at(name.as_ref(), configs.get(i).unwrap_or(&defaults), now))
            .collect()
    }

    fn base_value(&mut self, config: &SimulationConfig) -> f64 {
        let range = config.range();
        if range <= 0.0 {
            return config.min_value;
        }
        let low = config.min_value + range * (1.0 - BASE_BAND) / 2.0;
        let high = low + range * BASE_BAND;
        self.rng.random_range(low..=high)
    }
}

/// Spacing between backfilled points; at least 1 ms so timestamps stay
/// strictly increasing for any window size.
fn point_interval_ms(point_count: usize) -> i64 {
    (HISTORY_SPAN_MS / point_count.max(1) as i64).max(1)
}

fn assemble(
    id: String,
    name: String,
    color: String,
    unit: String,
    data: Vec<SimulatedDataPoint>,
    config: &SimulationConfig,
    step_index: u64,
) -> SimulatedTimeSeriesData {
    let summary = summarize(&data, config.classification_threshold());
    SimulatedTimeSeriesData {
        id,
        name,
        data,
        color,
        unit,
        total: summary.total,
        average: summary.average,
        min: summary.min,
        max: summary.max,
        trend: summary.trend,
        step_index,
    }
}

/// Create a series seeded from OS entropy
pub fn create_series(name: &str, overrides: &SimulationOverrides) -> Result<SimulatedTimeSeriesData> {
    SeriesSimulator::from_entropy()?.create(name, overrides)
}

/// Advance a series by one step, seeded from OS entropy
pub fn advance_series(
    series: &SimulatedTimeSeriesData,
    overrides: &SimulationOverrides,
) -> Result<SimulatedTimeSeriesData> {
    SeriesSimulator::from_entropy()?.advance(series, overrides)
}

pub fn create_multiple_series<S: AsRef<str>>(
    names: &[S],
    configs: &[SimulationOverrides],
) -> Result<Vec<SimulatedTimeSeriesData>> {
    SeriesSimulator::from_entropy()?.create_many_at(names, configs, Utc::now())
}
