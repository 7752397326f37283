//! Series Configuration
//!
//! `SimulationConfig` is the fully resolved, validated parameter set for one
//! series. `SimulationOverrides` is the partial form callers actually send:
//! every field optional, merged onto the defaults by [`SimulationOverrides::resolve`].

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Directional bias applied on every step
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrendBias {
    Up,
    Down,
    #[default]
    Stable,
    /// Fresh bias in `[-strength/2, +strength/2]` drawn on every step
    Random,
}

/// Fully specified series configuration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    /// Points retained in the sliding window
    pub point_count: usize,
    /// Lower clamp bound for every generated value
    pub min_value: f64,
    /// Upper clamp bound for every generated value
    pub max_value: f64,
    /// Half-width of the per-step uniform noise
    pub volatility: f64,
    pub trend: TrendBias,
    pub trend_strength: f64,
    pub seasonality: bool,
    /// Steps per full seasonal cycle
    pub seasonality_period: usize,
    /// Peak deviation of the seasonal sinusoid
    pub seasonality_amplitude: f64,
    /// Per-step chance of an injected spike, in `[0, 1]`
    pub anomaly_probability: f64,
    /// Spike size as a multiple of `volatility`
    pub anomaly_magnitude: f64,
    /// Dead zone for the derived trend classification.
    /// `None` falls back to `volatility`.
    pub trend_threshold: Option<f64>,
    pub unit: String,
    pub color: String,
    pub name: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            point_count: 24,
            min_value: 0.0,
            max_value: 100.0,
            volatility: 5.0,
            trend: TrendBias::Stable,
            trend_strength: 0.3,
            seasonality: false,
            seasonality_period: 24,
            seasonality_amplitude: 10.0,
            anomaly_probability: 0.02,
            anomaly_magnitude: 3.0,
            trend_threshold: None,
            unit: String::new(),
            color: "#3b82f6".to_string(),
            name: "Series".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Width of the clamp range (zero for a degenerate range)
    pub fn range(&self) -> f64 {
        self.max_value - self.min_value
    }

    /// Threshold used when classifying the derived trend
    pub fn classification_threshold(&self) -> f64 {
        self.trend_threshold.unwrap_or(self.volatility)
    }

    /// Check every field; returns the first violation found.
    ///
    /// `min_value == max_value` is accepted and yields a constant series.
    pub fn validate(&self) -> Result<()> {
        if self.point_count < 1 {
            return Err(SimulationError::invalid("pointCount must be at least 1"));
        }
        if !self.min_value.is_finite() || !self.max_value.is_finite() {
            return Err(SimulationError::invalid(
                "minValue and maxValue must be finite",
            ));
        }
        if self.min_value > self.max_value {
            return Err(SimulationError::invalid(format!(
                "minValue ({}) must not exceed maxValue ({})",
                self.min_value, self.max_value
            )));
        }
        if !self.range().is_finite() {
            return Err(SimulationError::invalid(
                "maxValue - minValue must be a finite number",
            ));
        }
        non_negative("volatility", self.volatility)?;
        non_negative("trendStrength", self.trend_strength)?;
        non_negative("seasonalityAmplitude", self.seasonality_amplitude)?;
        non_negative("anomalyMagnitude", self.anomaly_magnitude)?;
        if let Some(threshold) = self.trend_threshold {
            non_negative("trendThreshold", threshold)?;
        }
        // each step term must stay finite or opposing infinities sum to NaN
        finite_term(
            "trendStrength * (maxValue - minValue)",
            self.trend_strength * self.range(),
        )?;
        finite_term(
            "anomalyMagnitude * volatility",
            self.anomaly_magnitude * self.volatility,
        )?;
        finite_term(
            "seasonalityAmplitude + volatility",
            self.seasonality_amplitude + self.volatility,
        )?;
        if self.seasonality_period == 0 {
            return Err(SimulationError::invalid(
                "seasonalityPeriod must be greater than 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.anomaly_probability) {
            return Err(SimulationError::invalid(format!(
                "anomalyProbability ({}) must lie in [0, 1]",
                self.anomaly_probability
            )));
        }
        Ok(())
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(format!(
            "{field} ({value}) must be a finite, non-negative number"
        )))
    }
}

fn finite_term(term: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimulationError::invalid(format!(
            "{term} overflows; reduce the magnitudes involved"
        )))
    }
}

/// Partial configuration; unset fields take the defaults
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationOverrides {
    pub point_count: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub volatility: Option<f64>,
    pub trend: Option<TrendBias>,
    pub trend_strength: Option<f64>,
    pub seasonality: Option<bool>,
    pub seasonality_period: Option<usize>,
    pub seasonality_amplitude: Option<f64>,
    pub anomaly_probability: Option<f64>,
    pub anomaly_magnitude: Option<f64>,
    pub trend_threshold: Option<f64>,
    pub unit: Option<String>,
    pub color: Option<String>,
    pub name: Option<String>,
}

impl SimulationOverrides {
    /// Layer `other` on top of `self`; fields set in `other` win.
    pub fn merge(&self, other: &SimulationOverrides) -> SimulationOverrides {
        SimulationOverrides {
            point_count: other.point_count.or(self.point_count),
            min_value: other.min_value.or(self.min_value),
            max_value: other.max_value.or(self.max_value),
            volatility: other.volatility.or(self.volatility),
            trend: other.trend.or(self.trend),
            trend_strength: other.trend_strength.or(self.trend_strength),
            seasonality: other.seasonality.or(self.seasonality),
            seasonality_period: other.seasonality_period.or(self.seasonality_period),
            seasonality_amplitude: other.seasonality_amplitude.or(self.seasonality_amplitude),
            anomaly_probability: other.anomaly_probability.or(self.anomaly_probability),
            anomaly_magnitude: other.anomaly_magnitude.or(self.anomaly_magnitude),
            trend_threshold: other.trend_threshold.or(self.trend_threshold),
            unit: other.unit.clone().or_else(|| self.unit.clone()),
            color: other.color.clone().or_else(|| self.color.clone()),
            name: other.name.clone().or_else(|| self.name.clone()),
        }
    }

    /// Fill unset fields from [`SimulationConfig::default`] and validate.
    pub fn resolve(&self) -> Result<SimulationConfig> {
        let d = SimulationConfig::default();
        let config = SimulationConfig {
            point_count: self.point_count.unwrap_or(d.point_count),
            min_value: self.min_value.unwrap_or(d.min_value),
            max_value: self.max_value.unwrap_or(d.max_value),
            volatility: self.volatility.unwrap_or(d.volatility),
            trend: self.trend.unwrap_or(d.trend),
            trend_strength: self.trend_strength.unwrap_or(d.trend_strength),
            seasonality: self.seasonality.unwrap_or(d.seasonality),
            seasonality_period: self.seasonality_period.unwrap_or(d.seasonality_period),
            seasonality_amplitude: self
                .seasonality_amplitude
                .unwrap_or(d.seasonality_amplitude),
            anomaly_probability: self.anomaly_probability.unwrap_or(d.anomaly_probability),
            anomaly_magnitude: self.anomaly_magnitude.unwrap_or(d.anomaly_magnitude),
            trend_threshold: self.trend_threshold.or(d.trend_threshold),
            unit: self.unit.clone().unwrap_or(d.unit),
            color: self.color.clone().unwrap_or(d.color),
            name: self.name.clone().unwrap_or(d.name),
        };
        config.validate()?;
        Ok(config)
    }
}
