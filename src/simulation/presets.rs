//! Metric Presets
//!
//! Named override bundles for the metric kinds dashboards display:
//! - **energy**: consumption (kWh) and efficiency (%)
//! - **network**: link load (Mbps) with frequent spikes
//! - **host**: CPU utilization and temperature
//!
//! A preset is just a [`SimulationOverrides`]; callers layer their own
//! overrides on top with [`SimulationOverrides::merge`].

use crate::simulation::config::{SimulationOverrides, TrendBias};

/// Look up a preset by name (case-insensitive, short aliases accepted)
pub fn preset(name: &str) -> Option<SimulationOverrides> {
    match name.to_lowercase().as_str() {
        "energy_consumption" | "energy" => Some(SimulationOverrides {
            name: Some("Energy Consumption".into()),
            unit: Some("kWh".into()),
            color: Some("#f59e0b".into()),
            point_count: Some(24),
            min_value: Some(200.0),
            max_value: Some(800.0),
            volatility: Some(15.0),
            trend: Some(TrendBias::Up),
            trend_strength: Some(0.2),
            seasonality: Some(true),
            seasonality_period: Some(24),
            seasonality_amplitude: Some(40.0),
            anomaly_probability: Some(0.03),
            anomaly_magnitude: Some(4.0),
            ..Default::default()
        }),
        "energy_efficiency" | "efficiency" => Some(SimulationOverrides {
            name: Some("Efficiency".into()),
            unit: Some("%".into()),
            color: Some("#10b981".into()),
            point_count: Some(24),
            min_value: Some(60.0),
            max_value: Some(100.0),
            volatility: Some(1.5),
            trend: Some(TrendBias::Stable),
            trend_strength: Some(0.3),
            seasonality: Some(false),
            anomaly_probability: Some(0.01),
            anomaly_magnitude: Some(5.0),
            ..Default::default()
        }),
        "network_load" | "network" => Some(SimulationOverrides {
            name: Some("Network Load".into()),
            unit: Some("Mbps".into()),
            color: Some("#6366f1".into()),
            point_count: Some(60),
            min_value: Some(0.0),
            max_value: Some(1000.0),
            volatility: Some(40.0),
            trend: Some(TrendBias::Random),
            trend_strength: Some(0.4),
            seasonality: Some(true),
            seasonality_period: Some(30),
            seasonality_amplitude: Some(25.0),
            anomaly_probability: Some(0.08),
            anomaly_magnitude: Some(5.0),
            ..Default::default()
        }),
        "cpu_utilization" | "cpu" => Some(SimulationOverrides {
            name: Some("CPU Utilization".into()),
            unit: Some("%".into()),
            color: Some("#ef4444".into()),
            point_count: Some(60),
            min_value: Some(0.0),
            max_value: Some(100.0),
            volatility: Some(6.0),
            trend: Some(TrendBias::Random),
            trend_strength: Some(0.3),
            seasonality: Some(true),
            seasonality_period: Some(12),
            seasonality_amplitude: Some(8.0),
            anomaly_probability: Some(0.05),
            anomaly_magnitude: Some(4.0),
            ..Default::default()
        }),
        "temperature" | "temp" => Some(SimulationOverrides {
            name: Some("Temperature".into()),
            unit: Some("°C".into()),
            color: Some("#0ea5e9".into()),
            point_count: Some(48),
            min_value: Some(-10.0),
            max_value: Some(40.0),
            volatility: Some(0.5),
            trend: Some(TrendBias::Stable),
            trend_strength: Some(0.2),
            seasonality: Some(true),
            seasonality_period: Some(48),
            seasonality_amplitude: Some(1.5),
            anomaly_probability: Some(0.0),
            anomaly_magnitude: Some(0.0),
            // Slow drift; classify on a wider band than the noise
            trend_threshold: Some(2.0),
        }),
        _ => None,
    }
}

/// List all available presets
pub fn list_presets() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "energy_consumption",
            "Rising daily energy draw with a 24-step cycle",
        ),
        ("energy_efficiency", "Efficiency percentage hovering near its ceiling"),
        ("network_load", "Jittery link throughput with frequent spikes"),
        ("cpu_utilization", "Bursty CPU usage with a short cycle"),
        ("temperature", "Slow seasonal temperature drift"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_preset_resolves() {
        for (name, _) in list_presets() {
            let overrides = preset(name).unwrap_or_else(|| panic!("missing preset {name}"));
            assert!(overrides.resolve().is_ok(), "preset {name} is invalid");
        }
    }

    #[test]
    fn test_aliases_and_case() {
        assert_eq!(preset("NETWORK"), preset("network_load"));
        assert_eq!(preset("cpu"), preset("cpu_utilization"));
        assert!(preset("unknown").is_none());
    }

    #[test]
    fn test_caller_overrides_win() {
        let base = preset("energy").unwrap();
        let merged = base.merge(&SimulationOverrides {
            point_count: Some(8),
            ..Default::default()
        });
        let config = merged.resolve().unwrap();
        assert_eq!(config.point_count, 8);
        assert_eq!(config.unit, "kWh");
    }
}
