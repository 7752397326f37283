//! # series-sim - Synthetic Metric Series Engine
//!
//! Generates plausible metric streams (energy consumption, efficiency,
//! network load, ...) with configurable trend, seasonality, volatility and
//! anomaly characteristics, and advances them one tick at a time while
//! keeping derived statistics current.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         series-sim                           │
//! │                                                              │
//! │   SimulationOverrides ──resolve──▶ SimulationConfig          │
//! │                                         │                    │
//! │                 ┌───────────────────────┴──────────┐         │
//! │                 ▼                                  ▼         │
//! │        ┌─────────────────┐               ┌─────────────────┐ │
//! │        │   initializer   │               │     updater     │ │
//! │        │ (create_series) │               │ (advance_series)│ │
//! │        └────────┬────────┘               └────────┬────────┘ │
//! │                 └──────────┬───────────────────────┘         │
//! │                            ▼                                 │
//! │             step::next_value + algo::summarize               │
//! │                            │                                 │
//! │                            ▼                                 │
//! │                 SimulatedTimeSeriesData                      │
//! │                                                              │
//! │   LiveFeed: re-invokes the updater on a fixed period         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The engine never performs I/O. Storage, display and scheduling belong to
//! the caller; [`simulation::feed`] is an optional ready-made scheduler.
//!
//! ## Quick Start
//!
//! ```rust
//! use series_sim::{SeriesSimulator, SimulationOverrides, TrendBias};
//!
//! let mut sim = SeriesSimulator::seeded(7);
//! let overrides = SimulationOverrides {
//!     point_count: Some(12),
//!     trend: Some(TrendBias::Up),
//!     ..Default::default()
//! };
//!
//! let series = sim.create("Load", &overrides)?;
//! let next = sim.advance(&series, &overrides)?;
//! assert_eq!(next.data.len(), 12);
//! # Ok::<(), series_sim::SimulationError>(())
//! ```

pub mod algo;
pub mod error;
pub mod simulation;

pub use algo::{SeriesSummary, summarize};
pub use error::{Result, SimulationError};
pub use simulation::config::{SimulationConfig, SimulationOverrides, TrendBias};
pub use simulation::engine::{
    SeriesSimulator, advance_series, create_multiple_series, create_series,
};
pub use simulation::feed::{FeedSnapshot, FeedStats, LiveFeed, spawn_feed};
pub use simulation::presets::{list_presets, preset};
pub use simulation::step::{StepGranularity, UPDATE_STEP_FRACTION, next_value};
pub use simulation::types::{DerivedTrend, SimulatedDataPoint, SimulatedTimeSeriesData};

/// State handed back and forth between the engine and its callers
pub type SeriesState = SimulatedTimeSeriesData;
