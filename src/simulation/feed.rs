//! Live Feed
//!
//! Keeps a set of independent series and advances each one on every tick,
//! simulating live telemetry. [`spawn_feed`] drives the ticks from a tokio
//! interval; stopping is just ceasing to tick, since a single step never
//! suspends.

use crate::error::Result;
use crate::simulation::config::{SimulationConfig, SimulationOverrides};
use crate::simulation::engine::SeriesSimulator;
use crate::simulation::types::SimulatedTimeSeriesData;
use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cadence used by dashboards when none is given
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(5);

/// Shortest period [`spawn_feed`] will tick at
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

struct FeedEntry {
    series: SimulatedTimeSeriesData,
    config: SimulationConfig,
}

/// Feed statistics
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedStats {
    pub tick_count: u64,
    pub points_generated: u64,
}

/// State of every series after one tick
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeedSnapshot {
    pub timestamp: DateTime<Utc>,
    pub tick: u64,
    pub series: Vec<SimulatedTimeSeriesData>,
}

pub struct LiveFeed<R = StdRng> {
    simulator: SeriesSimulator<R>,
    entries: Vec<FeedEntry>,
    stats: FeedStats,
}

impl<R: Rng> LiveFeed<R> {
    pub fn new(simulator: SeriesSimulator<R>) -> Self {
        Self {
            simulator,
            entries: Vec::new(),
            stats: FeedStats::default(),
        }
    }

    /// Create a series and start advancing it; returns its id.
    pub fn add(&mut self, name: &str, overrides: &SimulationOverrides) -> Result<String> {
        self.add_at(name, overrides, Utc::now())
    }

    pub fn add_at(
        &mut self,
        name: &str,
        overrides: &SimulationOverrides,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let config = overrides.resolve()?;
        let series = self.simulator.create_from_config(name, &config, now)?;
        let id = series.id.clone();
        self.entries.push(FeedEntry { series, config });
        Ok(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.series.id != id);
        self.entries.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&SimulatedTimeSeriesData> {
        self.entries
            .iter()
            .map(|e| &e.series)
            .find(|s| s.id == id)
    }

    pub fn series(&self) -> impl Iterator<Item = &SimulatedTimeSeriesData> {
        self.entries.iter().map(|e| &e.series)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> &FeedStats {
        &self.stats
    }

    /// Advance every series by one step.
    ///
    /// All series are advanced before any is replaced, so a failure leaves
    /// the feed untouched.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Result<FeedSnapshot> {
        let mut next = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            next.push(
                self.simulator
                    .advance_with_config(&entry.series, &entry.config, now)?,
            );
        }
        for (entry, series) in self.entries.iter_mut().zip(next) {
            entry.series = series;
        }

        self.stats.tick_count += 1;
        self.stats.points_generated += self.entries.len() as u64;
        debug!(tick = self.stats.tick_count, series = self.entries.len(), "Feed ticked.");

        Ok(self.snapshot(now))
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> FeedSnapshot {
        FeedSnapshot {
            timestamp: now,
            tick: self.stats.tick_count,
            series: self.series().cloned().collect(),
        }
    }
}

/// Run `feed` on a fixed period until `cancel` fires or the receiver is
/// dropped. The first tick lands one period after spawning. The join handle
/// yields the feed back. Periods shorter than [`MIN_TICK_PERIOD`] are raised
/// to it.
pub fn spawn_feed<R>(
    mut feed: LiveFeed<R>,
    period: Duration,
    cancel: CancellationToken,
) -> (JoinHandle<LiveFeed<R>>, mpsc::Receiver<FeedSnapshot>)
where
    R: Rng + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    let period = period.max(MIN_TICK_PERIOD);

    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            series = feed.len(),
            period_ms = period.as_millis() as u64,
            "Live feed started."
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    match feed.tick_at(Utc::now()) {
                        Ok(snapshot) => {
                            if tx.send(snapshot).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => warn!(error = %e, "Feed tick failed."),
                    }
                }
            }
        }

        info!(ticks = feed.stats().tick_count, "Live feed stopped.");
        feed
    });

    (handle, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::presets::preset;

    fn feed_with_two() -> (LiveFeed, String, String) {
        let mut feed = LiveFeed::new(SeriesSimulator::seeded(21));
        let a = feed.add("Energy", &preset("energy").unwrap()).unwrap();
        let b = feed.add("Network", &preset("network").unwrap()).unwrap();
        (feed, a, b)
    }

    #[test]
    fn test_tick_advances_every_series() {
        let (mut feed, a, b) = feed_with_two();
        let before_a = feed.get(&a).unwrap().clone();
        let before_b = feed.get(&b).unwrap().clone();

        let snapshot = feed.tick_at(Utc::now()).unwrap();
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.series.len(), 2);

        let after_a = feed.get(&a).unwrap();
        let after_b = feed.get(&b).unwrap();
        assert_eq!(after_a.len(), before_a.len());
        assert_eq!(after_b.len(), before_b.len());
        assert_eq!(after_a.step_index, before_a.step_index + 1);
        assert_eq!(&after_a.data[..after_a.len() - 1], &before_a.data[1..]);

        assert_eq!(
            feed.stats(),
            &FeedStats {
                tick_count: 1,
                points_generated: 2
            }
        );
    }

    #[test]
    fn test_add_rejects_invalid_overrides() {
        let mut feed = LiveFeed::new(SeriesSimulator::seeded(1));
        let bad = SimulationOverrides {
            anomaly_probability: Some(2.0),
            ..Default::default()
        };
        assert!(feed.add("Bad", &bad).is_err());
        assert!(feed.is_empty());
    }

    #[test]
    fn test_remove() {
        let (mut feed, a, _) = feed_with_two();
        assert!(feed.remove(&a));
        assert!(!feed.remove(&a));
        assert_eq!(feed.len(), 1);
        assert!(feed.get(&a).is_none());
    }

    #[tokio::test]
    async fn test_spawned_feed_emits_and_stops() {
        let (feed, _, _) = feed_with_two();
        let cancel = CancellationToken::new();
        let (handle, mut rx) = spawn_feed(feed, Duration::from_millis(5), cancel.clone());

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.tick, 1);
        assert_eq!(second.tick, 2);
        assert_eq!(second.series.len(), 2);

        cancel.cancel();
        let feed = handle.await.unwrap();
        assert!(feed.stats().tick_count >= 2);
    }

    #[tokio::test]
    async fn test_zero_period_is_raised_to_minimum() {
        let (feed, _, _) = feed_with_two();
        let cancel = CancellationToken::new();
        let (handle, mut rx) = spawn_feed(feed, Duration::ZERO, cancel.clone());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.tick, 1);

        cancel.cancel();
        let feed = handle.await.unwrap();
        assert_eq!(feed.len(), 2);
        assert!(feed.stats().tick_count >= 1);
    }

    #[tokio::test]
    async fn test_spawned_feed_stops_when_receiver_dropped() {
        let (feed, _, _) = feed_with_two();
        let (handle, rx) = spawn_feed(feed, Duration::from_millis(5), CancellationToken::new());
        drop(rx);
        let feed = handle.await.unwrap();
        assert_eq!(feed.stats().tick_count, 1);
    }
}
