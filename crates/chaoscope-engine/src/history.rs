//! Bounded time series of aggregate observables and positions.

use std::collections::VecDeque;

use chaoscope_core::{Position, TrajectoryId};
use indexmap::IndexMap;

use crate::config::HistoryConfig;
use crate::observables::Aggregates;

/// One recorded instant.
#[derive(Clone, Debug, PartialEq)]
pub struct HistorySample {
    /// Simulation time.
    pub time: f64,
    /// Ticks completed.
    pub step_count: u64,
    /// Observables at that instant.
    pub aggregates: Aggregates,
    /// Render position of every trajectory.
    pub positions: Vec<(TrajectoryId, Position)>,
}

/// FIFO of [`HistorySample`]s, sampled every `sample_every` ticks.
#[derive(Clone, Debug)]
pub struct History {
    samples: VecDeque<HistorySample>,
    config: HistoryConfig,
}

impl History {
    /// An empty history following `config`.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            samples: VecDeque::new(),
            config,
        }
    }

    /// Whether a sample should be taken after tick `step_count`.
    pub fn is_due(&self, step_count: u64) -> bool {
        self.config.enabled
            && self.config.sample_every > 0
            && step_count % self.config.sample_every == 0
    }

    /// Append a sample, evicting the oldest beyond capacity.
    pub fn record(&mut self, sample: HistorySample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.config.capacity.max(1) {
            self.samples.pop_front();
        }
    }

    /// Samples from oldest to newest.
    pub fn samples(&self) -> impl ExactSizeIterator<Item = &HistorySample> + '_ {
        self.samples.iter()
    }

    /// Sample times, oldest first.
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }

    /// One column per aggregate, keyed by its camelCase name.
    ///
    /// A column is only emitted when every sample carries the value, so
    /// all columns have the same length as [`times`](Self::times).
    pub fn aggregate_columns(&self) -> IndexMap<String, Vec<f64>> {
        let mut columns: IndexMap<String, Vec<f64>> = IndexMap::new();
        let n = self.samples.len();
        for sample in &self.samples {
            for (name, value) in sample.aggregates.named() {
                columns.entry(name.to_string()).or_default().push(value);
            }
        }
        columns.retain(|_, col| col.len() == n);
        columns
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples are held.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop every sample.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
