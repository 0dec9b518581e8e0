//! Per-trajectory trails keyed by id, with an optional store-wide budget.

use chaoscope_core::{Position, TrajectoryId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::trail::Trail;

/// Default opacity attached to exported trails.
pub const DEFAULT_OPACITY: f64 = 0.8;

// ── TrailConfig ────────────────────────────────────────────────────

/// Bounds and decimation policy shared by every trail in a store.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailConfig {
    /// Maximum points per trail. Default: 1000.
    pub max_length: usize,
    /// Per-trail length that triggers decimation. Default: `None` (off).
    pub decimation_threshold: Option<usize>,
    /// Keep one point in this many when decimating. Default: 2.
    pub decimation_stride: usize,
    /// Total points across all trails before the longest one is thinned.
    /// Default: 8000.
    pub point_budget: Option<usize>,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            max_length: 1000,
            decimation_threshold: None,
            decimation_stride: 2,
            point_budget: Some(8000),
        }
    }
}

// ── TrailExport ────────────────────────────────────────────────────

/// Renderer-independent snapshot of one trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrailExport {
    /// Points from oldest to newest.
    pub points: Vec<Position>,
    /// Display colour.
    pub color: String,
    /// Display opacity in `[0, 1]`.
    pub opacity: f64,
}

// ── TrailStore ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Entry {
    trail: Trail,
    color: String,
}

/// Trails for every trajectory of a simulation, in insertion order.
///
/// The store only records positions it is given; it never refers back to
/// the trajectories themselves.
#[derive(Clone, Debug)]
pub struct TrailStore {
    trails: IndexMap<TrajectoryId, Entry>,
    config: TrailConfig,
}

impl TrailStore {
    /// An empty store.
    pub fn new(config: TrailConfig) -> Self {
        Self {
            trails: IndexMap::new(),
            config,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &TrailConfig {
        &self.config
    }

    fn new_trail(&self) -> Trail {
        Trail::new(
            self.config.max_length,
            self.config.decimation_threshold,
            self.config.decimation_stride,
        )
    }

    /// Register an empty trail for `id`, replacing any existing one.
    pub fn insert(&mut self, id: TrajectoryId, color: impl Into<String>) {
        let trail = self.new_trail();
        self.trails.insert(
            id,
            Entry {
                trail,
                color: color.into(),
            },
        );
    }

    /// Append a point to `id`'s trail. Unknown ids are ignored and
    /// reported by returning `false`.
    pub fn add_point(&mut self, id: TrajectoryId, position: Position) -> bool {
        let Some(entry) = self.trails.get_mut(&id) else {
            return false;
        };
        if entry.trail.push(position) {
            tracing::debug!(trajectory = %id, len = entry.trail.len(), "trail decimated");
        }
        self.enforce_budget();
        true
    }

    /// Thin the longest trail until the total is within budget.
    fn enforce_budget(&mut self) {
        let Some(budget) = self.config.point_budget else {
            return;
        };
        let stride = self.config.decimation_stride.max(2);
        while self.total_points() > budget {
            let longest = self
                .trails
                .iter_mut()
                .max_by_key(|(_, e)| e.trail.len())
                .filter(|(_, e)| e.trail.len() > 1);
            let Some((id, entry)) = longest else {
                break;
            };
            entry.trail.decimate(stride);
            tracing::debug!(trajectory = %id, len = entry.trail.len(), budget, "trail decimated for budget");
        }
    }

    /// Empty `id`'s trail, keeping it registered.
    pub fn clear(&mut self, id: TrajectoryId) {
        if let Some(entry) = self.trails.get_mut(&id) {
            entry.trail.clear();
        }
    }

    /// Empty every trail, keeping all registered.
    pub fn clear_all(&mut self) {
        for entry in self.trails.values_mut() {
            entry.trail.clear();
        }
    }

    /// Drop `id`'s trail entirely.
    pub fn remove(&mut self, id: TrajectoryId) -> Option<Trail> {
        self.trails.shift_remove(&id).map(|e| e.trail)
    }

    /// Drop every trail.
    pub fn remove_all(&mut self) {
        self.trails.clear();
    }

    /// Change the per-trail bound, trimming existing trails.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.config.max_length = max_length.max(1);
        for entry in self.trails.values_mut() {
            entry.trail.set_max_length(max_length);
        }
    }

    /// Borrow `id`'s trail.
    pub fn get(&self, id: TrajectoryId) -> Option<&Trail> {
        self.trails.get(&id).map(|e| &e.trail)
    }

    /// Number of registered trails.
    pub fn len(&self) -> usize {
        self.trails.len()
    }

    /// Whether no trail is registered.
    pub fn is_empty(&self) -> bool {
        self.trails.is_empty()
    }

    /// Points across every trail.
    pub fn total_points(&self) -> usize {
        self.trails.values().map(|e| e.trail.len()).sum()
    }

    /// Serializable copy of `id`'s trail.
    pub fn export(&self, id: TrajectoryId) -> Option<TrailExport> {
        self.trails.get(&id).map(|e| TrailExport {
            points: e.trail.iter().cloned().collect(),
            color: e.color.clone(),
            opacity: DEFAULT_OPACITY,
        })
    }

    /// Serializable copies of every trail, in insertion order.
    pub fn export_all(&self) -> Vec<(TrajectoryId, TrailExport)> {
        self.trails
            .keys()
            .filter_map(|&id| self.export(id).map(|t| (id, t)))
            .collect()
    }
}
