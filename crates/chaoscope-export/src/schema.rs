//! The export document and its sections.
//!
//! Every simulated system serializes through the same shapes: trajectories
//! and bodies alike become [`Entity`] values, so downstream tooling never
//! branches on the system type. Field names are camelCase on the wire.

use chaoscope_core::{Position, StateVector, SystemKind, TrajectoryId};
use chaoscope_engine::Aggregates;
use chaoscope_trail::TrailExport;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Current document version. Imports accept any `1.x`.
pub const SCHEMA_VERSION: &str = "1.0";

/// Major version accepted by import.
pub const SCHEMA_MAJOR: u32 = 1;

/// Schema identifier written to [`Metadata::schema`].
pub const SCHEMA_NAME: &str = "chaoscope-state";

/// A complete saved simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// `"major.minor"`.
    pub schema_version: String,
    /// Which system this is.
    pub simulation: SimulationInfo,
    /// Parameter values by name, in declaration order.
    pub parameters: IndexMap<String, f64>,
    /// Clock, observables and entities.
    pub state: StateSection,
    /// Recorded time series and trails, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<HistorySection>,
    /// Provenance.
    pub metadata: Metadata,
    /// Free-form caller data, carried through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom: Map<String, Value>,
}

/// Identity of the simulated system.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationInfo {
    /// Slug, e.g. `"double-gyre"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// The system kind; import refuses a document of another kind.
    #[serde(rename = "type")]
    pub kind: SystemKind,
    /// State dimension.
    pub dimensionality: usize,
}

/// The instantaneous state of a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSection {
    /// Simulation time.
    pub time: f64,
    /// Integration time step.
    pub dt: f64,
    /// Ticks completed.
    pub step_count: u64,
    /// Observables at export time.
    pub aggregates: Aggregates,
    /// One entry per trajectory.
    pub entities: Vec<Entity>,
}

/// A trajectory, body, or particle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Trajectory id.
    pub id: TrajectoryId,
    /// Display name.
    pub name: String,
    /// Display colour.
    pub color: String,
    /// Where it is and how fast it moves.
    pub state: EntityState,
}

/// Per-entity state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Render-space position.
    pub position: Position,
    /// Derivative magnitude.
    pub velocity: f64,
    /// Full state vector.
    pub vector: StateVector,
}

/// Column-oriented history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HistorySection {
    /// Sample times.
    pub time: Vec<f64>,
    /// One column per aggregate, each as long as `time`.
    pub aggregates: IndexMap<String, Vec<f64>>,
    /// Trails.
    pub entities: Vec<HistoryEntity>,
}

/// One entity's recorded trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntity {
    /// Trajectory id.
    pub id: TrajectoryId,
    /// Points, colour and opacity.
    pub trail: TrailExport,
}

/// Where and when the document was produced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Unix time in milliseconds.
    pub exported_at: u64,
    /// Caller-supplied origin label.
    pub source: String,
    /// `"chaoscope <version>"`.
    pub engine: String,
    /// Always [`SCHEMA_NAME`].
    pub schema: String,
}
