//! Building export documents from a running simulation.

use std::time::{SystemTime, UNIX_EPOCH};

use chaoscope_core::{DynamicalSystem, ParameterRecord};
use chaoscope_engine::observables;
use chaoscope_engine::Simulation;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::{
    Entity, EntityState, ExportDocument, HistoryEntity, HistorySection, Metadata, SimulationInfo,
    StateSection, SCHEMA_NAME, SCHEMA_VERSION,
};

/// What to include in an export.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Attach the history section (time series and trails). Default: true.
    pub include_history: bool,
    /// Origin label for [`Metadata::source`]. Default: `"chaoscope"`.
    pub source: String,
    /// Carried into the document's `custom` section.
    pub custom: Map<String, Value>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_history: true,
            source: "chaoscope".to_string(),
            custom: Map::new(),
        }
    }
}

/// Snapshot `sim` into a document.
pub fn export_simulation<S: DynamicalSystem>(
    sim: &Simulation<S>,
    options: &ExportOptions,
) -> ExportDocument {
    let system = sim.system();
    let params = sim.params();

    let entities = sim
        .trajectories()
        .iter()
        .map(|t| Entity {
            id: t.id(),
            name: t.name().to_string(),
            color: t.color().to_string(),
            state: EntityState {
                position: system.position(t.state(), params),
                velocity: observables::speed(system, params, sim.time(), t.state()),
                vector: t.state().into(),
            },
        })
        .collect();

    let history = options.include_history.then(|| HistorySection {
        time: sim.history().times(),
        aggregates: sim.history().aggregate_columns(),
        entities: sim
            .trails()
            .export_all()
            .into_iter()
            .map(|(id, trail)| HistoryEntity { id, trail })
            .collect(),
    });

    ExportDocument {
        schema_version: SCHEMA_VERSION.to_string(),
        simulation: SimulationInfo {
            id: sim.kind().slug().to_string(),
            name: system.display_name().to_string(),
            kind: sim.kind(),
            dimensionality: system.dimension(),
        },
        parameters: params.named_values(),
        state: StateSection {
            time: sim.time(),
            dt: sim.dt(),
            step_count: sim.step_count(),
            aggregates: sim.aggregates(),
            entities,
        },
        history,
        metadata: Metadata {
            exported_at: unix_millis(),
            source: options.source.clone(),
            engine: format!("chaoscope {}", env!("CARGO_PKG_VERSION")),
            schema: SCHEMA_NAME.to_string(),
        },
        custom: options.custom.clone(),
    }
}

/// Compact JSON.
pub fn to_json(doc: &ExportDocument) -> serde_json::Result<String> {
    serde_json::to_string(doc)
}

/// Indented JSON.
pub fn to_json_pretty(doc: &ExportDocument) -> serde_json::Result<String> {
    serde_json::to_string_pretty(doc)
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
