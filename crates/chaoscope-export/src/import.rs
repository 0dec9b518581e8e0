//! Applying payloads to a simulation.
//!
//! [`parse_payload`] decides between the current schema and the legacy
//! shape. [`import_into`] checks the payload against the simulation in
//! full (system kind, entity count and dimensions, trajectory limit) and
//! only then replaces trajectories, parameters, time step and clock.
//! Parameters go through the usual validator, so bad values become
//! warnings in the [`ImportReport`] rather than errors.

use chaoscope_core::{DynamicalSystem, ParamWarning, ParameterRecord, TrajectorySeed};
use chaoscope_engine::Simulation;
use chaoscope_systems::presets::{palette_color, trajectory_name};
use serde_json::Value;
use smallvec::SmallVec;
use tracing::{info, warn};

use crate::error::ImportError;
use crate::legacy::{self, LegacyPayload};
use crate::schema::{ExportDocument, SCHEMA_MAJOR};

/// A parsed payload, ready for [`import_into`].
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A versioned document.
    Current(Box<ExportDocument>),
    /// A pre-versioning payload.
    Legacy(LegacyPayload),
}

/// What an import changed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImportReport {
    /// Trajectories now in the simulation.
    pub entities: usize,
    /// Corrections applied to parameters and `dt`.
    pub warnings: Vec<ParamWarning>,
    /// Parameter names the system does not define; ignored.
    pub unknown_parameters: Vec<String>,
    /// Whether the legacy reader was used.
    pub legacy: bool,
}

/// Parse a JSON payload.
pub fn parse_payload(json: &str) -> Result<Payload, ImportError> {
    parse_value(serde_json::from_str(json)?)
}

/// Classify an already parsed JSON value.
pub fn parse_value(value: Value) -> Result<Payload, ImportError> {
    let Value::Object(root) = &value else {
        return Err(ImportError::malformed("payload is not a JSON object"));
    };
    match root.get("schemaVersion") {
        Some(version) => {
            let version = version
                .as_str()
                .ok_or_else(|| ImportError::malformed("'schemaVersion' must be a string"))?;
            check_version(version)?;
            Ok(Payload::Current(Box::new(serde_json::from_value(value)?)))
        }
        None => legacy::parse(root).map(Payload::Legacy),
    }
}

fn check_version(version: &str) -> Result<(), ImportError> {
    let major = version
        .split('.')
        .next()
        .and_then(|m| m.trim().parse::<u32>().ok());
    match major {
        Some(SCHEMA_MAJOR) => Ok(()),
        _ => Err(ImportError::UnsupportedVersion {
            found: version.to_string(),
        }),
    }
}

/// Everything import needs, extracted and checked before any mutation.
struct Plan<P> {
    seeds: Vec<TrajectorySeed>,
    params: P,
    unknown: Vec<String>,
    dt: Option<f64>,
    time: f64,
    step_count: u64,
}

/// Replace `sim`'s trajectories, parameters, time step and clock with
/// the payload's. On error `sim` is untouched.
pub fn import_into<S: DynamicalSystem>(
    sim: &mut Simulation<S>,
    payload: &Payload,
) -> Result<ImportReport, ImportError> {
    let plan = match payload {
        Payload::Current(doc) => plan_current(sim, doc)?,
        Payload::Legacy(legacy) => plan_legacy(sim, legacy)?,
    };
    sim.validate_seeds(&plan.seeds)?;

    // Validated: from here on nothing can fail.
    let entities = plan.seeds.len();
    sim.replace_trajectories(plan.seeds)?;
    let mut warnings = sim.set_parameters(plan.params);
    if let Some(dt) = plan.dt {
        warnings.extend(sim.set_time_step(dt));
    }
    sim.set_clock(plan.time, plan.step_count);

    for name in &plan.unknown {
        warn!(parameter = %name, "ignoring unknown parameter in import");
    }
    let legacy = matches!(payload, Payload::Legacy(_));
    info!(system = sim.kind().slug(), entities, legacy, "imported simulation state");

    Ok(ImportReport {
        entities,
        warnings,
        unknown_parameters: plan.unknown,
        legacy,
    })
}

fn plan_current<S: DynamicalSystem>(
    sim: &Simulation<S>,
    doc: &ExportDocument,
) -> Result<Plan<S::Params>, ImportError> {
    if doc.simulation.kind != sim.kind() {
        return Err(ImportError::SystemMismatch {
            expected: sim.kind(),
            found: doc.simulation.kind,
        });
    }
    if doc.state.entities.is_empty() {
        return Err(ImportError::NoEntities);
    }
    let dim = sim.system().dimension();
    let seeds = doc
        .state
        .entities
        .iter()
        .map(|e| {
            check_dimension(&e.name, e.state.vector.len(), dim)?;
            Ok(
                TrajectorySeed::new(e.name.clone(), e.color.clone(), e.state.vector.clone())
                    .with_id(e.id),
            )
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    let (params, unknown) =
        S::Params::from_named(doc.parameters.iter().map(|(k, v)| (k.as_str(), *v)));
    Ok(Plan {
        seeds,
        params,
        unknown,
        dt: Some(doc.state.dt),
        time: doc.state.time,
        step_count: doc.state.step_count,
    })
}

fn plan_legacy<S: DynamicalSystem>(
    sim: &Simulation<S>,
    legacy: &LegacyPayload,
) -> Result<Plan<S::Params>, ImportError> {
    if legacy.trajectories.is_empty() {
        return Err(ImportError::NoEntities);
    }
    let dim = sim.system().dimension();
    let seeds = legacy
        .trajectories
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let name = t.name.clone().unwrap_or_else(|| trajectory_name(i));
            check_dimension(&name, t.state.len(), dim)?;
            let color = t.color.clone().unwrap_or_else(|| palette_color(i).to_string());
            Ok(TrajectorySeed::new(name, color, SmallVec::from_slice(&t.state)))
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    let (params, unknown) =
        S::Params::from_named(legacy.parameters.iter().map(|(k, v)| (k.as_str(), *v)));
    Ok(Plan {
        seeds,
        params,
        unknown,
        dt: legacy.dt,
        time: legacy.time.unwrap_or(0.0),
        step_count: 0,
    })
}

fn check_dimension(name: &str, got: usize, expected: usize) -> Result<(), ImportError> {
    if got != expected {
        return Err(ImportError::malformed(format!(
            "entity '{name}' has {got} components, system expects {expected}"
        )));
    }
    Ok(())
}
