//! chaoscope: a simulation engine for chaotic dynamical systems.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all chaoscope sub-crates. For most users, adding `chaoscope` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use chaoscope::prelude::*;
//!
//! // Three Lorenz trajectories started 1e-3 apart.
//! let mut sim = chaoscope::default_simulation(Lorenz).unwrap();
//! let report = sim.step(2000);
//! assert_eq!(report.ticks, 2000);
//! assert_eq!(report.stability, Stability::Stable);
//!
//! // Nearby starts have separated.
//! assert!(sim.aggregates().max_separation > 0.1);
//!
//! // Save and restore through the versioned schema.
//! let json = to_json(&export_simulation(&sim, &ExportOptions::default())).unwrap();
//! let mut copy = chaoscope::default_simulation(Lorenz).unwrap();
//! import_into(&mut copy, &parse_payload(&json).unwrap()).unwrap();
//! assert_eq!(copy.step_count(), 2000);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `chaoscope-core` | State vectors, ids, parameter records, capability traits, errors |
//! | [`integrator`] | `chaoscope-integrator` | RK4 and Euler steps |
//! | [`systems`] | `chaoscope-systems` | Built-in systems and scenario presets |
//! | [`trail`] | `chaoscope-trail` | Trail buffers and the trail store |
//! | [`engine`] | `chaoscope-engine` | `Simulation`, safety net, observables, telemetry |
//! | [`export`] | `chaoscope-export` | Versioned JSON export and import |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod any;

pub use any::AnySimulation;

/// Core types, traits, and ids (`chaoscope-core`).
pub use chaoscope_core as types;

/// Fixed-step integrators (`chaoscope-integrator`).
pub use chaoscope_integrator as integrator;

/// Built-in systems and presets (`chaoscope-systems`).
///
/// Every system implements [`systems::InitialConditions`], which the
/// presets in [`systems::presets`] build on.
pub use chaoscope_systems as systems;

/// Trail recording (`chaoscope-trail`).
pub use chaoscope_trail as trail;

/// The simulation engine (`chaoscope-engine`).
pub use chaoscope_engine as engine;

/// Export and import (`chaoscope-export`).
pub use chaoscope_export as export;

use chaoscope_engine::{ConfigError, EngineConfig, Simulation};
use chaoscope_systems::presets::default_scenario;
use chaoscope_systems::InitialConditions;

/// A simulation of `system` with default parameters, the default
/// divergence scenario and the default configuration.
pub fn default_simulation<S: InitialConditions>(system: S) -> Result<Simulation<S>, ConfigError> {
    let seeds = default_scenario(&system);
    Simulation::new(system, S::Params::default(), seeds, EngineConfig::default())
}

/// Common imports for typical chaoscope usage.
///
/// ```rust
/// use chaoscope::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use chaoscope_core::{
        DerivativeFn, DynamicalSystem, EngineError, ParamWarning, ParameterRecord, Position,
        StateVector, SystemKind, TrajectoryId, TrajectorySeed, WarningKind,
    };

    // Integrators
    pub use chaoscope_integrator::Integrator;

    // Systems
    pub use chaoscope_systems::{
        DoubleGyre, DoubleGyreParams, DoublePendulum, DoublePendulumParams, InitialConditions,
        Lorenz, LorenzParams, Rossler, RosslerParams, ThreeBody, ThreeBodyParams, Waterwheel,
        WaterwheelParams,
    };

    // Engine
    pub use chaoscope_engine::{
        Aggregates, ConfigError, EngineConfig, Simulation, Stability, StepReport,
    };

    // Export
    pub use chaoscope_export::{
        export_simulation, import_into, parse_payload, to_json, ExportOptions, ImportError,
    };

    pub use crate::{default_simulation, AnySimulation};
}
