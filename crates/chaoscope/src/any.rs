//! A simulation of any built-in system, chosen at runtime.

use chaoscope_core::{EngineError, ParamWarning, ParameterRecord, SystemKind};
use chaoscope_engine::{
    Aggregates, ConfigError, EngineConfig, Simulation, StepReport, TelemetrySnapshot,
};
use chaoscope_export::{
    export_simulation, import_into, ExportDocument, ExportOptions, ImportError, ImportReport,
    Payload,
};
use chaoscope_systems::presets::default_scenario;
use chaoscope_systems::{
    DoubleGyre, DoublePendulum, InitialConditions, Lorenz, Rossler, ThreeBody, Waterwheel,
};
use indexmap::IndexMap;

/// One [`Simulation`] per built-in system, selected by [`SystemKind`].
///
/// For code that picks the system from user input (a menu, a slug in a
/// URL, a saved file) and wants a single type to hold on to.
#[derive(Debug)]
pub enum AnySimulation {
    /// Lorenz attractor.
    Lorenz(Simulation<Lorenz>),
    /// Rössler attractor.
    Rossler(Simulation<Rossler>),
    /// Double-gyre flow.
    DoubleGyre(Simulation<DoubleGyre>),
    /// Double pendulum.
    DoublePendulum(Simulation<DoublePendulum>),
    /// Malkus waterwheel. [`new`](Self::new) uses the default bucket count.
    Waterwheel(Simulation<Waterwheel>),
    /// Planar three-body problem.
    ThreeBody(Simulation<ThreeBody>),
}

macro_rules! dispatch {
    ($self:expr, $sim:ident => $body:expr) => {
        match $self {
            AnySimulation::Lorenz($sim) => $body,
            AnySimulation::Rossler($sim) => $body,
            AnySimulation::DoubleGyre($sim) => $body,
            AnySimulation::DoublePendulum($sim) => $body,
            AnySimulation::Waterwheel($sim) => $body,
            AnySimulation::ThreeBody($sim) => $body,
        }
    };
}

fn build<S: InitialConditions>(system: S, config: EngineConfig) -> Result<Simulation<S>, ConfigError> {
    let seeds = default_scenario(&system);
    Simulation::new(system, S::Params::default(), seeds, config)
}

impl AnySimulation {
    /// The default scenario of `kind` under `config`.
    pub fn new(kind: SystemKind, config: EngineConfig) -> Result<Self, ConfigError> {
        Ok(match kind {
            SystemKind::Lorenz => Self::Lorenz(build(Lorenz, config)?),
            SystemKind::Rossler => Self::Rossler(build(Rossler, config)?),
            SystemKind::DoubleGyre => Self::DoubleGyre(build(DoubleGyre, config)?),
            SystemKind::DoublePendulum => Self::DoublePendulum(build(DoublePendulum, config)?),
            SystemKind::Waterwheel => Self::Waterwheel(build(Waterwheel::default(), config)?),
            SystemKind::ThreeBody => Self::ThreeBody(build(ThreeBody, config)?),
        })
    }

    /// Build the simulation a versioned document describes and load it.
    ///
    /// A waterwheel takes its bucket count from the document's
    /// dimensionality. Legacy payloads carry no system kind; import those
    /// with [`import`](Self::import) into a simulation of the right kind.
    pub fn from_document(doc: ExportDocument, config: EngineConfig) -> Result<Self, ImportError> {
        let invalid_config = |e: ConfigError| ImportError::Malformed {
            detail: format!("invalid engine configuration: {e}"),
        };
        let mut sim = match doc.simulation.kind {
            SystemKind::Waterwheel => {
                let dim = doc.simulation.dimensionality;
                if dim < 3 {
                    return Err(ImportError::Malformed {
                        detail: format!("waterwheel needs at least 3 dimensions, got {dim}"),
                    });
                }
                Self::Waterwheel(build(Waterwheel::new(dim - 2), config).map_err(invalid_config)?)
            }
            kind => Self::new(kind, config).map_err(invalid_config)?,
        };
        sim.import(&Payload::Current(Box::new(doc)))?;
        Ok(sim)
    }

    /// Which system this is.
    pub fn kind(&self) -> SystemKind {
        dispatch!(self, s => s.kind())
    }

    /// Run `n` ticks.
    pub fn step(&mut self, n: u64) -> StepReport {
        dispatch!(self, s => s.step(n))
    }

    /// Restore initial conditions and zero the clock.
    pub fn reset(&mut self) {
        dispatch!(self, s => s.reset())
    }

    /// Simulation time.
    pub fn time(&self) -> f64 {
        dispatch!(self, s => s.time())
    }

    /// Ticks completed.
    pub fn step_count(&self) -> u64 {
        dispatch!(self, s => s.step_count())
    }

    /// Number of trajectories.
    pub fn trajectory_count(&self) -> usize {
        dispatch!(self, s => s.trajectories().len())
    }

    /// Aggregate observables.
    pub fn aggregates(&self) -> Aggregates {
        dispatch!(self, s => s.aggregates())
    }

    /// Parameter values by name.
    pub fn parameters(&self) -> IndexMap<String, f64> {
        dispatch!(self, s => s.params().named_values())
    }

    /// Set one parameter by name.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<Vec<ParamWarning>, EngineError> {
        dispatch!(self, s => s.set_parameter(name, value))
    }

    /// Telemetry payload.
    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        dispatch!(self, s => s.telemetry_snapshot())
    }

    /// Export document.
    pub fn export(&self, options: &ExportOptions) -> ExportDocument {
        dispatch!(self, s => export_simulation(s, options))
    }

    /// Load a payload into this simulation.
    pub fn import(&mut self, payload: &Payload) -> Result<ImportReport, ImportError> {
        dispatch!(self, s => import_into(s, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_builds_and_steps() {
        for kind in SystemKind::ALL {
            let mut sim = AnySimulation::new(kind, EngineConfig::default()).unwrap();
            assert_eq!(sim.kind(), kind);
            let report = sim.step(10);
            assert_eq!(report.ticks, 10, "{kind}");
            assert_eq!(sim.trajectory_count(), 3);
            assert!(sim.aggregates().energy.is_finite(), "{kind}");
        }
    }

    #[test]
    fn parameters_by_name() {
        let mut sim = AnySimulation::new(SystemKind::DoubleGyre, EngineConfig::default()).unwrap();
        let names: Vec<String> = sim.parameters().into_keys().collect();
        assert_eq!(names, ["A", "epsilon", "omega"]);
        let warnings = sim.set_parameter("epsilon", 2.0).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(sim.parameters()["epsilon"], 1.0);
    }

    #[test]
    fn from_document_sizes_the_waterwheel() {
        let wheel = Waterwheel::new(4);
        let mut source = AnySimulation::Waterwheel(build(wheel, EngineConfig::default()).unwrap());
        source.step(30);
        let doc = source.export(&ExportOptions::default());
        assert_eq!(doc.simulation.dimensionality, 6);

        let loaded = AnySimulation::from_document(doc, EngineConfig::default()).unwrap();
        match &loaded {
            AnySimulation::Waterwheel(sim) => assert_eq!(sim.system().buckets(), 4),
            other => panic!("expected a waterwheel, got {:?}", other.kind()),
        }
        assert_eq!(loaded.step_count(), 30);
    }

    #[test]
    fn from_document_rejects_undersized_waterwheel() {
        let source = AnySimulation::new(SystemKind::Waterwheel, EngineConfig::default()).unwrap();
        let mut doc = source.export(&ExportOptions::default());
        doc.simulation.dimensionality = 2;
        match AnySimulation::from_document(doc, EngineConfig::default()) {
            Err(ImportError::Malformed { detail }) => assert!(detail.contains("at least 3")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn from_document_picks_the_right_system() {
        let mut source = AnySimulation::new(SystemKind::ThreeBody, EngineConfig::default()).unwrap();
        source.step(20);
        let doc = source.export(&ExportOptions::default());
        let loaded = AnySimulation::from_document(doc, EngineConfig::default()).unwrap();
        assert_eq!(loaded.kind(), SystemKind::ThreeBody);
        assert_eq!(loaded.step_count(), 20);
        assert_eq!(loaded.time(), source.time());
    }
}
