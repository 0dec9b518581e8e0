//! Multi-trajectory simulation engine for chaotic systems.
//!
//! Provides [`Simulation`], which owns every trajectory of one
//! [`DynamicalSystem`](chaoscope_core::DynamicalSystem), steps them with a
//! fixed-step integrator, and keeps the numerical safety net, checkpoint
//! ring, trails and optional history in sync. Observables and telemetry
//! payloads are computed on demand; the engine itself performs no I/O.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod checkpoint;
pub mod config;
pub mod history;
pub mod metrics;
pub mod observables;
pub mod safety;
pub mod simulation;
pub mod telemetry;

pub use checkpoint::{Checkpoint, CheckpointRing};
pub use config::{ConfigError, EngineConfig, HistoryConfig, SafetyConfig};
pub use history::{History, HistorySample};
pub use metrics::StepMetrics;
pub use observables::Aggregates;
pub use safety::{TrajectoryHealth, TrajectoryStatus};
pub use simulation::{Simulation, Stability, StepReport, Trajectory};
pub use telemetry::{
    PublishOutcome, TelemetryBody, TelemetryData, TelemetryPublisher, TelemetryReceiver,
    TelemetrySnapshot,
};
