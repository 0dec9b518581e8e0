//! Core types and traits for the chaoscope simulation engine.
//!
//! This is the leaf crate of the workspace. It defines the vocabulary the
//! other crates share: state vectors, trajectory ids, the derivative
//! capability traits, typed parameter records with their validator,
//! boundary policies, trajectory seeds, and the structural error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod error;
pub mod id;
pub mod params;
pub mod seed;
pub mod state;
pub mod traits;

pub use boundary::{BoundaryPolicy, BoundaryRule};
pub use error::EngineError;
pub use id::{SystemKind, TrajectoryId};
pub use params::{
    Domain, ParamSpec, ParamWarning, ParameterRecord, TimeStepPolicy, Validated, WarningKind,
};
pub use seed::TrajectorySeed;
pub use state::{Position, StateVector};
pub use traits::{DerivativeFn, DynamicalSystem};
