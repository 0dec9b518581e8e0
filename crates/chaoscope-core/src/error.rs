//! Structural errors raised by simulation operations.
//!
//! Numerical trouble (NaN, overflow) is never an error: the safety net
//! repairs it and reports through the step report. Parameter problems are
//! corrected and surfaced as [`ParamWarning`](crate::ParamWarning)s. What
//! remains is misuse of the trajectory set and lookups that cannot succeed.

use thiserror::Error;

use crate::id::TrajectoryId;

/// Errors from structural operations on a simulation.
///
/// Every operation that returns this error leaves the simulation unchanged.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EngineError {
    /// `add_trajectory` at the configured maximum.
    #[error("trajectory limit reached ({max} trajectories)")]
    TrajectoryLimit {
        /// The configured maximum.
        max: usize,
    },
    /// Removing the only remaining trajectory.
    #[error("cannot remove the last trajectory")]
    LastTrajectory,
    /// Replacing the trajectory set with an empty one.
    #[error("a simulation needs at least one trajectory")]
    NoTrajectories,
    /// Two seeds in one trajectory set pinned to the same id.
    #[error("duplicate trajectory id {id}")]
    DuplicateId {
        /// The repeated id.
        id: TrajectoryId,
    },
    /// A positional index past the end of the trajectory list.
    #[error("trajectory index {index} out of range ({len} trajectories)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Current trajectory count.
        len: usize,
    },
    /// A state vector whose length does not match the system.
    #[error("state has {got} components, system expects {expected}")]
    DimensionMismatch {
        /// Dimension of the simulated system.
        expected: usize,
        /// Length of the supplied state.
        got: usize,
    },
    /// An initial state containing NaN or infinity.
    #[error("initial state contains non-finite component at index {index}")]
    NonFiniteState {
        /// Index of the first offending component.
        index: usize,
    },
    /// A parameter name the system does not define.
    #[error("unknown parameter '{name}'")]
    UnknownParameter {
        /// The name that was looked up.
        name: String,
    },
    /// Manual recovery requested before any checkpoint was saved.
    #[error("no checkpoint available")]
    NoCheckpoint,
}
