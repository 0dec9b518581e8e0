//! Initial-condition records handed to a simulation at construction.

use crate::id::TrajectoryId;
use crate::state::StateVector;

/// One trajectory to create: its starting state plus display metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySeed {
    /// Display name, e.g. `"Trajectory 1"`.
    pub name: String,
    /// CSS-style colour string, e.g. `"#ff6b6b"`.
    pub color: String,
    /// Initial state.
    pub state: StateVector,
    /// Id to use instead of the next free one, e.g. when reloading a
    /// saved state. Ids must be unique within one trajectory set.
    pub id: Option<TrajectoryId>,
}

impl TrajectorySeed {
    /// Build a seed from its parts.
    pub fn new(name: impl Into<String>, color: impl Into<String>, state: StateVector) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            state,
            id: None,
        }
    }

    /// Pin the trajectory's id.
    pub fn with_id(mut self, id: TrajectoryId) -> Self {
        self.id = Some(id);
        self
    }
}
