//! Import errors.

use chaoscope_core::{EngineError, SystemKind};
use thiserror::Error;

/// Why a payload could not be imported.
///
/// Import validates everything before touching the simulation, so any of
/// these leaves it unchanged.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Not JSON, or JSON that does not fit the document shape.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// A `schemaVersion` whose major version is not supported.
    #[error("unsupported schema version '{found}'")]
    UnsupportedVersion {
        /// The version string found in the payload.
        found: String,
    },
    /// The document was exported from a different system.
    #[error("payload is for {found}, simulation is {expected}")]
    SystemMismatch {
        /// Kind of the receiving simulation.
        expected: SystemKind,
        /// Kind recorded in the document.
        found: SystemKind,
    },
    /// A legacy payload without a required field.
    #[error("legacy payload is missing required field '{field}'")]
    MissingField {
        /// The missing field.
        field: &'static str,
    },
    /// The payload lists no trajectories.
    #[error("payload contains no entities")]
    NoEntities,
    /// Structurally valid JSON with unusable content.
    #[error("malformed payload: {detail}")]
    Malformed {
        /// What was wrong.
        detail: String,
    },
    /// The engine refused the imported trajectory set.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ImportError {
    pub(crate) fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}
