//! Versioned JSON export and import for chaoscope simulations.
//!
//! One canonical serializer, [`export_simulation`], turns any
//! [`Simulation`](chaoscope_engine::Simulation) into an [`ExportDocument`].
//! Import goes through [`parse_payload`], which accepts the current schema
//! (major version [`SCHEMA_MAJOR`]) or the pre-versioning legacy shape,
//! and [`import_into`], which validates the whole payload before changing
//! anything.
//!
//! # Document layout
//!
//! ```text
//! { schemaVersion, simulation: {id, name, type, dimensionality},
//!   parameters, state: {time, dt, stepCount, aggregates, entities},
//!   history: {time[], aggregates{}, entities[]},
//!   metadata: {exportedAt, source, engine, schema}, custom }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod export;
pub mod import;
pub mod legacy;
pub mod schema;

pub use error::ImportError;
pub use export::{export_simulation, to_json, to_json_pretty, ExportOptions};
pub use import::{import_into, parse_payload, parse_value, ImportReport, Payload};
pub use legacy::{LegacyPayload, LegacyTrajectory};
pub use schema::{
    Entity, EntityState, ExportDocument, HistoryEntity, HistorySection, Metadata, SimulationInfo,
    StateSection, SCHEMA_MAJOR, SCHEMA_NAME, SCHEMA_VERSION,
};
