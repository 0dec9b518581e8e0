//! Bounded trail buffers with adaptive decimation.
//!
//! A [`Trail`] is the recorded render-space history of one trajectory. A
//! [`TrailStore`] owns the trails of a whole simulation, keyed by
//! [`TrajectoryId`](chaoscope_core::TrajectoryId), and enforces an optional
//! store-wide point budget by thinning the longest trail first.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod store;
pub mod trail;

pub use store::{TrailConfig, TrailExport, TrailStore, DEFAULT_OPACITY};
pub use trail::Trail;
