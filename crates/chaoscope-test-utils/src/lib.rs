//! Test utilities for chaoscope development.
//!
//! Provides synthetic [`DynamicalSystem`](chaoscope_core::DynamicalSystem)
//! implementations with fully predictable behaviour, for exercising the
//! engine's bookkeeping and safety net without depending on real chaos.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{ConstantDerivative, Exponential, NanAfterCalls, NanRegion};
