//! Built-in chaotic systems for the chaoscope engine.
//!
//! Each system is a zero-sized (or nearly so) type implementing
//! [`DynamicalSystem`] together with a typed parameter record. The
//! [`presets`] module turns them into ready-made scenarios.
//!
//! | System | State | Parameters |
//! |---|---|---|
//! | [`Lorenz`] | `(x, y, z)` | [`LorenzParams`] |
//! | [`Rossler`] | `(x, y, z)` | [`RosslerParams`] |
//! | [`DoubleGyre`] | `(x, y)` | [`DoubleGyreParams`] |
//! | [`DoublePendulum`] | `(θ1, ω1, θ2, ω2)` | [`DoublePendulumParams`] |
//! | [`Waterwheel`] | `(ω, θ, m_0..m_n)` | [`WaterwheelParams`] |
//! | [`ThreeBody`] | `(x, y, vx, vy) × 3` | [`ThreeBodyParams`] |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod double_gyre;
pub mod double_pendulum;
pub mod lorenz;
pub mod presets;
pub mod rossler;
pub mod three_body;
pub mod waterwheel;

pub use double_gyre::{DoubleGyre, DoubleGyreParams};
pub use double_pendulum::{DoublePendulum, DoublePendulumParams};
pub use lorenz::{Lorenz, LorenzParams};
pub use rossler::{Rossler, RosslerParams};
pub use three_body::{ThreeBody, ThreeBodyParams};
pub use waterwheel::{Waterwheel, WaterwheelParams};

use chaoscope_core::{DynamicalSystem, StateVector};
use rand::Rng;

/// Where a system's trajectories start.
pub trait InitialConditions: DynamicalSystem {
    /// Canonical starting state.
    fn default_state(&self) -> StateVector;

    /// A random starting state from the system's sampling ranges.
    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector;

    /// Random parameters around the defaults. Systems whose interesting
    /// regime is narrow return the defaults.
    fn random_params<R: Rng>(&self, rng: &mut R) -> Self::Params;
}
