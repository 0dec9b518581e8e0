//! Capability traits implemented by every simulated system.
//!
//! [`DerivativeFn`] is all an integrator needs: the right-hand side of
//! `dy/dt = f(t, y; p)`. [`DynamicalSystem`] adds what the engine needs on
//! top of that to manage trajectories (identity, render projection,
//! boundary policy, optional physical energy).

use crate::boundary::BoundaryPolicy;
use crate::id::SystemKind;
use crate::params::ParameterRecord;
use crate::state::Position;

/// The right-hand side of an ODE system.
///
/// Implementations must be pure: the same `(t, state, params)` always
/// produces the same derivative, with no interior mutation visible to the
/// integrator. Autonomous systems ignore `t`.
pub trait DerivativeFn {
    /// Parameter record consumed by [`derivative`](Self::derivative).
    type Params: ParameterRecord;

    /// Number of state components.
    fn dimension(&self) -> usize;

    /// Write `f(t, state; params)` into `out`.
    ///
    /// Both slices have length [`dimension`](Self::dimension).
    fn derivative(&self, t: f64, state: &[f64], params: &Self::Params, out: &mut [f64]);
}

/// A simulated system the engine can drive.
pub trait DynamicalSystem: DerivativeFn + Send + 'static {
    /// Which catalogue entry this is.
    fn kind(&self) -> SystemKind;

    /// Human-readable name used in exports and telemetry.
    fn display_name(&self) -> &'static str {
        self.kind().display_name()
    }

    /// Length of the vectors returned by [`position`](Self::position).
    fn position_dims(&self) -> usize;

    /// Project a state into render space.
    fn position(&self, state: &[f64], params: &Self::Params) -> Position;

    /// Rules applied to each accepted state. Default: unconstrained.
    fn boundary(&self) -> BoundaryPolicy {
        BoundaryPolicy::none()
    }

    /// Conserved mechanical energy, for systems where that is meaningful.
    fn physical_energy(&self, _state: &[f64], _params: &Self::Params) -> Option<f64> {
        None
    }
}

impl<T: DerivativeFn + ?Sized> DerivativeFn for &T {
    type Params = T::Params;

    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn derivative(&self, t: f64, state: &[f64], params: &Self::Params, out: &mut [f64]) {
        (**self).derivative(t, state, params, out)
    }
}
