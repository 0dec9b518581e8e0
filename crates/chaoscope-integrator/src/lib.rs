//! Fixed-step ODE integrators.
//!
//! Every integrator is a pure function `(f, params, t, y, dt) -> y'` generic
//! over [`DerivativeFn`]. The [`Integrator`] enum selects one at runtime
//! from engine configuration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod euler;
pub mod rk4;

pub use euler::euler_step;
pub use rk4::rk4_step;

use chaoscope_core::{DerivativeFn, StateVector};
use serde::{Deserialize, Serialize};

/// Integration scheme used by a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Integrator {
    /// Classical fourth-order Runge-Kutta.
    #[default]
    Rk4,
    /// Forward Euler.
    Euler,
}

impl Integrator {
    /// Advance `state` by one step of size `dt` starting at `t`.
    pub fn step<F>(self, f: &F, params: &F::Params, t: f64, state: &[f64], dt: f64) -> StateVector
    where
        F: DerivativeFn + ?Sized,
    {
        match self {
            Integrator::Rk4 => rk4_step(f, params, t, state, dt),
            Integrator::Euler => euler_step(f, params, t, state, dt),
        }
    }

    /// Derivative evaluations per step.
    pub fn evaluations(self) -> u32 {
        match self {
            Integrator::Rk4 => 4,
            Integrator::Euler => 1,
        }
    }

    /// Order of accuracy.
    pub fn order(self) -> u32 {
        match self {
            Integrator::Rk4 => 4,
            Integrator::Euler => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    struct Rotation;

    impl DerivativeFn for Rotation {
        type Params = ();
        fn dimension(&self) -> usize {
            2
        }
        fn derivative(&self, _t: f64, s: &[f64], _p: &(), out: &mut [f64]) {
            out[0] = -s[1];
            out[1] = s[0];
        }
    }

    #[test]
    fn default_is_rk4() {
        assert_eq!(Integrator::default(), Integrator::Rk4);
        assert_eq!(Integrator::default().evaluations(), 4);
    }

    #[test]
    fn rk4_beats_euler_on_rotation() {
        let radius_drift = |scheme: Integrator| {
            let mut y: StateVector = StateVector::from_slice(&[1.0, 0.0]);
            for i in 0..1000 {
                y = scheme.step(&Rotation, &(), i as f64 * 0.01, &y, 0.01);
            }
            (y[0].hypot(y[1]) - 1.0).abs()
        };
        assert!(radius_drift(Integrator::Rk4) < 1e-8);
        assert!(radius_drift(Integrator::Euler) > 1e-3);
    }

    proptest! {
        #[test]
        fn zero_dt_is_identity_for_both(x in -1e3f64..1e3, y in -1e3f64..1e3) {
            for scheme in [Integrator::Rk4, Integrator::Euler] {
                let out = scheme.step(&Rotation, &(), 0.0, &[x, y], 0.0);
                prop_assert_eq!(out.as_slice(), &[x, y]);
            }
        }
    }
}
