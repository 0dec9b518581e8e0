//! Explicit (forward) Euler. First order, one evaluation per step.

use chaoscope_core::state::axpy;
use chaoscope_core::{DerivativeFn, StateVector};
use smallvec::smallvec;

/// Advance `state` by `dt` using `y' = y + dt·f(t, y)`.
pub fn euler_step<F>(f: &F, params: &F::Params, t: f64, state: &[f64], dt: f64) -> StateVector
where
    F: DerivativeFn + ?Sized,
{
    let mut k: StateVector = smallvec![0.0; state.len()];
    f.derivative(t, state, params, &mut k);
    axpy(state, dt, &k)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Drift;

    impl DerivativeFn for Drift {
        type Params = ();
        fn dimension(&self) -> usize {
            2
        }
        fn derivative(&self, _t: f64, _state: &[f64], _p: &(), out: &mut [f64]) {
            out[0] = 1.0;
            out[1] = -2.0;
        }
    }

    #[test]
    fn constant_field_moves_linearly() {
        let y = euler_step(&Drift, &(), 0.0, &[0.0, 0.0], 0.5);
        assert_eq!(y.as_slice(), &[0.5, -1.0]);
    }
}
