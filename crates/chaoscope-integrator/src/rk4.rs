//! Classical fourth-order Runge-Kutta.

use chaoscope_core::state::axpy;
use chaoscope_core::{DerivativeFn, StateVector};
use smallvec::smallvec;

/// Advance `state` by one RK4 step of size `dt` starting at time `t`.
///
/// Four derivative evaluations:
///
/// ```text
/// k1 = f(t,        y)
/// k2 = f(t + dt/2, y + dt/2·k1)
/// k3 = f(t + dt/2, y + dt/2·k2)
/// k4 = f(t + dt,   y + dt·k3)
/// y' = y + dt/6·(k1 + 2k2 + 2k3 + k4)
/// ```
///
/// Pure: neither `state` nor `f` is touched. Non-finite intermediate values
/// propagate into the result unchanged; detecting them is the caller's job.
pub fn rk4_step<F>(f: &F, params: &F::Params, t: f64, state: &[f64], dt: f64) -> StateVector
where
    F: DerivativeFn + ?Sized,
{
    let n = state.len();
    let half = 0.5 * dt;

    let mut k1: StateVector = smallvec![0.0; n];
    let mut k2: StateVector = smallvec![0.0; n];
    let mut k3: StateVector = smallvec![0.0; n];
    let mut k4: StateVector = smallvec![0.0; n];

    f.derivative(t, state, params, &mut k1);
    f.derivative(t + half, &axpy(state, half, &k1), params, &mut k2);
    f.derivative(t + half, &axpy(state, half, &k2), params, &mut k3);
    f.derivative(t + dt, &axpy(state, dt, &k3), params, &mut k4);

    let sixth = dt / 6.0;
    (0..n)
        .map(|i| state[i] + sixth * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]))
        .collect()
}
