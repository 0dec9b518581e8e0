//! Synthetic systems for engine testing.
//!
//! - [`ConstantDerivative`]: `dy/dt = c`, so every integrator is exact.
//! - [`Exponential`]: `dy/dt = k·y`, for driving states past the clamp limit.
//! - [`NanAfterCalls`]: fails deterministically after N evaluations.
//! - [`NanRegion`]: drifts along `x` and turns non-finite past a threshold.
//!
//! All of them take `()` as their parameter record and report themselves
//! as [`SystemKind::Lorenz`] unless told otherwise.

use std::sync::atomic::{AtomicUsize, Ordering};

use chaoscope_core::{DerivativeFn, DynamicalSystem, Position, StateVector, SystemKind};

fn leading_position(state: &[f64]) -> Position {
    Position::from_slice(&state[..state.len().min(3)])
}

// ── ConstantDerivative ─────────────────────────────────────────────

/// `dy/dt = rate`, independent of time and state.
#[derive(Clone, Debug, PartialEq)]
pub struct ConstantDerivative {
    pub rate: StateVector,
    pub kind: SystemKind,
}

impl ConstantDerivative {
    pub fn new(rate: &[f64]) -> Self {
        Self {
            rate: StateVector::from_slice(rate),
            kind: SystemKind::Lorenz,
        }
    }

    /// Report a different catalogue entry, e.g. to test import mismatches.
    pub fn with_kind(mut self, kind: SystemKind) -> Self {
        self.kind = kind;
        self
    }
}

impl DerivativeFn for ConstantDerivative {
    type Params = ();

    fn dimension(&self) -> usize {
        self.rate.len()
    }

    fn derivative(&self, _t: f64, _state: &[f64], _params: &(), out: &mut [f64]) {
        out.copy_from_slice(&self.rate);
    }
}

impl DynamicalSystem for ConstantDerivative {
    fn kind(&self) -> SystemKind {
        self.kind
    }

    fn position_dims(&self) -> usize {
        self.rate.len().min(3)
    }

    fn position(&self, state: &[f64], _params: &()) -> Position {
        leading_position(state)
    }
}

// ── Exponential ────────────────────────────────────────────────────

/// `dy/dt = rate·y` in every component.
#[derive(Clone, Debug, PartialEq)]
pub struct Exponential {
    pub dim: usize,
    pub rate: f64,
}

impl Exponential {
    pub fn new(dim: usize, rate: f64) -> Self {
        Self { dim, rate }
    }
}

impl DerivativeFn for Exponential {
    type Params = ();

    fn dimension(&self) -> usize {
        self.dim
    }

    fn derivative(&self, _t: f64, state: &[f64], _params: &(), out: &mut [f64]) {
        for (o, y) in out.iter_mut().zip(state) {
            *o = self.rate * y;
        }
    }
}

impl DynamicalSystem for Exponential {
    fn kind(&self) -> SystemKind {
        SystemKind::Lorenz
    }

    fn position_dims(&self) -> usize {
        self.dim.min(3)
    }

    fn position(&self, state: &[f64], _params: &()) -> Position {
        leading_position(state)
    }
}

// ── NanAfterCalls ──────────────────────────────────────────────────

/// Unit drift for the first `succeed_count` derivative evaluations, NaN
/// afterwards.
///
/// The counter is shared by every trajectory and every integrator stage
/// (RK4 evaluates four times per step, Euler once). Uses an atomic so the
/// fixture stays `Send`.
#[derive(Debug)]
pub struct NanAfterCalls {
    pub dim: usize,
    pub succeed_count: usize,
    call_count: AtomicUsize,
}

impl NanAfterCalls {
    pub fn new(dim: usize, succeed_count: usize) -> Self {
        Self {
            dim,
            succeed_count,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Evaluations so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl DerivativeFn for NanAfterCalls {
    type Params = ();

    fn dimension(&self) -> usize {
        self.dim
    }

    fn derivative(&self, _t: f64, _state: &[f64], _params: &(), out: &mut [f64]) {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        let value = if n >= self.succeed_count { f64::NAN } else { 1.0 };
        out.fill(value);
    }
}

impl DynamicalSystem for NanAfterCalls {
    fn kind(&self) -> SystemKind {
        SystemKind::Lorenz
    }

    fn position_dims(&self) -> usize {
        self.dim.min(3)
    }

    fn position(&self, state: &[f64], _params: &()) -> Position {
        leading_position(state)
    }
}

// ── NanRegion ──────────────────────────────────────────────────────

/// `dx/dt = 1` (other components still) while `x < threshold`, NaN
/// everywhere once `x >= threshold`.
///
/// A trajectory that starts past the threshold never produces a valid
/// step; one that starts before it runs cleanly until it crosses.
#[derive(Clone, Debug, PartialEq)]
pub struct NanRegion {
    pub dim: usize,
    pub threshold: f64,
}

impl NanRegion {
    pub fn new(dim: usize, threshold: f64) -> Self {
        Self { dim, threshold }
    }
}

impl DerivativeFn for NanRegion {
    type Params = ();

    fn dimension(&self) -> usize {
        self.dim
    }

    fn derivative(&self, _t: f64, state: &[f64], _params: &(), out: &mut [f64]) {
        if state[0] >= self.threshold {
            out.fill(f64::NAN);
        } else {
            out.fill(0.0);
            out[0] = 1.0;
        }
    }
}

impl DynamicalSystem for NanRegion {
    fn kind(&self) -> SystemKind {
        SystemKind::Lorenz
    }

    fn position_dims(&self) -> usize {
        self.dim.min(3)
    }

    fn position(&self, state: &[f64], _params: &()) -> Position {
        leading_position(state)
    }
}
