//! The time-periodic double-gyre flow on `[0, 2] × [0, 1]`.

use std::f64::consts::PI;

use chaoscope_core::{
    BoundaryPolicy, BoundaryRule, Domain, DerivativeFn, DynamicalSystem, ParamSpec,
    ParameterRecord, Position, StateVector, SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// Width of the flow domain.
pub const DOMAIN_WIDTH: f64 = 2.0;
/// Height of the flow domain.
pub const DOMAIN_HEIGHT: f64 = 1.0;

/// `A`, `ε`, `ω`.
#[derive(Clone, Debug, PartialEq)]
pub struct DoubleGyreParams {
    /// Velocity amplitude.
    pub amplitude: f64,
    /// Oscillation amplitude of the gyre separatrix, in `[0, 1]`.
    pub epsilon: f64,
    /// Angular frequency of the oscillation.
    pub omega: f64,
}

impl Default for DoubleGyreParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            epsilon: 0.25,
            omega: 0.5,
        }
    }
}

impl ParameterRecord for DoubleGyreParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("A", 0.1, Domain::Positive).with_advisory(0.01, 1.0),
        ParamSpec::new("epsilon", 0.25, Domain::Within(0.0, 1.0)),
        ParamSpec::new("omega", 0.5, Domain::Positive).with_advisory(0.01, 10.0),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.amplitude),
            1 => Some(self.epsilon),
            2 => Some(self.omega),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.amplitude = value,
            1 => self.epsilon = value,
            2 => self.omega = value,
            _ => {}
        }
    }
}

/// Velocity field
///
/// ```text
/// f(x, t) = a(t)·x² + b(t)·x,   a = ε·sin(ωt),   b = 1 − 2ε·sin(ωt)
/// u = −πA·sin(πf)·cos(πy)
/// v =  πA·cos(πf)·sin(πy)·∂f/∂x
/// ```
///
/// `x` wraps periodically across the domain width and `y` reflects at the
/// top and bottom walls.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleGyre;

impl DerivativeFn for DoubleGyre {
    type Params = DoubleGyreParams;

    fn dimension(&self) -> usize {
        2
    }

    fn derivative(&self, t: f64, s: &[f64], p: &DoubleGyreParams, out: &mut [f64]) {
        let (x, y) = (s[0], s[1]);
        let sin_wt = (p.omega * t).sin();
        let a = p.epsilon * sin_wt;
        let b = 1.0 - 2.0 * p.epsilon * sin_wt;
        let f = a * x * x + b * x;
        let dfdx = 2.0 * a * x + b;

        out[0] = -PI * p.amplitude * (PI * f).sin() * (PI * y).cos();
        out[1] = PI * p.amplitude * (PI * f).cos() * (PI * y).sin() * dfdx;
    }
}

impl DynamicalSystem for DoubleGyre {
    fn kind(&self) -> SystemKind {
        SystemKind::DoubleGyre
    }

    fn position_dims(&self) -> usize {
        2
    }

    fn position(&self, state: &[f64], _params: &DoubleGyreParams) -> Position {
        Position::from_slice(&state[..2])
    }

    fn boundary(&self) -> BoundaryPolicy {
        BoundaryPolicy::none()
            .with(
                0,
                BoundaryRule::Periodic {
                    min: 0.0,
                    max: DOMAIN_WIDTH,
                },
            )
            .with(
                1,
                BoundaryRule::Reflect {
                    min: 0.0,
                    max: DOMAIN_HEIGHT,
                },
            )
    }
}

impl InitialConditions for DoubleGyre {
    fn default_state(&self) -> StateVector {
        smallvec![0.5, 0.5]
    }

    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        smallvec![
            rng.gen::<f64>() * DOMAIN_WIDTH,
            rng.gen::<f64>() * DOMAIN_HEIGHT
        ]
    }

    fn random_params<R: Rng>(&self, rng: &mut R) -> DoubleGyreParams {
        DoubleGyreParams {
            amplitude: 0.1 + (rng.gen::<f64>() - 0.5) * 0.05,
            epsilon: 0.25 + (rng.gen::<f64>() - 0.5) * 0.1,
            omega: 0.5 + (rng.gen::<f64>() - 0.5) * 0.3,
        }
    }
}
