//! The Rössler attractor.

use chaoscope_core::{
    Domain, DerivativeFn, DynamicalSystem, ParamSpec, ParameterRecord, Position, StateVector,
    SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// `a`, `b`, `c`.
#[derive(Clone, Debug, PartialEq)]
pub struct RosslerParams {
    /// Linear feedback on `y`.
    pub a: f64,
    /// Constant forcing on `z`.
    pub b: f64,
    /// Threshold of the `z` nonlinearity.
    pub c: f64,
}

impl Default for RosslerParams {
    fn default() -> Self {
        Self {
            a: 0.2,
            b: 0.2,
            c: 5.7,
        }
    }
}

impl ParameterRecord for RosslerParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("a", 0.2, Domain::Any).with_advisory(0.0, 0.5),
        ParamSpec::new("b", 0.2, Domain::Any).with_advisory(0.0, 2.0),
        ParamSpec::new("c", 5.7, Domain::Positive).with_advisory(1.0, 20.0),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.a),
            1 => Some(self.b),
            2 => Some(self.c),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.a = value,
            1 => self.b = value,
            2 => self.c = value,
            _ => {}
        }
    }
}

/// `ẋ = −y − z`, `ẏ = x + ay`, `ż = b + z(x − c)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rossler;

impl DerivativeFn for Rossler {
    type Params = RosslerParams;

    fn dimension(&self) -> usize {
        3
    }

    fn derivative(&self, _t: f64, s: &[f64], p: &RosslerParams, out: &mut [f64]) {
        let (x, y, z) = (s[0], s[1], s[2]);
        out[0] = -y - z;
        out[1] = x + p.a * y;
        out[2] = p.b + z * (x - p.c);
    }
}

impl DynamicalSystem for Rossler {
    fn kind(&self) -> SystemKind {
        SystemKind::Rossler
    }

    fn position_dims(&self) -> usize {
        3
    }

    fn position(&self, state: &[f64], _params: &RosslerParams) -> Position {
        Position::from_slice(&state[..3])
    }
}

impl InitialConditions for Rossler {
    fn default_state(&self) -> StateVector {
        smallvec![1.0, 1.0, 0.1]
    }

    // z starts slightly positive so the orbit lands on the attractor.
    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        smallvec![
            (rng.gen::<f64>() - 0.5) * 3.0,
            (rng.gen::<f64>() - 0.5) * 3.0,
            0.1 + rng.gen::<f64>() * 0.5,
        ]
    }

    fn random_params<R: Rng>(&self, _rng: &mut R) -> RosslerParams {
        RosslerParams::default()
    }
}
