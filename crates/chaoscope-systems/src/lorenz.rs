//! The Lorenz convection model.

use chaoscope_core::{
    Domain, DerivativeFn, DynamicalSystem, ParamSpec, ParameterRecord, Position, StateVector,
    SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// `σ`, `ρ`, `β`.
#[derive(Clone, Debug, PartialEq)]
pub struct LorenzParams {
    /// Prandtl number.
    pub sigma: f64,
    /// Rayleigh number.
    pub rho: f64,
    /// Geometric factor.
    pub beta: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
        }
    }
}

impl ParameterRecord for LorenzParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("sigma", 10.0, Domain::AtLeast(0.1)).with_advisory(0.1, 50.0),
        ParamSpec::new("rho", 28.0, Domain::Positive).with_advisory(0.1, 100.0),
        ParamSpec::new("beta", 8.0 / 3.0, Domain::Positive).with_advisory(0.1, 10.0),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.sigma),
            1 => Some(self.rho),
            2 => Some(self.beta),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.sigma = value,
            1 => self.rho = value,
            2 => self.beta = value,
            _ => {}
        }
    }
}

/// `ẋ = σ(y − x)`, `ẏ = x(ρ − z) − y`, `ż = xy − βz`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lorenz;

impl DerivativeFn for Lorenz {
    type Params = LorenzParams;

    fn dimension(&self) -> usize {
        3
    }

    fn derivative(&self, _t: f64, s: &[f64], p: &LorenzParams, out: &mut [f64]) {
        let (x, y, z) = (s[0], s[1], s[2]);
        out[0] = p.sigma * (y - x);
        out[1] = x * (p.rho - z) - y;
        out[2] = x * y - p.beta * z;
    }
}

impl DynamicalSystem for Lorenz {
    fn kind(&self) -> SystemKind {
        SystemKind::Lorenz
    }

    fn position_dims(&self) -> usize {
        3
    }

    fn position(&self, state: &[f64], _params: &LorenzParams) -> Position {
        Position::from_slice(&state[..3])
    }
}

impl InitialConditions for Lorenz {
    fn default_state(&self) -> StateVector {
        smallvec![1.0, 1.0, 1.0]
    }

    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        smallvec![
            (rng.gen::<f64>() - 0.5) * 20.0,
            (rng.gen::<f64>() - 0.5) * 30.0,
            (rng.gen::<f64>() - 0.5) * 40.0 + 20.0,
        ]
    }

    fn random_params<R: Rng>(&self, rng: &mut R) -> LorenzParams {
        LorenzParams {
            sigma: 10.0 + (rng.gen::<f64>() - 0.5) * 2.0,
            rho: 28.0 + (rng.gen::<f64>() - 0.5) * 10.0,
            beta: 8.0 / 3.0 + (rng.gen::<f64>() - 0.5) * 0.5,
        }
    }
}
