//! The planar double pendulum.

use std::f64::consts::PI;

use chaoscope_core::{
    Domain, DerivativeFn, DynamicalSystem, ParamSpec, ParameterRecord, Position, StateVector,
    SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// Rod lengths, bob masses and gravity.
#[derive(Clone, Debug, PartialEq)]
pub struct DoublePendulumParams {
    /// Upper rod length.
    pub l1: f64,
    /// Lower rod length.
    pub l2: f64,
    /// Upper bob mass.
    pub m1: f64,
    /// Lower bob mass.
    pub m2: f64,
    /// Gravitational acceleration.
    pub g: f64,
}

impl Default for DoublePendulumParams {
    fn default() -> Self {
        Self {
            l1: 1.0,
            l2: 1.0,
            m1: 1.0,
            m2: 1.0,
            g: 9.81,
        }
    }
}

impl ParameterRecord for DoublePendulumParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("l1", 1.0, Domain::AtLeast(0.1)).with_advisory(0.1, 5.0),
        ParamSpec::new("l2", 1.0, Domain::AtLeast(0.1)).with_advisory(0.1, 5.0),
        ParamSpec::new("m1", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("m2", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("g", 9.81, Domain::AtLeast(0.0)).with_advisory(0.0, 30.0),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.l1),
            1 => Some(self.l2),
            2 => Some(self.m1),
            3 => Some(self.m2),
            4 => Some(self.g),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.l1 = value,
            1 => self.l2 = value,
            2 => self.m1 = value,
            3 => self.m2 = value,
            4 => self.g = value,
            _ => {}
        }
    }
}

/// State `(θ1, ω1, θ2, ω2)` with angles measured from the downward vertical.
///
/// The render position is the lower bob `(x2, y2)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoublePendulum;

impl DoublePendulum {
    /// Cartesian positions of both bobs, `(x1, y1, x2, y2)`, y pointing up.
    pub fn bob_positions(state: &[f64], p: &DoublePendulumParams) -> [f64; 4] {
        let (th1, th2) = (state[0], state[2]);
        let x1 = p.l1 * th1.sin();
        let y1 = -p.l1 * th1.cos();
        let x2 = x1 + p.l2 * th2.sin();
        let y2 = y1 - p.l2 * th2.cos();
        [x1, y1, x2, y2]
    }
}

impl DerivativeFn for DoublePendulum {
    type Params = DoublePendulumParams;

    fn dimension(&self) -> usize {
        4
    }

    fn derivative(&self, _t: f64, s: &[f64], p: &DoublePendulumParams, out: &mut [f64]) {
        let (th1, w1, th2, w2) = (s[0], s[1], s[2], s[3]);
        let delta = th2 - th1;
        let (sin_d, cos_d) = delta.sin_cos();
        let m = p.m1 + p.m2;

        let den1 = m * p.l1 - p.m2 * p.l1 * cos_d * cos_d;
        let den2 = (p.l2 / p.l1) * den1;

        out[0] = w1;
        out[1] = (p.m2 * p.l1 * w1 * w1 * sin_d * cos_d
            + p.m2 * p.g * th2.sin() * cos_d
            + p.m2 * p.l2 * w2 * w2 * sin_d
            - m * p.g * th1.sin())
            / den1;
        out[2] = w2;
        out[3] = (-p.m2 * p.l2 * w2 * w2 * sin_d * cos_d
            + m * p.g * th1.sin() * cos_d
            - m * p.l1 * w1 * w1 * sin_d
            - m * p.g * th2.sin())
            / den2;
    }
}

impl DynamicalSystem for DoublePendulum {
    fn kind(&self) -> SystemKind {
        SystemKind::DoublePendulum
    }

    fn position_dims(&self) -> usize {
        2
    }

    fn position(&self, state: &[f64], params: &DoublePendulumParams) -> Position {
        let [_, _, x2, y2] = Self::bob_positions(state, params);
        smallvec![x2, y2]
    }

    fn physical_energy(&self, state: &[f64], p: &DoublePendulumParams) -> Option<f64> {
        let (th1, w1, th2, w2) = (state[0], state[1], state[2], state[3]);
        let [_, y1, _, y2] = Self::bob_positions(state, p);

        let v1x = p.l1 * w1 * th1.cos();
        let v1y = p.l1 * w1 * th1.sin();
        let v2x = v1x + p.l2 * w2 * th2.cos();
        let v2y = v1y + p.l2 * w2 * th2.sin();

        let kinetic = 0.5 * p.m1 * (v1x * v1x + v1y * v1y) + 0.5 * p.m2 * (v2x * v2x + v2y * v2y);
        let potential = p.m1 * p.g * y1 + p.m2 * p.g * y2;
        Some(kinetic + potential)
    }
}

impl InitialConditions for DoublePendulum {
    fn default_state(&self) -> StateVector {
        smallvec![PI / 2.0, 0.0, PI / 2.0, 0.0]
    }

    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        smallvec![
            (rng.gen::<f64>() - 0.5) * 2.0 * PI,
            (rng.gen::<f64>() - 0.5) * 10.0,
            (rng.gen::<f64>() - 0.5) * 2.0 * PI,
            (rng.gen::<f64>() - 0.5) * 10.0,
        ]
    }

    fn random_params<R: Rng>(&self, rng: &mut R) -> DoublePendulumParams {
        DoublePendulumParams {
            l1: 0.8 + rng.gen::<f64>() * 0.4,
            l2: 0.8 + rng.gen::<f64>() * 0.4,
            m1: 0.5 + rng.gen::<f64>(),
            m2: 0.5 + rng.gen::<f64>(),
            g: 9.81,
        }
    }
}
