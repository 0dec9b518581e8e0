//! Planar three-body gravity with Plummer softening.

use chaoscope_core::{
    Domain, DerivativeFn, DynamicalSystem, ParamSpec, ParameterRecord, Position, StateVector,
    SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// Components per body: `(x, y, vx, vy)`.
const STRIDE: usize = 4;

/// Gravitational constant, masses and softening length.
#[derive(Clone, Debug, PartialEq)]
pub struct ThreeBodyParams {
    /// Gravitational constant.
    pub g: f64,
    /// Body masses.
    pub masses: [f64; 3],
    /// Plummer softening length; keeps close encounters finite.
    pub softening: f64,
}

impl Default for ThreeBodyParams {
    fn default() -> Self {
        Self {
            g: 1.0,
            masses: [1.0; 3],
            softening: 0.01,
        }
    }
}

impl ParameterRecord for ThreeBodyParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("G", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("m1", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("m2", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("m3", 1.0, Domain::Positive).with_advisory(0.1, 10.0),
        ParamSpec::new("softening", 0.01, Domain::AtLeast(0.0)).with_advisory(0.0, 0.5),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.g),
            1..=3 => Some(self.masses[index - 1]),
            4 => Some(self.softening),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.g = value,
            1..=3 => self.masses[index - 1] = value,
            4 => self.softening = value,
            _ => {}
        }
    }
}

/// Chenciner–Montgomery figure-eight choreography for equal unit masses
/// with `G = 1`.
pub fn figure_eight() -> StateVector {
    let (x1, y1) = (-0.970_004_36, 0.243_087_53);
    let (vx3, vy3) = (-0.932_407_37, -0.864_731_46);
    smallvec![
        x1, y1, -vx3 / 2.0, -vy3 / 2.0,
        -x1, -y1, -vx3 / 2.0, -vy3 / 2.0,
        0.0, 0.0, vx3, vy3,
    ]
}

/// State `(x, y, vx, vy)` for each of three bodies, 12 components.
///
/// The render position is the flattened `(x, y)` of all three bodies.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreeBody;

impl DerivativeFn for ThreeBody {
    type Params = ThreeBodyParams;

    fn dimension(&self) -> usize {
        3 * STRIDE
    }

    fn derivative(&self, _t: f64, s: &[f64], p: &ThreeBodyParams, out: &mut [f64]) {
        let eps2 = p.softening * p.softening;
        for i in 0..3 {
            let bi = i * STRIDE;
            out[bi] = s[bi + 2];
            out[bi + 1] = s[bi + 3];

            let (mut ax, mut ay) = (0.0, 0.0);
            for j in (0..3).filter(|&j| j != i) {
                let bj = j * STRIDE;
                let dx = s[bj] - s[bi];
                let dy = s[bj + 1] - s[bi + 1];
                let r2 = dx * dx + dy * dy + eps2;
                let inv_r3 = 1.0 / (r2 * r2.sqrt());
                ax += p.g * p.masses[j] * dx * inv_r3;
                ay += p.g * p.masses[j] * dy * inv_r3;
            }
            out[bi + 2] = ax;
            out[bi + 3] = ay;
        }
    }
}

impl DynamicalSystem for ThreeBody {
    fn kind(&self) -> SystemKind {
        SystemKind::ThreeBody
    }

    fn position_dims(&self) -> usize {
        6
    }

    fn position(&self, state: &[f64], _params: &ThreeBodyParams) -> Position {
        (0..3)
            .flat_map(|i| [state[i * STRIDE], state[i * STRIDE + 1]])
            .collect()
    }

    /// Kinetic energy plus the softened pairwise potential
    /// `−G·m_i·m_j / √(r² + ε²)`, which the softened force conserves.
    fn physical_energy(&self, s: &[f64], p: &ThreeBodyParams) -> Option<f64> {
        let eps2 = p.softening * p.softening;
        let mut kinetic = 0.0;
        let mut potential = 0.0;
        for i in 0..3 {
            let bi = i * STRIDE;
            kinetic += 0.5 * p.masses[i] * (s[bi + 2] * s[bi + 2] + s[bi + 3] * s[bi + 3]);
            for j in i + 1..3 {
                let bj = j * STRIDE;
                let dx = s[bj] - s[bi];
                let dy = s[bj + 1] - s[bi + 1];
                potential -= p.g * p.masses[i] * p.masses[j] / (dx * dx + dy * dy + eps2).sqrt();
            }
        }
        Some(kinetic + potential)
    }
}

impl InitialConditions for ThreeBody {
    fn default_state(&self) -> StateVector {
        figure_eight()
    }

    /// The figure-eight with every component nudged by up to ±0.05.
    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        figure_eight()
            .iter()
            .map(|c| c + rng.gen_range(-0.05..0.05))
            .collect()
    }

    fn random_params<R: Rng>(&self, _rng: &mut R) -> ThreeBodyParams {
        ThreeBodyParams::default()
    }
}
