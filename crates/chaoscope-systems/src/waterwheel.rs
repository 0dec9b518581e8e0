//! The Malkus waterwheel with discrete leaking buckets.

use std::f64::consts::TAU;

use chaoscope_core::{
    BoundaryPolicy, BoundaryRule, Domain, DerivativeFn, DynamicalSystem, ParamSpec,
    ParameterRecord, Position, StateVector, SystemKind,
};
use rand::Rng;
use smallvec::smallvec;

use crate::InitialConditions;

/// Bucket count used by [`Waterwheel::default`].
pub const DEFAULT_BUCKETS: usize = 20;

/// Inflow, leak and damping rates.
#[derive(Clone, Debug, PartialEq)]
pub struct WaterwheelParams {
    /// Inflow rate at the top of the wheel.
    pub q: f64,
    /// Per-bucket leak rate.
    pub k: f64,
    /// Rotational damping.
    pub nu: f64,
}

impl Default for WaterwheelParams {
    fn default() -> Self {
        Self {
            q: 2.5,
            k: 0.1,
            nu: 1.0,
        }
    }
}

impl ParameterRecord for WaterwheelParams {
    const SPECS: &'static [ParamSpec] = &[
        ParamSpec::new("Q", 2.5, Domain::AtLeast(0.0)).with_advisory(0.0, 10.0),
        ParamSpec::new("K", 0.1, Domain::Positive).with_advisory(0.01, 1.0),
        ParamSpec::new("nu", 1.0, Domain::AtLeast(0.0)).with_advisory(0.0, 5.0),
    ];

    fn get(&self, index: usize) -> Option<f64> {
        match index {
            0 => Some(self.q),
            1 => Some(self.k),
            2 => Some(self.nu),
            _ => None,
        }
    }

    fn set(&mut self, index: usize, value: f64) {
        match index {
            0 => self.q = value,
            1 => self.k = value,
            2 => self.nu = value,
            _ => {}
        }
    }
}

/// State `(ω, θ, m_0, …, m_{n−1})` for a wheel of `n` buckets.
///
/// Bucket `i` sits at angle `θ + 2πi/n`, measured from the top. Gravity
/// produces torque `Σ m_i·sin(angle_i)`; water enters buckets near the top
/// and leaks out of every bucket at rate `K·m_i`.
#[derive(Clone, Copy, Debug)]
pub struct Waterwheel {
    buckets: usize,
}

impl Default for Waterwheel {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS)
    }
}

impl Waterwheel {
    /// A wheel with `buckets` buckets (at least one).
    pub fn new(buckets: usize) -> Self {
        Self {
            buckets: buckets.max(1),
        }
    }

    /// Number of buckets.
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    fn bucket_angle(&self, theta: f64, i: usize) -> f64 {
        theta + TAU * i as f64 / self.buckets as f64
    }

    /// Inflow into a bucket at `angle`: a smooth bump centred on the top of
    /// the wheel, zero outside the top sector.
    fn inflow(&self, angle: f64, q: f64) -> f64 {
        let threshold = (TAU / self.buckets as f64).cos().abs();
        if angle.cos() > threshold {
            let x = angle.tan().atan();
            0.5 * q * ((self.buckets as f64 * x / 2.0).cos() + 1.0)
        } else {
            0.0
        }
    }
}

impl DerivativeFn for Waterwheel {
    type Params = WaterwheelParams;

    fn dimension(&self) -> usize {
        2 + self.buckets
    }

    fn derivative(&self, _t: f64, s: &[f64], p: &WaterwheelParams, out: &mut [f64]) {
        let (omega, theta) = (s[0], s[1]);
        let masses = &s[2..];

        let mut torque = 0.0;
        for (i, (m, dm)) in masses.iter().zip(&mut out[2..]).enumerate() {
            let angle = self.bucket_angle(theta, i);
            torque += m * angle.sin();
            *dm = self.inflow(angle, p.q) - p.k * m;
        }

        out[0] = torque - p.nu * omega;
        out[1] = omega;
    }
}

impl DynamicalSystem for Waterwheel {
    fn kind(&self) -> SystemKind {
        SystemKind::Waterwheel
    }

    fn position_dims(&self) -> usize {
        2
    }

    /// Centre of mass of the water on a unit-radius wheel, origin at the
    /// axle. An empty wheel projects to the axle.
    fn position(&self, state: &[f64], _params: &WaterwheelParams) -> Position {
        let theta = state[1];
        let (mut total, mut x, mut y) = (0.0, 0.0, 0.0);
        for (i, m) in state[2..].iter().enumerate() {
            let angle = self.bucket_angle(theta, i);
            total += m;
            x += m * angle.sin();
            y += m * angle.cos();
        }
        if total > 0.0 {
            smallvec![x / total, y / total]
        } else {
            smallvec![0.0, 0.0]
        }
    }

    fn boundary(&self) -> BoundaryPolicy {
        BoundaryPolicy::none().with_range(2..2 + self.buckets, BoundaryRule::NonNegative)
    }
}

impl InitialConditions for Waterwheel {
    fn default_state(&self) -> StateVector {
        let mut s: StateVector = smallvec![0.0; self.dimension()];
        s[0] = 0.1;
        s
    }

    fn random_state<R: Rng>(&self, rng: &mut R) -> StateVector {
        let mut s: StateVector = smallvec![0.0; self.dimension()];
        s[0] = rng.gen_range(0.01..0.3);
        s[1] = rng.gen_range(0.0..TAU);
        s
    }

    fn random_params<R: Rng>(&self, rng: &mut R) -> WaterwheelParams {
        WaterwheelParams {
            q: rng.gen_range(1.5..3.5),
            k: rng.gen_range(0.05..0.2),
            nu: rng.gen_range(0.5..1.5),
        }
    }
}
