//! Aggregate observables computed on demand from trajectory states.

use chaoscope_core::state::{distance, norm, norm_sq};
use chaoscope_core::{DynamicalSystem, StateVector};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

/// Cross-trajectory summary statistics.
///
/// All values are in state-space units of the simulated system.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    /// Mean of ‖state‖² over trajectories.
    pub energy: f64,
    /// RMS distance of states from their mean; 0 for fewer than two.
    pub entropy: f64,
    /// Largest ‖state‖ (distance from the origin).
    pub max_distance: f64,
    /// Largest pairwise distance between trajectories.
    pub max_separation: f64,
    /// Mean ‖f(t, state)‖.
    pub avg_velocity: f64,
    /// Mean physical energy, for systems that define one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_energy: Option<f64>,
}

impl Aggregates {
    /// Values keyed by their serialized (camelCase) names, in field order.
    /// `physicalEnergy` is present only when defined.
    pub fn named(&self) -> IndexMap<&'static str, f64> {
        let mut map = IndexMap::with_capacity(6);
        map.insert("energy", self.energy);
        map.insert("entropy", self.entropy);
        map.insert("maxDistance", self.max_distance);
        map.insert("maxSeparation", self.max_separation);
        map.insert("avgVelocity", self.avg_velocity);
        if let Some(e) = self.physical_energy {
            map.insert("physicalEnergy", e);
        }
        map
    }
}

/// Derivative of `state` at time `t`.
pub fn velocity<S: DynamicalSystem>(system: &S, params: &S::Params, t: f64, state: &[f64]) -> StateVector {
    let mut out: StateVector = smallvec![0.0; state.len()];
    system.derivative(t, state, params, &mut out);
    out
}

/// ‖f(t, state)‖.
pub fn speed<S: DynamicalSystem>(system: &S, params: &S::Params, t: f64, state: &[f64]) -> f64 {
    norm(&velocity(system, params, t, state))
}

/// Compute every aggregate over `states`. An empty slice yields zeros.
pub fn compute<S: DynamicalSystem>(
    system: &S,
    params: &S::Params,
    t: f64,
    states: &[&[f64]],
) -> Aggregates {
    let n = states.len();
    if n == 0 {
        return Aggregates::default();
    }
    let inv_n = 1.0 / n as f64;

    let energy = states.iter().map(|s| norm_sq(s)).sum::<f64>() * inv_n;
    let max_distance = states.iter().map(|s| norm(s)).fold(0.0, f64::max);
    let avg_velocity = states
        .iter()
        .map(|s| speed(system, params, t, s))
        .sum::<f64>()
        * inv_n;

    let entropy = if n < 2 {
        0.0
    } else {
        let dim = states[0].len();
        let mut mean = vec![0.0; dim];
        for s in states {
            for (m, c) in mean.iter_mut().zip(s.iter()) {
                *m += c * inv_n;
            }
        }
        let spread = states
            .iter()
            .map(|s| {
                let d = distance(s, &mean);
                d * d
            })
            .sum::<f64>()
            * inv_n;
        spread.sqrt()
    };

    let mut max_separation = 0.0_f64;
    for (i, a) in states.iter().enumerate() {
        for b in &states[i + 1..] {
            max_separation = max_separation.max(distance(a, b));
        }
    }

    let physical_energy = states
        .iter()
        .map(|s| system.physical_energy(s, params))
        .sum::<Option<f64>>()
        .map(|total| total * inv_n);

    Aggregates {
        energy,
        entropy,
        max_distance,
        max_separation,
        avg_velocity,
        physical_energy,
    }
}
