//! Scenario presets: named, coloured sets of initial conditions.
//!
//! The classic demonstration of chaos is a handful of trajectories that
//! start almost on top of each other and separate exponentially; that is
//! what [`divergence`] builds. [`random_ensemble`] draws independent
//! starting points from each system's sampling ranges with a seeded
//! ChaCha generator, so presets are reproducible for a given seed.

use chaoscope_core::{StateVector, TrajectorySeed};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::InitialConditions;

/// Trajectory colours, cycled by index.
pub const PALETTE: [&str; 10] = [
    "#ff6b6b", "#4ecdc4", "#ffe66d", "#a29bfe", "#fd79a8", "#55efc4", "#fab1a0", "#74b9ff",
    "#e17055", "#dfe6e9",
];

/// Offset between neighbouring trajectories in [`default_scenario`].
pub const DEFAULT_SEPARATION: f64 = 1e-3;

/// Trajectory count in [`default_scenario`].
pub const DEFAULT_TRAJECTORIES: usize = 3;

/// Colour for the `index`-th trajectory.
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Display name for the `index`-th trajectory (1-based).
pub fn trajectory_name(index: usize) -> String {
    format!("Trajectory {}", index + 1)
}

/// `count` copies of `base`, the `k`-th shifted by `k·epsilon` in its
/// first component.
pub fn perturbed(base: &[f64], count: usize, epsilon: f64) -> Vec<StateVector> {
    (0..count)
        .map(|k| {
            let mut s = StateVector::from_slice(base);
            if let Some(first) = s.first_mut() {
                *first += k as f64 * epsilon;
            }
            s
        })
        .collect()
}

/// Nearly identical trajectories around the system's default state.
pub fn divergence<S: InitialConditions>(system: &S, count: usize, epsilon: f64) -> Vec<TrajectorySeed> {
    seeds(perturbed(&system.default_state(), count, epsilon))
}

/// `count` independent random starting points, reproducible per `seed`.
pub fn random_ensemble<S: InitialConditions>(system: &S, count: usize, seed: u64) -> Vec<TrajectorySeed> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    seeds((0..count).map(|_| system.random_state(&mut rng)))
}

/// Random parameters drawn from the system's sampling ranges.
pub fn random_params<S: InitialConditions>(system: &S, seed: u64) -> S::Params {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    system.random_params(&mut rng)
}

/// The scenario a freshly loaded system starts with.
pub fn default_scenario<S: InitialConditions>(system: &S) -> Vec<TrajectorySeed> {
    divergence(system, DEFAULT_TRAJECTORIES, DEFAULT_SEPARATION)
}

fn seeds(states: impl IntoIterator<Item = StateVector>) -> Vec<TrajectorySeed> {
    states
        .into_iter()
        .enumerate()
        .map(|(i, state)| TrajectorySeed::new(trajectory_name(i), palette_color(i), state))
        .collect()
}
