//! Benchmark profiles for the chaoscope engine.
//!
//! Provides pre-built simulations for benchmarks and profiling:
//!
//! - [`reference_profile`]: Lorenz, 10 random trajectories
//! - [`stress_profile`]: 64-bucket waterwheel, 32 trajectories
//! - [`ensemble`]: any system with a seeded random ensemble

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use chaoscope_engine::{ConfigError, EngineConfig, Simulation};
use chaoscope_systems::presets::random_ensemble;
use chaoscope_systems::{InitialConditions, Lorenz, LorenzParams, Waterwheel, WaterwheelParams};

/// `count` random trajectories of `system`, reproducible per `seed`.
///
/// The trajectory cap is raised to `count` if needed.
pub fn ensemble<S: InitialConditions>(
    system: S,
    params: S::Params,
    count: usize,
    seed: u64,
) -> Result<Simulation<S>, ConfigError> {
    let seeds = random_ensemble(&system, count, seed);
    let config = EngineConfig {
        max_trajectories: count.max(EngineConfig::default().max_trajectories),
        ..Default::default()
    };
    Simulation::new(system, params, seeds, config)
}

/// Reference profile: Lorenz attractor, 10 trajectories, RK4, dt 0.01.
pub fn reference_profile(seed: u64) -> Result<Simulation<Lorenz>, ConfigError> {
    ensemble(Lorenz, LorenzParams::default(), 10, seed)
}

/// Stress profile: a 64-bucket waterwheel (66-dimensional state) with 32
/// trajectories.
pub fn stress_profile(seed: u64) -> Result<Simulation<Waterwheel>, ConfigError> {
    ensemble(Waterwheel::new(64), WaterwheelParams::default(), 32, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoscope_core::DerivativeFn;

    #[test]
    fn profiles_build() {
        let r = reference_profile(1).unwrap();
        assert_eq!(r.trajectories().len(), 10);

        let s = stress_profile(1).unwrap();
        assert_eq!(s.trajectories().len(), 32);
        assert_eq!(s.system().dimension(), 66);
    }
}
