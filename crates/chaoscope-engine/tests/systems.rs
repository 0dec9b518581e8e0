//! Integration test: the engine driving the built-in systems.
//!
//! Checks the qualitative behaviour each system is there to demonstrate
//! (divergence, bounded attractors, boundary policies, conserved energy)
//! plus history and telemetry wiring over long runs.

use chaoscope_engine::config::EngineConfig;
use chaoscope_engine::telemetry::{self, PublishOutcome};
use chaoscope_engine::Simulation;
use chaoscope_systems::presets::{default_scenario, divergence, random_ensemble};
use chaoscope_systems::{
    DoubleGyre, DoubleGyreParams, DoublePendulum, DoublePendulumParams, Lorenz, LorenzParams,
    Rossler, RosslerParams, ThreeBody, ThreeBodyParams, Waterwheel, WaterwheelParams,
};

fn lorenz(config: EngineConfig) -> Simulation<Lorenz> {
    Simulation::new(Lorenz, LorenzParams::default(), default_scenario(&Lorenz), config).unwrap()
}

#[test]
fn lorenz_neighbours_diverge() {
    let mut sim = lorenz(EngineConfig::default());
    let start = sim.aggregates();
    assert!(start.max_separation < 3e-3);

    sim.step(3000);
    let end = sim.aggregates();
    assert!(end.max_separation > 1.0, "{end:?}");
    assert!(end.entropy > start.entropy);
    assert!(!sim.is_unstable());
}

fn fine_lorenz(separation: f64) -> Simulation<Lorenz> {
    let config = EngineConfig {
        dt: 0.001,
        ..EngineConfig::default()
    };
    Simulation::new(Lorenz, LorenzParams::default(), divergence(&Lorenz, 2, separation), config)
        .unwrap()
}

#[test]
fn small_step_moves_a_short_distance() {
    let mut sim = fine_lorenz(1e-4);
    let before = sim.trajectories()[0].state().to_vec();
    assert_eq!(before, [1.0, 1.0, 1.0]);
    sim.step(1);
    let after = sim.trajectories()[0].state();
    let moved: f64 = before
        .iter()
        .zip(after)
        .map(|(a, b)| (a - b).powi(2))
        .sum::<f64>()
        .sqrt();
    assert!(moved > 0.0 && moved < 0.1, "moved {moved}");
}

#[test]
fn separation_grows_tenfold_over_ten_thousand_fine_steps() {
    let mut sim = fine_lorenz(1e-4);
    let second = sim.trajectories()[1].state();
    assert!((second[0] - 1.0001).abs() < 1e-15 && second[1..] == [1.0, 1.0]);
    let initial = sim.aggregates().max_separation;
    assert!((initial - 1e-4).abs() < 1e-12);

    sim.step(10_000);
    let end = sim.aggregates().max_separation;
    assert!(end > 10.0 * initial, "separation {end}");
}

#[test]
fn lorenz_stays_on_the_attractor() {
    let mut sim = lorenz(EngineConfig::default());
    sim.step(5000);
    for t in sim.trajectories() {
        assert!(t.state().iter().all(|c| c.abs() < 100.0), "{:?}", t.state());
        assert_eq!(t.health().recoveries, 0);
    }
}

#[test]
fn runs_are_deterministic() {
    let mut a = lorenz(EngineConfig::default());
    let mut b = lorenz(EngineConfig::default());
    a.step(700);
    b.step(700);
    for (x, y) in a.trajectories().iter().zip(b.trajectories()) {
        assert_eq!(x.state(), y.state());
    }
}

#[test]
fn rossler_stays_bounded() {
    let mut sim = Simulation::new(
        Rossler,
        RosslerParams::default(),
        default_scenario(&Rossler),
        EngineConfig::default(),
    )
    .unwrap();
    sim.step(5000);
    for t in sim.trajectories() {
        assert!(t.state().iter().all(|c| c.is_finite() && c.abs() < 100.0));
    }
}

#[test]
fn double_gyre_particles_stay_in_the_domain() {
    let mut sim = Simulation::new(
        DoubleGyre,
        DoubleGyreParams::default(),
        random_ensemble(&DoubleGyre, 10, 42),
        EngineConfig::default(),
    )
    .unwrap();
    sim.step(2000);
    for t in sim.trajectories() {
        let s = t.state();
        assert!((0.0..2.0).contains(&s[0]), "{s:?}");
        assert!((0.0..=1.0).contains(&s[1]), "{s:?}");
    }
}

#[test]
fn waterwheel_bucket_masses_never_go_negative() {
    let wheel = Waterwheel::new(8);
    let mut sim = Simulation::new(
        wheel.clone(),
        WaterwheelParams::default(),
        default_scenario(&wheel),
        EngineConfig::default(),
    )
    .unwrap();
    for _ in 0..20 {
        sim.step(100);
        for t in sim.trajectories() {
            assert!(t.state()[2..].iter().all(|m| *m >= 0.0), "{:?}", t.state());
        }
    }
}

#[test]
fn pendulum_reports_physical_energy() {
    let mut sim = Simulation::new(
        DoublePendulum,
        DoublePendulumParams::default(),
        default_scenario(&DoublePendulum),
        EngineConfig {
            dt: 0.001,
            ..Default::default()
        },
    )
    .unwrap();
    // Both arms start horizontal, so the total is close to zero.
    let before = sim.aggregates().physical_energy.unwrap();
    sim.step(1000);
    let after = sim.aggregates().physical_energy.unwrap();
    assert!((after - before).abs() < 1e-3, "{before} -> {after}");
}

#[test]
fn three_body_energy_is_roughly_conserved() {
    let mut sim = Simulation::new(
        ThreeBody,
        ThreeBodyParams::default(),
        divergence(&ThreeBody, 1, 0.0),
        EngineConfig::default(),
    )
    .unwrap();
    let before = sim.aggregates().physical_energy.unwrap();
    sim.step(2000);
    let after = sim.aggregates().physical_energy.unwrap();
    assert!(((after - before) / before).abs() < 1e-4, "{before} -> {after}");
}

#[test]
fn history_columns_line_up_with_times() {
    let mut config = EngineConfig::default();
    config.history.enabled = true;
    config.history.sample_every = 10;
    let mut sim = lorenz(config);
    sim.step(100);

    let times = sim.history().times();
    assert_eq!(times.len(), 10);
    let columns = sim.history().aggregate_columns();
    assert_eq!(columns["energy"].len(), 10);
    assert_eq!(columns["maxSeparation"].len(), 10);
    assert!(!columns.contains_key("physicalEnergy"));
}

#[test]
fn history_capacity_is_enforced() {
    let mut config = EngineConfig::default();
    config.history.enabled = true;
    config.history.sample_every = 1;
    config.history.capacity = 16;
    let mut sim = lorenz(config);
    sim.step(100);
    assert_eq!(sim.history().len(), 16);
    assert_eq!(sim.history().samples().next().map(|s| s.step_count), Some(85));
}

#[test]
fn telemetry_publishes_on_schedule_and_drops_when_full() {
    let mut sim = lorenz(EngineConfig::default());
    let (mut publisher, receiver) = telemetry::channel(4, 10);

    let mut outcomes = Vec::new();
    for _ in 0..50 {
        sim.step(1);
        outcomes.push(publisher.offer(&sim));
    }
    let sent = outcomes.iter().filter(|o| **o == PublishOutcome::Sent).count();
    let dropped = outcomes.iter().filter(|o| **o == PublishOutcome::Dropped).count();
    assert_eq!((sent, dropped), (4, 1));
    assert_eq!(publisher.dropped(), 1);

    let steps: Vec<u64> = receiver.drain().iter().map(|s| s.data.step_count).collect();
    assert_eq!(steps, [10, 20, 30, 40]);
}

#[test]
fn telemetry_snapshot_serializes_camel_case() {
    let mut sim = lorenz(EngineConfig::default());
    sim.step(1);
    let json = serde_json::to_value(sim.telemetry_snapshot()).unwrap();
    assert_eq!(json["simulationId"], "lorenz-attractor");
    assert_eq!(json["simulationName"], "Lorenz Attractor");
    assert_eq!(json["data"]["stepCount"], 1);
    assert_eq!(json["data"]["bodies"].as_array().map(Vec::len), Some(3));
}

#[test]
fn trails_respect_point_budget() {
    let mut config = EngineConfig::default();
    config.trail.point_budget = Some(900);
    let mut sim = lorenz(config);
    sim.step(2000);
    assert!(sim.trails().total_points() <= 900);
}
