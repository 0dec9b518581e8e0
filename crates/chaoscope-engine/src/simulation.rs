//! The trajectory/state manager.
//!
//! [`Simulation`] owns every trajectory of one dynamical system together
//! with its parameters, clock, trails, checkpoints and history. It is
//! driven synchronously: the caller decides how many ticks to run per
//! frame with [`step`](Simulation::step) and reads observables in between.
//!
//! One tick:
//!
//! 1. integrate every trajectory from the same `(t, dt)`;
//! 2. run each candidate through the safety net: non-finite results are
//!    reverted, out-of-range results are clamped;
//! 3. apply the system's boundary policy to accepted states and record a
//!    trail point for each;
//! 4. advance the clock (always, even when every trajectory reverted);
//! 5. checkpoint after enough consecutive fully accepted ticks, update the
//!    instability flag, and sample history when due.

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use chaoscope_core::{
    BoundaryPolicy, DynamicalSystem, EngineError, ParamWarning, ParameterRecord, Position,
    StateVector, SystemKind, TrajectoryId, TrajectorySeed,
};
use chaoscope_trail::{Trail, TrailStore};
use tracing::{debug, info, warn};

use crate::checkpoint::{Checkpoint, CheckpointRing};
use crate::config::{ConfigError, EngineConfig};
use crate::history::{History, HistorySample};
use crate::metrics::StepMetrics;
use crate::observables::{self, Aggregates};
use crate::safety::{self, TrajectoryHealth, Verdict};
use crate::telemetry::{TelemetryBody, TelemetryData, TelemetrySnapshot};

// ── Trajectory ─────────────────────────────────────────────────────

/// One independently integrated state plus its identity.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    id: TrajectoryId,
    name: String,
    color: String,
    state: StateVector,
    initial: StateVector,
    health: TrajectoryHealth,
}

impl Trajectory {
    /// Stable identifier. Adding trajectories never reuses an id;
    /// [`replace_trajectories`](Simulation::replace_trajectories) keeps
    /// pinned ids and numbers the rest after them.
    pub fn id(&self) -> TrajectoryId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display colour.
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Current state.
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// State restored by [`Simulation::reset`].
    pub fn initial_state(&self) -> &[f64] {
        &self.initial
    }

    /// Safety-net counters.
    pub fn health(&self) -> &TrajectoryHealth {
        &self.health
    }
}

// ── StepReport ─────────────────────────────────────────────────────

/// Stability signal carried by every [`StepReport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stability {
    /// No trajectory has reached the failure threshold.
    Stable,
    /// A trajectory produced too many consecutive non-finite steps.
    Unstable {
        /// The trajectory with the longest failure streak.
        trajectory: TrajectoryId,
        /// Its consecutive failures when the flag was last raised.
        consecutive: u32,
    },
}

/// Result of one [`Simulation::step`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Ticks executed (0 while paused).
    pub ticks: u64,
    /// Stability after the last tick.
    pub stability: Stability,
    /// Timing and safety counters for this call.
    pub metrics: StepMetrics,
}

// ── Simulation ─────────────────────────────────────────────────────

/// A running simulation of system `S`.
pub struct Simulation<S: DynamicalSystem> {
    system: S,
    params: S::Params,
    config: EngineConfig,
    boundary: BoundaryPolicy,
    dt: f64,
    trajectories: Vec<Trajectory>,
    next_id: u32,
    time: f64,
    step_count: u64,
    paused: bool,
    trails: TrailStore,
    checkpoints: CheckpointRing,
    accepted_streak: u64,
    instability: Option<(TrajectoryId, u32)>,
    history: History,
    warnings: VecDeque<ParamWarning>,
    last_metrics: StepMetrics,
}

impl<S: DynamicalSystem> Simulation<S> {
    /// Build a simulation from initial trajectories.
    ///
    /// The configuration is validated first. Parameters and `dt` are
    /// corrected rather than rejected; the resulting warnings are available
    /// from [`warnings`](Self::warnings). Every seed must match the
    /// system's dimension and be finite.
    pub fn new(
        system: S,
        params: S::Params,
        seeds: Vec<TrajectorySeed>,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if seeds.is_empty() {
            return Err(ConfigError::NoTrajectories);
        }
        if seeds.len() > config.max_trajectories {
            return Err(ConfigError::Seed {
                index: config.max_trajectories,
                source: EngineError::TrajectoryLimit {
                    max: config.max_trajectories,
                },
            });
        }
        let dim = system.dimension();
        for (index, seed) in seeds.iter().enumerate() {
            check_state(dim, &seed.state).map_err(|source| ConfigError::Seed { index, source })?;
        }
        if let Some((index, id)) = duplicate_id(&seeds) {
            return Err(ConfigError::Seed {
                index,
                source: EngineError::DuplicateId { id },
            });
        }

        let (params, mut warnings) = params.validated();
        let dt = config.time_step.validate(config.dt);
        warnings.extend(dt.warnings);

        let mut sim = Self {
            boundary: system.boundary(),
            system,
            params,
            dt: dt.value,
            trajectories: Vec::with_capacity(seeds.len()),
            next_id: first_free_id(&seeds),
            time: 0.0,
            step_count: 0,
            paused: config.start_paused,
            trails: TrailStore::new(config.trail.clone()),
            checkpoints: CheckpointRing::new(config.safety.checkpoint_capacity),
            accepted_streak: 0,
            instability: None,
            history: History::new(config.history.clone()),
            warnings: VecDeque::new(),
            last_metrics: StepMetrics::default(),
            config,
        };
        for seed in seeds {
            sim.push_trajectory(seed);
        }
        sim.record_warnings(&warnings);
        debug!(
            system = sim.system.kind().slug(),
            trajectories = sim.trajectories.len(),
            dt = sim.dt,
            "simulation created"
        );
        Ok(sim)
    }

    /// Seeds without a pinned id take the next free one. Callers have
    /// already rejected duplicates.
    fn push_trajectory(&mut self, seed: TrajectorySeed) -> TrajectoryId {
        let id = seed.id.unwrap_or(TrajectoryId(self.next_id));
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        self.trails.insert(id, seed.color.clone());
        self.trajectories.push(Trajectory {
            id,
            name: seed.name,
            color: seed.color,
            initial: seed.state.clone(),
            state: seed.state,
            health: TrajectoryHealth::default(),
        });
        id
    }

    fn record_warnings(&mut self, warnings: &[ParamWarning]) {
        let cap = self.config.max_warnings;
        for w in warnings {
            self.warnings.push_back(w.clone());
        }
        while self.warnings.len() > cap {
            self.warnings.pop_front();
        }
    }

    // ── Stepping ───────────────────────────────────────────────────

    /// Run `n` ticks. Does nothing while paused.
    pub fn step(&mut self, n: u64) -> StepReport {
        if self.paused || n == 0 {
            return StepReport {
                ticks: 0,
                stability: self.stability(),
                metrics: StepMetrics::default(),
            };
        }
        let start = Instant::now();
        let mut metrics = StepMetrics::default();
        for _ in 0..n {
            self.tick(&mut metrics);
        }
        metrics.total_us = start.elapsed().as_micros() as u64;
        self.last_metrics = metrics.clone();
        StepReport {
            ticks: n,
            stability: self.stability(),
            metrics,
        }
    }

    fn tick(&mut self, metrics: &mut StepMetrics) {
        let integrate_start = Instant::now();
        let t = self.time;
        let dt = self.dt;
        let limit = self.config.safety.state_limit;
        let integrator = self.config.integrator;
        let mut all_accepted = true;

        // 1–3. Integrate, inspect, constrain, record.
        for traj in &mut self.trajectories {
            let candidate = integrator.step(&self.system, &self.params, t, &traj.state, dt);
            metrics.derivative_evaluations += u64::from(integrator.evaluations());

            match safety::inspect(candidate, limit) {
                Verdict::Reject { component } => {
                    traj.health.record_invalid();
                    all_accepted = false;
                    metrics.recoveries += 1;
                    debug!(
                        trajectory = %traj.id,
                        component,
                        consecutive = traj.health.consecutive_invalid,
                        "non-finite step reverted"
                    );
                }
                Verdict::Accept { mut state, clamped } => {
                    if clamped > 0 {
                        metrics.clamps += 1;
                        debug!(trajectory = %traj.id, clamped, limit, "state clamped");
                    }
                    self.boundary.apply(&mut state);
                    traj.state = state;
                    traj.health.record_accepted(clamped > 0);
                    let position = self.system.position(&traj.state, &self.params);
                    self.trails.add_point(traj.id, position);
                }
            }
        }
        metrics.integration_us += integrate_start.elapsed().as_micros() as u64;

        let bookkeeping_start = Instant::now();

        // 4. Clock.
        self.time += dt;
        self.step_count += 1;

        // 5. Checkpoints, stability, history.
        if all_accepted {
            self.accepted_streak += 1;
            if self.accepted_streak >= self.config.safety.checkpoint_interval {
                self.save_checkpoint();
                self.accepted_streak = 0;
                metrics.checkpoints_saved += 1;
            }
        } else {
            self.accepted_streak = 0;
        }
        self.update_stability(all_accepted);
        if self.history.is_due(self.step_count) {
            let sample = self.history_sample();
            self.history.record(sample);
        }

        metrics.bookkeeping_us += bookkeeping_start.elapsed().as_micros() as u64;
    }

    fn save_checkpoint(&mut self) {
        let checkpoint = Checkpoint {
            step_count: self.step_count,
            time: self.time,
            states: self
                .trajectories
                .iter()
                .map(|t| (t.id, t.state.clone()))
                .collect(),
        };
        self.checkpoints.push(checkpoint);
        debug!(step = self.step_count, "checkpoint saved");
    }

    fn worst_offender(&self) -> Option<(TrajectoryId, u32)> {
        let threshold = self.config.safety.max_consecutive_failures;
        self.trajectories
            .iter()
            .filter(|t| t.health.consecutive_invalid >= threshold)
            .max_by_key(|t| t.health.consecutive_invalid)
            .map(|t| (t.id, t.health.consecutive_invalid))
    }

    fn update_stability(&mut self, all_accepted: bool) {
        match self.worst_offender() {
            Some((id, consecutive)) => {
                if self.instability.is_none() {
                    warn!(
                        trajectory = %id,
                        consecutive,
                        step = self.step_count,
                        "simulation unstable: repeated non-finite steps"
                    );
                }
                self.instability = Some((id, consecutive));
            }
            None if all_accepted => self.instability = None,
            None => {}
        }
    }

    fn history_sample(&self) -> HistorySample {
        HistorySample {
            time: self.time,
            step_count: self.step_count,
            aggregates: self.aggregates(),
            positions: self
                .trajectories
                .iter()
                .map(|t| (t.id, self.system.position(&t.state, &self.params)))
                .collect(),
        }
    }

    /// Current stability signal.
    pub fn stability(&self) -> Stability {
        match self.instability {
            Some((trajectory, consecutive)) => Stability::Unstable {
                trajectory,
                consecutive,
            },
            None => Stability::Stable,
        }
    }

    /// Whether the instability flag is raised.
    pub fn is_unstable(&self) -> bool {
        self.instability.is_some()
    }

    // ── Playback ───────────────────────────────────────────────────

    /// Resume stepping.
    pub fn play(&mut self) {
        self.paused = false;
    }

    /// Make [`step`](Self::step) a no-op until [`play`](Self::play).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Whether stepping is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Restore every trajectory to its initial state and zero the clock.
    ///
    /// Trails, checkpoints, history and safety counters are cleared; the
    /// play/pause state and parameters are kept.
    pub fn reset(&mut self) {
        for t in &mut self.trajectories {
            t.state = t.initial.clone();
            t.health = TrajectoryHealth::default();
        }
        self.time = 0.0;
        self.step_count = 0;
        self.trails.clear_all();
        self.checkpoints.clear();
        self.history.clear();
        self.accepted_streak = 0;
        self.instability = None;
        debug!("simulation reset");
    }

    /// Roll states and clock back to the latest checkpoint.
    ///
    /// Trajectories added after the checkpoint keep their current state.
    /// Clears the instability flag and failure streaks. Returns the
    /// restored step count.
    pub fn restore_checkpoint(&mut self) -> Result<u64, EngineError> {
        let checkpoint = self
            .checkpoints
            .latest()
            .cloned()
            .ok_or(EngineError::NoCheckpoint)?;
        for (id, state) in &checkpoint.states {
            if let Some(t) = self.trajectories.iter_mut().find(|t| t.id == *id) {
                t.state = state.clone();
            }
        }
        for t in &mut self.trajectories {
            t.health.clear_streak();
        }
        self.time = checkpoint.time;
        self.step_count = checkpoint.step_count;
        self.accepted_streak = 0;
        self.instability = None;
        info!(
            step = checkpoint.step_count,
            time = checkpoint.time,
            "restored checkpoint"
        );
        Ok(checkpoint.step_count)
    }

    // ── Trajectory set ─────────────────────────────────────────────

    /// Add a trajectory starting at `state`.
    pub fn add_trajectory(
        &mut self,
        state: StateVector,
        color: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<TrajectoryId, EngineError> {
        if self.trajectories.len() >= self.config.max_trajectories {
            return Err(EngineError::TrajectoryLimit {
                max: self.config.max_trajectories,
            });
        }
        check_state(self.system.dimension(), &state)?;
        let id = self.push_trajectory(TrajectorySeed::new(name, color, state));
        debug!(trajectory = %id, "trajectory added");
        Ok(id)
    }

    /// Remove the trajectory at `index` along with its trail.
    pub fn remove_trajectory(&mut self, index: usize) -> Result<Trajectory, EngineError> {
        let len = self.trajectories.len();
        if index >= len {
            return Err(EngineError::IndexOutOfRange { index, len });
        }
        if len == 1 {
            return Err(EngineError::LastTrajectory);
        }
        let removed = self.trajectories.remove(index);
        self.trails.remove(removed.id);
        debug!(trajectory = %removed.id, "trajectory removed");
        Ok(removed)
    }

    /// Check a replacement trajectory set without touching the simulation.
    pub fn validate_seeds(&self, seeds: &[TrajectorySeed]) -> Result<(), EngineError> {
        if seeds.is_empty() {
            return Err(EngineError::NoTrajectories);
        }
        if seeds.len() > self.config.max_trajectories {
            return Err(EngineError::TrajectoryLimit {
                max: self.config.max_trajectories,
            });
        }
        let dim = self.system.dimension();
        seeds.iter().try_for_each(|s| check_state(dim, &s.state))?;
        match duplicate_id(seeds) {
            Some((_, id)) => Err(EngineError::DuplicateId { id }),
            None => Ok(()),
        }
    }

    /// Replace every trajectory, as when loading a preset or a saved
    /// state. Seeds with a pinned id keep it; the rest are numbered after
    /// the largest pinned id (from zero if none is pinned), in order.
    /// Trails, checkpoints, history and the instability flag are cleared;
    /// the clock is left alone.
    ///
    /// On error nothing changes.
    pub fn replace_trajectories(&mut self, seeds: Vec<TrajectorySeed>) -> Result<(), EngineError> {
        self.validate_seeds(&seeds)?;
        self.trajectories.clear();
        self.trails.remove_all();
        self.next_id = first_free_id(&seeds);
        for seed in seeds {
            self.push_trajectory(seed);
        }
        self.checkpoints.clear();
        self.history.clear();
        self.accepted_streak = 0;
        self.instability = None;
        Ok(())
    }

    /// Set the clock, e.g. when loading a saved state. A non-finite time
    /// is replaced by zero.
    pub fn set_clock(&mut self, time: f64, step_count: u64) {
        self.time = if time.is_finite() { time } else { 0.0 };
        self.step_count = step_count;
    }

    // ── Parameters ─────────────────────────────────────────────────

    /// Validate and install new parameters. States and clock are kept.
    pub fn set_parameters(&mut self, params: S::Params) -> Vec<ParamWarning> {
        let (params, warnings) = params.validated();
        self.params = params;
        self.record_warnings(&warnings);
        warnings
    }

    /// Validate and install a single parameter by name.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> Result<Vec<ParamWarning>, EngineError> {
        let index = S::Params::index_of(name).ok_or_else(|| EngineError::UnknownParameter {
            name: name.to_string(),
        })?;
        let spec = &S::Params::SPECS[index];
        let validated = spec.validate(value);
        self.params.set(index, validated.value);
        self.record_warnings(&validated.warnings);
        Ok(validated.warnings)
    }

    /// Validate and install a new time step.
    pub fn set_time_step(&mut self, dt: f64) -> Vec<ParamWarning> {
        let validated = self.config.time_step.validate(dt);
        self.dt = validated.value;
        self.record_warnings(&validated.warnings);
        validated.warnings
    }

    /// Change the maximum trail length, trimming existing trails.
    pub fn set_trail_length(&mut self, max_length: usize) {
        self.trails.set_max_length(max_length);
        self.config.trail.max_length = max_length.max(1);
    }

    /// Retained parameter warnings, oldest first.
    pub fn warnings(&self) -> impl ExactSizeIterator<Item = &ParamWarning> + '_ {
        self.warnings.iter()
    }

    /// Drain retained parameter warnings.
    pub fn take_warnings(&mut self) -> Vec<ParamWarning> {
        self.warnings.drain(..).collect()
    }

    // ── Observables ────────────────────────────────────────────────

    /// Aggregate observables over all trajectories.
    pub fn aggregates(&self) -> Aggregates {
        let states: Vec<&[f64]> = self.trajectories.iter().map(|t| t.state()).collect();
        observables::compute(&self.system, &self.params, self.time, &states)
    }

    /// The flow `f(t, state)` for an arbitrary state, e.g. for drawing a
    /// velocity field.
    pub fn velocity_at(&self, t: f64, state: &[f64]) -> Result<StateVector, EngineError> {
        check_dimension(self.system.dimension(), state)?;
        Ok(observables::velocity(&self.system, &self.params, t, state))
    }

    /// Derivative magnitude of a trajectory at the current time.
    pub fn speed(&self, id: TrajectoryId) -> Option<f64> {
        self.trajectory(id)
            .map(|t| observables::speed(&self.system, &self.params, self.time, &t.state))
    }

    /// Render position of a trajectory.
    pub fn position(&self, id: TrajectoryId) -> Option<Position> {
        self.trajectory(id)
            .map(|t| self.system.position(&t.state, &self.params))
    }

    /// State of the first trajectory, the one handed to predictors.
    pub fn representative_state(&self) -> Option<&[f64]> {
        self.trajectories.first().map(|t| t.state())
    }

    /// Payload for an external telemetry sender.
    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        let agg = self.aggregates();
        TelemetrySnapshot {
            simulation_id: self.system.kind().slug().to_string(),
            simulation_name: self.system.display_name().to_string(),
            data: TelemetryData {
                time: self.time,
                step_count: self.step_count,
                energy: agg.energy,
                entropy: agg.entropy,
                bodies: self
                    .trajectories
                    .iter()
                    .map(|t| TelemetryBody {
                        id: t.id,
                        position: self.system.position(&t.state, &self.params),
                        velocity: observables::speed(&self.system, &self.params, self.time, &t.state),
                    })
                    .collect(),
            },
        }
    }

    // ── Accessors ──────────────────────────────────────────────────

    /// The simulated system.
    pub fn system(&self) -> &S {
        &self.system
    }

    /// Which catalogue entry is simulated.
    pub fn kind(&self) -> SystemKind {
        self.system.kind()
    }

    /// Active (validated) parameters.
    pub fn params(&self) -> &S::Params {
        &self.params
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Active time step.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Simulation time.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks completed since construction or reset.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Every trajectory, in creation order.
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// Look up a trajectory by id.
    pub fn trajectory(&self, id: TrajectoryId) -> Option<&Trajectory> {
        self.trajectories.iter().find(|t| t.id == id)
    }

    /// A trajectory's trail.
    pub fn trail(&self, id: TrajectoryId) -> Option<&Trail> {
        self.trails.get(id)
    }

    /// Every trail.
    pub fn trails(&self) -> &TrailStore {
        &self.trails
    }

    /// Retained checkpoints.
    pub fn checkpoints(&self) -> &CheckpointRing {
        &self.checkpoints
    }

    /// Recorded history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Metrics from the most recent non-empty [`step`](Self::step).
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }
}

impl<S: DynamicalSystem> fmt::Debug for Simulation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("kind", &self.system.kind())
            .field("params", &self.params)
            .field("dt", &self.dt)
            .field("time", &self.time)
            .field("step_count", &self.step_count)
            .field("trajectories", &self.trajectories.len())
            .field("paused", &self.paused)
            .field("unstable", &self.is_unstable())
            .finish()
    }
}

fn check_dimension(expected: usize, state: &[f64]) -> Result<(), EngineError> {
    if state.len() != expected {
        return Err(EngineError::DimensionMismatch {
            expected,
            got: state.len(),
        });
    }
    Ok(())
}

/// One past the largest pinned id, so unpinned seeds never collide.
fn first_free_id(seeds: &[TrajectorySeed]) -> u32 {
    seeds
        .iter()
        .filter_map(|s| s.id)
        .map(|id| id.0.saturating_add(1))
        .max()
        .unwrap_or(0)
}

/// First seed whose pinned id repeats an earlier one.
fn duplicate_id(seeds: &[TrajectorySeed]) -> Option<(usize, TrajectoryId)> {
    let mut seen = std::collections::HashSet::new();
    seeds
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.id.map(|id| (i, id)))
        .find(|(_, id)| !seen.insert(*id))
}

fn check_state(expected: usize, state: &[f64]) -> Result<(), EngineError> {
    check_dimension(expected, state)?;
    match state.iter().position(|c| !c.is_finite()) {
        Some(index) => Err(EngineError::NonFiniteState { index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaoscope_core::WarningKind;
    use chaoscope_systems::presets::default_scenario;
    use chaoscope_systems::{Lorenz, LorenzParams};
    use chaoscope_test_utils::{ConstantDerivative, NanRegion};
    use smallvec::smallvec;
    use tracing_test::traced_test;

    // Simulation must be movable to another thread.
    const _: fn() = || {
        fn assert<T: Send>() {}
        assert::<Simulation<Lorenz>>();
    };

    fn lorenz() -> Simulation<Lorenz> {
        Simulation::new(
            Lorenz,
            LorenzParams::default(),
            default_scenario(&Lorenz),
            EngineConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn construction_rejects_empty_seed_list() {
        let err = Simulation::new(Lorenz, LorenzParams::default(), vec![], EngineConfig::default())
            .unwrap_err();
        assert_eq!(err, ConfigError::NoTrajectories);
    }

    #[test]
    fn construction_rejects_bad_seed() {
        let seeds = vec![
            TrajectorySeed::new("a", "#fff", smallvec![1.0, 1.0, 1.0]),
            TrajectorySeed::new("b", "#fff", smallvec![1.0, 1.0]),
        ];
        let err = Simulation::new(Lorenz, LorenzParams::default(), seeds, EngineConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Seed {
                index: 1,
                source: EngineError::DimensionMismatch {
                    expected: 3,
                    got: 2
                }
            }
        );
    }

    #[test]
    fn construction_corrects_params_and_dt() {
        let config = EngineConfig {
            dt: -0.5,
            ..Default::default()
        };
        let params = LorenzParams {
            sigma: f64::NAN,
            ..Default::default()
        };
        let sim = Simulation::new(Lorenz, params, default_scenario(&Lorenz), config).unwrap();
        assert_eq!(sim.params().sigma, 10.0);
        assert_eq!(sim.dt(), 0.01);
        let kinds: Vec<WarningKind> = sim.warnings().map(|w| w.kind).collect();
        assert_eq!(kinds, [WarningKind::NonFinite, WarningKind::OutOfDomain]);
    }

    #[test]
    fn step_advances_clock() {
        let mut sim = lorenz();
        let report = sim.step(5);
        assert_eq!(report.ticks, 5);
        assert_eq!(sim.step_count(), 5);
        assert!((sim.time() - 0.05).abs() < 1e-12);
        assert_eq!(report.stability, Stability::Stable);
        assert_eq!(report.metrics.derivative_evaluations, 5 * 3 * 4);
    }

    #[test]
    fn paused_step_is_noop() {
        let mut sim = lorenz();
        sim.pause();
        let before: Vec<StateVector> = sim.trajectories().iter().map(|t| t.state.clone()).collect();
        let report = sim.step(10);
        assert_eq!(report.ticks, 0);
        assert_eq!(sim.step_count(), 0);
        let after: Vec<StateVector> = sim.trajectories().iter().map(|t| t.state.clone()).collect();
        assert_eq!(before, after);
        sim.play();
        assert_eq!(sim.step(1).ticks, 1);
    }

    #[test]
    fn start_paused_config() {
        let config = EngineConfig {
            start_paused: true,
            ..Default::default()
        };
        let sim = Simulation::new(Lorenz, LorenzParams::default(), default_scenario(&Lorenz), config)
            .unwrap();
        assert!(sim.is_paused());
    }

    #[test]
    fn trails_record_each_accepted_step() {
        let mut sim = lorenz();
        sim.step(7);
        for t in sim.trajectories() {
            assert_eq!(sim.trail(t.id()).map(Trail::len), Some(7));
        }
    }

    #[test]
    fn reset_restores_initial_conditions() {
        let mut sim = lorenz();
        let initial: Vec<StateVector> = sim.trajectories().iter().map(|t| t.state.clone()).collect();
        sim.step(50);
        sim.reset();
        let now: Vec<StateVector> = sim.trajectories().iter().map(|t| t.state.clone()).collect();
        assert_eq!(initial, now);
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.trails().total_points(), 0);
        assert!(sim.checkpoints().is_empty());
    }

    #[test]
    fn add_trajectory_respects_limit() {
        let config = EngineConfig {
            max_trajectories: 4,
            ..Default::default()
        };
        let mut sim =
            Simulation::new(Lorenz, LorenzParams::default(), default_scenario(&Lorenz), config).unwrap();
        let id = sim.add_trajectory(smallvec![2.0, 2.0, 2.0], "#123456", "extra").unwrap();
        assert_eq!(id, TrajectoryId(3));
        assert_eq!(
            sim.add_trajectory(smallvec![2.0, 2.0, 2.0], "#123456", "overflow"),
            Err(EngineError::TrajectoryLimit { max: 4 })
        );
        assert_eq!(sim.trajectories().len(), 4);
    }

    #[test]
    fn add_trajectory_validates_state() {
        let mut sim = lorenz();
        assert_eq!(
            sim.add_trajectory(smallvec![1.0], "#fff", "short"),
            Err(EngineError::DimensionMismatch {
                expected: 3,
                got: 1
            })
        );
        assert_eq!(
            sim.add_trajectory(smallvec![1.0, f64::NAN, 0.0], "#fff", "nan"),
            Err(EngineError::NonFiniteState { index: 1 })
        );
    }

    #[test]
    fn remove_trajectory_rules() {
        let mut sim = lorenz();
        assert_eq!(
            sim.remove_trajectory(7).unwrap_err(),
            EngineError::IndexOutOfRange { index: 7, len: 3 }
        );
        sim.step(3);
        let removed = sim.remove_trajectory(1).unwrap();
        assert_eq!(removed.id(), TrajectoryId(1));
        assert!(sim.trail(TrajectoryId(1)).is_none());
        sim.remove_trajectory(0).unwrap();
        assert_eq!(sim.remove_trajectory(0).unwrap_err(), EngineError::LastTrajectory);
        assert_eq!(sim.trajectories().len(), 1);
    }

    #[test]
    fn ids_are_not_reused() {
        let mut sim = lorenz();
        sim.remove_trajectory(2).unwrap();
        let id = sim.add_trajectory(smallvec![0.5, 0.5, 0.5], "#fff", "new").unwrap();
        assert_eq!(id, TrajectoryId(3));
    }

    #[test]
    fn set_parameters_keeps_state_and_clock() {
        let mut sim = lorenz();
        sim.step(10);
        let state = sim.trajectories()[0].state.clone();
        let warnings = sim.set_parameters(LorenzParams {
            rho: -1.0,
            ..Default::default()
        });
        assert_eq!(warnings.len(), 1);
        assert_eq!(sim.params().rho, 28.0);
        assert_eq!(sim.trajectories()[0].state, state);
        assert_eq!(sim.step_count(), 10);
    }

    #[test]
    fn set_parameter_by_name() {
        let mut sim = lorenz();
        assert!(sim.set_parameter("rho", 99.0).unwrap().is_empty());
        assert_eq!(sim.params().rho, 99.0);
        assert_eq!(
            sim.set_parameter("gamma", 1.0),
            Err(EngineError::UnknownParameter {
                name: "gamma".into()
            })
        );
    }

    #[test]
    fn set_time_step_warns_on_advisory() {
        let mut sim = lorenz();
        let w = sim.set_time_step(0.5);
        assert_eq!(sim.dt(), 0.5);
        assert_eq!(w[0].kind, WarningKind::Advisory);
        sim.set_time_step(0.0);
        assert_eq!(sim.dt(), 0.01);
    }

    #[test]
    fn warnings_are_bounded() {
        let config = EngineConfig {
            max_warnings: 3,
            ..Default::default()
        };
        let mut sim =
            Simulation::new(Lorenz, LorenzParams::default(), default_scenario(&Lorenz), config).unwrap();
        for _ in 0..5 {
            sim.set_time_step(-1.0);
        }
        assert_eq!(sim.warnings().len(), 3);
        assert_eq!(sim.take_warnings().len(), 3);
        assert_eq!(sim.warnings().len(), 0);
    }

    #[test]
    fn set_trail_length_trims() {
        let mut sim = lorenz();
        sim.step(20);
        sim.set_trail_length(5);
        assert_eq!(sim.trail(TrajectoryId(0)).map(Trail::len), Some(5));
        assert_eq!(sim.config().trail.max_length, 5);
    }

    #[test]
    fn velocity_at_checks_dimension() {
        let sim = lorenz();
        let v = sim.velocity_at(0.0, &[1.0, 2.0, 3.0]).unwrap();
        let expected = [10.0, 23.0, -6.0];
        for (got, want) in v.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{v:?}");
        }
        assert!(sim.velocity_at(0.0, &[1.0]).is_err());
    }

    #[test]
    fn representative_is_first_trajectory() {
        let sim = lorenz();
        assert_eq!(sim.representative_state(), Some(&[1.0, 1.0, 1.0][..]));
    }

    #[test]
    fn telemetry_snapshot_lists_bodies() {
        let mut sim = lorenz();
        sim.step(3);
        let snap = sim.telemetry_snapshot();
        assert_eq!(snap.simulation_id, "lorenz-attractor");
        assert_eq!(snap.data.step_count, 3);
        assert_eq!(snap.data.bodies.len(), 3);
        assert_eq!(snap.data.bodies[0].position.len(), 3);
    }

    #[test]
    fn replace_trajectories_is_atomic() {
        let mut sim = lorenz();
        sim.step(5);
        let bad = vec![TrajectorySeed::new("x", "#fff", smallvec![1.0, 2.0])];
        assert!(sim.replace_trajectories(bad).is_err());
        assert_eq!(sim.trajectories().len(), 3);
        assert_eq!(sim.trails().total_points(), 15);

        let good = vec![TrajectorySeed::new("x", "#fff", smallvec![1.0, 2.0, 3.0])];
        sim.replace_trajectories(good).unwrap();
        assert_eq!(sim.trajectories().len(), 1);
        assert_eq!(sim.trajectories()[0].id(), TrajectoryId(0));
        assert_eq!(sim.trails().len(), 1);
        assert_eq!(sim.trails().total_points(), 0);
        assert_eq!(sim.replace_trajectories(vec![]), Err(EngineError::NoTrajectories));
    }

    #[test]
    fn replace_trajectories_keeps_pinned_ids() {
        let mut sim = lorenz();
        let seeds = vec![
            TrajectorySeed::new("a", "#fff", smallvec![1.0, 1.0, 1.0]).with_id(TrajectoryId(4)),
            TrajectorySeed::new("b", "#fff", smallvec![2.0, 1.0, 1.0]),
            TrajectorySeed::new("c", "#fff", smallvec![3.0, 1.0, 1.0]).with_id(TrajectoryId(0)),
        ];
        sim.replace_trajectories(seeds).unwrap();
        let ids: Vec<TrajectoryId> = sim.trajectories().iter().map(Trajectory::id).collect();
        assert_eq!(ids, [TrajectoryId(4), TrajectoryId(5), TrajectoryId(0)]);
        assert!(sim.trail(TrajectoryId(4)).is_some());

        let added = sim.add_trajectory(smallvec![0.0, 1.0, 1.0], "#000", "d").unwrap();
        assert_eq!(added, TrajectoryId(6));
    }

    #[test]
    fn duplicate_pinned_ids_are_rejected() {
        let mut sim = lorenz();
        let seeds = vec![
            TrajectorySeed::new("a", "#fff", smallvec![1.0, 1.0, 1.0]).with_id(TrajectoryId(2)),
            TrajectorySeed::new("b", "#fff", smallvec![2.0, 1.0, 1.0]).with_id(TrajectoryId(2)),
        ];
        assert_eq!(
            sim.replace_trajectories(seeds.clone()),
            Err(EngineError::DuplicateId { id: TrajectoryId(2) })
        );
        assert_eq!(sim.trajectories().len(), 3);

        match Simulation::new(Lorenz, LorenzParams::default(), seeds, EngineConfig::default()) {
            Err(ConfigError::Seed { index: 1, source }) => {
                assert_eq!(source, EngineError::DuplicateId { id: TrajectoryId(2) });
            }
            other => panic!("expected a duplicate-id seed error, got {other:?}"),
        }
    }

    #[test]
    fn history_sampled_when_enabled() {
        let mut config = EngineConfig::default();
        config.history.enabled = true;
        config.history.sample_every = 5;
        let mut sim =
            Simulation::new(Lorenz, LorenzParams::default(), default_scenario(&Lorenz), config).unwrap();
        sim.step(20);
        assert_eq!(sim.history().len(), 4);
        assert_eq!(sim.history().times().len(), 4);
    }

    fn stuck_and_free() -> Simulation<NanRegion> {
        let seeds = vec![
            TrajectorySeed::new("stuck", "#f00", smallvec![5.0, 0.0]),
            TrajectorySeed::new("free", "#0f0", smallvec![-100.0, 0.0]),
        ];
        Simulation::new(NanRegion::new(2, 1.0), (), seeds, EngineConfig::default()).unwrap()
    }

    #[test]
    #[traced_test]
    fn escalation_warns_once_on_transition() {
        let mut sim = stuck_and_free();
        assert_eq!(sim.step(4).stability, Stability::Stable);
        assert_eq!(
            sim.step(1).stability,
            Stability::Unstable {
                trajectory: TrajectoryId(0),
                consecutive: 5
            }
        );
        sim.step(3);
        assert_eq!(
            sim.stability(),
            Stability::Unstable {
                trajectory: TrajectoryId(0),
                consecutive: 8
            }
        );
        logs_assert(|lines: &[&str]| {
            let n = lines
                .iter()
                .filter(|l| l.contains("simulation unstable"))
                .count();
            match n {
                1 => Ok(()),
                n => Err(format!("expected one instability warning, saw {n}")),
            }
        });
    }

    #[test]
    #[traced_test]
    fn reverted_steps_are_logged() {
        let mut sim = stuck_and_free();
        sim.step(1);
        assert!(logs_contain("non-finite step reverted"));
    }

    #[test]
    fn instability_clears_once_every_trajectory_is_accepted() {
        let mut sim = stuck_and_free();
        sim.step(6);
        assert!(sim.is_unstable());
        sim.remove_trajectory(0).unwrap();
        assert_eq!(sim.step(1).stability, Stability::Stable);
    }

    #[test]
    #[traced_test]
    fn restore_is_logged() {
        let seeds = vec![TrajectorySeed::new("a", "#fff", smallvec![0.0, 0.0])];
        let mut sim =
            Simulation::new(ConstantDerivative::new(&[1.0, 0.0]), (), seeds, EngineConfig::default())
                .unwrap();
        sim.step(10);
        assert_eq!(sim.restore_checkpoint(), Ok(10));
        assert!(logs_contain("restored checkpoint"));
    }

    #[test]
    fn debug_output_is_compact() {
        let text = format!("{:?}", lorenz());
        assert!(text.contains("Lorenz"));
        assert!(text.contains("trajectories: 3"));
    }
}
