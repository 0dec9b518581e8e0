//! Engine configuration, validation, and error types.
//!
//! [`EngineConfig`] is the construction input for a
//! [`Simulation`](crate::Simulation). [`validate()`](EngineConfig::validate)
//! checks structural invariants up front; values that are merely unusual
//! (a huge `dt`, odd parameters) are corrected with warnings at runtime
//! instead.
//!
//! Every config struct deserializes with `#[serde(default)]`, so a JSON
//! file only needs to name the fields it changes.

use chaoscope_core::{EngineError, TimeStepPolicy};
use chaoscope_integrator::Integrator;
use chaoscope_trail::TrailConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── SafetyConfig ───────────────────────────────────────────────────

/// Thresholds for the numerical safety net.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    /// Components beyond `±state_limit` are clamped. Default: 1e6.
    pub state_limit: f64,
    /// Consecutive invalid steps of one trajectory before the simulation
    /// is flagged unstable. Default: 5.
    pub max_consecutive_failures: u32,
    /// Fully accepted ticks between checkpoints. Default: 10.
    pub checkpoint_interval: u64,
    /// Checkpoints retained. Default: 10.
    pub checkpoint_capacity: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            state_limit: 1e6,
            max_consecutive_failures: 5,
            checkpoint_interval: 10,
            checkpoint_capacity: 10,
        }
    }
}

// ── HistoryConfig ──────────────────────────────────────────────────

/// Sampling of aggregate observables over time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Whether samples are recorded at all. Default: false.
    pub enabled: bool,
    /// Samples retained, oldest evicted first. Default: 1000.
    pub capacity: usize,
    /// Record a sample every this many ticks. Default: 10.
    pub sample_every: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            capacity: 1000,
            sample_every: 10,
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected by [`EngineConfig::validate()`] or while building a
/// simulation from its initial trajectories.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `max_trajectories` is zero.
    #[error("max_trajectories must be at least 1")]
    ZeroTrajectoryCap,
    /// `checkpoint_capacity` is zero.
    #[error("checkpoint_capacity must be at least 1")]
    CheckpointRingZero,
    /// `checkpoint_interval` is zero.
    #[error("checkpoint_interval must be at least 1")]
    CheckpointIntervalZero,
    /// `max_consecutive_failures` is zero.
    #[error("max_consecutive_failures must be at least 1")]
    FailureThresholdZero,
    /// `state_limit` is NaN, infinite, zero, or negative.
    #[error("state_limit must be finite and positive, got {value}")]
    InvalidStateLimit {
        /// The invalid value.
        value: f64,
    },
    /// `TimeStepPolicy` invariant violated.
    #[error("invalid time step policy: {reason}")]
    InvalidTimeStepPolicy {
        /// Which invariant was violated.
        reason: String,
    },
    /// `trail.max_length` is zero.
    #[error("trail max_length must be at least 1")]
    TrailLengthZero,
    /// `trail.decimation_stride` is below 2.
    #[error("decimation_stride {configured} is below minimum of 2")]
    DecimationStrideTooSmall {
        /// The configured stride.
        configured: usize,
    },
    /// `HistoryConfig` invariant violated.
    #[error("invalid history config: {reason}")]
    InvalidHistory {
        /// Which invariant was violated.
        reason: String,
    },
    /// No initial trajectories were supplied.
    #[error("a simulation needs at least one initial trajectory")]
    NoTrajectories,
    /// An initial trajectory was rejected.
    #[error("initial trajectory {index}: {source}")]
    Seed {
        /// Position of the seed in the supplied list.
        index: usize,
        /// Why it was rejected.
        source: EngineError,
    },
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Complete configuration for a simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial time step. Validated against [`time_step`](Self::time_step)
    /// with warnings, never rejected. Default: 0.01.
    pub dt: f64,
    /// Hard and advisory rules for `dt`.
    pub time_step: TimeStepPolicy,
    /// Upper bound on simultaneous trajectories. Default: 10.
    pub max_trajectories: usize,
    /// Integration scheme. Default: RK4.
    pub integrator: Integrator,
    /// Safety-net thresholds.
    pub safety: SafetyConfig,
    /// Trail bounds and decimation.
    pub trail: TrailConfig,
    /// Observable history sampling.
    pub history: HistoryConfig,
    /// Start in the paused state. Default: false.
    pub start_paused: bool,
    /// Parameter warnings retained for inspection. Default: 64.
    pub max_warnings: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dt: 0.01,
            time_step: TimeStepPolicy::default(),
            max_trajectories: 10,
            integrator: Integrator::default(),
            safety: SafetyConfig::default(),
            trail: TrailConfig::default(),
            history: HistoryConfig::default(),
            start_paused: false,
            max_warnings: 64,
        }
    }
}

impl EngineConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Trajectory cap.
        if self.max_trajectories == 0 {
            return Err(ConfigError::ZeroTrajectoryCap);
        }
        // 2. Safety net.
        let s = &self.safety;
        if !s.state_limit.is_finite() || s.state_limit <= 0.0 {
            return Err(ConfigError::InvalidStateLimit {
                value: s.state_limit,
            });
        }
        if s.max_consecutive_failures == 0 {
            return Err(ConfigError::FailureThresholdZero);
        }
        if s.checkpoint_interval == 0 {
            return Err(ConfigError::CheckpointIntervalZero);
        }
        if s.checkpoint_capacity == 0 {
            return Err(ConfigError::CheckpointRingZero);
        }
        // 3. Time step policy.
        let p = &self.time_step;
        if !p.default_dt.is_finite() || p.default_dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStepPolicy {
                reason: format!("default_dt must be finite and positive, got {}", p.default_dt),
            });
        }
        if !p.advisory_min.is_finite()
            || !p.advisory_max.is_finite()
            || p.advisory_min > p.advisory_max
        {
            return Err(ConfigError::InvalidTimeStepPolicy {
                reason: format!(
                    "advisory window [{}, {}] is not a finite, ordered range",
                    p.advisory_min, p.advisory_max,
                ),
            });
        }
        // 4. Trails.
        if self.trail.max_length == 0 {
            return Err(ConfigError::TrailLengthZero);
        }
        if self.trail.decimation_stride < 2 {
            return Err(ConfigError::DecimationStrideTooSmall {
                configured: self.trail.decimation_stride,
            });
        }
        // 5. History, only when recording.
        let h = &self.history;
        if h.enabled {
            if h.capacity == 0 {
                return Err(ConfigError::InvalidHistory {
                    reason: "capacity must be at least 1".to_string(),
                });
            }
            if h.sample_every == 0 {
                return Err(ConfigError::InvalidHistory {
                    reason: "sample_every must be at least 1".to_string(),
                });
            }
        }
        Ok(())
    }
}
