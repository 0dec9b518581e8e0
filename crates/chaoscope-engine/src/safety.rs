//! The numerical safety net.
//!
//! Every candidate state produced by the integrator passes through
//! [`inspect`] before it replaces the trajectory's state:
//!
//! - any NaN or infinite component makes the step **invalid**: the caller
//!   keeps the pre-step state and counts a consecutive failure;
//! - finite components beyond `±limit` are **clamped** to the limit and the
//!   step is accepted;
//! - otherwise the step is accepted unchanged.
//!
//! [`TrajectoryHealth`] tracks the per-trajectory counters the engine uses
//! for checkpointing and escalation.

use chaoscope_core::StateVector;
use serde::{Deserialize, Serialize};

/// Outcome of the last step for one trajectory.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrajectoryStatus {
    /// Accepted as integrated.
    #[default]
    Valid,
    /// Rejected as non-finite; the pre-step state was kept.
    Recovered,
    /// Accepted after clamping out-of-range components.
    Clamped,
}

/// The safety net's verdict on a candidate state.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    /// Use this state. `clamped` counts the components that were limited.
    Accept {
        /// The state to install.
        state: StateVector,
        /// Number of components clamped to the limit.
        clamped: usize,
    },
    /// Discard the candidate. `component` is the first non-finite index.
    Reject {
        /// Index of the first NaN or infinite component.
        component: usize,
    },
}

/// Classify `candidate` against `limit`.
pub fn inspect(mut candidate: StateVector, limit: f64) -> Verdict {
    if let Some(component) = candidate.iter().position(|c| !c.is_finite()) {
        return Verdict::Reject { component };
    }
    let mut clamped = 0;
    for c in candidate.iter_mut() {
        if c.abs() > limit {
            *c = c.clamp(-limit, limit);
            clamped += 1;
        }
    }
    Verdict::Accept {
        state: candidate,
        clamped,
    }
}

/// Per-trajectory safety counters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryHealth {
    /// Status after the most recent step.
    pub status: TrajectoryStatus,
    /// Invalid steps since the last accepted one.
    pub consecutive_invalid: u32,
    /// Invalid steps over the trajectory's lifetime (since reset).
    pub recoveries: u64,
    /// Clamped steps over the trajectory's lifetime (since reset).
    pub clamps: u64,
}

impl TrajectoryHealth {
    /// Record a rejected step.
    pub fn record_invalid(&mut self) {
        self.status = TrajectoryStatus::Recovered;
        self.consecutive_invalid = self.consecutive_invalid.saturating_add(1);
        self.recoveries += 1;
    }

    /// Record an accepted step, clamped or not.
    pub fn record_accepted(&mut self, clamped: bool) {
        self.consecutive_invalid = 0;
        if clamped {
            self.status = TrajectoryStatus::Clamped;
            self.clamps += 1;
        } else {
            self.status = TrajectoryStatus::Valid;
        }
    }

    /// Whether the last step was accepted.
    pub fn is_accepted(&self) -> bool {
        self.status != TrajectoryStatus::Recovered
    }

    /// Clear the consecutive counter without touching lifetime totals.
    pub fn clear_streak(&mut self) {
        self.consecutive_invalid = 0;
        self.status = TrajectoryStatus::Valid;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    #[test]
    fn finite_in_range_is_accepted_unchanged() {
        let v = inspect(smallvec![1.0, -2.0, 3.0], 10.0);
        assert_eq!(
            v,
            Verdict::Accept {
                state: smallvec![1.0, -2.0, 3.0],
                clamped: 0
            }
        );
    }

    #[test]
    fn nan_or_infinity_is_rejected() {
        assert_eq!(
            inspect(smallvec![0.0, f64::NAN], 10.0),
            Verdict::Reject { component: 1 }
        );
        assert_eq!(
            inspect(smallvec![f64::INFINITY, f64::NAN], 10.0),
            Verdict::Reject { component: 0 }
        );
    }

    #[test]
    fn out_of_range_is_clamped() {
        let v = inspect(smallvec![5e6, -2e6, 1.0], 1e6);
        assert_eq!(
            v,
            Verdict::Accept {
                state: smallvec![1e6, -1e6, 1.0],
                clamped: 2
            }
        );
    }

    #[test]
    fn health_counters() {
        let mut h = TrajectoryHealth::default();
        h.record_invalid();
        h.record_invalid();
        assert_eq!(h.consecutive_invalid, 2);
        assert_eq!(h.status, TrajectoryStatus::Recovered);
        assert!(!h.is_accepted());

        h.record_accepted(true);
        assert_eq!(h.consecutive_invalid, 0);
        assert_eq!(h.status, TrajectoryStatus::Clamped);
        assert!(h.is_accepted());
        assert_eq!((h.recoveries, h.clamps), (2, 1));

        h.record_invalid();
        h.clear_streak();
        assert_eq!(h.consecutive_invalid, 0);
        assert_eq!(h.recoveries, 3);
    }

    proptest! {
        #[test]
        fn accepted_states_are_finite_and_bounded(
            xs in prop::collection::vec(prop::num::f64::ANY, 1..12),
            limit in 1.0f64..1e8,
        ) {
            match inspect(StateVector::from_vec(xs.clone()), limit) {
                Verdict::Accept { state, .. } => {
                    prop_assert!(state.iter().all(|c| c.is_finite() && c.abs() <= limit));
                }
                Verdict::Reject { component } => {
                    prop_assert!(!xs[component].is_finite());
                }
            }
        }
    }
}
