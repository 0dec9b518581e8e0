//! Non-blocking hand-off of telemetry snapshots to an external sender.
//!
//! The engine never performs I/O. A driver builds a
//! [`TelemetrySnapshot`] with
//! [`Simulation::telemetry_snapshot`](crate::Simulation::telemetry_snapshot)
//! and offers it to a [`TelemetryPublisher`], which forwards it over a
//! bounded channel with `try_send`. A full or disconnected channel drops
//! the snapshot and bumps a counter; the simulation is never blocked.

use chaoscope_core::{DynamicalSystem, Position, TrajectoryId};
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use serde::{Deserialize, Serialize};

use crate::simulation::Simulation;

// ── Payload ────────────────────────────────────────────────────────

/// Per-trajectory entry in a telemetry payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryBody {
    /// Trajectory id.
    pub id: TrajectoryId,
    /// Render position.
    pub position: Position,
    /// Derivative magnitude.
    pub velocity: f64,
}

/// Observables carried in a telemetry payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryData {
    /// Simulation time.
    pub time: f64,
    /// Ticks completed.
    pub step_count: u64,
    /// Mean ‖state‖².
    pub energy: f64,
    /// Cross-trajectory spread.
    pub entropy: f64,
    /// Every trajectory.
    pub bodies: Vec<TelemetryBody>,
}

/// The payload an external collector receives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    /// System slug, e.g. `"lorenz-attractor"`.
    pub simulation_id: String,
    /// Human-readable system name.
    pub simulation_name: String,
    /// Observables.
    pub data: TelemetryData,
}

// ── Channel ────────────────────────────────────────────────────────

/// What happened to an offered snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishOutcome {
    /// Queued for the receiver.
    Sent,
    /// Gated out: not on a publishing step, or this step was already sent.
    NotDue,
    /// Channel full or receiver gone; the snapshot was discarded.
    Dropped,
}

/// Create a publisher/receiver pair.
///
/// `capacity` bounds the queued snapshots (at least 1); `every` publishes
/// on steps that are multiples of it (at least 1).
pub fn channel(capacity: usize, every: u64) -> (TelemetryPublisher, TelemetryReceiver) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    (
        TelemetryPublisher {
            tx,
            every: every.max(1),
            last_step: None,
            sent: 0,
            dropped: 0,
        },
        TelemetryReceiver { rx },
    )
}

/// Sending half, owned by the simulation driver.
#[derive(Debug)]
pub struct TelemetryPublisher {
    tx: Sender<TelemetrySnapshot>,
    every: u64,
    last_step: Option<u64>,
    sent: u64,
    dropped: u64,
}

impl TelemetryPublisher {
    /// Whether a snapshot taken at `step_count` would be published.
    pub fn is_due(&self, step_count: u64) -> bool {
        step_count % self.every == 0 && self.last_step != Some(step_count)
    }

    /// Publish `sim`'s current snapshot if it is due.
    ///
    /// The snapshot is only built when due.
    pub fn offer<S: DynamicalSystem>(&mut self, sim: &Simulation<S>) -> PublishOutcome {
        let step = sim.step_count();
        if !self.is_due(step) {
            return PublishOutcome::NotDue;
        }
        self.last_step = Some(step);
        self.publish(sim.telemetry_snapshot())
    }

    /// Publish `snapshot` unconditionally. Never blocks.
    pub fn publish(&mut self, snapshot: TelemetrySnapshot) -> PublishOutcome {
        match self.tx.try_send(snapshot) {
            Ok(()) => {
                self.sent += 1;
                PublishOutcome::Sent
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                self.dropped += 1;
                PublishOutcome::Dropped
            }
        }
    }

    /// Snapshots queued so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Snapshots discarded so far.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Receiving half, owned by the external sender.
#[derive(Debug, Clone)]
pub struct TelemetryReceiver {
    rx: Receiver<TelemetrySnapshot>,
}

impl TelemetryReceiver {
    /// Next queued snapshot, if any. Returns `None` when empty or when the
    /// publisher has been dropped and the queue is drained.
    pub fn try_recv(&self) -> Option<TelemetrySnapshot> {
        match self.rx.try_recv() {
            Ok(s) => Some(s),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Every queued snapshot, oldest first.
    pub fn drain(&self) -> Vec<TelemetrySnapshot> {
        self.rx.try_iter().collect()
    }

    /// Block until a snapshot arrives or the publisher is dropped.
    pub fn recv(&self) -> Option<TelemetrySnapshot> {
        self.rx.recv().ok()
    }
}
