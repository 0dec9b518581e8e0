//! Fixed-capacity ring of recovery checkpoints.
//!
//! [`CheckpointRing`] keeps the most recent checkpoints in tagged slots.
//! The write position is monotonic (never wraps); slot index is
//! `pos % capacity`, and each slot stores the position it was written at
//! so a lookup by position can tell a live checkpoint from an overwritten
//! one.

use chaoscope_core::{StateVector, TrajectoryId};

/// A value copy of every trajectory state at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Checkpoint {
    /// Ticks completed when the checkpoint was taken.
    pub step_count: u64,
    /// Simulation time when the checkpoint was taken.
    pub time: f64,
    /// State of each trajectory alive at that instant.
    pub states: Vec<(TrajectoryId, StateVector)>,
}

/// A tagged slot: the `u64` is the write position at which it was stored.
type Slot = Option<(u64, Checkpoint)>;

/// Bounded FIFO of checkpoints.
#[derive(Clone, Debug)]
pub struct CheckpointRing {
    slots: Vec<Slot>,
    write_pos: u64,
}

impl CheckpointRing {
    /// A ring holding up to `capacity` checkpoints (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity.max(1)],
            write_pos: 0,
        }
    }

    /// Store `checkpoint`, returning the one it displaced, if any.
    pub fn push(&mut self, checkpoint: Checkpoint) -> Option<Checkpoint> {
        let pos = self.write_pos;
        let idx = (pos as usize) % self.slots.len();
        let evicted = self.slots[idx].replace((pos, checkpoint)).map(|(_, c)| c);
        self.write_pos = pos + 1;
        evicted
    }

    /// The most recently stored checkpoint.
    pub fn latest(&self) -> Option<&Checkpoint> {
        self.write_pos
            .checked_sub(1)
            .and_then(|pos| self.get_by_pos(pos))
    }

    /// The checkpoint stored at write position `pos`, unless it has been
    /// overwritten or not yet written.
    pub fn get_by_pos(&self, pos: u64) -> Option<&Checkpoint> {
        if pos >= self.write_pos || self.write_pos - pos > self.slots.len() as u64 {
            return None;
        }
        match &self.slots[(pos as usize) % self.slots.len()] {
            Some((tag, c)) if *tag == pos => Some(c),
            _ => None,
        }
    }

    /// Checkpoints currently held, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> + '_ {
        let start = self.write_pos.saturating_sub(self.slots.len() as u64);
        (start..self.write_pos).filter_map(move |pos| self.get_by_pos(pos))
    }

    /// Number of checkpoints held.
    pub fn len(&self) -> usize {
        (self.write_pos as usize).min(self.slots.len())
    }

    /// Whether no checkpoint has been stored since construction or clear.
    pub fn is_empty(&self) -> bool {
        self.write_pos == 0
    }

    /// Maximum checkpoints held.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Total checkpoints ever stored (monotonic until cleared).
    pub fn write_pos(&self) -> u64 {
        self.write_pos
    }

    /// Drop every checkpoint.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn cp(step: u64) -> Checkpoint {
        Checkpoint {
            step_count: step,
            time: step as f64 * 0.01,
            states: vec![(TrajectoryId(0), smallvec![step as f64])],
        }
    }

    #[test]
    fn new_ring_is_empty() {
        let ring = CheckpointRing::new(4);
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.capacity(), 4);
        assert!(ring.latest().is_none());
    }

    #[test]
    fn push_and_latest() {
        let mut ring = CheckpointRing::new(4);
        ring.push(cp(10));
        ring.push(cp(20));
        assert_eq!(ring.latest().map(|c| c.step_count), Some(20));
        assert_eq!(ring.len(), 2);
    }

    #[test]
    fn eviction_is_fifo() {
        let mut ring = CheckpointRing::new(3);
        for step in 1..=3 {
            assert!(ring.push(cp(step)).is_none());
        }
        let evicted = ring.push(cp(4));
        assert_eq!(evicted.map(|c| c.step_count), Some(1));
        assert!(ring.get_by_pos(0).is_none());
        assert_eq!(ring.get_by_pos(1).map(|c| c.step_count), Some(2));
        let held: Vec<u64> = ring.iter().map(|c| c.step_count).collect();
        assert_eq!(held, [2, 3, 4]);
    }

    #[test]
    fn unwritten_position_is_none() {
        let mut ring = CheckpointRing::new(2);
        ring.push(cp(1));
        assert!(ring.get_by_pos(1).is_none());
    }

    #[test]
    fn clear_resets() {
        let mut ring = CheckpointRing::new(2);
        ring.push(cp(1));
        ring.clear();
        assert!(ring.is_empty());
        assert!(ring.latest().is_none());
        assert_eq!(ring.write_pos(), 0);
    }

    #[test]
    fn zero_capacity_is_raised() {
        let mut ring = CheckpointRing::new(0);
        ring.push(cp(1));
        ring.push(cp(2));
        assert_eq!(ring.capacity(), 1);
        assert_eq!(ring.latest().map(|c| c.step_count), Some(2));
    }
}
