//! A single trajectory's bounded position history.

use std::collections::VecDeque;

use chaoscope_core::Position;

/// Ordered history of render positions, oldest first.
///
/// Bounded by `max_length`: pushing past it evicts the oldest point. When a
/// decimation threshold is set and the trail grows past it, every
/// `stride`-th point is kept (starting with the oldest) and the rest are
/// discarded, which thins the trail uniformly while keeping its shape.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Position>,
    max_length: usize,
    decimation_threshold: Option<usize>,
    stride: usize,
}

impl Trail {
    /// An empty trail.
    ///
    /// `max_length` is raised to at least 1 and `stride` to at least 2.
    pub fn new(max_length: usize, decimation_threshold: Option<usize>, stride: usize) -> Self {
        let max_length = max_length.max(1);
        Self {
            points: VecDeque::with_capacity(max_length.min(4096)),
            max_length,
            decimation_threshold,
            stride: stride.max(2),
        }
    }

    /// Append a point. Returns `true` if the push triggered decimation.
    pub fn push(&mut self, position: Position) -> bool {
        self.points.push_back(position);
        while self.points.len() > self.max_length {
            self.points.pop_front();
        }
        match self.decimation_threshold {
            Some(threshold) if self.points.len() > threshold => {
                self.decimate(self.stride);
                true
            }
            _ => false,
        }
    }

    /// Keep every `stride`-th point starting at the oldest.
    ///
    /// Leaves `ceil(len / stride)` points in their original order. A stride
    /// below 2 is a no-op.
    pub fn decimate(&mut self, stride: usize) {
        if stride < 2 {
            return;
        }
        let mut index = 0usize;
        self.points.retain(|_| {
            let keep = index % stride == 0;
            index += 1;
            keep
        });
    }

    /// Change the bound, dropping the oldest points if the trail is longer.
    pub fn set_max_length(&mut self, max_length: usize) {
        self.max_length = max_length.max(1);
        while self.points.len() > self.max_length {
            self.points.pop_front();
        }
    }

    /// Current bound.
    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trail holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points from oldest to newest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Position> + '_ {
        self.points.iter()
    }

    /// The newest point.
    pub fn latest(&self) -> Option<&Position> {
        self.points.back()
    }
}
