//! Per-component boundary rules applied after each accepted step.

use std::ops::Range;

use smallvec::SmallVec;

/// How a single state component is kept inside its domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryRule {
    /// Wrap around: leaving through `max` re-enters at `min` and vice versa.
    Periodic {
        /// Lower edge.
        min: f64,
        /// Upper edge, exclusive.
        max: f64,
    },
    /// Mirror at the edge: `y' = 2·limit − y`.
    Reflect {
        /// Lower wall.
        min: f64,
        /// Upper wall.
        max: f64,
    },
    /// Negative values are replaced by zero.
    NonNegative,
}

impl BoundaryRule {
    fn apply(self, y: f64) -> f64 {
        match self {
            BoundaryRule::Periodic { min, max } => {
                let width = max - min;
                if y < min || y >= max {
                    // rem_euclid of a tiny negative offset rounds up to `width`.
                    let wrapped = min + (y - min).rem_euclid(width);
                    if wrapped >= max {
                        min
                    } else {
                        wrapped
                    }
                } else {
                    y
                }
            }
            BoundaryRule::Reflect { min, max } => {
                let mirrored = if y < min {
                    2.0 * min - y
                } else if y > max {
                    2.0 * max - y
                } else {
                    y
                };
                // A single mirror is enough for any sane step; anything
                // further out lands on the wall.
                mirrored.clamp(min, max)
            }
            BoundaryRule::NonNegative => y.max(0.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct ComponentRule {
    components: Range<usize>,
    rule: BoundaryRule,
}

/// The set of rules a system applies to its state after each step.
///
/// Rules target component ranges; components with no rule are free.
/// Ranges past the end of a state are truncated to it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoundaryPolicy {
    rules: SmallVec<[ComponentRule; 2]>,
}

impl BoundaryPolicy {
    /// No constraints.
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a rule for one component.
    pub fn with(self, component: usize, rule: BoundaryRule) -> Self {
        self.with_range(component..component + 1, rule)
    }

    /// Add a rule for a range of components.
    pub fn with_range(mut self, components: Range<usize>, rule: BoundaryRule) -> Self {
        self.rules.push(ComponentRule { components, rule });
        self
    }

    /// True when no rule is registered.
    pub fn is_none(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in place.
    pub fn apply(&self, state: &mut [f64]) {
        let len = state.len();
        for r in &self.rules {
            let end = r.components.end.min(len);
            let start = r.components.start.min(end);
            for y in &mut state[start..end] {
                *y = r.rule.apply(*y);
            }
        }
    }
}
