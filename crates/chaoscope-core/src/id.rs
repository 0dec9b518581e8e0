//! Strongly-typed identifiers and the [`SystemKind`] catalogue.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifies a trajectory within a simulation.
///
/// Ids are allocated sequentially by the simulation and are never reused
/// while the simulation lives, so a removed trajectory's id cannot alias a
/// newly added one in trails or checkpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrajectoryId(pub u32);

impl fmt::Display for TrajectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TrajectoryId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// The family of dynamical system a simulation integrates.
///
/// The serialized form is the kebab-case slug used as `simulation.type` in
/// exported documents (`"lorenz-attractor"`, `"double-gyre"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    /// Lorenz convection model, state `(x, y, z)`.
    #[serde(rename = "lorenz-attractor")]
    Lorenz,
    /// Rössler attractor, state `(x, y, z)`.
    #[serde(rename = "rossler-attractor")]
    Rossler,
    /// Time-periodic double-gyre flow, state `(x, y)`.
    #[serde(rename = "double-gyre")]
    DoubleGyre,
    /// Planar double pendulum, state `(θ1, ω1, θ2, ω2)`.
    #[serde(rename = "double-pendulum")]
    DoublePendulum,
    /// Malkus waterwheel with discrete buckets, state `(ω, θ, m_0..m_n)`.
    #[serde(rename = "malkus-waterwheel")]
    Waterwheel,
    /// Planar three-body gravity, state `(x, y, vx, vy)` per body.
    #[serde(rename = "three-body")]
    ThreeBody,
}

impl SystemKind {
    /// Every kind, in catalogue order.
    pub const ALL: [SystemKind; 6] = [
        SystemKind::Lorenz,
        SystemKind::Rossler,
        SystemKind::DoubleGyre,
        SystemKind::DoublePendulum,
        SystemKind::Waterwheel,
        SystemKind::ThreeBody,
    ];

    /// Kebab-case identifier, stable across versions.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Lorenz => "lorenz-attractor",
            Self::Rossler => "rossler-attractor",
            Self::DoubleGyre => "double-gyre",
            Self::DoublePendulum => "double-pendulum",
            Self::Waterwheel => "malkus-waterwheel",
            Self::ThreeBody => "three-body",
        }
    }

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Lorenz => "Lorenz Attractor",
            Self::Rossler => "Rössler Attractor",
            Self::DoubleGyre => "Double Gyre Flow",
            Self::DoublePendulum => "Double Pendulum",
            Self::Waterwheel => "Malkus Waterwheel",
            Self::ThreeBody => "Three-Body Problem",
        }
    }
}

impl fmt::Display for SystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for SystemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.slug() == s)
            .ok_or_else(|| format!("unknown system kind '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_round_trips_through_from_str() {
        for kind in SystemKind::ALL {
            assert_eq!(kind.slug().parse::<SystemKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_slug_is_rejected() {
        assert!("strange-attractor".parse::<SystemKind>().is_err());
    }

    #[test]
    fn display_is_slug() {
        assert_eq!(SystemKind::DoubleGyre.to_string(), "double-gyre");
        assert_eq!(SystemKind::Waterwheel.to_string(), "malkus-waterwheel");
    }

    #[test]
    fn trajectory_id_display() {
        assert_eq!(TrajectoryId(7).to_string(), "7");
        assert_eq!(TrajectoryId::from(3), TrajectoryId(3));
    }
}
