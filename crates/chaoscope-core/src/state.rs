//! State vectors, render positions, and the small vector algebra the
//! integrator and observables need.

use smallvec::SmallVec;

/// An ordered tuple of real components describing one trajectory.
///
/// Uses `SmallVec<[f64; 12]>` so every built-in system up to planar
/// three-body (12 components) stays on the stack. Waterwheels with many
/// buckets spill to the heap transparently.
pub type StateVector = SmallVec<[f64; 12]>;

/// Render-space projection of a state (2 or 3 components for most systems).
pub type Position = SmallVec<[f64; 3]>;

/// Squared Euclidean norm.
pub fn norm_sq(v: &[f64]) -> f64 {
    v.iter().map(|c| c * c).sum()
}

/// Euclidean norm.
pub fn norm(v: &[f64]) -> f64 {
    norm_sq(v).sqrt()
}

/// Euclidean distance between two vectors of equal length.
///
/// Extra trailing components of the longer vector are ignored.
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Whether every component is finite (neither NaN nor infinite).
pub fn is_finite(v: &[f64]) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// `base + scale * delta`, component-wise.
pub fn axpy(base: &[f64], scale: f64, delta: &[f64]) -> StateVector {
    base.iter()
        .zip(delta)
        .map(|(b, d)| b + scale * d)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn norms() {
        let v: StateVector = smallvec![3.0, 4.0];
        assert_eq!(norm_sq(&v), 25.0);
        assert_eq!(norm(&v), 5.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = [1.0, 1.0, 1.0];
        let b = [1.0, 4.0, 5.0];
        assert_eq!(distance(&a, &b), 5.0);
        assert_eq!(distance(&b, &a), 5.0);
    }

    #[test]
    fn finiteness() {
        assert!(is_finite(&[0.0, -1.0, 1e300]));
        assert!(!is_finite(&[0.0, f64::NAN]));
        assert!(!is_finite(&[f64::NEG_INFINITY]));
    }

    #[test]
    fn axpy_combines_componentwise() {
        let out = axpy(&[1.0, 2.0], 0.5, &[2.0, -4.0]);
        assert_eq!(out.as_slice(), &[2.0, 0.0]);
    }
}
