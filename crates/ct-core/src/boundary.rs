//! Search ranges and tolerance-aware targets.
//!
//! Every iterative search in the solver layer is bounded by a [`Boundary`],
//! and every target it chases is a [`FloatConstraint`] so that "close enough"
//! terminates a search instead of exact float equality.

use core::cmp::Ordering;

use crate::error::{CtError, CtResult};

/// Inclusive numeric range `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boundary {
    min: f64,
    max: f64,
}

impl Boundary {
    /// Create a boundary. Fails if either end is non-finite or `min > max`.
    pub fn new(min: f64, max: f64) -> CtResult<Self> {
        if !min.is_finite() {
            return Err(CtError::NonFinite {
                what: "boundary min",
                value: min,
            });
        }
        if !max.is_finite() {
            return Err(CtError::NonFinite {
                what: "boundary max",
                value: max,
            });
        }
        if min > max {
            return Err(CtError::InvalidBoundary { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Shrink the upper end; a cap below `min` collapses the range onto `min`.
    pub fn with_max_at_most(&self, cap: f64) -> Self {
        let max = self.max.min(cap).max(self.min);
        Self { min: self.min, max }
    }

    /// Raise the lower end; a floor above `max` collapses the range onto `max`.
    pub fn with_min_at_least(&self, floor: f64) -> Self {
        let min = self.min.max(floor).min(self.max);
        Self { min, max: self.max }
    }
}

/// Target value with an absolute tolerance.
///
/// Comparisons treat anything within `abs_tol` of the target as equal.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloatConstraint {
    value: f64,
    abs_tol: f64,
}

impl FloatConstraint {
    pub const DEFAULT_ABS_TOL: f64 = 1e-3;

    pub fn new(value: f64, abs_tol: f64) -> CtResult<Self> {
        if !value.is_finite() {
            return Err(CtError::NonFinite {
                what: "constraint value",
                value,
            });
        }
        if !abs_tol.is_finite() || abs_tol < 0.0 {
            return Err(CtError::InvalidArg {
                what: "constraint tolerance must be finite and non-negative",
            });
        }
        Ok(Self { value, abs_tol })
    }

    /// Constraint with [`Self::DEFAULT_ABS_TOL`].
    pub fn target(value: f64) -> CtResult<Self> {
        Self::new(value, Self::DEFAULT_ABS_TOL)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn abs_tol(&self) -> f64 {
        self.abs_tol
    }

    /// Tolerance-aware ordering of `x` relative to the target.
    pub fn compare(&self, x: f64) -> Ordering {
        let diff = x - self.value;
        if diff.abs() <= self.abs_tol {
            Ordering::Equal
        } else if diff < 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn is_met_by(&self, x: f64) -> bool {
        self.compare(x) == Ordering::Equal
    }

    /// Signed distance from the target, `x - value`.
    pub fn residual(&self, x: f64) -> f64 {
        x - self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundary_rejects_inverted_range() {
        assert!(matches!(
            Boundary::new(2.0, 1.0),
            Err(CtError::InvalidBoundary { .. })
        ));
        assert!(Boundary::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn degenerate_boundary_is_allowed() {
        let b = Boundary::new(3.0, 3.0).unwrap();
        assert_eq!(b.width(), 0.0);
        assert!(b.contains(3.0));
    }

    #[test]
    fn cap_collapses_onto_min() {
        let b = Boundary::new(10.0, 20.0).unwrap();
        assert_eq!(b.with_max_at_most(15.0).max(), 15.0);
        assert_eq!(b.with_max_at_most(5.0).max(), 10.0);
        assert_eq!(b.with_min_at_least(12.0).min(), 12.0);
        assert_eq!(b.with_min_at_least(25.0).min(), 20.0);
    }

    #[test]
    fn constraint_uses_tolerance() {
        let c = FloatConstraint::new(90.0, 0.01).unwrap();
        assert!(c.is_met_by(90.005));
        assert_eq!(c.compare(89.9), Ordering::Less);
        assert_eq!(c.compare(90.1), Ordering::Greater);
        assert!(FloatConstraint::new(90.0, -1.0).is_err());
    }

    #[test]
    fn residual_is_signed() {
        let c = FloatConstraint::new(90.0, 0.01).unwrap();
        assert_eq!(c.residual(92.5), 2.5);
        assert_eq!(c.residual(87.5), -2.5);
    }

    proptest! {
        #[test]
        fn clamp_stays_inside(a in -1e6_f64..1e6, b in -1e6_f64..1e6, x in -1e7_f64..1e7) {
            let b = Boundary::new(a.min(b), a.max(b)).unwrap();
            prop_assert!(b.contains(b.clamp(x)));
        }
    }
}
