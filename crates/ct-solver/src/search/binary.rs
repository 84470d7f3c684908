//! Bisection.

use super::{RootFinder, RootSolution, closest_end};
use ct_core::Boundary;

/// Bisection over a boundary.
///
/// Works for any monotonic function, smooth or not. Stops when
/// `|f(x)| <= tolerance` or after `max_iterations` evaluations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BinarySearchStrategy {
    tolerance: f64,
    max_iterations: usize,
}

/// Smallest feasible point of a monotone predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdSolution {
    /// Feasible point when `found`, otherwise the boundary max.
    pub x: f64,
    pub found: bool,
    pub iterations: usize,
}

impl Default for BinarySearchStrategy {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 100,
        }
    }
}

impl BinarySearchStrategy {
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations: max_iterations.max(1),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Smallest `x` in the boundary with `feasible(x)`, assuming the predicate
    /// flips from false to true exactly once.
    ///
    /// Bisects until the bracket is narrower than the tolerance; the returned
    /// point is always on the feasible side.
    pub fn search_threshold<E, F>(
        &self,
        boundary: Boundary,
        mut feasible: F,
    ) -> Result<ThresholdSolution, E>
    where
        F: FnMut(f64) -> Result<bool, E>,
    {
        let (mut lo, mut hi) = (boundary.min(), boundary.max());
        if feasible(lo)? {
            return Ok(ThresholdSolution {
                x: lo,
                found: true,
                iterations: 1,
            });
        }
        if !feasible(hi)? {
            return Ok(ThresholdSolution {
                x: hi,
                found: false,
                iterations: 2,
            });
        }

        let mut iterations = 2;
        while hi - lo > self.tolerance && iterations < self.max_iterations {
            let mid = 0.5 * (lo + hi);
            iterations += 1;
            if feasible(mid)? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(ThresholdSolution {
            x: hi,
            found: true,
            iterations,
        })
    }
}

impl RootFinder for BinarySearchStrategy {
    fn find_root<E, F>(&self, boundary: Boundary, mut f: F) -> Result<RootSolution, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let (mut lo, mut hi) = (boundary.min(), boundary.max());
        let mut f_lo = f(lo)?;
        if f_lo.abs() <= self.tolerance {
            return Ok(RootSolution {
                x: lo,
                residual: f_lo,
                converged: true,
                iterations: 1,
            });
        }
        let mut f_hi = f(hi)?;
        if f_hi.abs() <= self.tolerance {
            return Ok(RootSolution {
                x: hi,
                residual: f_hi,
                converged: true,
                iterations: 2,
            });
        }
        if f_lo.signum() == f_hi.signum() {
            return Ok(closest_end(lo, f_lo, hi, f_hi, 2));
        }

        let mut iterations = 2;
        while iterations < self.max_iterations {
            let mid = 0.5 * (lo + hi);
            let f_mid = f(mid)?;
            iterations += 1;
            if f_mid.abs() <= self.tolerance {
                return Ok(RootSolution {
                    x: mid,
                    residual: f_mid,
                    converged: true,
                    iterations,
                });
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
                f_hi = f_mid;
            }
        }
        Ok(closest_end(lo, f_lo, hi, f_hi, iterations))
    }
}
