//! Bounded one-dimensional search strategies.
//!
//! The strategies know nothing about speeds, rates or pressures: they take a
//! [`Boundary`] and a scalar function and report where it crosses zero. The
//! function may fail (a trial propagation can hit a process error); that
//! error aborts the search and is returned unchanged.

mod binary;
mod brent;

pub use binary::{BinarySearchStrategy, ThresholdSolution};
pub use brent::RootFindingStrategy;

use ct_core::Boundary;

/// Outcome of a bounded root search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootSolution {
    /// Best point found, always inside the boundary.
    pub x: f64,
    /// f(x)
    pub residual: f64,
    /// `|f(x)|` is within the strategy tolerance.
    pub converged: bool,
    /// Function evaluations spent.
    pub iterations: usize,
}

/// Find `x` in a boundary with `f(x) ≈ 0`.
///
/// Without a sign change across the boundary the end with the smaller
/// `|f|` comes back with `converged == false`.
pub trait RootFinder {
    fn find_root<E, F>(&self, boundary: Boundary, f: F) -> Result<RootSolution, E>
    where
        F: FnMut(f64) -> Result<f64, E>;
}

/// The strategies a policy can be built from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchStrategy {
    Binary(BinarySearchStrategy),
    RootFinding(RootFindingStrategy),
}

impl RootFinder for SearchStrategy {
    fn find_root<E, F>(&self, boundary: Boundary, f: F) -> Result<RootSolution, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        match self {
            Self::Binary(strategy) => strategy.find_root(boundary, f),
            Self::RootFinding(strategy) => strategy.find_root(boundary, f),
        }
    }
}

impl From<BinarySearchStrategy> for SearchStrategy {
    fn from(strategy: BinarySearchStrategy) -> Self {
        Self::Binary(strategy)
    }
}

impl From<RootFindingStrategy> for SearchStrategy {
    fn from(strategy: RootFindingStrategy) -> Self {
        Self::RootFinding(strategy)
    }
}

/// Solution at whichever end of the boundary is closer to a root.
pub(crate) fn closest_end(a: f64, fa: f64, b: f64, fb: f64, iterations: usize) -> RootSolution {
    let (x, residual) = if fa.abs() <= fb.abs() { (a, fa) } else { (b, fb) };
    RootSolution {
        x,
        residual,
        converged: false,
        iterations,
    }
}
