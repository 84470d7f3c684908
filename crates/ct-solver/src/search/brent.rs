//! Brent's method.

use super::{RootFinder, RootSolution, closest_end};
use ct_core::Boundary;

/// Bracketed root finding (Brent: bisection, secant and inverse quadratic
/// interpolation).
///
/// Converges much faster than bisection on smooth functions and never leaves
/// the bracket. Converged means `|f(x)| <= tolerance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootFindingStrategy {
    tolerance: f64,
    max_iterations: usize,
}

impl Default for RootFindingStrategy {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 100,
        }
    }
}

impl RootFindingStrategy {
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

    fn converged(&self, x: f64, fx: f64, iterations: usize) -> RootSolution {
        RootSolution {
            x,
            residual: fx,
            converged: true,
            iterations,
        }
    }
}

impl RootFinder for RootFindingStrategy {
    fn find_root<E, F>(&self, boundary: Boundary, mut f: F) -> Result<RootSolution, E>
    where
        F: FnMut(f64) -> Result<f64, E>,
    {
        let (mut a, mut b) = (boundary.min(), boundary.max());
        let mut fa = f(a)?;
        if fa.abs() <= self.tolerance {
            return Ok(self.converged(a, fa, 1));
        }
        let mut fb = f(b)?;
        if fb.abs() <= self.tolerance {
            return Ok(self.converged(b, fb, 2));
        }
        if fa.signum() == fb.signum() {
            return Ok(closest_end(a, fa, b, fb, 2));
        }

        let x_tol = f64::EPSILON * a.abs().max(b.abs()).max(1.0);
        let (mut c, mut fc) = (b, fb);
        let mut d = b - a;
        let mut e = d;
        let mut iterations = 2;

        while iterations < self.max_iterations {
            // keep the root between b and c
            if (fb > 0.0) == (fc > 0.0) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            // b is the best guess
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }

            let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * x_tol;
            let xm = 0.5 * (c - b);
            if fb.abs() <= self.tolerance {
                return Ok(self.converged(b, fb, iterations));
            }
            if xm.abs() <= tol1 {
                // bracket collapsed on a discontinuity
                break;
            }

            if e.abs() >= tol1 && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (mut p, mut q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    (
                        s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                        (q - 1.0) * (r - 1.0) * (s - 1.0),
                    )
                };
                if p > 0.0 {
                    q = -q;
                }
                p = p.abs();
                let min1 = 3.0 * xm * q - (tol1 * q).abs();
                let min2 = (e * q).abs();
                if 2.0 * p < min1.min(min2) {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }

            a = b;
            fa = fb;
            b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
            b = boundary.clamp(b);
            fb = f(b)?;
            iterations += 1;
        }

        Ok(RootSolution {
            x: b,
            residual: fb,
            converged: fb.abs() <= self.tolerance,
            iterations,
        })
    }
}
