//! Constant-speed chart curves.

use crate::error::{ChartError, ChartResult};
use ct_core::numeric::lerp;

/// Raw curve arrays as they arrive from configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChartCurveData {
    pub speed_rpm: f64,
    pub rate_actual_m3_per_hour: Vec<f64>,
    pub polytropic_head_joule_per_kg: Vec<f64>,
    pub efficiency_fraction: Vec<f64>,
}

/// Validated constant-speed curve.
///
/// Invariants:
/// - equal-length rate/head/efficiency arrays with at least one point
/// - rates strictly increasing and non-negative
/// - heads positive, efficiencies in (0, 1]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ChartCurveData"))]
pub struct ChartCurve {
    speed_rpm: f64,
    rates: Vec<f64>,
    heads: Vec<f64>,
    efficiencies: Vec<f64>,
}

impl TryFrom<ChartCurveData> for ChartCurve {
    type Error = ChartError;

    fn try_from(data: ChartCurveData) -> ChartResult<Self> {
        Self::new(
            data.speed_rpm,
            data.rate_actual_m3_per_hour,
            data.polytropic_head_joule_per_kg,
            data.efficiency_fraction,
        )
    }
}

impl ChartCurve {
    /// Create a curve.
    ///
    /// # Arguments
    /// * `speed_rpm` - Shaft speed of the curve, positive
    /// * `rates` - Actual volumetric rates [m³/h], strictly increasing
    /// * `heads` - Polytropic heads [J/kg]
    /// * `efficiencies` - Polytropic efficiencies (fractions)
    ///
    /// # Errors
    /// Returns [`ChartError::InvalidCurve`] if any invariant is violated.
    pub fn new(
        speed_rpm: f64,
        rates: Vec<f64>,
        heads: Vec<f64>,
        efficiencies: Vec<f64>,
    ) -> ChartResult<Self> {
        if !speed_rpm.is_finite() || speed_rpm <= 0.0 {
            return Err(ChartError::InvalidCurve {
                what: "speed must be positive and finite",
            });
        }
        if rates.is_empty() {
            return Err(ChartError::InvalidCurve {
                what: "curve needs at least one point",
            });
        }
        if rates.len() != heads.len() || rates.len() != efficiencies.len() {
            return Err(ChartError::InvalidCurve {
                what: "rate, head and efficiency arrays must have equal length",
            });
        }
        if rates.iter().any(|r| !r.is_finite() || *r < 0.0) {
            return Err(ChartError::InvalidCurve {
                what: "rates must be finite and non-negative",
            });
        }
        if rates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ChartError::InvalidCurve {
                what: "rates must be strictly increasing",
            });
        }
        if heads.iter().any(|h| !h.is_finite() || *h <= 0.0) {
            return Err(ChartError::InvalidCurve {
                what: "heads must be positive and finite",
            });
        }
        if efficiencies
            .iter()
            .any(|e| !e.is_finite() || *e <= 0.0 || *e > 1.0)
        {
            return Err(ChartError::InvalidCurve {
                what: "efficiencies must be within (0, 1]",
            });
        }
        Ok(Self {
            speed_rpm,
            rates,
            heads,
            efficiencies,
        })
    }

    pub fn speed_rpm(&self) -> f64 {
        self.speed_rpm
    }

    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    pub fn heads(&self) -> &[f64] {
        &self.heads
    }

    pub fn efficiencies(&self) -> &[f64] {
        &self.efficiencies
    }

    /// Minimum (surge-side) rate [m³/h].
    pub fn minimum_rate(&self) -> f64 {
        self.rates[0]
    }

    /// Maximum (stonewall-side) rate [m³/h].
    pub fn maximum_rate(&self) -> f64 {
        self.rates[self.rates.len() - 1]
    }

    /// Head at `rate`, clamped to the curve ends.
    pub fn head_at(&self, rate: f64) -> f64 {
        interpolate_clamped(&self.rates, &self.heads, rate)
    }

    /// Efficiency at `rate`, clamped to the curve ends.
    pub fn efficiency_at(&self, rate: f64) -> f64 {
        interpolate_clamped(&self.rates, &self.efficiencies, rate)
    }

    /// Position of `rate` between min (0) and max (1) rate.
    pub fn rate_fraction(&self, rate: f64) -> f64 {
        let width = self.maximum_rate() - self.minimum_rate();
        if width <= 0.0 {
            return 0.0;
        }
        ((rate - self.minimum_rate()) / width).clamp(0.0, 1.0)
    }

    /// Rate at a fraction of the way from min to max rate.
    pub fn rate_at_fraction(&self, fraction: f64) -> f64 {
        lerp(self.minimum_rate(), self.maximum_rate(), fraction)
    }

    /// Equivalent curve at `speed_rpm` between two bounding curves.
    ///
    /// Procedure:
    /// 1. `alpha = (speed - lower.speed) / (upper.speed - lower.speed)`
    /// 2. the rate fractions of every point on either curve are merged and sorted
    /// 3. at each fraction, rate/head/efficiency are read from both curves and
    ///    blended linearly with `alpha`
    ///
    /// `lower.speed < speed < upper.speed` is expected; `alpha` is clamped to [0, 1].
    pub fn interpolate(lower: &ChartCurve, upper: &ChartCurve, speed_rpm: f64) -> ChartResult<Self> {
        let span = upper.speed_rpm - lower.speed_rpm;
        if span <= 0.0 {
            return Err(ChartError::InvalidChart {
                what: "interpolation needs a lower and a strictly faster upper curve",
            });
        }
        let alpha = ((speed_rpm - lower.speed_rpm) / span).clamp(0.0, 1.0);

        let mut fractions: Vec<f64> = lower
            .rates
            .iter()
            .map(|r| lower.rate_fraction(*r))
            .chain(upper.rates.iter().map(|r| upper.rate_fraction(*r)))
            .collect();
        fractions.sort_by(f64::total_cmp);
        fractions.dedup_by(|a, b| (*a - *b).abs() < 1e-12);

        let mut rates = Vec::with_capacity(fractions.len());
        let mut heads = Vec::with_capacity(fractions.len());
        let mut efficiencies = Vec::with_capacity(fractions.len());
        for fraction in fractions {
            let rate_lo = lower.rate_at_fraction(fraction);
            let rate_hi = upper.rate_at_fraction(fraction);
            rates.push(lerp(rate_lo, rate_hi, alpha));
            heads.push(lerp(lower.head_at(rate_lo), upper.head_at(rate_hi), alpha));
            efficiencies.push(lerp(
                lower.efficiency_at(rate_lo),
                upper.efficiency_at(rate_hi),
                alpha,
            ));
        }

        // Single-point bounding curves can yield duplicate rates
        if rates.windows(2).any(|w| w[1] <= w[0]) {
            let rate = rates[0];
            return Self::new(speed_rpm, vec![rate], vec![heads[0]], vec![efficiencies[0]]);
        }
        Self::new(speed_rpm, rates, heads, efficiencies)
    }
}

/// Piecewise-linear lookup, flat outside the table.
fn interpolate_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let last = xs.len() - 1;
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[last] {
        return ys[last];
    }
    // xs is strictly increasing, so partition_point finds the segment
    let upper = xs.partition_point(|v| *v <= x);
    let lower = upper - 1;
    let t = (x - xs[lower]) / (xs[upper] - xs[lower]);
    lerp(ys[lower], ys[upper], t)
}
