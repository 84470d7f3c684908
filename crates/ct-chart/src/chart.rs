//! Single- and variable-speed compressor charts.

use std::borrow::Cow;

use crate::curve::ChartCurve;
use crate::error::{ChartError, ChartResult};
use crate::point::{ChartAreaFlag, ChartOperatingPoint};
use ct_core::Boundary;

/// Relative slack when comparing rates and speeds against chart limits.
pub(crate) const LIMIT_REL_TOL: f64 = 1e-6;

/// Compressor chart.
#[derive(Debug, Clone, PartialEq)]
pub enum CompressorChart {
    /// One curve; the shaft runs at the curve speed.
    SingleSpeed(ChartCurve),
    /// Curves ordered by strictly increasing speed.
    VariableSpeed(Vec<ChartCurve>),
}

impl CompressorChart {
    pub fn single_speed(curve: ChartCurve) -> Self {
        Self::SingleSpeed(curve)
    }

    /// Build a variable-speed chart; curves are sorted by speed.
    ///
    /// # Errors
    /// Fails on an empty curve list or two curves with the same speed.
    pub fn variable_speed(mut curves: Vec<ChartCurve>) -> ChartResult<Self> {
        if curves.is_empty() {
            return Err(ChartError::InvalidChart {
                what: "variable-speed chart needs at least one curve",
            });
        }
        curves.sort_by(|a, b| a.speed_rpm().total_cmp(&b.speed_rpm()));
        if curves
            .windows(2)
            .any(|w| w[1].speed_rpm() <= w[0].speed_rpm())
        {
            return Err(ChartError::InvalidChart {
                what: "chart curves must have distinct speeds",
            });
        }
        Ok(Self::VariableSpeed(curves))
    }

    pub fn is_variable_speed(&self) -> bool {
        matches!(self, Self::VariableSpeed(_))
    }

    pub fn curves(&self) -> &[ChartCurve] {
        match self {
            Self::SingleSpeed(curve) => std::slice::from_ref(curve),
            Self::VariableSpeed(curves) => curves,
        }
    }

    pub fn minimum_speed(&self) -> f64 {
        self.curves()[0].speed_rpm()
    }

    pub fn maximum_speed(&self) -> f64 {
        let curves = self.curves();
        curves[curves.len() - 1].speed_rpm()
    }

    /// `[min_speed, max_speed]` of the chart.
    pub fn speed_range(&self) -> ChartResult<Boundary> {
        Boundary::new(self.minimum_speed(), self.maximum_speed()).map_err(|_| {
            ChartError::InvalidChart {
                what: "chart speed range is not finite",
            }
        })
    }

    /// The curve that applies at `speed_rpm`.
    ///
    /// Single-speed charts ignore the speed. Outside the chart range the
    /// nearest end curve is returned; between two curves an equivalent curve
    /// is synthesized.
    pub fn curve_at_speed(&self, speed_rpm: f64) -> ChartResult<Cow<'_, ChartCurve>> {
        let curves = match self {
            Self::SingleSpeed(curve) => return Ok(Cow::Borrowed(curve)),
            Self::VariableSpeed(curves) => curves,
        };
        if !speed_rpm.is_finite() {
            return Err(ChartError::InvalidArg {
                what: "speed must be finite",
            });
        }
        let upper = curves.partition_point(|c| c.speed_rpm() < speed_rpm);
        if upper == 0 {
            return Ok(Cow::Borrowed(&curves[0]));
        }
        if upper == curves.len() {
            return Ok(Cow::Borrowed(&curves[curves.len() - 1]));
        }
        if curves[upper].speed_rpm() == speed_rpm {
            return Ok(Cow::Borrowed(&curves[upper]));
        }
        ChartCurve::interpolate(&curves[upper - 1], &curves[upper], speed_rpm).map(Cow::Owned)
    }

    pub fn minimum_rate_at_speed(&self, speed_rpm: f64) -> ChartResult<f64> {
        Ok(self.curve_at_speed(speed_rpm)?.minimum_rate())
    }

    pub fn maximum_rate_at_speed(&self, speed_rpm: f64) -> ChartResult<f64> {
        Ok(self.curve_at_speed(speed_rpm)?.maximum_rate())
    }

    /// Evaluate the chart.
    ///
    /// # Arguments
    /// * `speed_rpm` - Shaft speed (ignored by single-speed charts)
    /// * `rate_m3_per_h` - Actual rate through the machine, recirculation included
    /// * `rate_before_asv_m3_per_h` - Actual rate without recirculation
    ///
    /// Head and efficiency come from the total rate clamped to the curve,
    /// so below minimum flow the minimum-flow head applies. The area flag
    /// reports the rate before recirculation, which makes an active ASV
    /// visible as `BelowMinFlow` on an otherwise valid point.
    pub fn evaluate(
        &self,
        speed_rpm: f64,
        rate_m3_per_h: f64,
        rate_before_asv_m3_per_h: f64,
    ) -> ChartResult<ChartOperatingPoint> {
        if !rate_m3_per_h.is_finite() || rate_m3_per_h < 0.0 {
            return Err(ChartError::InvalidArg {
                what: "actual rate must be finite and non-negative",
            });
        }
        if !rate_before_asv_m3_per_h.is_finite() || rate_before_asv_m3_per_h < 0.0 {
            return Err(ChartError::InvalidArg {
                what: "rate before recirculation must be finite and non-negative",
            });
        }

        let (speed, speed_ok) = match self {
            Self::SingleSpeed(curve) => (curve.speed_rpm(), true),
            Self::VariableSpeed(_) => {
                let slack = LIMIT_REL_TOL * self.maximum_speed();
                let ok = speed_rpm >= self.minimum_speed() - slack
                    && speed_rpm <= self.maximum_speed() + slack;
                (speed_rpm, ok)
            }
        };

        let curve = self.curve_at_speed(speed)?;
        let min_rate = curve.minimum_rate();
        let max_rate = curve.maximum_rate();
        let slack = LIMIT_REL_TOL * max_rate;
        let rate_for_lookup = rate_m3_per_h.clamp(min_rate, max_rate);

        let chart_area_flag = if rate_m3_per_h > max_rate + slack {
            ChartAreaFlag::AboveMaxFlow
        } else if rate_before_asv_m3_per_h < min_rate - slack {
            ChartAreaFlag::BelowMinFlow
        } else {
            ChartAreaFlag::Internal
        };
        let rate_ok = rate_m3_per_h >= min_rate - slack && rate_m3_per_h <= max_rate + slack;

        Ok(ChartOperatingPoint {
            speed_rpm: speed,
            actual_rate_m3_per_h: rate_m3_per_h,
            actual_rate_before_asv_m3_per_h: rate_before_asv_m3_per_h,
            minimum_rate_m3_per_h: min_rate,
            maximum_rate_m3_per_h: max_rate,
            polytropic_head_joule_per_kg: curve.head_at(rate_for_lookup),
            polytropic_efficiency: curve.efficiency_at(rate_for_lookup),
            chart_area_flag,
            is_valid: speed_ok && rate_ok,
        })
    }
}
