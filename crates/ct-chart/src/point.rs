//! Chart evaluation results.

/// Where an operating point sits relative to the chart envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ChartAreaFlag {
    BelowMinFlow,
    Internal,
    AboveMaxFlow,
}

/// Result of evaluating a chart at (speed, rate).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChartOperatingPoint {
    /// Speed the chart was evaluated at [rpm]
    pub speed_rpm: f64,
    /// Actual rate through the compressor, recirculation included [m³/h]
    pub actual_rate_m3_per_h: f64,
    /// Actual rate before anti-surge recirculation [m³/h]
    pub actual_rate_before_asv_m3_per_h: f64,
    /// Minimum rate of the curve at this speed [m³/h]
    pub minimum_rate_m3_per_h: f64,
    /// Maximum rate of the curve at this speed [m³/h]
    pub maximum_rate_m3_per_h: f64,
    /// Polytropic head [J/kg]
    pub polytropic_head_joule_per_kg: f64,
    /// Polytropic efficiency (0, 1]
    pub polytropic_efficiency: f64,
    pub chart_area_flag: ChartAreaFlag,
    /// Speed inside the chart range and total rate inside the envelope.
    pub is_valid: bool,
}

impl ChartOperatingPoint {
    /// Total rate, recirculation included, is left of the minimum-flow line.
    pub fn is_below_minimum_flow(&self) -> bool {
        self.actual_rate_m3_per_h < self.minimum_rate_m3_per_h - crate::chart::LIMIT_REL_TOL * self.maximum_rate_m3_per_h
    }
}
