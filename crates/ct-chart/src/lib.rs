//! ct-chart: compressor performance charts.
//!
//! A chart maps (shaft speed, actual volumetric rate) to polytropic head and
//! efficiency, and classifies the point against the chart envelope.
//!
//! - [`ChartCurve`]: one constant-speed curve (rate, head, efficiency arrays)
//! - [`CompressorChart`]: single-speed or variable-speed chart
//! - [`ChartOperatingPoint`] / [`ChartAreaFlag`]: evaluation results
//!
//! Between two known speeds the chart synthesizes an equivalent curve by
//! linear interpolation at matching rate fractions; see
//! [`ChartCurve::interpolate`].

pub mod chart;
pub mod curve;
pub mod error;
pub mod point;

pub use chart::CompressorChart;
pub use curve::{ChartCurve, ChartCurveData};
pub use error::{ChartError, ChartResult};
pub use point::{ChartAreaFlag, ChartOperatingPoint};
