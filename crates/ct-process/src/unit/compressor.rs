//! Compressor stage driven by a chart.

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use crate::operating_point::CompressorOperatingPoint;
use ct_chart::CompressorChart;
use ct_core::units::SECONDS_PER_HOUR;
use ct_core::units::constants::R_UNIVERSAL;
use ct_fluids::{FluidService, FluidStream};

/// Compressor stage.
///
/// ## Model
///
/// The chart gives polytropic head `H` and efficiency `η` at the shaft speed
/// and the actual inlet rate. The outlet pressure follows the polytropic
/// relation
///
/// ```text
/// (n-1)/n = (κ-1) / (κ·η)
/// P2/P1   = (1 + H·((n-1)/n)·M / (Z·R·T1)) ^ (n/(n-1))
/// ```
///
/// with Z and κ averaged between inlet and outlet and iterated to a fixed
/// point. The outlet enthalpy is `h1 + H/η`.
#[derive(Clone, Debug)]
pub struct Compressor {
    name: String,
    chart: CompressorChart,
    last_operating_point: Option<CompressorOperatingPoint>,
}

impl Compressor {
    pub fn new(name: impl Into<String>, chart: CompressorChart) -> Self {
        Self {
            name: name.into(),
            chart,
            last_operating_point: None,
        }
    }

    pub fn chart(&self) -> &CompressorChart {
        &self.chart
    }

    /// Operating point of the last propagation, if any.
    pub fn operating_point(&self) -> Option<&CompressorOperatingPoint> {
        self.last_operating_point.as_ref()
    }

    fn speed_for(&self, ctx: &PropagationContext<'_>) -> ProcessResult<f64> {
        match (&self.chart, ctx.speed_rpm) {
            (CompressorChart::SingleSpeed(curve), _) => Ok(curve.speed_rpm()),
            (CompressorChart::VariableSpeed(_), Some(speed)) => Ok(speed),
            (CompressorChart::VariableSpeed(_), None) => Err(ProcessError::InvalidConfiguration {
                what: format!(
                    "compressor '{}' has a variable-speed chart but no shaft speed is set",
                    self.name
                ),
            }),
        }
    }
}

/// Compress `inlet` by a polytropic head [J/kg] at a polytropic efficiency.
pub fn polytropic_compression(
    fluid: &dyn FluidService,
    inlet: &FluidStream,
    polytropic_head: f64,
    polytropic_efficiency: f64,
) -> ProcessResult<FluidStream> {
    const MAX_ITER: usize = 50;
    const REL_TOL: f64 = 1e-10;

    if !polytropic_head.is_finite() || polytropic_head < 0.0 {
        return Err(ProcessError::InvalidArg {
            what: "polytropic head must be finite and non-negative",
        });
    }
    if !polytropic_efficiency.is_finite()
        || polytropic_efficiency <= 0.0
        || polytropic_efficiency > 1.0
    {
        return Err(ProcessError::InvalidArg {
            what: "polytropic efficiency must be within (0, 1]",
        });
    }

    let p1 = inlet.pressure_bara();
    let t1 = inlet.temperature_kelvin();
    let molar_mass = inlet.molar_mass();
    let h2 = inlet.enthalpy() + polytropic_head / polytropic_efficiency;

    let outlet_at = |z: f64, kappa: f64| -> ProcessResult<FluidStream> {
        let exponent = (kappa - 1.0) / (kappa * polytropic_efficiency);
        let ratio = (1.0 + polytropic_head * exponent * molar_mass / (z * R_UNIVERSAL * t1))
            .powf(1.0 / exponent);
        Ok(inlet.with_pressure_and_enthalpy(fluid, p1 * ratio, h2)?)
    };

    let mut outlet = outlet_at(inlet.z(), inlet.kappa())?;
    for _ in 0..MAX_ITER {
        let z_avg = 0.5 * (inlet.z() + outlet.z());
        let kappa_avg = 0.5 * (inlet.kappa() + outlet.kappa());
        let next = outlet_at(z_avg, kappa_avg)?;
        let settled =
            (next.pressure_bara() - outlet.pressure_bara()).abs() <= REL_TOL * next.pressure_bara();
        outlet = next;
        if settled {
            break;
        }
    }
    Ok(outlet)
}

impl ProcessUnit for Compressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let speed = self.speed_for(ctx)?;
        let mass_rate = inlet.mass_rate_kg_per_h();
        let recirculated = ctx.recirculation_kg_per_h.min(mass_rate);

        let rate = inlet.volumetric_rate_m3_per_h();
        let rate_before_asv = (mass_rate - recirculated) / inlet.density();
        let chart_point = self.chart.evaluate(speed, rate, rate_before_asv)?;

        let outlet = polytropic_compression(
            ctx.fluid,
            inlet,
            chart_point.polytropic_head_joule_per_kg,
            chart_point.polytropic_efficiency,
        )?;

        let specific_work = chart_point.polytropic_head_joule_per_kg / chart_point.polytropic_efficiency;
        self.last_operating_point = Some(CompressorOperatingPoint {
            chart: chart_point,
            inlet_pressure_bara: inlet.pressure_bara(),
            outlet_pressure_bara: outlet.pressure_bara(),
            inlet_temperature_kelvin: inlet.temperature_kelvin(),
            outlet_temperature_kelvin: outlet.temperature_kelvin(),
            mass_rate_kg_per_h: mass_rate,
            fluid_power_megawatt: mass_rate / SECONDS_PER_HOUR * specific_work / 1.0e6,
        });
        Ok(outlet)
    }
}
