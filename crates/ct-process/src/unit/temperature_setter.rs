//! Cooler/heater with a fixed outlet temperature.

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use ct_fluids::FluidStream;

#[derive(Clone, Debug)]
pub struct TemperatureSetter {
    name: String,
    temperature_kelvin: f64,
}

impl TemperatureSetter {
    pub fn new(name: impl Into<String>, temperature_kelvin: f64) -> ProcessResult<Self> {
        if !temperature_kelvin.is_finite() || temperature_kelvin <= 0.0 {
            return Err(ProcessError::InvalidArg {
                what: "required temperature must be finite and positive",
            });
        }
        Ok(Self {
            name: name.into(),
            temperature_kelvin,
        })
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.temperature_kelvin
    }
}

impl ProcessUnit for TemperatureSetter {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        if inlet.temperature_kelvin() == self.temperature_kelvin {
            return Ok(inlet.clone());
        }
        let conditions = inlet
            .conditions()
            .with_temperature_kelvin(self.temperature_kelvin)?;
        Ok(inlet.with_conditions(ctx.fluid, conditions)?)
    }
}
