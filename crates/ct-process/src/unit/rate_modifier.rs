//! Fixed mass-rate addition or removal.

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use ct_core::numeric::ensure_non_negative;
use ct_fluids::FluidStream;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateModifierMode {
    Add,
    Remove,
}

/// Adds or removes a mass rate [kg/h] at unchanged state.
#[derive(Clone, Debug)]
pub struct RateModifier {
    name: String,
    mode: RateModifierMode,
    rate_kg_per_h: f64,
}

impl RateModifier {
    pub fn new(name: impl Into<String>, mode: RateModifierMode) -> Self {
        Self {
            name: name.into(),
            mode,
            rate_kg_per_h: 0.0,
        }
    }

    pub fn mode(&self) -> RateModifierMode {
        self.mode
    }

    pub fn rate(&self) -> f64 {
        self.rate_kg_per_h
    }

    pub fn set_rate(&mut self, rate_kg_per_h: f64) -> ProcessResult<()> {
        self.rate_kg_per_h = ensure_non_negative(rate_kg_per_h, "modified rate")?;
        Ok(())
    }
}

impl ProcessUnit for RateModifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        _ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let rate = match self.mode {
            RateModifierMode::Add => inlet.mass_rate_kg_per_h() + self.rate_kg_per_h,
            RateModifierMode::Remove => inlet.mass_rate_kg_per_h() - self.rate_kg_per_h,
        };
        if rate < 0.0 {
            return Err(ProcessError::OutsideCapacity {
                unit: self.name.clone(),
                what: format!(
                    "cannot remove {:.3} kg/h from a stream of {:.3} kg/h",
                    self.rate_kg_per_h,
                    inlet.mass_rate_kg_per_h()
                ),
            });
        }
        Ok(inlet.with_mass_rate(rate)?)
    }
}
