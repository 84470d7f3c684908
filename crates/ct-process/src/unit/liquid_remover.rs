//! Scrubber that drops the condensed phase.

use tracing::{debug, warn};

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::ProcessResult;
use ct_fluids::FluidStream;

/// Removes any liquid at inlet conditions; the outlet is the vapor phase
/// at the same pressure and temperature.
#[derive(Clone, Debug)]
pub struct LiquidRemover {
    name: String,
}

impl LiquidRemover {
    /// Removing more than this share of the mass is logged as suspicious.
    const LARGE_REMOVAL_FRACTION: f64 = 0.9;

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ProcessUnit for LiquidRemover {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        if inlet.vapor_fraction_molar() >= 1.0 {
            return Ok(inlet.clone());
        }

        let split = ctx.fluid.vapor_split(inlet.fluid(), inlet.conditions())?;
        let removed = 1.0 - split.vapor_mass_fraction;
        if removed > Self::LARGE_REMOVAL_FRACTION {
            warn!(
                unit = %self.name,
                removed_mass_fraction = removed,
                "liquid remover drops most of the inlet mass"
            );
        } else {
            debug!(unit = %self.name, removed_mass_fraction = removed, "liquid removed");
        }

        let state = ctx.fluid.state_pt(&split.vapor, inlet.conditions())?;
        Ok(FluidStream::new(
            state,
            inlet.mass_rate_kg_per_h() * split.vapor_mass_fraction,
        )?)
    }
}
