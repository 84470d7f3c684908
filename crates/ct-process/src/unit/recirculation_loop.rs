//! Anti-surge recirculation around a sub-system.

use super::{ProcessUnit, RateModifier, RateModifierMode};
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use crate::system::ProcessSystem;
use ct_fluids::FluidStream;

/// Wraps an inner system with a recirculation line.
///
/// The recirculated mass is added at the loop inlet, runs through every inner
/// unit, and is taken out again at the loop outlet, so the loop outlet
/// carries the same mass rate as its inlet.
#[derive(Clone, Debug)]
pub struct RecirculationLoop {
    name: String,
    inner: ProcessSystem,
    add: RateModifier,
    remove: RateModifier,
}

impl RecirculationLoop {
    /// # Errors
    /// The inner system must be non-empty and single-stream.
    pub fn new(name: impl Into<String>, inner: ProcessSystem) -> ProcessResult<Self> {
        let name = name.into();
        if inner.is_empty() {
            return Err(ProcessError::InvalidConfiguration {
                what: format!("recirculation loop '{name}' has no inner units"),
            });
        }
        if inner.is_multi_stream() {
            return Err(ProcessError::InvalidConfiguration {
                what: format!(
                    "recirculation loop '{name}' cannot contain mixers or splitters"
                ),
            });
        }
        Ok(Self {
            add: RateModifier::new(format!("{name} recirculation in"), RateModifierMode::Add),
            remove: RateModifier::new(
                format!("{name} recirculation out"),
                RateModifierMode::Remove,
            ),
            name,
            inner,
        })
    }

    pub fn inner(&self) -> &ProcessSystem {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut ProcessSystem {
        &mut self.inner
    }

    /// Recirculated mass rate [kg/h].
    pub fn recirculation_rate(&self) -> f64 {
        self.add.rate()
    }

    pub fn set_recirculation_rate(&mut self, rate_kg_per_h: f64) -> ProcessResult<()> {
        self.add.set_rate(rate_kg_per_h)?;
        self.remove.set_rate(rate_kg_per_h)
    }
}

impl ProcessUnit for RecirculationLoop {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let inner_ctx = ctx.with_recirculation(self.recirculation_rate());
        let with_recirculation = self.add.propagate_stream(ctx, inlet)?;
        let compressed = self
            .inner
            .propagate_with_context(&inner_ctx, &with_recirculation)?;
        self.remove.propagate_stream(ctx, &compressed)
    }
}
