//! Process units.
//!
//! Every unit turns one inlet stream into one outlet stream. Streams are
//! never mutated; units only keep their own configuration and the operating
//! point of the last propagation.

mod choke;
mod compressor;
mod liquid_remover;
mod mixer;
mod rate_modifier;
mod recirculation_loop;
mod splitter;
mod temperature_setter;

pub use choke::{Choke, ChokeValve};
pub use compressor::{Compressor, polytropic_compression};
pub use liquid_remover::LiquidRemover;
pub use mixer::Mixer;
pub use rate_modifier::{RateModifier, RateModifierMode};
pub use recirculation_loop::RecirculationLoop;
pub use splitter::Splitter;
pub use temperature_setter::TemperatureSetter;

use crate::context::PropagationContext;
use crate::error::ProcessResult;
use ct_fluids::FluidStream;

/// Common interface of all process units.
pub trait ProcessUnit {
    /// Unit name for logging and reporting.
    fn name(&self) -> &str;

    /// Compute the outlet stream for `inlet` under the current configuration.
    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream>;

    /// Whether the unit takes or produces more than one stream.
    fn is_multi_stream(&self) -> bool {
        false
    }
}

/// Closed set of units a [`ProcessSystem`](crate::ProcessSystem) can hold.
#[derive(Debug, Clone)]
pub enum Unit {
    Compressor(Compressor),
    Choke(Choke),
    ChokeValve(ChokeValve),
    Mixer(Mixer),
    Splitter(Splitter),
    RateModifier(RateModifier),
    TemperatureSetter(TemperatureSetter),
    LiquidRemover(LiquidRemover),
    RecirculationLoop(RecirculationLoop),
}

impl Unit {
    pub fn kind(&self) -> &'static str {
        match self {
            Unit::Compressor(_) => "compressor",
            Unit::Choke(_) => "choke",
            Unit::ChokeValve(_) => "choke valve",
            Unit::Mixer(_) => "mixer",
            Unit::Splitter(_) => "splitter",
            Unit::RateModifier(_) => "rate modifier",
            Unit::TemperatureSetter(_) => "temperature setter",
            Unit::LiquidRemover(_) => "liquid remover",
            Unit::RecirculationLoop(_) => "recirculation loop",
        }
    }

    fn as_unit(&self) -> &dyn ProcessUnit {
        match self {
            Unit::Compressor(u) => u,
            Unit::Choke(u) => u,
            Unit::ChokeValve(u) => u,
            Unit::Mixer(u) => u,
            Unit::Splitter(u) => u,
            Unit::RateModifier(u) => u,
            Unit::TemperatureSetter(u) => u,
            Unit::LiquidRemover(u) => u,
            Unit::RecirculationLoop(u) => u,
        }
    }

    fn as_unit_mut(&mut self) -> &mut dyn ProcessUnit {
        match self {
            Unit::Compressor(u) => u,
            Unit::Choke(u) => u,
            Unit::ChokeValve(u) => u,
            Unit::Mixer(u) => u,
            Unit::Splitter(u) => u,
            Unit::RateModifier(u) => u,
            Unit::TemperatureSetter(u) => u,
            Unit::LiquidRemover(u) => u,
            Unit::RecirculationLoop(u) => u,
        }
    }
}

impl ProcessUnit for Unit {
    fn name(&self) -> &str {
        self.as_unit().name()
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        self.as_unit_mut().propagate_stream(ctx, inlet)
    }

    fn is_multi_stream(&self) -> bool {
        self.as_unit().is_multi_stream()
    }
}

macro_rules! unit_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Unit {
                fn from(unit: $variant) -> Self {
                    Unit::$variant(unit)
                }
            }
        )*
    };
}

unit_from!(
    Compressor,
    Choke,
    ChokeValve,
    Mixer,
    Splitter,
    RateModifier,
    TemperatureSetter,
    LiquidRemover,
    RecirculationLoop,
);
