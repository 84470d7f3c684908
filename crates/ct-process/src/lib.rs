//! ct-process: process units and the process system that chains them.
//!
//! A [`ProcessSystem`] is an ordered list of process units plus an optional
//! [`Shaft`]. Propagating a [`FluidStream`](ct_fluids::FluidStream) runs it
//! through every unit in order and returns the outlet stream.
//!
//! Units:
//! - [`Compressor`]: chart lookup + polytropic compression
//! - [`Choke`] / [`ChokeValve`]: isenthalpic pressure drop (the valve clamps choked flow)
//! - [`Mixer`] / [`Splitter`]: N streams into one, one stream into N
//! - [`RateModifier`]: add or remove a fixed mass rate
//! - [`TemperatureSetter`]: force the outlet temperature
//! - [`LiquidRemover`]: drop the condensed phase
//! - [`RecirculationLoop`]: inner system wrapped by an anti-surge recirculation
//!
//! The mutable knobs that solvers turn (shaft speed, recirculation rate,
//! choke pressure drop) are addressed by [`UnitId`](ct_core::UnitId).

pub mod context;
pub mod error;
pub mod operating_point;
pub mod shaft;
pub mod system;
pub mod unit;

pub use context::PropagationContext;
pub use error::{ProcessError, ProcessResult};
pub use operating_point::{CompressorOperatingPoint, UnitOperatingPoint};
pub use shaft::{Shaft, ShaftKind};
pub use system::{ProcessSystem, ProcessSystemBuilder};
pub use unit::{
    Choke, ChokeValve, Compressor, LiquidRemover, Mixer, ProcessUnit, RateModifier,
    RateModifierMode, RecirculationLoop, Splitter, TemperatureSetter, Unit,
};
