//! ct-fluids: fluid value objects and thermodynamic property services.
//!
//! Provides:
//! - Natural-gas species definitions (CH4, C2H6, N2, CO2, H2O, ...)
//! - Composition handling (pure fluids and mixtures, molar blending)
//! - `FluidModel`: composition plus the equation-of-state tag
//! - `ProcessConditions` and `ThermoState`
//! - `FluidService` trait for flash calculations
//! - `IdealGasService` (mixtures) and `CoolPropService` (pure fluids via rfluids)
//! - `FluidStream`: immutable thermo state + mass rate
//!
//! # Architecture
//!
//! The process and solver layers only talk to the `FluidService` trait, so the
//! property backend is swappable. Streams never change in place: every
//! operation returns a new `FluidStream`.
//!
//! # Example
//!
//! ```no_run
//! use ct_fluids::{
//!     Composition, EosModel, FluidModel, FluidStream, IdealGasService, ProcessConditions,
//!     Species,
//! };
//!
//! let service = IdealGasService::new();
//! let gas = FluidModel::new(Composition::pure(Species::CH4), EosModel::Srk);
//! let inlet = ProcessConditions::from_celsius(50.0, 30.0).unwrap();
//!
//! let stream = FluidStream::from_standard_rate(&service, gas, inlet, 1.0e6).unwrap();
//! println!("Actual rate: {:.1} m3/h", stream.volumetric_rate_m3_per_h());
//! ```

pub mod composition;
pub mod coolprop;
pub mod eos;
pub mod error;
pub mod ideal_gas;
pub mod service;
pub mod species;
pub mod state;
pub mod stream;

// Re-exports for ergonomics
pub use composition::Composition;
pub use coolprop::CoolPropService;
pub use eos::{EosModel, FluidModel};
pub use error::{FluidError, FluidResult};
pub use ideal_gas::IdealGasService;
pub use service::{FluidService, PhaseSplit};
pub use species::Species;
pub use state::{ProcessConditions, SpecEnthalpy, ThermoProperties, ThermoState};
pub use stream::FluidStream;
