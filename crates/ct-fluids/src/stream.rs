//! Fluid streams: a thermodynamic state moving at a mass rate.

use crate::eos::FluidModel;
use crate::error::{FluidError, FluidResult};
use crate::service::FluidService;
use crate::state::{ProcessConditions, SpecEnthalpy, ThermoState};
use ct_core::units::HOURS_PER_DAY;

/// Immutable fluid stream.
///
/// Every transformation returns a new stream. Volumetric and standard rates
/// are derived on request, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidStream {
    state: ThermoState,
    mass_rate_kg_per_h: f64,
}

fn validate_mass_rate(mass_rate_kg_per_h: f64) -> FluidResult<f64> {
    if !mass_rate_kg_per_h.is_finite() {
        return Err(FluidError::NonPhysical {
            what: "mass rate must be finite",
        });
    }
    if mass_rate_kg_per_h < 0.0 {
        return Err(FluidError::NonPhysical {
            what: "mass rate must be non-negative",
        });
    }
    Ok(mass_rate_kg_per_h)
}

impl FluidStream {
    /// Wrap an existing state. Fails on a negative or non-finite mass rate.
    pub fn new(state: ThermoState, mass_rate_kg_per_h: f64) -> FluidResult<Self> {
        Ok(Self {
            state,
            mass_rate_kg_per_h: validate_mass_rate(mass_rate_kg_per_h)?,
        })
    }

    /// Create a stream at `conditions` flowing `mass_rate_kg_per_h`.
    pub fn from_mass_rate(
        service: &dyn FluidService,
        fluid: FluidModel,
        conditions: ProcessConditions,
        mass_rate_kg_per_h: f64,
    ) -> FluidResult<Self> {
        let mass_rate_kg_per_h = validate_mass_rate(mass_rate_kg_per_h)?;
        let state = service.state_pt(&fluid, conditions)?;
        Ok(Self {
            state,
            mass_rate_kg_per_h,
        })
    }

    /// Create a stream from a standard volume rate [Sm³/day].
    pub fn from_standard_rate(
        service: &dyn FluidService,
        fluid: FluidModel,
        conditions: ProcessConditions,
        standard_rate_sm3_per_day: f64,
    ) -> FluidResult<Self> {
        if !standard_rate_sm3_per_day.is_finite() || standard_rate_sm3_per_day < 0.0 {
            return Err(FluidError::NonPhysical {
                what: "standard rate must be finite and non-negative",
            });
        }
        let standard_density = service.standard_density(&fluid)?;
        let mass_rate = standard_rate_sm3_per_day * standard_density / HOURS_PER_DAY;
        Self::from_mass_rate(service, fluid, conditions, mass_rate)
    }

    pub fn state(&self) -> &ThermoState {
        &self.state
    }

    pub fn fluid(&self) -> &FluidModel {
        self.state.fluid()
    }

    pub fn conditions(&self) -> ProcessConditions {
        self.state.conditions()
    }

    pub fn pressure_bara(&self) -> f64 {
        self.state.pressure_bara()
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.state.temperature_kelvin()
    }

    pub fn density(&self) -> f64 {
        self.state.properties().density_kg_per_m3
    }

    pub fn enthalpy(&self) -> SpecEnthalpy {
        self.state.properties().enthalpy_joule_per_kg
    }

    pub fn z(&self) -> f64 {
        self.state.properties().z
    }

    pub fn kappa(&self) -> f64 {
        self.state.properties().kappa
    }

    pub fn vapor_fraction_molar(&self) -> f64 {
        self.state.properties().vapor_fraction_molar
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass(&self) -> f64 {
        self.state.fluid().molar_mass_kg_per_mol()
    }

    pub fn mass_rate_kg_per_h(&self) -> f64 {
        self.mass_rate_kg_per_h
    }

    /// Molar rate [kmol/h].
    pub fn molar_rate_kmol_per_h(&self) -> f64 {
        self.mass_rate_kg_per_h / self.state.fluid().composition.molar_mass()
    }

    /// Actual volumetric rate [m³/h] at the stream's own conditions.
    pub fn volumetric_rate_m3_per_h(&self) -> f64 {
        self.mass_rate_kg_per_h / self.density()
    }

    /// Standard volume rate [Sm³/day].
    pub fn standard_rate_sm3_per_day(&self, service: &dyn FluidService) -> FluidResult<f64> {
        let standard_density = service.standard_density(self.fluid())?;
        Ok(self.mass_rate_kg_per_h * HOURS_PER_DAY / standard_density)
    }

    /// Same state, different mass rate.
    pub fn with_mass_rate(&self, mass_rate_kg_per_h: f64) -> FluidResult<Self> {
        Self::new(self.state.clone(), mass_rate_kg_per_h)
    }

    /// Same fluid and rate, re-flashed at new (P, T).
    pub fn with_conditions(
        &self,
        service: &dyn FluidService,
        conditions: ProcessConditions,
    ) -> FluidResult<Self> {
        Ok(Self {
            state: service.state_pt(self.fluid(), conditions)?,
            mass_rate_kg_per_h: self.mass_rate_kg_per_h,
        })
    }

    /// Same fluid and rate, re-flashed at new (P, h).
    pub fn with_pressure_and_enthalpy(
        &self,
        service: &dyn FluidService,
        pressure_bara: f64,
        enthalpy: SpecEnthalpy,
    ) -> FluidResult<Self> {
        Ok(Self {
            state: service.state_ph(self.fluid(), pressure_bara, enthalpy)?,
            mass_rate_kg_per_h: self.mass_rate_kg_per_h,
        })
    }
}
