//! Process conditions and thermodynamic state definitions.

use crate::eos::FluidModel;
use crate::error::{FluidError, FluidResult};
use ct_core::units::{Pressure, Temperature, bara, celsius, constants, k, to_bara, to_kelvin};

/// Specific enthalpy [J/kg].
pub type SpecEnthalpy = f64;

/// Pressure and temperature of a stream.
///
/// Both are strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessConditions {
    pressure: Pressure,
    temperature: Temperature,
}

impl ProcessConditions {
    /// Create conditions from pressure [bara] and temperature [K].
    pub fn new(pressure_bara: f64, temperature_kelvin: f64) -> FluidResult<Self> {
        Self::from_quantities(bara(pressure_bara), k(temperature_kelvin))
    }

    /// Create conditions from pressure [bara] and temperature [°C].
    pub fn from_celsius(pressure_bara: f64, temperature_celsius: f64) -> FluidResult<Self> {
        Self::from_quantities(bara(pressure_bara), celsius(temperature_celsius))
    }

    pub fn from_quantities(pressure: Pressure, temperature: Temperature) -> FluidResult<Self> {
        if !pressure.value.is_finite() || pressure.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !temperature.value.is_finite() || temperature.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(Self {
            pressure,
            temperature,
        })
    }

    /// 1.01325 bara and 15 °C.
    pub fn standard() -> Self {
        Self {
            pressure: bara(constants::STANDARD_PRESSURE_BARA),
            temperature: k(constants::STANDARD_TEMPERATURE_KELVIN),
        }
    }

    pub fn pressure(&self) -> Pressure {
        self.pressure
    }

    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    pub fn pressure_bara(&self) -> f64 {
        to_bara(self.pressure)
    }

    pub fn temperature_kelvin(&self) -> f64 {
        to_kelvin(self.temperature)
    }

    pub fn with_pressure_bara(&self, pressure_bara: f64) -> FluidResult<Self> {
        Self::from_quantities(bara(pressure_bara), self.temperature)
    }

    pub fn with_temperature_kelvin(&self, temperature_kelvin: f64) -> FluidResult<Self> {
        Self::from_quantities(self.pressure, k(temperature_kelvin))
    }
}

/// Properties a backend derives from (fluid, P, T).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermoProperties {
    /// Density [kg/m³]
    pub density_kg_per_m3: f64,
    /// Specific enthalpy [J/kg]
    pub enthalpy_joule_per_kg: SpecEnthalpy,
    /// Specific heat capacity at constant pressure [J/(kg·K)]
    pub cp_joule_per_kg_kelvin: f64,
    /// Compressibility factor Z = P/(ρRT)
    pub z: f64,
    /// Isentropic exponent κ
    pub kappa: f64,
    /// Molar vapor fraction (1.0 = all vapor)
    pub vapor_fraction_molar: f64,
}

/// Fluid model at a specific (P, T) with its derived properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermoState {
    fluid: FluidModel,
    conditions: ProcessConditions,
    properties: ThermoProperties,
}

impl ThermoState {
    pub fn new(
        fluid: FluidModel,
        conditions: ProcessConditions,
        properties: ThermoProperties,
    ) -> Self {
        Self {
            fluid,
            conditions,
            properties,
        }
    }

    pub fn fluid(&self) -> &FluidModel {
        &self.fluid
    }

    pub fn conditions(&self) -> ProcessConditions {
        self.conditions
    }

    pub fn properties(&self) -> &ThermoProperties {
        &self.properties
    }

    pub fn pressure_bara(&self) -> f64 {
        self.conditions.pressure_bara()
    }

    pub fn temperature_kelvin(&self) -> f64 {
        self.conditions.temperature_kelvin()
    }
}
