//! Fluid property service trait and validation helpers.

use crate::eos::FluidModel;
use crate::error::{FluidError, FluidResult};
use crate::state::{ProcessConditions, SpecEnthalpy, ThermoProperties, ThermoState};

/// Vapor part of a (possibly two-phase) fluid.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSplit {
    /// Fluid model of the vapor phase.
    pub vapor: FluidModel,
    /// Vapor mass over total mass, in [0, 1].
    pub vapor_mass_fraction: f64,
}

/// Thermodynamic engine consumed by process units.
///
/// Every call is a pure function of (composition, EoS, P, T) or (…, P, h);
/// implementations must be thread-safe (Send + Sync).
pub trait FluidService: Send + Sync {
    /// Get the backend name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this backend can evaluate the given fluid.
    fn supports(&self, fluid: &FluidModel) -> bool;

    /// Pressure-temperature flash.
    fn flash_pt(
        &self,
        fluid: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<ThermoProperties>;

    /// Pressure-enthalpy flash, returning the temperature found with its properties.
    fn flash_ph(
        &self,
        fluid: &FluidModel,
        pressure_bara: f64,
        enthalpy: SpecEnthalpy,
    ) -> FluidResult<(ProcessConditions, ThermoProperties)>;

    /// Split off the vapor phase at the given conditions.
    ///
    /// Default: single-phase vapor, nothing to remove.
    fn vapor_split(
        &self,
        fluid: &FluidModel,
        _conditions: ProcessConditions,
    ) -> FluidResult<PhaseSplit> {
        Ok(PhaseSplit {
            vapor: fluid.clone(),
            vapor_mass_fraction: 1.0,
        })
    }

    /// Full state at (P, T).
    fn state_pt(&self, fluid: &FluidModel, conditions: ProcessConditions) -> FluidResult<ThermoState> {
        let properties = self.flash_pt(fluid, conditions)?;
        Ok(ThermoState::new(fluid.clone(), conditions, properties))
    }

    /// Full state at (P, h).
    fn state_ph(
        &self,
        fluid: &FluidModel,
        pressure_bara: f64,
        enthalpy: SpecEnthalpy,
    ) -> FluidResult<ThermoState> {
        let (conditions, properties) = self.flash_ph(fluid, pressure_bara, enthalpy)?;
        Ok(ThermoState::new(fluid.clone(), conditions, properties))
    }

    /// Density at standard conditions [kg/Sm³].
    fn standard_density(&self, fluid: &FluidModel) -> FluidResult<f64> {
        self.get_density(fluid, ProcessConditions::standard())
    }

    /// Density [kg/m³].
    fn get_density(&self, fluid: &FluidModel, conditions: ProcessConditions) -> FluidResult<f64> {
        Ok(self.flash_pt(fluid, conditions)?.density_kg_per_m3)
    }

    /// Specific enthalpy [J/kg].
    fn get_enthalpy(&self, fluid: &FluidModel, conditions: ProcessConditions) -> FluidResult<f64> {
        Ok(self.flash_pt(fluid, conditions)?.enthalpy_joule_per_kg)
    }

    /// Compressibility factor.
    fn get_z(&self, fluid: &FluidModel, conditions: ProcessConditions) -> FluidResult<f64> {
        Ok(self.flash_pt(fluid, conditions)?.z)
    }

    /// Isentropic exponent.
    fn get_kappa(&self, fluid: &FluidModel, conditions: ProcessConditions) -> FluidResult<f64> {
        Ok(self.flash_pt(fluid, conditions)?.kappa)
    }

    /// Molar vapor fraction.
    fn get_vapor_fraction_molar(
        &self,
        fluid: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<f64> {
        Ok(self.flash_pt(fluid, conditions)?.vapor_fraction_molar)
    }
}

/// Sanity checks on backend outputs before they reach a stream.
pub(crate) mod validation {
    use super::*;

    fn above(value: f64, floor: f64, what: &'static str) -> FluidResult<()> {
        if value.is_finite() && value > floor {
            Ok(())
        } else {
            Err(FluidError::NonPhysical { what })
        }
    }

    /// Enthalpy has an arbitrary reference, so only finiteness is checked.
    pub fn validate_enthalpy(h: f64) -> FluidResult<()> {
        above(h, f64::NEG_INFINITY, "enthalpy")
    }

    /// Bundle the outputs of a flash, rejecting anything a gas cannot have.
    pub fn properties(
        density_kg_per_m3: f64,
        enthalpy_joule_per_kg: f64,
        cp_joule_per_kg_kelvin: f64,
        z: f64,
        kappa: f64,
        vapor_fraction_molar: f64,
    ) -> FluidResult<ThermoProperties> {
        above(density_kg_per_m3, 0.0, "density")?;
        validate_enthalpy(enthalpy_joule_per_kg)?;
        above(cp_joule_per_kg_kelvin, 0.0, "cp")?;
        above(z, 0.0, "compressibility factor")?;
        above(kappa, 1.0, "kappa")?;
        if !(0.0..=1.0).contains(&vapor_fraction_molar) {
            return Err(FluidError::OutOfRange {
                what: "vapor fraction",
            });
        }
        Ok(ThermoProperties {
            density_kg_per_m3,
            enthalpy_joule_per_kg,
            cp_joule_per_kg_kelvin,
            z,
            kappa,
            vapor_fraction_molar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;

    #[test]
    fn gas_properties_pass() {
        assert!(properties(31.8, -4.6e6, 2230.0, 0.91, 1.30, 1.0).is_ok());
    }

    #[test]
    fn non_physical_outputs_are_rejected() {
        assert!(properties(0.0, 0.0, 2000.0, 1.0, 1.3, 1.0).is_err());
        assert!(properties(1.0, f64::NAN, 2000.0, 1.0, 1.3, 1.0).is_err());
        assert!(properties(1.0, 0.0, -1.0, 1.0, 1.3, 1.0).is_err());
        assert!(properties(1.0, 0.0, 2000.0, 0.0, 1.3, 1.0).is_err());
        assert!(properties(1.0, 0.0, 2000.0, 1.0, 1.0, 1.0).is_err());
        assert!(properties(1.0, 0.0, 2000.0, 1.0, f64::INFINITY, 1.0).is_err());
        assert!(properties(1.0, 0.0, 2000.0, 1.0, 1.3, 1.2).is_err());
    }

    #[test]
    fn enthalpy_may_be_negative() {
        assert!(validate_enthalpy(-1.0e7).is_ok());
        assert!(validate_enthalpy(f64::INFINITY).is_err());
    }
}
