//! Ideal-gas mixture backend.
//!
//! Each species carries a constant molar heat capacity, so the mixture has
//! Z = 1, a constant κ = cp/(cp − R) and h = cp·(T − T_ref) with the
//! reference at 15 °C. The PH flash is closed-form.

use crate::eos::FluidModel;
use crate::error::{FluidError, FluidResult};
use crate::service::{FluidService, validation};
use crate::state::{ProcessConditions, SpecEnthalpy, ThermoProperties};
use ct_core::units::constants::{R_UNIVERSAL, STANDARD_TEMPERATURE_KELVIN};

/// Ideal-gas mixture property service.
///
/// Ignores the EoS tag; always single-phase vapor.
#[derive(Debug, Clone, Default)]
pub struct IdealGasService;

impl IdealGasService {
    pub fn new() -> Self {
        Self
    }

    /// Mixture cp [J/(kg·K)] and specific gas constant [J/(kg·K)].
    fn mixture_constants(fluid: &FluidModel) -> (f64, f64) {
        let molar_mass = fluid.molar_mass_kg_per_mol();
        let cp_molar: f64 = fluid
            .composition
            .iter()
            .map(|(species, x)| x * species.ideal_gas_cp_molar())
            .sum();
        (cp_molar / molar_mass, R_UNIVERSAL / molar_mass)
    }

    fn properties_at(
        fluid: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<ThermoProperties> {
        let (cp, r_specific) = Self::mixture_constants(fluid);
        let p_pa = conditions.pressure().value;
        let t_k = conditions.temperature_kelvin();

        let density = p_pa / (r_specific * t_k);
        let enthalpy = cp * (t_k - STANDARD_TEMPERATURE_KELVIN);
        let kappa = cp / (cp - r_specific);

        validation::properties(density, enthalpy, cp, 1.0, kappa, 1.0)
    }
}

impl FluidService for IdealGasService {
    fn name(&self) -> &str {
        "IdealGas"
    }

    fn supports(&self, _fluid: &FluidModel) -> bool {
        true
    }

    fn flash_pt(
        &self,
        fluid: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<ThermoProperties> {
        Self::properties_at(fluid, conditions)
    }

    fn flash_ph(
        &self,
        fluid: &FluidModel,
        pressure_bara: f64,
        enthalpy: SpecEnthalpy,
    ) -> FluidResult<(ProcessConditions, ThermoProperties)> {
        validation::validate_enthalpy(enthalpy)?;
        let (cp, _) = Self::mixture_constants(fluid);
        let t_k = STANDARD_TEMPERATURE_KELVIN + enthalpy / cp;
        if t_k <= 0.0 {
            return Err(FluidError::OutOfRange {
                what: "enthalpy below absolute zero for ideal gas",
            });
        }
        let conditions = ProcessConditions::new(pressure_bara, t_k)?;
        Ok((conditions, Self::properties_at(fluid, conditions)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Composition;
    use crate::eos::EosModel;
    use crate::species::Species;

    fn methane() -> FluidModel {
        FluidModel::new(Composition::pure(Species::CH4), EosModel::Srk)
    }

    #[test]
    fn methane_density_at_pipeline_conditions() {
        let service = IdealGasService::new();
        let c = ProcessConditions::new(50.0, 303.15).unwrap();
        let rho = service.get_density(&methane(), c).unwrap();
        // P/(RT) with R = 518.3 J/(kg·K)
        assert!((rho - 31.82).abs() < 0.05, "rho = {rho}");
        assert_eq!(service.get_z(&methane(), c).unwrap(), 1.0);
    }

    #[test]
    fn kappa_for_methane_near_1_3() {
        let service = IdealGasService::new();
        let kappa = service
            .get_kappa(&methane(), ProcessConditions::standard())
            .unwrap();
        assert!((kappa - 1.304).abs() < 0.01, "kappa = {kappa}");
    }

    #[test]
    fn ph_flash_inverts_pt_flash() {
        let service = IdealGasService::new();
        let c = ProcessConditions::new(20.0, 350.0).unwrap();
        let h = service.get_enthalpy(&methane(), c).unwrap();
        let (found, _) = service.flash_ph(&methane(), 20.0, h).unwrap();
        assert!((found.temperature_kelvin() - 350.0).abs() < 1e-9);
    }

    #[test]
    fn ph_flash_rejects_enthalpy_below_absolute_zero() {
        let service = IdealGasService::new();
        assert!(service.flash_ph(&methane(), 20.0, -1.0e7).is_err());
    }

    #[test]
    fn default_vapor_split_keeps_everything() {
        let service = IdealGasService::new();
        let split = service
            .vapor_split(&methane(), ProcessConditions::standard())
            .unwrap();
        assert_eq!(split.vapor_mass_fraction, 1.0);
        assert_eq!(split.vapor, methane());
    }
}
