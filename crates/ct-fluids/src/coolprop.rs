//! CoolProp backend through `rfluids`.

use core::fmt::Display;

use crate::eos::FluidModel;
use crate::error::{FluidError, FluidResult};
use crate::service::{FluidService, validation};
use crate::state::{ProcessConditions, SpecEnthalpy, ThermoProperties};
use ct_core::units::constants::R_UNIVERSAL;
use rfluids::prelude::*;

/// Temperature bracket of the PH flash [K].
const PH_FLASH_T_RANGE: (f64, f64) = (100.0, 1000.0);
const PH_FLASH_MAX_ITER: usize = 100;

fn backend<E: Display>(context: &'static str) -> impl FnOnce(E) -> FluidError {
    move |e| FluidError::Backend {
        message: format!("CoolProp {context}: {e}"),
    }
}

/// Reference-EoS properties of pure fluids.
///
/// The `EosModel` tag is ignored: CoolProp always uses the Helmholtz-energy
/// reference equation of the species. Mixtures are rejected.
#[derive(Debug, Clone, Default)]
pub struct CoolPropService;

impl CoolPropService {
    pub fn new() -> Self {
        Self
    }

    fn pure_of(fluid: &FluidModel) -> FluidResult<Pure> {
        let species = fluid.composition.is_pure().ok_or(FluidError::NotSupported {
            what: "CoolProp backend supports pure fluids only",
        })?;
        Ok(species.rfluids_pure())
    }

    fn state(pure: Pure, p_pa: f64, t_k: f64) -> FluidResult<Fluid> {
        Fluid::from(pure)
            .in_state(FluidInput::pressure(p_pa), FluidInput::temperature(t_k))
            .map_err(backend("state update"))
    }

    fn enthalpy_at(pure: Pure, p_pa: f64, t_k: f64) -> FluidResult<f64> {
        Self::state(pure, p_pa, t_k)?
            .enthalpy()
            .map_err(backend("enthalpy"))
    }

    fn properties_at(
        fluid_model: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<ThermoProperties> {
        let pure = Self::pure_of(fluid_model)?;
        let p_pa = conditions.pressure().value;
        let t_k = conditions.temperature_kelvin();
        let mut state = Self::state(pure, p_pa, t_k)?;

        let rho = state.density().map_err(backend("density"))?;
        let h = state.enthalpy().map_err(backend("enthalpy"))?;
        let cp = state.specific_heat().map_err(backend("cp"))?;

        // P/(ρT) is the apparent gas constant: Z = R_app/R_s, cv ≈ cp - R_app
        let r_apparent = p_pa / (rho * t_k);
        let cv = cp - r_apparent;
        if !(cv.is_finite() && cv > 0.0) {
            return Err(FluidError::Backend {
                message: format!("CoolProp gave cv = {cv} at {p_pa} Pa, {t_k} K"),
            });
        }
        let z = r_apparent * fluid_model.molar_mass_kg_per_mol() / R_UNIVERSAL;

        validation::properties(rho, h, cp, z, cp / cv, 1.0)
    }

    /// T with h(P, T) = h, by bisection over [`PH_FLASH_T_RANGE`].
    fn temperature_from_ph(pure: Pure, p_pa: f64, h: f64) -> FluidResult<f64> {
        let (mut lo, mut hi) = PH_FLASH_T_RANGE;
        if h < Self::enthalpy_at(pure, p_pa, lo)? || h > Self::enthalpy_at(pure, p_pa, hi)? {
            return Err(FluidError::OutOfRange {
                what: "enthalpy outside the PH flash temperature range",
            });
        }

        let tol = 1e-3_f64.max(h.abs() * 1e-9);
        for _ in 0..PH_FLASH_MAX_ITER {
            let mid = 0.5 * (lo + hi);
            let h_mid = Self::enthalpy_at(pure, p_pa, mid)?;
            if (h_mid - h).abs() < tol {
                return Ok(mid);
            }
            if h_mid < h {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(0.5 * (lo + hi))
    }
}

impl FluidService for CoolPropService {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports(&self, fluid: &FluidModel) -> bool {
        fluid.composition.is_pure().is_some()
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
        let pure = Self::pure_of(fluid)?;
        let probe = ProcessConditions::new(pressure_bara, 300.0)?;
        let t_k = Self::temperature_from_ph(pure, probe.pressure().value, enthalpy)?;
        let conditions = probe.with_temperature_kelvin(t_k)?;
        Ok((conditions, Self::properties_at(fluid, conditions)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::Composition;
    use crate::eos::EosModel;
    use crate::species::Species;

    #[test]
    fn service_name() {
        assert_eq!(CoolPropService::new().name(), "CoolProp");
    }

    #[test]
    fn supports_pure_fluids_only() {
        let service = CoolPropService::new();
        let pure = FluidModel::new(Composition::pure(Species::N2), EosModel::Srk);
        assert!(service.supports(&pure));

        let mix = FluidModel::new(
            Composition::new_mole_fractions(vec![(Species::CH4, 0.9), (Species::Ethane, 0.1)])
                .unwrap(),
            EosModel::Srk,
        );
        assert!(!service.supports(&mix));
        assert!(matches!(
            service.flash_pt(&mix, ProcessConditions::standard()),
            Err(FluidError::NotSupported { .. })
        ));
    }
}
