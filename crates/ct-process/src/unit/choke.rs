//! Isenthalpic pressure reducers.

use tracing::warn;

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use ct_core::numeric::ensure_non_negative;
use ct_fluids::FluidStream;

fn validate_pressure_change(pressure_change_bar: f64) -> ProcessResult<f64> {
    Ok(ensure_non_negative(pressure_change_bar, "pressure change")?)
}

/// Isenthalpic throttle with a settable pressure drop [bar].
#[derive(Clone, Debug)]
pub struct Choke {
    name: String,
    pressure_change_bar: f64,
}

impl Choke {
    /// Create a choke with no pressure drop.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pressure_change_bar: 0.0,
        }
    }

    /// Create a choke with a fixed pressure drop.
    pub fn with_pressure_change(
        name: impl Into<String>,
        pressure_change_bar: f64,
    ) -> ProcessResult<Self> {
        let mut choke = Self::new(name);
        choke.set_pressure_change(pressure_change_bar)?;
        Ok(choke)
    }

    pub fn pressure_change(&self) -> f64 {
        self.pressure_change_bar
    }

    pub fn set_pressure_change(&mut self, pressure_change_bar: f64) -> ProcessResult<()> {
        self.pressure_change_bar = validate_pressure_change(pressure_change_bar)?;
        Ok(())
    }
}

impl ProcessUnit for Choke {
    fn name(&self) -> &str {
        &self.name
    }

    /// A zero drop returns the inlet unchanged, skipping the flash.
    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        if self.pressure_change_bar == 0.0 {
            return Ok(inlet.clone());
        }
        let outlet_pressure = inlet.pressure_bara() - self.pressure_change_bar;
        if outlet_pressure <= 0.0 {
            return Err(ProcessError::OutsideCapacity {
                unit: self.name.clone(),
                what: format!(
                    "pressure drop {:.4} bar from {:.4} bara leaves no positive outlet pressure",
                    self.pressure_change_bar,
                    inlet.pressure_bara()
                ),
            });
        }
        Ok(inlet.with_pressure_and_enthalpy(ctx.fluid, outlet_pressure, inlet.enthalpy())?)
    }
}

/// Choke that caps the pressure drop at the critical pressure ratio.
///
/// ```text
/// P_crit = P_in · (2/(κ+1))^(κ/(κ-1))
/// ```
///
/// Asking for an outlet pressure below `P_crit` clamps it to `P_crit` and
/// logs a warning.
#[derive(Clone, Debug)]
pub struct ChokeValve {
    name: String,
    pressure_change_bar: f64,
    choked: bool,
}

impl ChokeValve {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pressure_change_bar: 0.0,
            choked: false,
        }
    }

    pub fn with_pressure_change(
        name: impl Into<String>,
        pressure_change_bar: f64,
    ) -> ProcessResult<Self> {
        let mut valve = Self::new(name);
        valve.set_pressure_change(pressure_change_bar)?;
        Ok(valve)
    }

    pub fn pressure_change(&self) -> f64 {
        self.pressure_change_bar
    }

    pub fn set_pressure_change(&mut self, pressure_change_bar: f64) -> ProcessResult<()> {
        self.pressure_change_bar = validate_pressure_change(pressure_change_bar)?;
        Ok(())
    }

    /// Whether the last propagation hit choked flow.
    pub fn was_choked(&self) -> bool {
        self.choked
    }

    /// Critical outlet pressure [bara] for an inlet stream.
    pub fn critical_pressure_bara(inlet: &FluidStream) -> f64 {
        let kappa = inlet.kappa();
        inlet.pressure_bara() * (2.0 / (kappa + 1.0)).powf(kappa / (kappa - 1.0))
    }
}

impl ProcessUnit for ChokeValve {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        self.choked = false;
        if self.pressure_change_bar == 0.0 {
            return Ok(inlet.clone());
        }

        let requested = inlet.pressure_bara() - self.pressure_change_bar;
        let critical = Self::critical_pressure_bara(inlet);
        let outlet_pressure = if requested < critical {
            warn!(
                valve = %self.name,
                requested_bara = requested,
                critical_bara = critical,
                "choked flow: outlet pressure clamped to critical pressure"
            );
            self.choked = true;
            critical
        } else {
            requested
        };
        Ok(inlet.with_pressure_and_enthalpy(ctx.fluid, outlet_pressure, inlet.enthalpy())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_fluids::{
        Composition, EosModel, FluidModel, IdealGasService, ProcessConditions, Species,
    };

    fn stream(service: &IdealGasService, p: f64) -> FluidStream {
        FluidStream::from_mass_rate(
            service,
            FluidModel::new(Composition::pure(Species::CH4), EosModel::Srk),
            ProcessConditions::new(p, 300.0).unwrap(),
            5_000.0,
        )
        .unwrap()
    }

    #[test]
    fn zero_drop_is_identity() {
        let service = IdealGasService::new();
        let ctx = PropagationContext::new(&service, None);
        let inlet = stream(&service, 40.0);
        let outlet = Choke::new("c").propagate_stream(&ctx, &inlet).unwrap();
        assert_eq!(outlet, inlet);
    }

    #[test]
    fn negative_drop_is_invalid_input() {
        assert!(matches!(
            Choke::with_pressure_change("c", -1.0),
            Err(ProcessError::InvalidArg { .. })
        ));
        assert!(ChokeValve::with_pressure_change("v", -0.1).is_err());
    }

    #[test]
    fn drop_beyond_inlet_pressure_is_outside_capacity() {
        let service = IdealGasService::new();
        let ctx = PropagationContext::new(&service, None);
        let inlet = stream(&service, 40.0);
        let mut choke = Choke::with_pressure_change("c", 45.0).unwrap();
        assert!(matches!(
            choke.propagate_stream(&ctx, &inlet),
            Err(ProcessError::OutsideCapacity { .. })
        ));
    }

    #[test]
    fn isenthalpic_for_ideal_gas_keeps_temperature() {
        let service = IdealGasService::new();
        let ctx = PropagationContext::new(&service, None);
        let inlet = stream(&service, 40.0);
        let mut choke = Choke::with_pressure_change("c", 10.0).unwrap();
        let outlet = choke.propagate_stream(&ctx, &inlet).unwrap();
        assert!((outlet.pressure_bara() - 30.0).abs() < 1e-9);
        assert!((outlet.temperature_kelvin() - 300.0).abs() < 1e-9);
        assert_eq!(outlet.mass_rate_kg_per_h(), inlet.mass_rate_kg_per_h());
    }

    #[test]
    fn valve_below_critical_clamps() {
        let service = IdealGasService::new();
        let ctx = PropagationContext::new(&service, None);
        let inlet = stream(&service, 40.0);
        let naive = 40.0 - 35.0;
        let mut valve = ChokeValve::with_pressure_change("v", 35.0).unwrap();

        let outlet = valve.propagate_stream(&ctx, &inlet).unwrap();
        let critical = ChokeValve::critical_pressure_bara(&inlet);

        assert!(valve.was_choked());
        assert!(outlet.pressure_bara() > naive);
        assert!((outlet.pressure_bara() - critical).abs() < 1e-9);
    }

    #[test]
    fn valve_above_critical_behaves_like_choke() {
        let service = IdealGasService::new();
        let ctx = PropagationContext::new(&service, None);
        let inlet = stream(&service, 40.0);
        let mut valve = ChokeValve::with_pressure_change("v", 5.0).unwrap();
        let outlet = valve.propagate_stream(&ctx, &inlet).unwrap();
        assert!(!valve.was_choked());
        assert!((outlet.pressure_bara() - 35.0).abs() < 1e-9);
    }
}
