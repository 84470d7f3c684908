//! Adiabatic stream mixer.

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use ct_fluids::{Composition, FluidModel, FluidService, FluidStream};

/// Mixes the propagated stream with a set of side streams.
///
/// The outlet takes the lowest inlet pressure, the molar-blended composition
/// and the mass-weighted enthalpy. Mass is conserved.
#[derive(Clone, Debug)]
pub struct Mixer {
    name: String,
    side_streams: Vec<FluidStream>,
}

impl Mixer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            side_streams: Vec::new(),
        }
    }

    pub fn side_streams(&self) -> &[FluidStream] {
        &self.side_streams
    }

    /// Streams mixed into the propagated inlet.
    pub fn set_side_streams(&mut self, streams: Vec<FluidStream>) {
        self.side_streams = streams;
    }

    /// Mix any number of streams into one.
    pub fn mix(fluid: &dyn FluidService, streams: &[FluidStream]) -> ProcessResult<FluidStream> {
        let Some(first) = streams.first() else {
            return Err(ProcessError::InvalidArg {
                what: "mixer needs at least one inlet stream",
            });
        };
        let eos = first.fluid().eos;
        if streams.iter().any(|s| s.fluid().eos != eos) {
            return Err(ProcessError::InvalidConfiguration {
                what: "mixer inlets use different equations of state".to_string(),
            });
        }
        if streams.len() == 1 {
            return Ok(first.clone());
        }

        let pressure = streams
            .iter()
            .map(FluidStream::pressure_bara)
            .fold(f64::INFINITY, f64::min);
        let total_mass: f64 = streams.iter().map(FluidStream::mass_rate_kg_per_h).sum();
        let total_moles: f64 = streams.iter().map(FluidStream::molar_rate_kmol_per_h).sum();

        // No flow at all: blend and average with equal weights.
        let (parts, enthalpy) = if total_moles > 0.0 {
            let parts: Vec<(&Composition, f64)> = streams
                .iter()
                .map(|s| (&s.fluid().composition, s.molar_rate_kmol_per_h()))
                .collect();
            let enthalpy = streams
                .iter()
                .map(|s| s.enthalpy() * s.mass_rate_kg_per_h())
                .sum::<f64>()
                / total_mass;
            (parts, enthalpy)
        } else {
            let parts: Vec<(&Composition, f64)> = streams
                .iter()
                .map(|s| (&s.fluid().composition, 1.0))
                .collect();
            let enthalpy =
                streams.iter().map(FluidStream::enthalpy).sum::<f64>() / streams.len() as f64;
            (parts, enthalpy)
        };

        let model = FluidModel::new(Composition::blend(&parts)?, eos);
        let state = fluid.state_ph(&model, pressure, enthalpy)?;
        Ok(FluidStream::new(state, total_mass)?)
    }
}

impl ProcessUnit for Mixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let mut streams = Vec::with_capacity(self.side_streams.len() + 1);
        streams.push(inlet.clone());
        streams.extend(self.side_streams.iter().cloned());
        Self::mix(ctx.fluid, &streams)
    }

    fn is_multi_stream(&self) -> bool {
        true
    }
}
