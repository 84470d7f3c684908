//! Stream splitter.

use super::ProcessUnit;
use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use ct_fluids::FluidStream;

/// Splits one stream into several with the same state.
///
/// The first outlet continues down the system; the others are kept and can
/// be read back with [`Splitter::side_outlets`].
#[derive(Clone, Debug)]
pub struct Splitter {
    name: String,
    fractions: Vec<f64>,
    side_outlets: Vec<FluidStream>,
}

fn normalized(fractions: &[f64]) -> ProcessResult<Vec<f64>> {
    if fractions.is_empty() {
        return Err(ProcessError::InvalidArg {
            what: "splitter needs at least one split fraction",
        });
    }
    if fractions.iter().any(|f| !f.is_finite() || *f < 0.0) {
        return Err(ProcessError::InvalidArg {
            what: "split fractions must be finite and non-negative",
        });
    }
    let sum: f64 = fractions.iter().sum();
    if sum <= 0.0 {
        return Err(ProcessError::InvalidArg {
            what: "split fractions must not all be zero",
        });
    }
    Ok(fractions.iter().map(|f| f / sum).collect())
}

impl Splitter {
    /// Fractions are normalized to sum to one.
    pub fn new(name: impl Into<String>, fractions: &[f64]) -> ProcessResult<Self> {
        Ok(Self {
            name: name.into(),
            fractions: normalized(fractions)?,
            side_outlets: Vec::new(),
        })
    }

    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }

    /// Replace the fractions, keeping the number of outlets.
    pub fn set_fractions(&mut self, fractions: &[f64]) -> ProcessResult<()> {
        if fractions.len() != self.fractions.len() {
            return Err(ProcessError::InvalidConfiguration {
                what: format!(
                    "splitter '{}' has {} outlets, got {} fractions",
                    self.name,
                    self.fractions.len(),
                    fractions.len()
                ),
            });
        }
        self.fractions = normalized(fractions)?;
        Ok(())
    }

    /// Outlets beyond the first from the last propagation.
    pub fn side_outlets(&self) -> &[FluidStream] {
        &self.side_outlets
    }

    /// One outlet per fraction, same state as the inlet.
    pub fn split(&self, inlet: &FluidStream) -> ProcessResult<Vec<FluidStream>> {
        self.fractions
            .iter()
            .map(|f| Ok(inlet.with_mass_rate(inlet.mass_rate_kg_per_h() * f)?))
            .collect()
    }
}

impl ProcessUnit for Splitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn propagate_stream(
        &mut self,
        _ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let mut outlets = self.split(inlet)?.into_iter();
        let first = outlets.next().ok_or(ProcessError::InvalidArg {
            what: "splitter needs at least one split fraction",
        })?;
        self.side_outlets = outlets.collect();
        Ok(first)
    }

    fn is_multi_stream(&self) -> bool {
        true
    }
}
