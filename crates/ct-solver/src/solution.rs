//! What solvers hand back: success flags and the configuration they committed.

use ct_core::{FloatConstraint, UnitId};
use ct_fluids::{FluidService, FluidStream};
use ct_process::ProcessSystem;
use serde::Serialize;

use crate::error::SolverResult;

/// A committed configuration and whether it met its target.
///
/// `success == false` still carries the best-effort configuration the solver
/// left the system in.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Solution<C> {
    pub success: bool,
    pub configuration: C,
}

impl<C> Solution<C> {
    pub fn new(success: bool, configuration: C) -> Self {
        Self {
            success,
            configuration,
        }
    }

    pub fn map<D>(self, f: impl FnOnce(C) -> D) -> Solution<D> {
        Solution {
            success: self.success,
            configuration: f(self.configuration),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SpeedConfiguration {
    pub speed_rpm: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RecirculationConfiguration {
    pub loop_id: UnitId,
    pub recirculation_rate_kg_per_h: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ChokeConfiguration {
    pub choke_id: UnitId,
    pub pressure_change_bar: f64,
}

/// Any configuration a solver can commit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Configuration {
    /// Policy that does not touch the system.
    Unchanged,
    Speed(SpeedConfiguration),
    Recirculation(RecirculationConfiguration),
    Choke(ChokeConfiguration),
}

impl From<SpeedConfiguration> for Configuration {
    fn from(c: SpeedConfiguration) -> Self {
        Self::Speed(c)
    }
}

impl From<RecirculationConfiguration> for Configuration {
    fn from(c: RecirculationConfiguration) -> Self {
        Self::Recirculation(c)
    }
}

impl From<ChokeConfiguration> for Configuration {
    fn from(c: ChokeConfiguration) -> Self {
        Self::Choke(c)
    }
}

/// Solutions of one solver, in the order it produced them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SolverReport {
    pub solver: String,
    pub solutions: Vec<Solution<Configuration>>,
}

impl SolverReport {
    pub fn new(solver: impl Into<String>, solutions: Vec<Solution<Configuration>>) -> Self {
        Self {
            solver: solver.into(),
            solutions,
        }
    }

    pub fn success(&self) -> bool {
        self.solutions.iter().all(|s| s.success)
    }
}

/// A solver that drives one knob of a process system towards a discharge
/// pressure target.
pub trait Solver {
    fn name(&self) -> &str;

    /// Search, commit the result on `system`, and report.
    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport>;
}

/// Discharge pressure [bara] for the current configuration.
pub(crate) fn outlet_pressure(
    system: &mut ProcessSystem,
    fluid: &dyn FluidService,
    inlet: &FluidStream,
) -> SolverResult<f64> {
    Ok(system.propagate_stream(fluid, inlet)?.pressure_bara())
}
