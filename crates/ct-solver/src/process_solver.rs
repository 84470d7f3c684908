//! Top-level orchestration of solvers against a stream constraint.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::solution::{Solver, SolverReport};
use ct_core::FloatConstraint;
use ct_fluids::{FluidService, FluidStream};
use ct_process::{ProcessSystem, UnitOperatingPoint};

/// Target for the train outlet stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct StreamConstraint {
    /// Discharge pressure [bara]
    pub pressure: Option<FloatConstraint>,
    /// Outlet mass rate [kg/h]
    pub mass_rate: Option<FloatConstraint>,
}

impl StreamConstraint {
    pub fn pressure(target: FloatConstraint) -> Self {
        Self {
            pressure: Some(target),
            mass_rate: None,
        }
    }

    pub fn with_mass_rate(mut self, target: FloatConstraint) -> Self {
        self.mass_rate = Some(target);
        self
    }

    pub fn is_met_by(&self, stream: &FluidStream) -> bool {
        self.pressure
            .is_none_or(|p| p.is_met_by(stream.pressure_bara()))
            && self
                .mass_rate
                .is_none_or(|m| m.is_met_by(stream.mass_rate_kg_per_h()))
    }
}

/// Progress of a [`ProcessSolver`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverState {
    #[default]
    NotStarted,
    Solving,
    Converged,
    Failed,
}

/// Everything a caller needs after a solve.
#[derive(Clone, Debug)]
pub struct ProcessSolution {
    /// Every solver succeeded and the outlet meets the constraint.
    pub success: bool,
    pub state: SolverState,
    pub reports: Vec<SolverReport>,
    pub outlet: FluidStream,
    pub operating_points: Vec<UnitOperatingPoint>,
}

/// Runs its solvers in order on one process system.
///
/// There is no retry: a failed solver leaves its best-effort configuration
/// in place, the next solver runs on top of it, and the overall solution is
/// flagged unsuccessful.
pub struct ProcessSolver {
    solvers: Vec<Box<dyn Solver>>,
    constraint: StreamConstraint,
    state: SolverState,
}

impl ProcessSolver {
    pub fn new(solvers: Vec<Box<dyn Solver>>, constraint: StreamConstraint) -> Self {
        Self {
            solvers,
            constraint,
            state: SolverState::NotStarted,
        }
    }

    pub fn constraint(&self) -> &StreamConstraint {
        &self.constraint
    }

    pub fn state(&self) -> SolverState {
        self.state
    }

    pub fn solver_names(&self) -> Vec<&str> {
        self.solvers.iter().map(|s| s.name()).collect()
    }

    /// Solve, commit the configuration on `system` and propagate once more
    /// for the reported outlet.
    ///
    /// # Errors
    /// Process errors during a trial abort the solve and leave the state
    /// `Failed`. An unmet target is not an error.
    pub fn find_solution(
        &mut self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> SolverResult<ProcessSolution> {
        self.state = SolverState::Solving;
        match self.run(system, fluid, inlet) {
            Ok(solution) => {
                self.state = solution.state;
                Ok(solution)
            }
            Err(e) => {
                self.state = SolverState::Failed;
                Err(e)
            }
        }
    }

    fn run(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> SolverResult<ProcessSolution> {
        let mut reports = Vec::with_capacity(self.solvers.len());
        if !self.solvers.is_empty() {
            let target = self
                .constraint
                .pressure
                .ok_or_else(|| SolverError::InvalidConfiguration {
                    what: "solvers need a target pressure".to_string(),
                })?;
            for solver in &self.solvers {
                let report = solver.solve(system, fluid, inlet, target)?;
                debug!(solver = solver.name(), success = report.success(), "solver finished");
                reports.push(report);
            }
        }

        let outlet = system.propagate_stream(fluid, inlet)?;
        let success =
            reports.iter().all(SolverReport::success) && self.constraint.is_met_by(&outlet);
        if !success {
            warn!(
                pressure_bara = outlet.pressure_bara(),
                mass_rate_kg_per_h = outlet.mass_rate_kg_per_h(),
                "process solver did not meet the stream constraint"
            );
        }
        Ok(ProcessSolution {
            success,
            state: if success {
                SolverState::Converged
            } else {
                SolverState::Failed
            },
            reports,
            operating_points: system.operating_points(),
            outlet,
        })
    }
}
