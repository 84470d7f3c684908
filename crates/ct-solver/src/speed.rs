//! Shaft speed solver.

use tracing::{debug, warn};

use crate::error::{SolverError, SolverResult};
use crate::policy::PressureControl;
use crate::search::{RootFinder, RootFindingStrategy, SearchStrategy};
use crate::solution::{
    Configuration, Solution, Solver, SolverReport, SpeedConfiguration, outlet_pressure,
};
use ct_core::{Boundary, FloatConstraint};
use ct_fluids::{FluidService, FluidStream};
use ct_process::ProcessSystem;

/// Finds the shaft speed that gives the target discharge pressure.
///
/// Every trial sets the speed on the system's shaft and re-propagates the
/// inlet. When the target is out of reach the speed is left at the boundary
/// end closest to it and the solution is flagged unsuccessful.
#[derive(Clone, Debug)]
pub struct SpeedSolver {
    boundary: Option<Boundary>,
    search: SearchStrategy,
}

impl Default for SpeedSolver {
    fn default() -> Self {
        Self::new(None, RootFindingStrategy::default().into())
    }
}

impl SpeedSolver {
    /// `boundary: None` searches the speed range shared by all charts.
    pub fn new(boundary: Option<Boundary>, search: SearchStrategy) -> Self {
        Self { boundary, search }
    }

    fn speed_boundary(&self, system: &ProcessSystem) -> SolverResult<Boundary> {
        match system.shaft() {
            Some(shaft) if shaft.is_variable_speed() => {}
            _ => {
                return Err(SolverError::InvalidConfiguration {
                    what: "speed solver needs a variable-speed shaft".to_string(),
                });
            }
        }
        if let Some(boundary) = self.boundary {
            return Ok(boundary);
        }
        system
            .speed_range()?
            .ok_or_else(|| SolverError::InvalidConfiguration {
                what: "no speed boundary given and no variable-speed chart to take it from"
                    .to_string(),
            })
    }

    pub fn solve_speed(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<Solution<SpeedConfiguration>> {
        let boundary = self.speed_boundary(system)?;

        let root = self.search.find_root(boundary, |speed| -> SolverResult<f64> {
            system.set_speed(speed)?;
            let pressure = outlet_pressure(system, fluid, inlet)?;
            debug!(speed_rpm = speed, pressure_bara = pressure, "speed trial");
            Ok(target.residual(pressure))
        })?;

        system.set_speed(root.x)?;
        let pressure = outlet_pressure(system, fluid, inlet)?;
        let success = root.converged || target.is_met_by(pressure);
        if success {
            debug!(speed_rpm = root.x, pressure_bara = pressure, "speed solved");
        } else {
            warn!(
                speed_rpm = root.x,
                pressure_bara = pressure,
                target_bara = target.value(),
                "target pressure not reachable within the speed range"
            );
        }
        Ok(Solution::new(success, SpeedConfiguration { speed_rpm: root.x }))
    }
}

impl Solver for SpeedSolver {
    fn name(&self) -> &str {
        "speed"
    }

    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport> {
        let solution = self.solve_speed(system, fluid, inlet, target)?;
        Ok(SolverReport::new(self.name(), vec![solution.map(Into::into)]))
    }
}

/// A speed left at a range end still counts once pressure control has taken
/// the outlet onto the target.
pub(crate) fn accept_pinned_speed(
    speed: &mut Solution<SpeedConfiguration>,
    pressure_control: &Solution<Configuration>,
    system: &mut ProcessSystem,
    fluid: &dyn FluidService,
    inlet: &FluidStream,
    target: FloatConstraint,
) -> SolverResult<()> {
    if !speed.success && pressure_control.success {
        let pressure = outlet_pressure(system, fluid, inlet)?;
        speed.success = target.is_met_by(pressure);
        if speed.success {
            debug!(
                speed_rpm = speed.configuration.speed_rpm,
                pressure_bara = pressure,
                "speed at its limit, target met by pressure control"
            );
        }
    }
    Ok(())
}

/// Speed first, then a pressure-control policy (typically a choke) for
/// whatever excess the slowest speed still leaves.
///
/// The report carries both solutions, speed first.
pub struct SpeedWithPressureControlSolver {
    speed: SpeedSolver,
    pressure_control: Box<dyn PressureControl>,
}

impl SpeedWithPressureControlSolver {
    pub fn new(speed: SpeedSolver, pressure_control: Box<dyn PressureControl>) -> Self {
        Self {
            speed,
            pressure_control,
        }
    }
}

impl Solver for SpeedWithPressureControlSolver {
    fn name(&self) -> &str {
        "speed with pressure control"
    }

    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport> {
        let mut speed = self.speed.solve_speed(system, fluid, inlet, target)?;
        let pressure = self
            .pressure_control
            .control_pressure(system, fluid, inlet, target)?;
        accept_pinned_speed(&mut speed, &pressure, system, fluid, inlet, target)?;
        Ok(SolverReport::new(
            self.name(),
            vec![speed.map(Into::into), pressure],
        ))
    }
}
