//! Common anti-surge valve solver.

use tracing::{debug, warn};

use crate::error::SolverResult;
use crate::policy::{CapacityControl, PressureControl};
use crate::solution::{Configuration, Solution, Solver, SolverReport};
use crate::speed::{SpeedSolver, accept_pinned_speed};
use ct_core::{FloatConstraint, UnitId};
use ct_fluids::{FluidService, FluidStream};
use ct_process::ProcessSystem;

/// Speed, then capacity, then pressure control on one shared recirculation
/// loop.
///
/// 1. With recirculation at its floor, solve speed for the target pressure.
/// 2. Find the smallest recirculation that keeps every stage inside minimum
///    flow at that speed. More recirculation shifts the head, so steps 1 and
///    2 alternate until the recirculation rate settles or
///    `max_outer_iterations` runs out.
/// 3. Let the pressure-control policy finish the job without going below the
///    capacity rate.
///
/// This is a heuristic: nothing guarantees the alternation converges for
/// every chart shape, hence the iteration guard.
pub struct CommonAsvSolver {
    loop_id: UnitId,
    speed: Option<SpeedSolver>,
    capacity: Box<dyn CapacityControl>,
    pressure_control: Box<dyn PressureControl>,
    max_outer_iterations: usize,
}

impl CommonAsvSolver {
    pub const DEFAULT_MAX_OUTER_ITERATIONS: usize = 10;

    /// Relative change in recirculation rate treated as settled.
    const SETTLED_REL_TOL: f64 = 1e-4;

    /// `speed: None` for single-speed trains.
    pub fn new(
        loop_id: UnitId,
        speed: Option<SpeedSolver>,
        capacity: Box<dyn CapacityControl>,
        pressure_control: Box<dyn PressureControl>,
    ) -> Self {
        Self {
            loop_id,
            speed,
            capacity,
            pressure_control,
            max_outer_iterations: Self::DEFAULT_MAX_OUTER_ITERATIONS,
        }
    }

    pub fn with_max_outer_iterations(mut self, max_outer_iterations: usize) -> Self {
        self.max_outer_iterations = max_outer_iterations.max(1);
        self
    }

    fn settled(before: f64, after: f64) -> bool {
        (after - before).abs() <= Self::SETTLED_REL_TOL * after.abs().max(1.0)
    }
}

impl Solver for CommonAsvSolver {
    fn name(&self) -> &str {
        "common ASV"
    }

    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport> {
        system.set_recirculation_rate(self.loop_id, 0.0)?;

        let mut speed_solution = None;
        let mut capacity_solution = Solution::new(true, Configuration::Unchanged);
        let mut settled = false;
        for iteration in 0..self.max_outer_iterations {
            let before = system.recirculation_rate(self.loop_id)?;
            if let Some(speed) = &self.speed {
                speed_solution = Some(speed.solve_speed(system, fluid, inlet, target)?);
            }
            capacity_solution = self.capacity.ensure_capacity(system, fluid, inlet)?;
            let after = system.recirculation_rate(self.loop_id)?;
            debug!(
                iteration,
                recirculation_kg_per_h = after,
                "common ASV outer iteration"
            );
            if Self::settled(before, after) {
                settled = true;
                break;
            }
        }
        if !settled {
            warn!(
                max_outer_iterations = self.max_outer_iterations,
                "speed and recirculation did not settle; continuing with the last iterate"
            );
        }

        let pressure_solution = self
            .pressure_control
            .control_pressure(system, fluid, inlet, target)?;

        let mut solutions = Vec::with_capacity(3);
        if let Some(mut speed) = speed_solution {
            accept_pinned_speed(&mut speed, &pressure_solution, system, fluid, inlet, target)?;
            solutions.push(speed.map(Into::into));
        }
        solutions.push(capacity_solution);
        solutions.push(pressure_solution);
        Ok(SolverReport::new(self.name(), solutions))
    }
}
