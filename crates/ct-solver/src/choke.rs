//! Choke solvers: meet a discharge pressure by throttling.
//!
//! Throttling only lowers pressure. When the train already delivers at or
//! below the target both solvers leave the choke open and report success.

use core::cmp::Ordering;

use tracing::{debug, warn};

use crate::error::SolverResult;
use crate::policy::{PressureControl, PressureControlPolicy};
use crate::search::{RootFinder, RootFindingStrategy, SearchStrategy};
use crate::solution::{
    ChokeConfiguration, Configuration, Solution, Solver, SolverReport, outlet_pressure,
};
use ct_core::{Boundary, FloatConstraint, UnitId};
use ct_fluids::{FluidService, FluidStream};
use ct_process::ProcessSystem;

/// Keeps a throttled inlet strictly above vacuum.
const MAX_PRESSURE_DROP_FRACTION: f64 = 0.999;

/// Open the choke and return the natural discharge pressure, and whether it
/// is already at or below the target.
fn natural_pressure_if_low_enough(
    system: &mut ProcessSystem,
    fluid: &dyn FluidService,
    inlet: &FluidStream,
    choke_id: UnitId,
    target: FloatConstraint,
) -> SolverResult<(f64, bool)> {
    system.set_pressure_change(choke_id, 0.0)?;
    let natural = outlet_pressure(system, fluid, inlet)?;
    Ok((natural, target.compare(natural) != Ordering::Greater))
}

fn choke_solution(
    choke_id: UnitId,
    pressure_change_bar: f64,
    success: bool,
) -> Solution<Configuration> {
    Solution::new(
        success,
        ChokeConfiguration {
            choke_id,
            pressure_change_bar,
        }
        .into(),
    )
}

/// Choke at the train inlet.
///
/// The discharge pressure falls as the suction pressure is throttled, so the
/// pressure drop is found by a bounded root search.
#[derive(Clone, Debug)]
pub struct UpstreamChokeSolver {
    choke_id: UnitId,
    boundary: Option<Boundary>,
    search: SearchStrategy,
}

impl UpstreamChokeSolver {
    /// `boundary: None` allows any drop that keeps the suction above vacuum.
    pub fn new(choke_id: UnitId, boundary: Option<Boundary>, search: SearchStrategy) -> Self {
        Self {
            choke_id,
            boundary,
            search,
        }
    }

    pub fn with_defaults(choke_id: UnitId) -> Self {
        Self::new(choke_id, None, RootFindingStrategy::default().into())
    }

    fn pressure_drop_boundary(&self, inlet: &FluidStream) -> SolverResult<Boundary> {
        let cap = MAX_PRESSURE_DROP_FRACTION * inlet.pressure_bara();
        Ok(match self.boundary {
            Some(boundary) => boundary.with_max_at_most(cap),
            None => Boundary::new(0.0, cap)?,
        })
    }
}

impl PressureControl for UpstreamChokeSolver {
    fn policy(&self) -> PressureControlPolicy {
        PressureControlPolicy::UpstreamChoke
    }

    fn control_pressure(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<Solution<Configuration>> {
        let (natural, low_enough) =
            natural_pressure_if_low_enough(system, fluid, inlet, self.choke_id, target)?;
        if low_enough {
            debug!(pressure_bara = natural, "no upstream choking needed");
            return Ok(choke_solution(self.choke_id, 0.0, true));
        }

        let choke_id = self.choke_id;
        let boundary = self.pressure_drop_boundary(inlet)?;
        let root = self.search.find_root(boundary, |dp| -> SolverResult<f64> {
            system.set_pressure_change(choke_id, dp)?;
            let pressure = outlet_pressure(system, fluid, inlet)?;
            debug!(pressure_change_bar = dp, pressure_bara = pressure, "upstream choke trial");
            Ok(target.residual(pressure))
        })?;

        system.set_pressure_change(choke_id, root.x)?;
        let pressure = outlet_pressure(system, fluid, inlet)?;
        let success = root.converged || target.is_met_by(pressure);
        if !success {
            warn!(
                pressure_change_bar = root.x,
                pressure_bara = pressure,
                target_bara = target.value(),
                "upstream choke cannot reach the target pressure"
            );
        }
        Ok(choke_solution(choke_id, root.x, success))
    }
}

impl Solver for UpstreamChokeSolver {
    fn name(&self) -> &str {
        "upstream choke"
    }

    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport> {
        let solution = self.control_pressure(system, fluid, inlet, target)?;
        Ok(SolverReport::new(self.name(), vec![solution]))
    }
}

/// Choke at the train outlet.
///
/// The natural excess pressure is taken out directly; a root search only
/// runs when units after the choke make the direct drop miss.
#[derive(Clone, Debug)]
pub struct DownstreamChokeSolver {
    choke_id: UnitId,
    search: SearchStrategy,
}

impl DownstreamChokeSolver {
    pub fn new(choke_id: UnitId, search: SearchStrategy) -> Self {
        Self { choke_id, search }
    }

    pub fn with_defaults(choke_id: UnitId) -> Self {
        Self::new(choke_id, RootFindingStrategy::default().into())
    }
}

impl PressureControl for DownstreamChokeSolver {
    fn policy(&self) -> PressureControlPolicy {
        PressureControlPolicy::DownstreamChoke
    }

    fn control_pressure(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<Solution<Configuration>> {
        let (natural, low_enough) =
            natural_pressure_if_low_enough(system, fluid, inlet, self.choke_id, target)?;
        if low_enough {
            debug!(pressure_bara = natural, "no downstream choking needed");
            return Ok(choke_solution(self.choke_id, 0.0, true));
        }

        let choke_id = self.choke_id;
        let direct = natural - target.value();
        system.set_pressure_change(choke_id, direct)?;
        let pressure = outlet_pressure(system, fluid, inlet)?;
        if target.is_met_by(pressure) {
            debug!(pressure_change_bar = direct, "downstream choke set");
            return Ok(choke_solution(choke_id, direct, true));
        }

        let boundary = Boundary::new(0.0, MAX_PRESSURE_DROP_FRACTION * natural)?;
        let root = self.search.find_root(boundary, |dp| -> SolverResult<f64> {
            system.set_pressure_change(choke_id, dp)?;
            Ok(target.residual(outlet_pressure(system, fluid, inlet)?))
        })?;
        system.set_pressure_change(choke_id, root.x)?;
        let pressure = outlet_pressure(system, fluid, inlet)?;
        let success = root.converged || target.is_met_by(pressure);
        if !success {
            warn!(
                pressure_change_bar = root.x,
                pressure_bara = pressure,
                target_bara = target.value(),
                "downstream choke cannot reach the target pressure"
            );
        }
        Ok(choke_solution(choke_id, root.x, success))
    }
}

impl Solver for DownstreamChokeSolver {
    fn name(&self) -> &str {
        "downstream choke"
    }

    fn solve(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<SolverReport> {
        let solution = self.control_pressure(system, fluid, inlet, target)?;
        Ok(SolverReport::new(self.name(), vec![solution]))
    }
}
