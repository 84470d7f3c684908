//! Named pressure-control and capacity policies.
//!
//! A policy name resolves once, at construction, to a strategy object behind
//! a narrow trait. Solvers never look at the name again.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::choke::{DownstreamChokeSolver, UpstreamChokeSolver};
use crate::error::{SolverError, SolverResult};
use crate::search::{BinarySearchStrategy, RootFinder, RootFindingStrategy, SearchStrategy};
use crate::solution::{Configuration, RecirculationConfiguration, Solution, outlet_pressure};
use ct_core::{Boundary, FloatConstraint, UnitId};
use ct_fluids::{FluidService, FluidStream};
use ct_process::ProcessSystem;

/// How a train keeps every stage right of its minimum-flow line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum CapacityPolicy {
    /// Flow passes through even outside the chart.
    #[default]
    None,
    /// Raise one recirculation rate shared by the whole train.
    CommonAsvMinFlow,
}

/// How a train brings its discharge pressure down to the target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum PressureControlPolicy {
    #[default]
    None,
    /// Recirculate more through the shared ASV; head falls as flow rises.
    CommonAsv,
    /// Throttle the suction.
    UpstreamChoke,
    /// Throttle the discharge.
    DownstreamChoke,
}

impl CapacityPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::CommonAsvMinFlow => "COMMON_ASV_MIN_FLOW",
        }
    }
}

impl PressureControlPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::CommonAsv => "COMMON_ASV",
            Self::UpstreamChoke => "UPSTREAM_CHOKE",
            Self::DownstreamChoke => "DOWNSTREAM_CHOKE",
        }
    }
}

impl FromStr for CapacityPolicy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "COMMON_ASV_MIN_FLOW" => Ok(Self::CommonAsvMinFlow),
            _ => Err(SolverError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

impl FromStr for PressureControlPolicy {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NONE" => Ok(Self::None),
            "COMMON_ASV" => Ok(Self::CommonAsv),
            "UPSTREAM_CHOKE" => Ok(Self::UpstreamChoke),
            "DOWNSTREAM_CHOKE" => Ok(Self::DownstreamChoke),
            _ => Err(SolverError::UnknownPolicy {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for CapacityPolicy {
    type Error = SolverError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for PressureControlPolicy {
    type Error = SolverError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for CapacityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PressureControlPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keeps the train inside chart capacity.
pub trait CapacityControl {
    fn policy(&self) -> CapacityPolicy;

    /// Adjust the system so every stage is inside its minimum-flow limit,
    /// commit, and report.
    fn ensure_capacity(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> SolverResult<Solution<Configuration>>;
}

/// Brings the discharge pressure down to a target.
pub trait PressureControl {
    fn policy(&self) -> PressureControlPolicy;

    fn control_pressure(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<Solution<Configuration>>;
}

/// Default recirculation ceiling, in multiples of the largest chart rate.
const DEFAULT_RECIRCULATION_CAPACITY_FACTOR: f64 = 5.0;

/// Configured recirculation range, or `[0, k · largest chart rate · inlet density]`.
pub fn resolve_recirculation_boundary(
    configured: Option<Boundary>,
    system: &ProcessSystem,
    inlet: &FluidStream,
) -> SolverResult<Boundary> {
    if let Some(boundary) = configured {
        return Ok(boundary);
    }
    let mut max_rate: Option<f64> = None;
    for chart in system.compressor_charts() {
        let rate = chart.maximum_rate_at_speed(chart.maximum_speed())?;
        max_rate = Some(max_rate.map_or(rate, |m: f64| m.max(rate)));
    }
    let max_rate = max_rate.ok_or_else(|| SolverError::InvalidConfiguration {
        what: "recirculation needs at least one compressor".to_string(),
    })?;
    Ok(Boundary::new(
        0.0,
        DEFAULT_RECIRCULATION_CAPACITY_FACTOR * max_rate * inlet.density(),
    )?)
}

fn recirculation_solution(
    loop_id: UnitId,
    rate_kg_per_h: f64,
    success: bool,
) -> Solution<Configuration> {
    Solution::new(
        success,
        RecirculationConfiguration {
            loop_id,
            recirculation_rate_kg_per_h: rate_kg_per_h,
        }
        .into(),
    )
}

/// `NONE`: leave the system alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoControl;

impl CapacityControl for NoControl {
    fn policy(&self) -> CapacityPolicy {
        CapacityPolicy::None
    }

    fn ensure_capacity(
        &self,
        _system: &mut ProcessSystem,
        _fluid: &dyn FluidService,
        _inlet: &FluidStream,
    ) -> SolverResult<Solution<Configuration>> {
        Ok(Solution::new(true, Configuration::Unchanged))
    }
}

impl PressureControl for NoControl {
    fn policy(&self) -> PressureControlPolicy {
        PressureControlPolicy::None
    }

    fn control_pressure(
        &self,
        _system: &mut ProcessSystem,
        _fluid: &dyn FluidService,
        _inlet: &FluidStream,
        _target: FloatConstraint,
    ) -> SolverResult<Solution<Configuration>> {
        Ok(Solution::new(true, Configuration::Unchanged))
    }
}

/// `COMMON_ASV_MIN_FLOW`: smallest shared recirculation that keeps every
/// stage at or right of minimum flow.
#[derive(Clone, Debug)]
pub struct CommonAsvMinFlow {
    loop_id: UnitId,
    boundary: Option<Boundary>,
    search: BinarySearchStrategy,
}

impl CommonAsvMinFlow {
    pub fn new(loop_id: UnitId, boundary: Option<Boundary>, search: BinarySearchStrategy) -> Self {
        Self {
            loop_id,
            boundary,
            search,
        }
    }
}

impl CapacityControl for CommonAsvMinFlow {
    fn policy(&self) -> CapacityPolicy {
        CapacityPolicy::CommonAsvMinFlow
    }

    fn ensure_capacity(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> SolverResult<Solution<Configuration>> {
        let loop_id = self.loop_id;
        let boundary = resolve_recirculation_boundary(self.boundary, system, inlet)?;

        let threshold = self
            .search
            .search_threshold(boundary, |rate| -> SolverResult<bool> {
                system.set_recirculation_rate(loop_id, rate)?;
                system.propagate_stream(fluid, inlet)?;
                Ok(system.is_within_minimum_flow())
            })?;

        system.set_recirculation_rate(loop_id, threshold.x)?;
        system.propagate_stream(fluid, inlet)?;
        if threshold.found {
            debug!(recirculation_kg_per_h = threshold.x, "minimum-flow recirculation");
        } else {
            warn!(
                recirculation_kg_per_h = threshold.x,
                "minimum flow not reached within the recirculation range"
            );
        }
        Ok(recirculation_solution(loop_id, threshold.x, threshold.found))
    }
}

/// `COMMON_ASV`: raise the shared recirculation until the discharge pressure
/// falls to the target.
///
/// The search starts at the current recirculation rate, so a rate set for
/// capacity is never lowered.
#[derive(Clone, Debug)]
pub struct CommonAsvPressureControl {
    loop_id: UnitId,
    boundary: Option<Boundary>,
    search: SearchStrategy,
}

impl CommonAsvPressureControl {
    pub fn new(loop_id: UnitId, boundary: Option<Boundary>, search: SearchStrategy) -> Self {
        Self {
            loop_id,
            boundary,
            search,
        }
    }
}

impl PressureControl for CommonAsvPressureControl {
    fn policy(&self) -> PressureControlPolicy {
        PressureControlPolicy::CommonAsv
    }

    fn control_pressure(
        &self,
        system: &mut ProcessSystem,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
        target: FloatConstraint,
    ) -> SolverResult<Solution<Configuration>> {
        let loop_id = self.loop_id;
        let floor = system.recirculation_rate(loop_id)?;
        let boundary =
            resolve_recirculation_boundary(self.boundary, system, inlet)?.with_min_at_least(floor);

        let pressure = outlet_pressure(system, fluid, inlet)?;
        if target.compare(pressure) != Ordering::Greater {
            debug!(pressure_bara = pressure, "no extra recirculation needed");
            return Ok(recirculation_solution(loop_id, floor, true));
        }

        let root = self.search.find_root(boundary, |rate| -> SolverResult<f64> {
            system.set_recirculation_rate(loop_id, rate)?;
            let pressure = outlet_pressure(system, fluid, inlet)?;
            debug!(recirculation_kg_per_h = rate, pressure_bara = pressure, "ASV trial");
            Ok(target.residual(pressure))
        })?;

        system.set_recirculation_rate(loop_id, root.x)?;
        let pressure = outlet_pressure(system, fluid, inlet)?;
        let success = root.converged || target.is_met_by(pressure);
        if !success {
            warn!(
                recirculation_kg_per_h = root.x,
                pressure_bara = pressure,
                target_bara = target.value(),
                "recirculation cannot bring the pressure down to target"
            );
        }
        Ok(recirculation_solution(loop_id, root.x, success))
    }
}

/// Units a policy may drive.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ControlTargets {
    pub recirculation_loop: Option<UnitId>,
    pub upstream_choke: Option<UnitId>,
    pub downstream_choke: Option<UnitId>,
}

/// Search strategies and ranges the factories build policies from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
    pub binary_search: BinarySearchStrategy,
    pub root_finding: RootFindingStrategy,
    pub recirculation_boundary: Option<Boundary>,
    pub upstream_choke_boundary: Option<Boundary>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            binary_search: BinarySearchStrategy::default(),
            root_finding: RootFindingStrategy::default(),
            recirculation_boundary: None,
            upstream_choke_boundary: None,
        }
    }
}

fn required(id: Option<UnitId>, what: &str, policy: &str) -> SolverResult<UnitId> {
    id.ok_or_else(|| SolverError::InvalidConfiguration {
        what: format!("policy {policy} needs a {what}"),
    })
}

/// Build the capacity strategy for a policy.
pub fn create_capacity_control(
    policy: CapacityPolicy,
    targets: &ControlTargets,
    settings: &ControlSettings,
) -> SolverResult<Box<dyn CapacityControl>> {
    Ok(match policy {
        CapacityPolicy::None => Box::new(NoControl),
        CapacityPolicy::CommonAsvMinFlow => Box::new(CommonAsvMinFlow::new(
            required(targets.recirculation_loop, "recirculation loop", policy.as_str())?,
            settings.recirculation_boundary,
            settings.binary_search,
        )),
    })
}

/// Build the pressure-control strategy for a policy.
pub fn create_pressure_control(
    policy: PressureControlPolicy,
    targets: &ControlTargets,
    settings: &ControlSettings,
) -> SolverResult<Box<dyn PressureControl>> {
    Ok(match policy {
        PressureControlPolicy::None => Box::new(NoControl),
        PressureControlPolicy::CommonAsv => Box::new(CommonAsvPressureControl::new(
            required(targets.recirculation_loop, "recirculation loop", policy.as_str())?,
            settings.recirculation_boundary,
            settings.binary_search.into(),
        )),
        PressureControlPolicy::UpstreamChoke => Box::new(UpstreamChokeSolver::new(
            required(targets.upstream_choke, "upstream choke", policy.as_str())?,
            settings.upstream_choke_boundary,
            settings.root_finding.into(),
        )),
        PressureControlPolicy::DownstreamChoke => Box::new(DownstreamChokeSolver::new(
            required(targets.downstream_choke, "downstream choke", policy.as_str())?,
            settings.root_finding.into(),
        )),
    })
}
