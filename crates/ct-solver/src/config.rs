//! Inbound configuration for a compressor train and its solvers.
//!
//! ```yaml
//! shaft:
//!   mechanical_efficiency: 0.97
//! stages:
//!   - inlet_temperature_kelvin: 303.15
//!     chart:
//!       - speed_rpm: 10000
//!         rate_actual_m3_per_hour: [700, 900, 1100, 1300]
//!         polytropic_head_joule_per_kg: [120000, 115000, 105000, 90000]
//!         efficiency_fraction: [0.70, 0.72, 0.72, 0.68]
//! solver:
//!   pressure_control: COMMON_ASV
//!   capacity_policy: COMMON_ASV_MIN_FLOW
//! ```

use serde::{Deserialize, Serialize};

use crate::asv::CommonAsvSolver;
use crate::choke::{DownstreamChokeSolver, UpstreamChokeSolver};
use crate::error::{SolverError, SolverResult};
use crate::policy::{
    CapacityPolicy, ControlSettings, ControlTargets, PressureControlPolicy,
    create_capacity_control, create_pressure_control,
};
use crate::process_solver::{ProcessSolution, ProcessSolver, StreamConstraint};
use crate::search::{BinarySearchStrategy, RootFindingStrategy};
use crate::solution::Solver;
use crate::speed::{SpeedSolver, SpeedWithPressureControlSolver};
use ct_chart::{ChartCurve, CompressorChart};
use ct_core::{Boundary, FloatConstraint};
use ct_fluids::{FluidService, FluidStream};
use ct_process::{
    Choke, Compressor, LiquidRemover, ProcessResult, ProcessSystem, ProcessSystemBuilder, Shaft,
    TemperatureSetter,
};

/// Numerical settings and policy names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Bisection tolerance, in the units of the searched quantity.
    pub binary_search_tolerance: f64,
    /// Root-finding tolerance on the pressure residual [bar].
    pub root_finding_tolerance: f64,
    pub max_iterations: usize,
    pub max_outer_iterations: usize,
    /// Defaults to the speed range shared by all charts [rpm].
    pub speed_boundary: Option<Boundary>,
    /// Defaults to `[0, 5 · largest chart rate · inlet density]` [kg/h].
    pub recirculation_boundary: Option<Boundary>,
    /// Defaults to any drop keeping the suction above vacuum [bar].
    pub upstream_choke_boundary: Option<Boundary>,
    pub pressure_control: PressureControlPolicy,
    pub capacity_policy: CapacityPolicy,
    /// Tolerance of the discharge pressure target [bar].
    pub target_pressure_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            binary_search_tolerance: 1e-3,
            root_finding_tolerance: 1e-3,
            max_iterations: 100,
            max_outer_iterations: CommonAsvSolver::DEFAULT_MAX_OUTER_ITERATIONS,
            speed_boundary: None,
            recirculation_boundary: None,
            upstream_choke_boundary: None,
            pressure_control: PressureControlPolicy::DownstreamChoke,
            capacity_policy: CapacityPolicy::CommonAsvMinFlow,
            target_pressure_tolerance: FloatConstraint::DEFAULT_ABS_TOL,
        }
    }
}

/// Deserialized boundaries skip the constructor checks.
fn checked(boundary: Option<Boundary>) -> SolverResult<Option<Boundary>> {
    boundary
        .map(|b| Boundary::new(b.min(), b.max()).map_err(SolverError::from))
        .transpose()
}

fn positive(value: f64, what: &str) -> SolverResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SolverError::InvalidConfiguration {
            what: format!("{what} must be positive, got {value}"),
        });
    }
    Ok(value)
}

impl SolverConfig {
    pub fn binary_search(&self) -> BinarySearchStrategy {
        BinarySearchStrategy::new(self.binary_search_tolerance, self.max_iterations)
    }

    pub fn root_finding(&self) -> RootFindingStrategy {
        RootFindingStrategy::new(self.root_finding_tolerance, self.max_iterations)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> SolverResult<()> {
        positive(self.binary_search_tolerance, "binary_search_tolerance")?;
        positive(self.root_finding_tolerance, "root_finding_tolerance")?;
        positive(self.target_pressure_tolerance, "target_pressure_tolerance")?;
        if self.max_iterations == 0 || self.max_outer_iterations == 0 {
            return Err(SolverError::InvalidConfiguration {
                what: "iteration budgets must be at least 1".to_string(),
            });
        }
        checked(self.speed_boundary)?;
        checked(self.recirculation_boundary)?;
        checked(self.upstream_choke_boundary)?;
        Ok(())
    }

    fn control_settings(&self) -> SolverResult<ControlSettings> {
        Ok(ControlSettings {
            binary_search: self.binary_search(),
            root_finding: self.root_finding(),
            recirculation_boundary: checked(self.recirculation_boundary)?,
            upstream_choke_boundary: checked(self.upstream_choke_boundary)?,
        })
    }
}

fn default_mechanical_efficiency() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShaftConfig {
    #[serde(default = "default_mechanical_efficiency")]
    pub mechanical_efficiency: f64,
    /// Fixed speed [rpm]; omitted means variable speed when any chart has
    /// more than one curve.
    #[serde(default)]
    pub speed_rpm: Option<f64>,
}

impl Default for ShaftConfig {
    fn default() -> Self {
        Self {
            mechanical_efficiency: default_mechanical_efficiency(),
            speed_rpm: None,
        }
    }
}

/// One compressor stage with its inlet conditioning.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StageConfig {
    /// One curve makes a single-speed chart, more make a variable-speed one.
    pub chart: Vec<ChartCurve>,
    pub inlet_temperature_kelvin: f64,
    #[serde(default)]
    pub pressure_drop_ahead_of_stage_bar: Option<f64>,
    #[serde(default)]
    pub remove_liquid: bool,
}

impl StageConfig {
    fn compressor_chart(&self) -> SolverResult<CompressorChart> {
        match self.chart.as_slice() {
            [] => Err(SolverError::InvalidConfiguration {
                what: "stage chart has no curves".to_string(),
            }),
            [curve] => Ok(CompressorChart::single_speed(curve.clone())),
            curves => Ok(CompressorChart::variable_speed(curves.to_vec())?),
        }
    }
}

/// A common-shaft compressor train.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainConfig {
    #[serde(default)]
    pub shaft: ShaftConfig,
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub solver: SolverConfig,
}

/// A wired process system with the solver that drives it.
pub struct CompressorTrain {
    pub system: ProcessSystem,
    pub solver: ProcessSolver,
    /// Units the solvers drive.
    pub targets: ControlTargets,
}

impl CompressorTrain {
    pub fn solve(
        &mut self,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> SolverResult<ProcessSolution> {
        self.solver.find_solution(&mut self.system, fluid, inlet)
    }
}

fn add_stages(
    builder: &mut ProcessSystemBuilder,
    stages: &[StageConfig],
    charts: Vec<CompressorChart>,
) -> ProcessResult<()> {
    for (index, (stage, chart)) in stages.iter().zip(charts).enumerate() {
        let n = index + 1;
        if let Some(dp) = stage.pressure_drop_ahead_of_stage_bar {
            builder.add(Choke::with_pressure_change(
                format!("stage {n} pressure drop"),
                dp,
            )?);
        }
        builder.add(TemperatureSetter::new(
            format!("stage {n} inlet temperature"),
            stage.inlet_temperature_kelvin,
        )?);
        if stage.remove_liquid {
            builder.add(LiquidRemover::new(format!("stage {n} scrubber")));
        }
        builder.add(Compressor::new(format!("stage {n}"), chart));
    }
    Ok(())
}

impl TrainConfig {
    /// Wire the process system and its solvers for a discharge pressure target.
    ///
    /// Layout: optional upstream choke, then the stages (inside one common
    /// recirculation loop when an ASV policy is selected), then an optional
    /// downstream choke.
    pub fn build(&self, target_pressure_bara: f64) -> SolverResult<CompressorTrain> {
        let solver_config = &self.solver;
        solver_config.validate()?;
        if self.stages.is_empty() {
            return Err(SolverError::InvalidConfiguration {
                what: "train has no stages".to_string(),
            });
        }
        let target = FloatConstraint::new(
            target_pressure_bara,
            solver_config.target_pressure_tolerance,
        )?;

        let charts = self
            .stages
            .iter()
            .map(StageConfig::compressor_chart)
            .collect::<SolverResult<Vec<_>>>()?;
        let variable_speed = charts.iter().any(CompressorChart::is_variable_speed);
        let eta = self.shaft.mechanical_efficiency;
        let shaft = match self.shaft.speed_rpm {
            Some(speed) => Shaft::single_speed(speed, eta)?,
            None if variable_speed => Shaft::variable_speed(eta)?,
            None => Shaft::single_speed(charts[0].minimum_speed(), eta)?,
        };
        let speed_controlled = shaft.is_variable_speed();

        let mut builder = ProcessSystem::builder();
        builder.set_shaft(shaft);
        let mut targets = ControlTargets::default();
        if solver_config.pressure_control == PressureControlPolicy::UpstreamChoke {
            targets.upstream_choke = Some(builder.add(Choke::new("upstream choke")));
        }
        let common_asv = solver_config.capacity_policy == CapacityPolicy::CommonAsvMinFlow
            || solver_config.pressure_control == PressureControlPolicy::CommonAsv;
        if common_asv {
            let stages = &self.stages;
            targets.recirculation_loop = Some(
                builder.add_recirculation_loop("common ASV", |inner| {
                    add_stages(inner, stages, charts)
                })?,
            );
        } else {
            add_stages(&mut builder, &self.stages, charts)?;
        }
        if solver_config.pressure_control == PressureControlPolicy::DownstreamChoke {
            targets.downstream_choke = Some(builder.add(Choke::new("downstream choke")));
        }
        let system = builder.build()?;

        let settings = solver_config.control_settings()?;
        let speed = speed_controlled.then(|| {
            SpeedSolver::new(
                solver_config.speed_boundary,
                settings.root_finding.into(),
            )
        });
        let mut solvers: Vec<Box<dyn Solver>> = Vec::new();
        if let Some(loop_id) = targets.recirculation_loop {
            let capacity =
                create_capacity_control(solver_config.capacity_policy, &targets, &settings)?;
            let pressure_control =
                create_pressure_control(solver_config.pressure_control, &targets, &settings)?;
            solvers.push(Box::new(
                CommonAsvSolver::new(loop_id, speed, capacity, pressure_control)
                    .with_max_outer_iterations(solver_config.max_outer_iterations),
            ));
        } else if let Some(speed) = speed {
            match solver_config.pressure_control {
                PressureControlPolicy::None => solvers.push(Box::new(speed)),
                policy => solvers.push(Box::new(SpeedWithPressureControlSolver::new(
                    speed,
                    create_pressure_control(policy, &targets, &settings)?,
                ))),
            }
        } else {
            if let Some(choke_id) = targets.upstream_choke {
                solvers.push(Box::new(UpstreamChokeSolver::new(
                    choke_id,
                    settings.upstream_choke_boundary,
                    settings.root_finding.into(),
                )));
            }
            if let Some(choke_id) = targets.downstream_choke {
                solvers.push(Box::new(DownstreamChokeSolver::new(
                    choke_id,
                    settings.root_finding.into(),
                )));
            }
        }

        Ok(CompressorTrain {
            system,
            solver: ProcessSolver::new(solvers, StreamConstraint::pressure(target)),
            targets,
        })
    }
}
