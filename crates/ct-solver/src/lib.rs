//! ct-solver: operating-point solvers for compressor trains.
//!
//! Given a [`ProcessSystem`](ct_process::ProcessSystem), an inlet stream and a
//! discharge pressure target, the solvers turn the system's knobs (shaft
//! speed, shared recirculation rate, choke pressure drop) until the target is
//! met or the search range runs out.
//!
//! - [`search`]: bounded bisection and Brent root finding
//! - [`policy`]: named capacity and pressure-control policies + factories
//! - [`SpeedSolver`], [`UpstreamChokeSolver`], [`DownstreamChokeSolver`],
//!   [`CommonAsvSolver`]: solvers for one knob each
//! - [`SpeedWithPressureControlSolver`]: speed, then a choke for the rest
//! - [`ProcessSolver`]: runs solvers in order and checks the outlet
//! - [`config`]: serde configuration that wires a train and its solvers
//!
//! An unmet target is never an error. It comes back as `success == false`
//! with the system left at the best configuration inside its bounds.

pub mod asv;
pub mod choke;
pub mod config;
pub mod error;
pub mod policy;
pub mod process_solver;
pub mod search;
pub mod solution;
pub mod speed;

pub use asv::CommonAsvSolver;
pub use choke::{DownstreamChokeSolver, UpstreamChokeSolver};
pub use config::{CompressorTrain, ShaftConfig, SolverConfig, StageConfig, TrainConfig};
pub use error::{SolverError, SolverResult};
pub use policy::{
    CapacityControl, CapacityPolicy, ControlSettings, ControlTargets, PressureControl,
    PressureControlPolicy, create_capacity_control, create_pressure_control,
};
pub use process_solver::{ProcessSolution, ProcessSolver, SolverState, StreamConstraint};
pub use search::{
    BinarySearchStrategy, RootFinder, RootFindingStrategy, RootSolution, SearchStrategy,
};
pub use solution::{
    ChokeConfiguration, Configuration, RecirculationConfiguration, Solution, Solver,
    SolverReport, SpeedConfiguration,
};
pub use speed::{SpeedSolver, SpeedWithPressureControlSolver};
