//! Error types for solvers and solver configuration.

use ct_chart::ChartError;
use ct_core::CtError;
use ct_fluids::FluidError;
use ct_process::ProcessError;
use thiserror::Error;

/// Errors that abort a solve.
///
/// Running out of search range or iterations is not an error; it comes back
/// as a solution with `success == false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid solver configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("Unknown policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    #[error("{0}")]
    Core(#[from] CtError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for CtError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::Core(inner) => inner,
            SolverError::Process(inner) => inner.into(),
            SolverError::Fluid(inner) => inner.into(),
            SolverError::Chart(inner) => inner.into(),
            other => CtError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
