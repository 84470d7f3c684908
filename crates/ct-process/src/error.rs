//! Error types for process units and systems.

use ct_chart::ChartError;
use ct_core::{CtError, UnitId};
use ct_fluids::FluidError;
use thiserror::Error;

/// Errors raised while configuring or propagating through process units.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// Invalid physical input given at construction/configuration time.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A unit was asked to go further than physically possible.
    #[error("{unit} is outside capacity: {what}")]
    OutsideCapacity { unit: String, what: String },

    #[error("Invalid configuration: {what}")]
    InvalidConfiguration { what: String },

    #[error("No process unit with id {id}")]
    UnitNotFound { id: UnitId },

    #[error("Process unit {id} is not a {expected}")]
    WrongUnitKind { id: UnitId, expected: &'static str },

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),
}

pub type ProcessResult<T> = Result<T, ProcessError>;

impl From<CtError> for ProcessError {
    fn from(e: CtError) -> Self {
        match e {
            CtError::InvalidArg { what } | CtError::NonFinite { what, .. } => {
                ProcessError::InvalidArg { what }
            }
            other => ProcessError::InvalidConfiguration {
                what: other.to_string(),
            },
        }
    }
}

impl From<ProcessError> for CtError {
    fn from(e: ProcessError) -> Self {
        match e {
            ProcessError::InvalidArg { what } => CtError::InvalidArg { what },
            other => CtError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
