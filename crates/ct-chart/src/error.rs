//! Chart errors.

use ct_core::CtError;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("Invalid chart curve: {what}")]
    InvalidCurve { what: &'static str },

    #[error("Invalid chart: {what}")]
    InvalidChart { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl From<ChartError> for CtError {
    fn from(e: ChartError) -> Self {
        match e {
            ChartError::InvalidCurve { what }
            | ChartError::InvalidChart { what }
            | ChartError::InvalidArg { what } => CtError::InvalidArg { what },
        }
    }
}
