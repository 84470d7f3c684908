use thiserror::Error;

pub type CtResult<T> = Result<T, CtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Invalid boundary: min={min} is greater than max={max}")]
    InvalidBoundary { min: f64, max: f64 },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
