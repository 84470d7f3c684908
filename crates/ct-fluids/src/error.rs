//! Errors of the property backends and stream constructors.

use ct_core::CtError;
use thiserror::Error;

pub type FluidResult<T> = Result<T, FluidError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Negative rate, non-positive pressure or temperature, bad fractions.
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// A flash left the backend's valid range, e.g. a PH flash with no
    /// temperature bracket.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// The backend cannot handle this fluid (mixtures on CoolProp).
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },
}

impl From<FluidError> for CtError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::InvalidArg { what } | FluidError::NonPhysical { what } => {
                CtError::InvalidArg { what }
            }
            other => CtError::Invariant {
                what: format!("fluid: {other}"),
            },
        }
    }
}

impl From<CtError> for FluidError {
    fn from(err: CtError) -> Self {
        match err {
            CtError::NonFinite { what, .. } | CtError::InvalidArg { what } => {
                FluidError::NonPhysical { what }
            }
            other => FluidError::Backend {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FluidError::NonPhysical { what: "mass rate" };
        assert!(err.to_string().contains("mass rate"));

        let err = FluidError::Backend {
            message: "CoolProp failed".into(),
        };
        assert!(err.to_string().contains("CoolProp"));
    }

    #[test]
    fn error_to_core_error() {
        let core: CtError = FluidError::NotSupported { what: "mixtures" }.into();
        assert!(matches!(core, CtError::Invariant { .. }));

        let core: CtError = FluidError::NonPhysical { what: "pressure" }.into();
        assert!(matches!(core, CtError::InvalidArg { what: "pressure" }));
    }
}
