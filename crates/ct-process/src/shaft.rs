//! Mechanical shaft shared by the compressors of one train.

use crate::error::{ProcessError, ProcessResult};

/// Whether the driver can change the shaft speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ShaftKind {
    SingleSpeed,
    VariableSpeed,
}

/// Shaft coupling every compressor of a system to one speed.
///
/// Owned by exactly one [`ProcessSystem`](crate::ProcessSystem). Only speed
/// solvers change the speed, and only on a variable-speed shaft.
#[derive(Clone, Debug, PartialEq)]
pub struct Shaft {
    kind: ShaftKind,
    speed_rpm: Option<f64>,
    /// Fraction of driver power reaching the gas, in (0, 1]
    mechanical_efficiency: f64,
}

fn validate_mechanical_efficiency(eta: f64) -> ProcessResult<f64> {
    if !eta.is_finite() || eta <= 0.0 || eta > 1.0 {
        return Err(ProcessError::InvalidArg {
            what: "mechanical efficiency must be within (0, 1]",
        });
    }
    Ok(eta)
}

fn validate_speed(speed_rpm: f64) -> ProcessResult<f64> {
    if !speed_rpm.is_finite() || speed_rpm <= 0.0 {
        return Err(ProcessError::InvalidArg {
            what: "shaft speed must be positive and finite",
        });
    }
    Ok(speed_rpm)
}

impl Shaft {
    /// Create a fixed-speed shaft.
    ///
    /// # Errors
    /// Returns error if the speed or efficiency is non-physical.
    pub fn single_speed(speed_rpm: f64, mechanical_efficiency: f64) -> ProcessResult<Self> {
        Ok(Self {
            kind: ShaftKind::SingleSpeed,
            speed_rpm: Some(validate_speed(speed_rpm)?),
            mechanical_efficiency: validate_mechanical_efficiency(mechanical_efficiency)?,
        })
    }

    /// Create a variable-speed shaft with no speed set yet.
    pub fn variable_speed(mechanical_efficiency: f64) -> ProcessResult<Self> {
        Ok(Self {
            kind: ShaftKind::VariableSpeed,
            speed_rpm: None,
            mechanical_efficiency: validate_mechanical_efficiency(mechanical_efficiency)?,
        })
    }

    pub fn kind(&self) -> ShaftKind {
        self.kind
    }

    pub fn is_variable_speed(&self) -> bool {
        self.kind == ShaftKind::VariableSpeed
    }

    pub fn speed_rpm(&self) -> Option<f64> {
        self.speed_rpm
    }

    pub fn mechanical_efficiency(&self) -> f64 {
        self.mechanical_efficiency
    }

    /// Set the speed. A single-speed shaft only accepts its own speed.
    pub fn set_speed(&mut self, speed_rpm: f64) -> ProcessResult<()> {
        let speed_rpm = validate_speed(speed_rpm)?;
        match self.kind {
            ShaftKind::VariableSpeed => {
                self.speed_rpm = Some(speed_rpm);
                Ok(())
            }
            ShaftKind::SingleSpeed if self.speed_rpm == Some(speed_rpm) => Ok(()),
            ShaftKind::SingleSpeed => Err(ProcessError::InvalidConfiguration {
                what: format!("cannot change the speed of a single-speed shaft to {speed_rpm} rpm"),
            }),
        }
    }

    /// Driver power needed for a given gas power.
    pub fn shaft_power_megawatt(&self, fluid_power_megawatt: f64) -> f64 {
        fluid_power_megawatt / self.mechanical_efficiency
    }
}
