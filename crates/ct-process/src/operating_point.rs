//! Operating points recorded by units during the last propagation.

use ct_chart::ChartOperatingPoint;
use ct_core::UnitId;

/// What a compressor saw and did on its last propagation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompressorOperatingPoint {
    pub chart: ChartOperatingPoint,
    pub inlet_pressure_bara: f64,
    pub outlet_pressure_bara: f64,
    pub inlet_temperature_kelvin: f64,
    pub outlet_temperature_kelvin: f64,
    pub mass_rate_kg_per_h: f64,
    /// Power delivered to the gas, m·head/η [MW]
    pub fluid_power_megawatt: f64,
}

/// Per-unit result handed to reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnitOperatingPoint {
    Compressor {
        id: UnitId,
        name: String,
        point: CompressorOperatingPoint,
    },
    Choke {
        id: UnitId,
        name: String,
        pressure_change_bar: f64,
        /// Outlet pressure was clamped at the critical pressure.
        choked: bool,
    },
    RecirculationLoop {
        id: UnitId,
        name: String,
        recirculation_rate_kg_per_h: f64,
    },
}

impl UnitOperatingPoint {
    pub fn id(&self) -> UnitId {
        match self {
            Self::Compressor { id, .. }
            | Self::Choke { id, .. }
            | Self::RecirculationLoop { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Compressor { name, .. }
            | Self::Choke { name, .. }
            | Self::RecirculationLoop { name, .. } => name,
        }
    }
}
