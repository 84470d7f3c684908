//! Typed quantities at the fluid boundary plus the engineering units the
//! train works in (bara, kg/h, Sm³/day).

use uom::si::f64::{Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature};
use uom::si::pressure::bar;
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

/// For standard rates in Sm³/day.
pub const HOURS_PER_DAY: f64 = 24.0;

#[inline]
pub fn bara(v: f64) -> Pressure {
    Pressure::new::<bar>(v)
}

#[inline]
pub fn to_bara(p: Pressure) -> f64 {
    p.get::<bar>()
}

#[inline]
pub fn k(v: f64) -> Temperature {
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    Temperature::new::<degree_celsius>(v)
}

#[inline]
pub fn to_kelvin(t: Temperature) -> f64 {
    t.get::<kelvin>()
}

pub mod constants {
    /// Universal gas constant [J/(mol·K)]
    pub const R_UNIVERSAL: f64 = 8.314_462_618;

    /// Standard reference pressure [bara]
    pub const STANDARD_PRESSURE_BARA: f64 = 1.013_25;

    /// Standard reference temperature [K] (15 °C)
    pub const STANDARD_TEMPERATURE_KELVIN: f64 = 288.15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bara_is_stored_in_pascal() {
        let p = bara(50.0);
        assert!((p.value - 5.0e6).abs() < 1e-6);
        assert!((to_bara(p) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn standard_temperature_is_fifteen_celsius() {
        let t = celsius(15.0);
        assert!((to_kelvin(t) - constants::STANDARD_TEMPERATURE_KELVIN).abs() < 1e-9);
    }
}
