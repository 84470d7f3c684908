//! Per-propagation context handed to every unit.

use ct_fluids::FluidService;

/// What a unit can see besides its inlet stream.
#[derive(Clone, Copy)]
pub struct PropagationContext<'a> {
    /// Property backend used for every flash.
    pub fluid: &'a dyn FluidService,
    /// Shaft speed of the owning system, if it has a shaft with a set speed.
    pub speed_rpm: Option<f64>,
    /// Recirculated mass already added by enclosing loops [kg/h].
    pub recirculation_kg_per_h: f64,
}

impl<'a> PropagationContext<'a> {
    pub fn new(fluid: &'a dyn FluidService, speed_rpm: Option<f64>) -> Self {
        Self {
            fluid,
            speed_rpm,
            recirculation_kg_per_h: 0.0,
        }
    }

    /// Context for the inside of a recirculation loop.
    pub fn with_recirculation(&self, rate_kg_per_h: f64) -> Self {
        Self {
            recirculation_kg_per_h: self.recirculation_kg_per_h + rate_kg_per_h,
            ..*self
        }
    }
}
