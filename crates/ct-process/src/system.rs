//! Ordered chain of process units sharing one shaft.

use tracing::debug;

use crate::context::PropagationContext;
use crate::error::{ProcessError, ProcessResult};
use crate::operating_point::{CompressorOperatingPoint, UnitOperatingPoint};
use crate::shaft::Shaft;
use crate::unit::{ProcessUnit, RecirculationLoop, Unit};
use ct_chart::CompressorChart;
use ct_core::{Boundary, UnitId};
use ct_fluids::{FluidService, FluidStream};

/// Process units in flow order plus the shaft that drives their compressors.
///
/// Solvers turn three knobs, all addressed by [`UnitId`]: the shaft speed,
/// the recirculation rate of a [`RecirculationLoop`] and the pressure drop of a
/// choke. Each trial re-propagates the inlet through every unit.
#[derive(Clone, Debug)]
pub struct ProcessSystem {
    units: Vec<(UnitId, Unit)>,
    shaft: Option<Shaft>,
}

impl ProcessSystem {
    pub fn builder() -> ProcessSystemBuilder {
        ProcessSystemBuilder::new()
    }

    pub fn shaft(&self) -> Option<&Shaft> {
        self.shaft.as_ref()
    }

    pub fn shaft_mut(&mut self) -> Option<&mut Shaft> {
        self.shaft.as_mut()
    }

    /// Set the shaft speed [rpm].
    pub fn set_speed(&mut self, speed_rpm: f64) -> ProcessResult<()> {
        match self.shaft.as_mut() {
            Some(shaft) => shaft.set_speed(speed_rpm),
            None => Err(ProcessError::InvalidConfiguration {
                what: "process system has no shaft".to_string(),
            }),
        }
    }

    pub fn speed_rpm(&self) -> Option<f64> {
        self.shaft.as_ref().and_then(Shaft::speed_rpm)
    }

    /// Top-level units in flow order.
    pub fn units(&self) -> &[(UnitId, Unit)] {
        &self.units
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Find a unit by id, looking inside recirculation loops too.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        for (uid, unit) in &self.units {
            if *uid == id {
                return Some(unit);
            }
            if let Unit::RecirculationLoop(recirculation) = unit {
                if let Some(found) = recirculation.inner().unit(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        for (uid, unit) in self.units.iter_mut() {
            if *uid == id {
                return Some(unit);
            }
            if let Unit::RecirculationLoop(recirculation) = unit {
                if let Some(found) = recirculation.inner_mut().unit_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn recirculation_loop(&self, id: UnitId) -> ProcessResult<&RecirculationLoop> {
        match self.unit(id) {
            Some(Unit::RecirculationLoop(recirculation)) => Ok(recirculation),
            Some(_) => Err(ProcessError::WrongUnitKind {
                id,
                expected: "recirculation loop",
            }),
            None => Err(ProcessError::UnitNotFound { id }),
        }
    }

    fn recirculation_loop_mut(&mut self, id: UnitId) -> ProcessResult<&mut RecirculationLoop> {
        match self.unit_mut(id) {
            Some(Unit::RecirculationLoop(recirculation)) => Ok(recirculation),
            Some(_) => Err(ProcessError::WrongUnitKind {
                id,
                expected: "recirculation loop",
            }),
            None => Err(ProcessError::UnitNotFound { id }),
        }
    }

    /// Recirculated mass rate of a loop [kg/h].
    pub fn recirculation_rate(&self, id: UnitId) -> ProcessResult<f64> {
        Ok(self.recirculation_loop(id)?.recirculation_rate())
    }

    pub fn set_recirculation_rate(&mut self, id: UnitId, rate_kg_per_h: f64) -> ProcessResult<()> {
        self.recirculation_loop_mut(id)?
            .set_recirculation_rate(rate_kg_per_h)
    }

    /// Pressure drop of a choke or choke valve [bar].
    pub fn pressure_change(&self, id: UnitId) -> ProcessResult<f64> {
        match self.unit(id) {
            Some(Unit::Choke(choke)) => Ok(choke.pressure_change()),
            Some(Unit::ChokeValve(valve)) => Ok(valve.pressure_change()),
            Some(_) => Err(ProcessError::WrongUnitKind {
                id,
                expected: "choke",
            }),
            None => Err(ProcessError::UnitNotFound { id }),
        }
    }

    pub fn set_pressure_change(&mut self, id: UnitId, pressure_change_bar: f64) -> ProcessResult<()> {
        match self.unit_mut(id) {
            Some(Unit::Choke(choke)) => choke.set_pressure_change(pressure_change_bar),
            Some(Unit::ChokeValve(valve)) => valve.set_pressure_change(pressure_change_bar),
            Some(_) => Err(ProcessError::WrongUnitKind {
                id,
                expected: "choke",
            }),
            None => Err(ProcessError::UnitNotFound { id }),
        }
    }

    /// Whether any unit takes or produces more than one stream.
    pub fn is_multi_stream(&self) -> bool {
        self.units.iter().any(|(_, unit)| unit.is_multi_stream())
    }

    /// Charts of every compressor, in flow order.
    pub fn compressor_charts(&self) -> Vec<&CompressorChart> {
        let mut charts = Vec::new();
        for (_, unit) in &self.units {
            match unit {
                Unit::Compressor(compressor) => charts.push(compressor.chart()),
                Unit::RecirculationLoop(recirculation) => {
                    charts.extend(recirculation.inner().compressor_charts())
                }
                _ => {}
            }
        }
        charts
    }

    /// Speed range every variable-speed chart covers.
    ///
    /// `None` if no compressor has a variable-speed chart.
    pub fn speed_range(&self) -> ProcessResult<Option<Boundary>> {
        let mut range: Option<(f64, f64)> = None;
        for chart in self.compressor_charts() {
            if !chart.is_variable_speed() {
                continue;
            }
            let (lo, hi) = (chart.minimum_speed(), chart.maximum_speed());
            range = Some(match range {
                Some((min, max)) => (min.max(lo), max.min(hi)),
                None => (lo, hi),
            });
        }
        match range {
            None => Ok(None),
            Some((min, max)) => Boundary::new(min, max).map(Some).map_err(|_| {
                ProcessError::InvalidConfiguration {
                    what: format!(
                        "compressor charts share no common speed range ({min} > {max} rpm)"
                    ),
                }
            }),
        }
    }

    /// Run `inlet` through every unit and return the outlet stream.
    pub fn propagate_stream(
        &mut self,
        fluid: &dyn FluidService,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let ctx = PropagationContext::new(fluid, self.speed_rpm());
        self.propagate_with_context(&ctx, inlet)
    }

    pub(crate) fn propagate_with_context(
        &mut self,
        ctx: &PropagationContext<'_>,
        inlet: &FluidStream,
    ) -> ProcessResult<FluidStream> {
        let ctx = match self.speed_rpm() {
            Some(speed) => PropagationContext {
                speed_rpm: Some(speed),
                ..*ctx
            },
            None => *ctx,
        };
        let mut stream = inlet.clone();
        for (id, unit) in self.units.iter_mut() {
            stream = unit.propagate_stream(&ctx, &stream)?;
            debug!(
                unit = %unit.name(),
                %id,
                pressure_bara = stream.pressure_bara(),
                temperature_kelvin = stream.temperature_kelvin(),
                "propagated"
            );
        }
        Ok(stream)
    }

    /// Operating points from the last propagation, loops flattened.
    pub fn operating_points(&self) -> Vec<UnitOperatingPoint> {
        let mut points = Vec::new();
        for (id, unit) in &self.units {
            match unit {
                Unit::Compressor(compressor) => {
                    if let Some(point) = compressor.operating_point() {
                        points.push(UnitOperatingPoint::Compressor {
                            id: *id,
                            name: compressor.name().to_string(),
                            point: *point,
                        });
                    }
                }
                Unit::Choke(choke) => points.push(UnitOperatingPoint::Choke {
                    id: *id,
                    name: choke.name().to_string(),
                    pressure_change_bar: choke.pressure_change(),
                    choked: false,
                }),
                Unit::ChokeValve(valve) => points.push(UnitOperatingPoint::Choke {
                    id: *id,
                    name: valve.name().to_string(),
                    pressure_change_bar: valve.pressure_change(),
                    choked: valve.was_choked(),
                }),
                Unit::RecirculationLoop(recirculation) => {
                    points.push(UnitOperatingPoint::RecirculationLoop {
                        id: *id,
                        name: recirculation.name().to_string(),
                        recirculation_rate_kg_per_h: recirculation.recirculation_rate(),
                    });
                    points.extend(recirculation.inner().operating_points());
                }
                _ => {}
            }
        }
        points
    }

    /// Compressor operating points from the last propagation, in flow order.
    pub fn compressor_operating_points(&self) -> Vec<CompressorOperatingPoint> {
        self.operating_points()
            .into_iter()
            .filter_map(|point| match point {
                UnitOperatingPoint::Compressor { point, .. } => Some(point),
                _ => None,
            })
            .collect()
    }

    /// Every compressor runs at or right of its minimum-flow line.
    pub fn is_within_minimum_flow(&self) -> bool {
        self.compressor_operating_points()
            .iter()
            .all(|point| !point.chart.is_below_minimum_flow())
    }

    /// Every compressor point is inside its chart.
    pub fn is_within_capacity(&self) -> bool {
        self.compressor_operating_points()
            .iter()
            .all(|point| point.chart.is_valid)
    }

    /// Gas power of all compressors [MW].
    pub fn fluid_power_megawatt(&self) -> f64 {
        self.compressor_operating_points()
            .iter()
            .map(|point| point.fluid_power_megawatt)
            .sum()
    }

    /// Driver power including mechanical losses [MW].
    pub fn shaft_power_megawatt(&self) -> f64 {
        let fluid_power = self.fluid_power_megawatt();
        match &self.shaft {
            Some(shaft) => shaft.shaft_power_megawatt(fluid_power),
            None => fluid_power,
        }
    }
}

/// Builder for a [`ProcessSystem`].
///
/// Ids are handed out in insertion order and stay unique across nested
/// recirculation loops.
#[derive(Debug, Default)]
pub struct ProcessSystemBuilder {
    units: Vec<(UnitId, Unit)>,
    shaft: Option<Shaft>,
    last_unit_id: Option<UnitId>,
}

impl ProcessSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_shaft(&mut self, shaft: Shaft) -> &mut Self {
        self.shaft = Some(shaft);
        self
    }

    fn next_id(&mut self) -> UnitId {
        let id = self
            .last_unit_id
            .map_or(UnitId::from_index(0), UnitId::next);
        self.last_unit_id = Some(id);
        id
    }

    /// Append a unit and return its id.
    pub fn add(&mut self, unit: impl Into<Unit>) -> UnitId {
        let id = self.next_id();
        self.units.push((id, unit.into()));
        id
    }

    /// Append a recirculation loop whose inner units are added by `build`.
    ///
    /// # Errors
    /// The inner system must be non-empty, single-stream and without its own shaft.
    pub fn add_recirculation_loop<F>(
        &mut self,
        name: impl Into<String>,
        build: F,
    ) -> ProcessResult<UnitId>
    where
        F: FnOnce(&mut ProcessSystemBuilder) -> ProcessResult<()>,
    {
        let id = self.next_id();
        let mut inner = ProcessSystemBuilder {
            last_unit_id: Some(id),
            ..Self::default()
        };
        build(&mut inner)?;
        self.last_unit_id = inner.last_unit_id;

        if inner.shaft.is_some() {
            return Err(ProcessError::InvalidConfiguration {
                what: "the shaft belongs to the outer process system".to_string(),
            });
        }
        let recirculation = RecirculationLoop::new(
            name,
            ProcessSystem {
                units: inner.units,
                shaft: None,
            },
        )?;
        self.units.push((id, recirculation.into()));
        Ok(id)
    }

    /// # Errors
    /// Variable-speed charts need a shaft to read their speed from.
    pub fn build(self) -> ProcessResult<ProcessSystem> {
        let system = ProcessSystem {
            units: self.units,
            shaft: self.shaft,
        };
        let needs_shaft = system
            .compressor_charts()
            .iter()
            .any(|chart| chart.is_variable_speed());
        if needs_shaft && system.shaft.is_none() {
            return Err(ProcessError::InvalidConfiguration {
                what: "variable-speed compressor charts need a shaft".to_string(),
            });
        }
        Ok(system)
    }
}
