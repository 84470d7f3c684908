//! Stream propagation through units and systems with the ideal-gas backend.

use ct_chart::{ChartAreaFlag, ChartCurve, CompressorChart};
use ct_fluids::{
    Composition, EosModel, FluidModel, FluidResult, FluidService, FluidStream, IdealGasService,
    PhaseSplit, ProcessConditions, SpecEnthalpy, Species, ThermoProperties,
};
use ct_process::{
    ChokeValve, Compressor, LiquidRemover, Mixer, ProcessError, ProcessSystem, ProcessUnit,
    PropagationContext, RateModifier, RateModifierMode, Shaft, Splitter, TemperatureSetter,
    UnitOperatingPoint,
};
use proptest::prelude::*;

fn methane() -> FluidModel {
    FluidModel::new(Composition::pure(Species::CH4), EosModel::Srk)
}

fn stream_at(service: &dyn FluidService, p: f64, t: f64, mass_rate: f64) -> FluidStream {
    FluidStream::from_mass_rate(
        service,
        methane(),
        ProcessConditions::new(p, t).unwrap(),
        mass_rate,
    )
    .unwrap()
}

fn fan_law_chart() -> CompressorChart {
    let base_rates = [700.0, 900.0, 1100.0, 1300.0];
    let base_heads = [120_000.0, 115_000.0, 105_000.0, 90_000.0];
    let efficiencies = vec![0.70, 0.72, 0.72, 0.68];
    let curves = [8_000.0, 10_000.0, 11_000.0]
        .iter()
        .map(|speed| {
            let s = speed / 10_000.0;
            ChartCurve::new(
                *speed,
                base_rates.iter().map(|r| r * s).collect(),
                base_heads.iter().map(|h| h * s * s).collect(),
                efficiencies.clone(),
            )
            .unwrap()
        })
        .collect();
    CompressorChart::variable_speed(curves).unwrap()
}

/// Ideal gas that treats water as fully condensed.
struct WetGasService {
    dry: IdealGasService,
}

impl FluidService for WetGasService {
    fn name(&self) -> &str {
        "wet ideal gas"
    }

    fn supports(&self, _fluid: &FluidModel) -> bool {
        true
    }

    fn flash_pt(
        &self,
        fluid: &FluidModel,
        conditions: ProcessConditions,
    ) -> FluidResult<ThermoProperties> {
        let properties = self.dry.flash_pt(fluid, conditions)?;
        Ok(ThermoProperties {
            vapor_fraction_molar: 1.0 - fluid.composition.mole_fraction(Species::H2O),
            ..properties
        })
    }

    fn flash_ph(
        &self,
        fluid: &FluidModel,
        pressure_bara: f64,
        enthalpy: SpecEnthalpy,
    ) -> FluidResult<(ProcessConditions, ThermoProperties)> {
        self.dry.flash_ph(fluid, pressure_bara, enthalpy)
    }

    fn vapor_split(
        &self,
        fluid: &FluidModel,
        _conditions: ProcessConditions,
    ) -> FluidResult<PhaseSplit> {
        Ok(PhaseSplit {
            vapor: FluidModel::new(fluid.composition.without(Species::H2O)?, fluid.eos),
            vapor_mass_fraction: 1.0 - fluid.composition.mass_fraction(Species::H2O),
        })
    }
}

#[test]
fn splitter_fractions_split_mass() {
    let service = IdealGasService::new();
    let inlet = stream_at(&service, 30.0, 300.0, 100.0);
    let splitter = Splitter::new("split", &[0.3, 0.3, 0.4]).unwrap();

    let rates: Vec<f64> = splitter
        .split(&inlet)
        .unwrap()
        .iter()
        .map(FluidStream::mass_rate_kg_per_h)
        .collect();
    for (rate, expected) in rates.iter().zip([30.0, 30.0, 40.0]) {
        assert!((rate - expected).abs() < 1e-9);
    }
    assert!((rates.iter().sum::<f64>() - 100.0).abs() < 1e-9);
}

#[test]
fn splitter_normalizes_fractions() {
    let splitter = Splitter::new("split", &[3.0, 1.0]).unwrap();
    assert_eq!(splitter.fractions(), &[0.75, 0.25]);
}

#[test]
fn splitter_rejects_fraction_count_mismatch() {
    let mut splitter = Splitter::new("split", &[0.5, 0.5]).unwrap();
    assert!(matches!(
        splitter.set_fractions(&[0.2, 0.3, 0.5]),
        Err(ProcessError::InvalidConfiguration { .. })
    ));
    assert!(Splitter::new("bad", &[0.5, -0.1]).is_err());
    assert!(Splitter::new("zero", &[0.0, 0.0]).is_err());
}

#[test]
fn splitter_forwards_first_outlet_and_keeps_the_rest() {
    let service = IdealGasService::new();
    let ctx = PropagationContext::new(&service, None);
    let inlet = stream_at(&service, 30.0, 300.0, 100.0);
    let mut splitter = Splitter::new("split", &[0.6, 0.4]).unwrap();

    let outlet = splitter.propagate_stream(&ctx, &inlet).unwrap();
    assert!((outlet.mass_rate_kg_per_h() - 60.0).abs() < 1e-9);
    assert_eq!(splitter.side_outlets().len(), 1);
    assert!((splitter.side_outlets()[0].mass_rate_kg_per_h() - 40.0).abs() < 1e-9);
}

#[test]
fn mixer_conserves_mass_and_energy() {
    let service = IdealGasService::new();
    let hot = stream_at(&service, 50.0, 340.0, 50.0);
    let cold = stream_at(&service, 40.0, 300.0, 50.0);

    let mixed = Mixer::mix(&service, &[hot.clone(), cold.clone()]).unwrap();

    assert!((mixed.mass_rate_kg_per_h() - 100.0).abs() < 1e-9);
    assert!((mixed.pressure_bara() - 40.0).abs() < 1e-12);
    let energy_in = hot.enthalpy() * 50.0 + cold.enthalpy() * 50.0;
    assert!((mixed.enthalpy() * 100.0 - energy_in).abs() < 1e-6);
    // constant cp: equal masses land halfway
    assert!((mixed.temperature_kelvin() - 320.0).abs() < 1e-9);
}

#[test]
fn mixer_blends_compositions_by_moles() {
    let service = IdealGasService::new();
    let nitrogen = FluidModel::new(Composition::pure(Species::N2), EosModel::Srk);
    let conditions = ProcessConditions::new(20.0, 300.0).unwrap();
    let a = FluidStream::from_mass_rate(&service, methane(), conditions, 16.043).unwrap();
    let b = FluidStream::from_mass_rate(&service, nitrogen, conditions, 28.014).unwrap();

    let mixed = Mixer::mix(&service, &[a, b]).unwrap();
    let x_ch4 = mixed.fluid().composition.mole_fraction(Species::CH4);
    assert!((x_ch4 - 0.5).abs() < 1e-3);
}

#[test]
fn mixer_rejects_mixed_equations_of_state() {
    let service = IdealGasService::new();
    let conditions = ProcessConditions::new(20.0, 300.0).unwrap();
    let srk = FluidStream::from_mass_rate(&service, methane(), conditions, 1.0).unwrap();
    let pr = FluidStream::from_mass_rate(
        &service,
        FluidModel::new(Composition::pure(Species::CH4), EosModel::Pr),
        conditions,
        1.0,
    )
    .unwrap();
    assert!(Mixer::mix(&service, &[srk, pr]).is_err());
    assert!(Mixer::mix(&service, &[]).is_err());
}

#[test]
fn rate_modifier_cannot_remove_more_than_present() {
    let service = IdealGasService::new();
    let ctx = PropagationContext::new(&service, None);
    let inlet = stream_at(&service, 30.0, 300.0, 100.0);

    let mut add = RateModifier::new("in", RateModifierMode::Add);
    add.set_rate(25.0).unwrap();
    let added = add.propagate_stream(&ctx, &inlet).unwrap();
    assert!((added.mass_rate_kg_per_h() - 125.0).abs() < 1e-12);

    let mut remove = RateModifier::new("out", RateModifierMode::Remove);
    remove.set_rate(150.0).unwrap();
    assert!(matches!(
        remove.propagate_stream(&ctx, &inlet),
        Err(ProcessError::OutsideCapacity { .. })
    ));
    assert!(remove.set_rate(-1.0).is_err());
}

#[test]
fn temperature_setter_heats_or_cools() {
    let service = IdealGasService::new();
    let ctx = PropagationContext::new(&service, None);
    let inlet = stream_at(&service, 30.0, 350.0, 10.0);

    let mut cooler = TemperatureSetter::new("cooler", 303.15).unwrap();
    let cooled = cooler.propagate_stream(&ctx, &inlet).unwrap();
    assert!((cooled.temperature_kelvin() - 303.15).abs() < 1e-12);
    assert_eq!(cooled.pressure_bara(), inlet.pressure_bara());

    let mut heater = TemperatureSetter::new("heater", 400.0).unwrap();
    assert!(heater.propagate_stream(&ctx, &inlet).unwrap().temperature_kelvin() > 350.0);
    assert!(TemperatureSetter::new("bad", 0.0).is_err());
}

#[test]
fn liquid_remover_drops_water() {
    let service = WetGasService {
        dry: IdealGasService::new(),
    };
    let ctx = PropagationContext::new(&service, None);
    let wet = FluidModel::new(
        Composition::new_mole_fractions(vec![(Species::CH4, 0.95), (Species::H2O, 0.05)])
            .unwrap(),
        EosModel::Srk,
    );
    let water_mass_fraction = wet.composition.mass_fraction(Species::H2O);
    let inlet = FluidStream::from_mass_rate(
        &service,
        wet,
        ProcessConditions::new(30.0, 300.0).unwrap(),
        1_000.0,
    )
    .unwrap();

    let outlet = LiquidRemover::new("scrubber")
        .propagate_stream(&ctx, &inlet)
        .unwrap();

    assert_eq!(outlet.fluid().composition.mole_fraction(Species::H2O), 0.0);
    assert!(
        (outlet.mass_rate_kg_per_h() - 1_000.0 * (1.0 - water_mass_fraction)).abs() < 1e-9
    );
    assert_eq!(outlet.pressure_bara(), inlet.pressure_bara());
    assert_eq!(outlet.vapor_fraction_molar(), 1.0);
}

#[test]
fn liquid_remover_passes_dry_gas_through() {
    let service = IdealGasService::new();
    let ctx = PropagationContext::new(&service, None);
    let inlet = stream_at(&service, 30.0, 300.0, 10.0);
    let outlet = LiquidRemover::new("scrubber")
        .propagate_stream(&ctx, &inlet)
        .unwrap();
    assert_eq!(outlet, inlet);
}

#[test]
fn recirculation_loop_returns_inlet_mass_rate() {
    let service = IdealGasService::new();
    let mut builder = ProcessSystem::builder();
    builder.set_shaft(Shaft::variable_speed(1.0).unwrap());
    let mut compressor_id = None;
    let loop_id = builder
        .add_recirculation_loop("asv", |inner| {
            compressor_id = Some(inner.add(Compressor::new("stage 1", fan_law_chart())));
            Ok(())
        })
        .unwrap();
    let mut system = builder.build().unwrap();
    system.set_speed(10_000.0).unwrap();
    system.set_recirculation_rate(loop_id, 5_000.0).unwrap();

    let inlet = stream_at(&service, 50.0, 303.15, 20_000.0);
    let outlet = system.propagate_stream(&service, &inlet).unwrap();

    assert!((outlet.mass_rate_kg_per_h() - 20_000.0).abs() < 1e-9);
    assert!(outlet.pressure_bara() > inlet.pressure_bara());
    assert_eq!(system.recirculation_rate(loop_id).unwrap(), 5_000.0);

    let points = system.compressor_operating_points();
    assert_eq!(points.len(), 1);
    let chart = &points[0].chart;
    assert!((points[0].mass_rate_kg_per_h - 25_000.0).abs() < 1e-9);
    assert!(
        (chart.actual_rate_before_asv_m3_per_h * 1.25 - chart.actual_rate_m3_per_h).abs() < 1e-6
    );

    let all = system.operating_points();
    assert!(matches!(
        all[0],
        UnitOperatingPoint::RecirculationLoop { recirculation_rate_kg_per_h, .. }
            if recirculation_rate_kg_per_h == 5_000.0
    ));
    assert_eq!(all[1].id(), compressor_id.unwrap());
}

#[test]
fn compressor_reads_speed_from_the_shaft() {
    let service = IdealGasService::new();
    let mut builder = ProcessSystem::builder();
    builder.set_shaft(Shaft::variable_speed(0.95).unwrap());
    builder.add(Compressor::new("stage 1", fan_law_chart()));
    let mut system = builder.build().unwrap();

    let inlet = stream_at(&service, 50.0, 303.15, 1.0);
    // 1000 Am3/h at inlet conditions
    let inlet = inlet.with_mass_rate(1_000.0 * inlet.density()).unwrap();

    assert!(matches!(
        system.propagate_stream(&service, &inlet),
        Err(ProcessError::InvalidConfiguration { .. })
    ));

    system.set_speed(10_000.0).unwrap();
    system.propagate_stream(&service, &inlet).unwrap();
    let point = system.compressor_operating_points()[0];
    assert!((point.chart.polytropic_head_joule_per_kg - 110_000.0).abs() < 1e-6);
    assert_eq!(point.chart.chart_area_flag, ChartAreaFlag::Internal);
    assert!(system.is_within_minimum_flow());
    assert!(system.is_within_capacity());
    assert!(system.shaft_power_megawatt() > system.fluid_power_megawatt());

    system.set_speed(8_000.0).unwrap();
    system.propagate_stream(&service, &inlet).unwrap();
    let slower = system.compressor_operating_points()[0];
    assert!(slower.chart.polytropic_head_joule_per_kg < point.chart.polytropic_head_joule_per_kg);
    assert!(slower.outlet_pressure_bara < point.outlet_pressure_bara);
}

#[test]
fn variable_speed_chart_needs_a_shaft() {
    let mut builder = ProcessSystem::builder();
    builder.add(Compressor::new("stage 1", fan_law_chart()));
    assert!(matches!(
        builder.build(),
        Err(ProcessError::InvalidConfiguration { .. })
    ));
}

#[test]
fn choke_valve_in_a_system_reports_choking() {
    let service = IdealGasService::new();
    let mut builder = ProcessSystem::builder();
    let valve = builder.add(ChokeValve::new("valve"));
    let mut system = builder.build().unwrap();
    system.set_pressure_change(valve, 45.0).unwrap();

    let inlet = stream_at(&service, 50.0, 303.15, 100.0);
    let outlet = system.propagate_stream(&service, &inlet).unwrap();

    assert!(outlet.pressure_bara() > 5.0);
    assert!(matches!(
        system.operating_points()[0],
        UnitOperatingPoint::Choke { choked: true, .. }
    ));
}

proptest! {
    #[test]
    fn splitter_conserves_mass(
        fractions in prop::collection::vec(0.01f64..10.0, 1..6),
        mass_rate in 0.0f64..1.0e6,
    ) {
        let service = IdealGasService::new();
        let inlet = stream_at(&service, 30.0, 300.0, mass_rate);
        let outlets = Splitter::new("split", &fractions).unwrap().split(&inlet).unwrap();
        let total: f64 = outlets.iter().map(FluidStream::mass_rate_kg_per_h).sum();
        prop_assert!((total - mass_rate).abs() <= 1e-9 * mass_rate.max(1.0));
        prop_assert_eq!(outlets.len(), fractions.len());
    }
}
