//! Trains wired from YAML configuration.

use ct_fluids::{
    Composition, EosModel, FluidModel, FluidStream, IdealGasService, ProcessConditions, Species,
};
use ct_solver::{
    CapacityPolicy, CompressorTrain, PressureControlPolicy, SolverConfig, SolverError,
    SolverState, TrainConfig,
};

const VARIABLE_SPEED_TRAIN: &str = r#"
shaft:
  mechanical_efficiency: 0.97
stages:
  - inlet_temperature_kelvin: 303.15
    chart:
      - speed_rpm: 8000
        rate_actual_m3_per_hour: [560, 720, 880, 1040]
        polytropic_head_joule_per_kg: [76800, 73600, 67200, 57600]
        efficiency_fraction: [0.70, 0.72, 0.72, 0.68]
      - speed_rpm: 10000
        rate_actual_m3_per_hour: [700, 900, 1100, 1300]
        polytropic_head_joule_per_kg: [120000, 115000, 105000, 90000]
        efficiency_fraction: [0.70, 0.72, 0.72, 0.68]
      - speed_rpm: 11000
        rate_actual_m3_per_hour: [770, 990, 1210, 1430]
        polytropic_head_joule_per_kg: [145200, 139150, 127050, 108900]
        efficiency_fraction: [0.70, 0.72, 0.72, 0.68]
solver:
  pressure_control: COMMON_ASV
  capacity_policy: COMMON_ASV_MIN_FLOW
"#;

const SINGLE_SPEED_CHOKED_TRAIN: &str = r#"
shaft:
  speed_rpm: 10000
stages:
  - inlet_temperature_kelvin: 303.15
    remove_liquid: true
    chart:
      - speed_rpm: 10000
        rate_actual_m3_per_hour: [700, 900, 1100, 1300]
        polytropic_head_joule_per_kg: [120000, 115000, 105000, 90000]
        efficiency_fraction: [0.70, 0.72, 0.72, 0.68]
solver:
  pressure_control: downstream_choke
  capacity_policy: NONE
"#;

fn inlet(service: &IdealGasService, actual_rate: f64) -> FluidStream {
    let conditions = ProcessConditions::new(50.0, 303.15).unwrap();
    let fluid = FluidModel::new(Composition::pure(Species::CH4), EosModel::Srk);
    let unit_rate = FluidStream::from_mass_rate(service, fluid, conditions, 1.0).unwrap();
    unit_rate
        .with_mass_rate(actual_rate * unit_rate.density())
        .unwrap()
}

#[test]
fn variable_speed_train_with_common_asv() {
    let config: TrainConfig = serde_yaml::from_str(VARIABLE_SPEED_TRAIN).unwrap();
    assert_eq!(config.solver.pressure_control, PressureControlPolicy::CommonAsv);
    assert_eq!(config.shaft.speed_rpm, None);

    let mut train = config.build(90.0).unwrap();
    assert!(train.targets.recirculation_loop.is_some());
    assert!(train.targets.upstream_choke.is_none());
    assert!(train.targets.downstream_choke.is_none());
    assert!(train.system.shaft().unwrap().is_variable_speed());
    assert_eq!(train.solver.solver_names(), vec!["common ASV"]);

    let service = IdealGasService::new();
    let inlet = inlet(&service, 1_000.0);
    let solution = train.solve(&service, &inlet).unwrap();

    assert!(solution.success);
    assert_eq!(train.solver.state(), SolverState::Converged);
    assert!((solution.outlet.pressure_bara() - 90.0).abs() <= 1e-3);
    // 1000 Am3/h sits right of the minimum-flow line at the solved speed
    let loop_id = train.targets.recirculation_loop.unwrap();
    assert_eq!(train.system.recirculation_rate(loop_id).unwrap(), 0.0);
    let shaft_power = train.system.shaft_power_megawatt();
    assert!(shaft_power > train.system.fluid_power_megawatt());
}

#[test]
fn single_speed_train_with_downstream_choke() {
    let config: TrainConfig = serde_yaml::from_str(SINGLE_SPEED_CHOKED_TRAIN).unwrap();
    assert_eq!(config.solver.capacity_policy, CapacityPolicy::None);

    let mut train = config.build(80.0).unwrap();
    assert!(train.targets.recirculation_loop.is_none());
    let choke_id = train.targets.downstream_choke.unwrap();
    assert_eq!(train.solver.solver_names(), vec!["downstream choke"]);

    let service = IdealGasService::new();
    let inlet = inlet(&service, 1_000.0);
    let solution = train.solve(&service, &inlet).unwrap();

    assert!(solution.success);
    assert!((solution.outlet.pressure_bara() - 80.0).abs() <= 1e-3);
    assert!(train.system.pressure_change(choke_id).unwrap() > 10.0);
}

/// At 800 Am3/h the slowest curve alone gives about 76 bara, so a 65 bara
/// target leaves speed pinned and the choke takes out the rest.
fn variable_speed_choked_train(policy: PressureControlPolicy) -> CompressorTrain {
    let mut config: TrainConfig = serde_yaml::from_str(VARIABLE_SPEED_TRAIN).unwrap();
    config.solver.pressure_control = policy;
    config.solver.capacity_policy = CapacityPolicy::None;
    config.build(65.0).unwrap()
}

#[test]
fn choke_finishes_below_minimum_speed_pressure() {
    let service = IdealGasService::new();
    let inlet = inlet(&service, 800.0);

    for policy in [
        PressureControlPolicy::DownstreamChoke,
        PressureControlPolicy::UpstreamChoke,
    ] {
        let mut train = variable_speed_choked_train(policy);
        assert!(train.targets.recirculation_loop.is_none());
        assert_eq!(
            train.solver.solver_names(),
            vec!["speed with pressure control"]
        );

        let solution = train.solve(&service, &inlet).unwrap();

        assert!(solution.success, "{policy}: {:?}", solution.reports);
        assert_eq!(train.solver.state(), SolverState::Converged);
        assert!((solution.outlet.pressure_bara() - 65.0).abs() <= 1e-3);
        assert!((train.system.speed_rpm().unwrap() - 8_000.0).abs() <= 1.0);
        let report = &solution.reports[0];
        assert_eq!(report.solutions.len(), 2);
        assert!(report.solutions.iter().all(|s| s.success));
        let choke_id = train
            .targets
            .upstream_choke
            .or(train.targets.downstream_choke)
            .unwrap();
        assert!(train.system.pressure_change(choke_id).unwrap() > 1.0);
    }
}

#[test]
fn choke_stays_open_when_speed_reaches_target() {
    let service = IdealGasService::new();
    let inlet = inlet(&service, 1_000.0);
    let mut config: TrainConfig = serde_yaml::from_str(VARIABLE_SPEED_TRAIN).unwrap();
    config.solver.pressure_control = PressureControlPolicy::DownstreamChoke;
    config.solver.capacity_policy = CapacityPolicy::None;
    let mut train = config.build(90.0).unwrap();

    let solution = train.solve(&service, &inlet).unwrap();

    assert!(solution.success);
    let choke_id = train.targets.downstream_choke.unwrap();
    assert_eq!(train.system.pressure_change(choke_id).unwrap(), 0.0);
    assert!(train.system.speed_rpm().unwrap() > 8_000.0);
}

#[test]
fn omitted_solver_section_uses_defaults() {
    let yaml = r#"
stages:
  - inlet_temperature_kelvin: 300.0
    chart:
      - speed_rpm: 10000
        rate_actual_m3_per_hour: [700, 1300]
        polytropic_head_joule_per_kg: [120000, 90000]
        efficiency_fraction: [0.72, 0.68]
"#;
    let config: TrainConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.solver, SolverConfig::default());
    assert_eq!(config.shaft.mechanical_efficiency, 1.0);

    let train = config.build(80.0).unwrap();
    assert!(train.targets.recirculation_loop.is_some());
    assert!(train.targets.downstream_choke.is_some());
    assert!(!train.system.shaft().unwrap().is_variable_speed());
}

#[test]
fn unknown_policy_is_rejected_by_name() {
    let err = serde_yaml::from_str::<SolverConfig>("pressure_control: FULL_THROTTLE")
        .unwrap_err()
        .to_string();
    assert!(err.contains("Unknown policy 'FULL_THROTTLE'"), "{err}");
}

#[test]
fn unknown_field_is_rejected() {
    assert!(serde_yaml::from_str::<SolverConfig>("max_iteration: 10").is_err());
}

#[test]
fn configured_boundaries_are_checked() {
    let mut config: TrainConfig = serde_yaml::from_str(VARIABLE_SPEED_TRAIN).unwrap();
    config.solver = serde_yaml::from_str("recirculation_boundary: {min: 10.0, max: 1.0}").unwrap();
    assert!(config.build(90.0).is_err());
}

#[test]
fn non_positive_tolerance_is_invalid() {
    let mut config: TrainConfig = serde_yaml::from_str(VARIABLE_SPEED_TRAIN).unwrap();
    config.solver.root_finding_tolerance = 0.0;
    assert!(matches!(
        config.build(90.0),
        Err(SolverError::InvalidConfiguration { .. })
    ));
}

#[test]
fn train_without_stages_is_invalid() {
    let config: TrainConfig = serde_yaml::from_str("stages: []").unwrap();
    assert!(matches!(
        config.build(90.0),
        Err(SolverError::InvalidConfiguration { .. })
    ));
}

#[test]
fn solver_config_round_trips_through_json() {
    let config = SolverConfig {
        pressure_control: PressureControlPolicy::UpstreamChoke,
        ..SolverConfig::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"UPSTREAM_CHOKE\""));
    let back: SolverConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
