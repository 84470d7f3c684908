//! Chart evaluation against a fan-law scaled variable-speed chart.

use ct_chart::{ChartAreaFlag, ChartCurve, CompressorChart};

/// Curves scaled from a 10 000 rpm base curve with the fan laws
/// (rate ∝ N, head ∝ N²).
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

#[test]
fn internal_point_on_a_known_curve() {
    let chart = fan_law_chart();
    let point = chart.evaluate(10_000.0, 1000.0, 1000.0).unwrap();

    assert_eq!(point.chart_area_flag, ChartAreaFlag::Internal);
    assert!(point.is_valid);
    assert!((point.polytropic_head_joule_per_kg - 110_000.0).abs() < 1e-6);
    assert!((point.polytropic_efficiency - 0.72).abs() < 1e-12);
}

#[test]
fn below_minimum_flow_uses_minimum_flow_head() {
    let chart = fan_law_chart();
    let point = chart.evaluate(10_000.0, 300.0, 300.0).unwrap();

    assert_eq!(point.chart_area_flag, ChartAreaFlag::BelowMinFlow);
    assert!(!point.is_valid);
    assert!((point.polytropic_head_joule_per_kg - 120_000.0).abs() < 1e-6);
}

#[test]
fn recirculation_makes_low_flow_valid_but_still_flagged() {
    let chart = fan_law_chart();
    let point = chart.evaluate(10_000.0, 750.0, 300.0).unwrap();

    assert_eq!(point.chart_area_flag, ChartAreaFlag::BelowMinFlow);
    assert!(point.is_valid);
}

#[test]
fn above_maximum_flow_is_invalid() {
    let chart = fan_law_chart();
    let point = chart.evaluate(10_000.0, 1500.0, 1500.0).unwrap();

    assert_eq!(point.chart_area_flag, ChartAreaFlag::AboveMaxFlow);
    assert!(!point.is_valid);
    assert!((point.polytropic_head_joule_per_kg - 90_000.0).abs() < 1e-6);
}

#[test]
fn speed_outside_range_is_invalid_and_clamped() {
    let chart = fan_law_chart();
    let fast = chart.evaluate(12_000.0, 1000.0, 1000.0).unwrap();
    assert!(!fast.is_valid);

    let at_max = chart.evaluate(11_000.0, 1000.0, 1000.0).unwrap();
    assert_eq!(
        fast.polytropic_head_joule_per_kg,
        at_max.polytropic_head_joule_per_kg
    );
}

#[test]
fn head_grows_with_speed_at_fixed_rate() {
    let chart = fan_law_chart();
    let mut previous = 0.0;
    for speed in [8_000.0, 8_500.0, 9_000.0, 9_500.0, 10_000.0, 10_500.0, 11_000.0] {
        let head = chart
            .evaluate(speed, 1000.0, 1000.0)
            .unwrap()
            .polytropic_head_joule_per_kg;
        assert!(head > previous, "head {head} at {speed} rpm");
        previous = head;
    }
}

#[test]
fn minimum_rate_follows_interpolated_curve() {
    let chart = fan_law_chart();
    assert!((chart.minimum_rate_at_speed(9_000.0).unwrap() - 630.0).abs() < 1e-9);
    assert!((chart.maximum_rate_at_speed(10_500.0).unwrap() - 1365.0).abs() < 1e-9);
    let range = chart.speed_range().unwrap();
    assert_eq!((range.min(), range.max()), (8_000.0, 11_000.0));
}

#[test]
fn single_speed_chart_ignores_requested_speed() {
    let curve = ChartCurve::new(
        7_500.0,
        vec![500.0, 1500.0],
        vec![60_000.0, 40_000.0],
        vec![0.75, 0.75],
    )
    .unwrap();
    let chart = CompressorChart::single_speed(curve);

    let point = chart.evaluate(1.0, 1000.0, 1000.0).unwrap();
    assert_eq!(point.speed_rpm, 7_500.0);
    assert!(point.is_valid);
    assert!((point.polytropic_head_joule_per_kg - 50_000.0).abs() < 1e-6);
}

#[test]
fn duplicate_speeds_are_rejected() {
    let c = || ChartCurve::new(9_000.0, vec![1.0, 2.0], vec![1.0, 1.0], vec![0.7, 0.7]).unwrap();
    assert!(CompressorChart::variable_speed(vec![c(), c()]).is_err());
    assert!(CompressorChart::variable_speed(vec![]).is_err());
}
