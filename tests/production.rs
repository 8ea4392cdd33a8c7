use pem_electrolyzer_twin::{
    lookup_table::{LookupTable, MeasurementRecord},
    operating_point::{InvalidOperatingPoint, OperatingPoint},
    production::{
        self, compute, compute_checked, EfficiencyMode, FallbackReason, RateSource,
    },
};

fn assert_close(label: &str, actual: f64, expected: f64, rel_tol: f64) {
    let denom = expected.abs().max(1e-12);
    let diff = (actual - expected).abs();
    assert!(
        diff <= rel_tol * denom,
        "{label} expected {expected:e} got {actual:e} (diff {diff:e}, tol {rel_tol})"
    );
}

fn record(voltage: f64, current: f64, rate: f64) -> MeasurementRecord {
    MeasurementRecord {
        voltage,
        current,
        gas_rate_ml_per_min: rate,
    }
}

#[test]
fn fallback_without_table_matches_faraday_closed_form() {
    let point = OperatingPoint::new(5.3, 1.5);
    let out = compute(&point, None, EfficiencyMode::Direct(85.0));
    let expected = (1.5 * 0.85) / (2.0 * 96485.0) * 22.4 * 60.0 / 1000.0;
    assert_close("h2", out.result.h2_production_l_min, expected, 1e-12);
    assert_close("h2 approx", out.result.h2_production_l_min, 8.880e-6, 1e-3);
    assert_eq!(
        out.source,
        RateSource::Theoretical {
            reason: FallbackReason::NoTable
        }
    );
    assert!(out.used_fallback());
    assert_close("o2", out.result.o2_production_l_min, expected / 2.0, 1e-12);
    assert_close("power", out.result.power_kw, 7.95, 1e-12);
    assert_close(
        "specific",
        out.result.specific_consumption_kwh_per_nm3,
        7.95 / (expected / 1000.0 * 60.0),
        1e-12,
    );
}

#[test]
fn empirical_rows_are_averaged_and_converted_to_l_min() {
    let table = LookupTable::new(vec![
        record(5.3, 1.5, 40.0),
        record(5.3, 1.5, 60.0),
        record(6.2, 6.6, 300.0),
    ]);
    let out = compute(
        &OperatingPoint::new(5.3, 1.5),
        Some(&table),
        EfficiencyMode::Direct(90.0),
    );
    assert_close("h2", out.result.h2_production_l_min, 0.05, 1e-12);
    assert_close("o2", out.result.o2_production_l_min, 0.025, 1e-12);
    assert_eq!(out.source, RateSource::Empirical { samples: 2 });
    assert!(!out.used_fallback());
    assert_eq!(out.result.efficiency_percent, 90.0);
}

#[test]
fn missing_row_falls_back_with_reason() {
    let table = LookupTable::new(vec![record(5.3, 1.5, 50.0)]);
    let out = compute(
        &OperatingPoint::new(6.2, 6.0),
        Some(&table),
        EfficiencyMode::Derived,
    );
    assert_eq!(
        out.source,
        RateSource::Theoretical {
            reason: FallbackReason::NoMatchingRow
        }
    );
    let expected = production::theoretical_h2_l_min(6.0, 0.85);
    assert_close("h2", out.result.h2_production_l_min, expected, 1e-12);
}

#[test]
fn derived_efficiency_is_bounded_by_voltage_efficiency() {
    let table = LookupTable::new(vec![record(6.2, 6.6, 30.0)]);
    let out = compute(
        &OperatingPoint::new(6.2, 6.6),
        Some(&table),
        EfficiencyMode::Derived,
    );
    let voltage_eff = production::voltage_efficiency_percent(6.2);
    assert_close("voltage eff", voltage_eff, 19.8387, 1e-4);
    assert!(out.result.efficiency_percent <= voltage_eff + 1e-12);
    assert!(out.result.efficiency_percent >= 0.0);
}

#[test]
fn faradaic_efficiency_is_capped_when_measured_exceeds_theory() {
    // 1.5 A 의 100% 이론값은 약 1.04e-5 L/min.
    let table = LookupTable::new(vec![record(5.3, 1.5, 50.0)]);
    let out = compute(
        &OperatingPoint::new(5.3, 1.5),
        Some(&table),
        EfficiencyMode::Derived,
    );
    let b = production::efficiency_breakdown(5.3, 1.5, out.result.h2_production_l_min);
    assert_eq!(b.faradaic_efficiency_percent, 100.0);
    assert_close(
        "combined",
        out.result.efficiency_percent,
        production::voltage_efficiency_percent(5.3),
        1e-12,
    );
}

#[test]
fn zero_current_degenerates_without_nan() {
    let point = OperatingPoint {
        current: 0.0,
        ..OperatingPoint::new(5.3, 1.5)
    };
    let out = compute(&point, None, EfficiencyMode::Derived);
    assert_eq!(out.result.h2_production_l_min, 0.0);
    assert_eq!(out.result.power_kw, 0.0);
    assert_eq!(out.result.specific_consumption_kwh_per_nm3, 0.0);
    assert_eq!(out.result.efficiency_percent, 0.0);
    let b = production::efficiency_breakdown(5.3, 0.0, 0.0);
    assert_eq!(b.faradaic_efficiency_percent, 0.0);
}

#[test]
fn negative_current_is_clamped_in_theoretical_rate() {
    assert_eq!(production::theoretical_h2_l_min(-2.0, 0.85), 0.0);
    assert_eq!(production::voltage_efficiency_percent(0.0), 0.0);
    assert_eq!(production::voltage_efficiency_percent(-1.0), 0.0);
}

#[test]
fn hydrogen_to_oxygen_ratio_holds_on_every_valid_point() {
    let table = LookupTable::new(vec![record(5.75, 4.0, 120.0), record(6.2, 5.4, 180.0)]);
    for (v, currents) in [
        (5.3, [1.5, 2.05, 2.6]),
        (5.75, [3.5, 4.0, 4.5]),
        (6.2, [5.4, 6.0, 6.6]),
    ] {
        for i in currents {
            let out = compute_checked(
                &OperatingPoint::new(v, i),
                Some(&table),
                EfficiencyMode::Derived,
            )
            .expect("valid point");
            let r = out.result;
            assert_close("o2 ratio", r.o2_production_l_min * 2.0, r.h2_production_l_min, 1e-12);
            assert_close("power", r.power_kw, v * i, 1e-12);
            assert!(r.h2_production_l_min > 0.0);
            assert!(r.specific_consumption_kwh_per_nm3.is_finite());
        }
    }
}

#[test]
fn checked_compute_rejects_unpaired_current_and_bad_efficiency() {
    let err = compute_checked(
        &OperatingPoint::new(5.3, 4.0),
        None,
        EfficiencyMode::Derived,
    )
    .unwrap_err();
    assert_eq!(
        err,
        InvalidOperatingPoint::CurrentNotPaired {
            voltage: 5.3,
            current: 4.0
        }
    );

    let err = compute_checked(&OperatingPoint::new(7.0, 1.5), None, EfficiencyMode::Derived)
        .unwrap_err();
    assert_eq!(err, InvalidOperatingPoint::UnknownVoltage(7.0));

    let err = compute_checked(
        &OperatingPoint::new(5.3, 1.5),
        None,
        EfficiencyMode::Direct(87.0),
    )
    .unwrap_err();
    assert_eq!(err, InvalidOperatingPoint::UnsupportedEfficiency(87.0));
}

#[test]
fn specific_consumption_uses_hourly_cubic_metres() {
    // 0.05 L/min = 0.003 m³/h
    assert_close(
        "specific",
        production::specific_consumption_kwh_per_nm3(7.95, 0.05),
        2650.0,
        1e-12,
    );
    assert_eq!(production::specific_consumption_kwh_per_nm3(7.95, 0.0), 0.0);
}

#[test]
fn direct_efficiency_passes_through_unchanged() {
    let out = compute_checked(
        &OperatingPoint::new(6.2, 6.6),
        None,
        EfficiencyMode::Direct(90.0),
    )
    .expect("valid point");
    assert_eq!(out.result.efficiency_percent, 90.0);
}

#[test]
fn specific_consumption_is_thousand_times_kwh_scale() {
    // V × I 를 그대로 나누므로 kW 로 환산한 값의 1000배가 된다.
    let (power, h2) = (7.95, 0.05);
    let kwh_per_nm3 = (power / 1000.0) / (h2 / 1000.0 * 60.0);
    assert_close(
        "scale",
        production::specific_consumption_kwh_per_nm3(power, h2),
        kwh_per_nm3 * 1000.0,
        1e-12,
    );
}

#[test]
fn derived_is_the_default_efficiency_mode() {
    assert_eq!(EfficiencyMode::default(), EfficiencyMode::Derived);
}
