use pem_electrolyzer_twin::operating_point::{
    self, DisplayInputs, InvalidOperatingPoint, OperatingPoint, DIRECT_EFFICIENCY_OPTIONS,
    FIXED_PRESSURE_BAR, FIXED_TEMPERATURE_C,
};

#[test]
fn every_listed_pair_validates() {
    assert_eq!(operating_point::voltage_options(), &[5.3, 5.75, 6.2]);
    for v in operating_point::voltage_options() {
        let currents = operating_point::current_options(*v).expect("currents");
        assert_eq!(currents.len(), 3);
        for i in currents {
            assert!(OperatingPoint::new(*v, *i).validate().is_ok(), "{v} V / {i} A");
        }
    }
    assert_eq!(
        operating_point::current_options(5.75),
        Some(&[3.5, 4.0, 4.5][..])
    );
    assert_eq!(operating_point::current_options(5.0), None);
}

#[test]
fn current_sets_are_disjoint_between_voltages() {
    let err = OperatingPoint::new(6.2, 2.6).validate().unwrap_err();
    assert_eq!(
        err,
        InvalidOperatingPoint::CurrentNotPaired {
            voltage: 6.2,
            current: 2.6
        }
    );
    assert!(err.to_string().contains("6.2"));
}

#[test]
fn default_point_uses_fixed_conditions() {
    let p = OperatingPoint::default();
    assert_eq!((p.voltage, p.current), (5.3, 1.5));
    assert_eq!(p.temperature_c, FIXED_TEMPERATURE_C);
    assert_eq!(p.pressure_bar, FIXED_PRESSURE_BAR);
}

#[test]
fn direct_efficiency_must_be_an_offered_value() {
    for e in DIRECT_EFFICIENCY_OPTIONS {
        assert_eq!(operating_point::validate_direct_efficiency(e), Ok(e));
    }
    assert_eq!(
        operating_point::validate_direct_efficiency(100.0),
        Err(InvalidOperatingPoint::UnsupportedEfficiency(100.0))
    );
}

#[test]
fn display_inputs_are_clamped_to_widget_ranges() {
    let d = DisplayInputs {
        water_flow_l_min: 0.0,
        electrode_area_cm2: 1000.0,
    }
    .clamped();
    assert_eq!(d.water_flow_l_min, 0.1);
    assert_eq!(d.electrode_area_cm2, 500.0);
    assert_eq!(DisplayInputs::default().clamped(), DisplayInputs::default());
}
