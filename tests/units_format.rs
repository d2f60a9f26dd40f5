//! Unit formatting: thresholds, conversions and degraded values.

use neowatch::units::{
    format_diameter, format_distance, format_speed, UnitPreference, DASH, KM_TO_MI, M_TO_FT,
};

use UnitPreference::{Imperial, Metric};

#[test]
fn non_finite_values_render_dash() {
    for v in [None, Some(f64::NAN), Some(f64::INFINITY), Some(f64::NEG_INFINITY)] {
        for unit in [Metric, Imperial] {
            assert_eq!(format_distance(v, unit), DASH);
            assert_eq!(format_speed(v, unit), DASH);
            assert_eq!(format_diameter(v, unit), DASH);
        }
    }
}

#[test]
fn distance_switches_scale_at_one_thousand() {
    assert_eq!(format_distance(Some(999.5), Metric), "999.5 km");
    assert_eq!(format_distance(Some(1000.0), Metric), "1.00 Mkm");
    assert_eq!(format_distance(Some(45_678_123.4), Metric), "45678.12 Mkm");
    assert_eq!(format_distance(Some(1.0), Imperial), "1 mi");
    assert_eq!(format_distance(Some(1000.0), Imperial), "621 mi");
    assert_eq!(format_distance(Some(1700.0), Imperial), "1.06 kmi");
}

#[test]
fn speed_formats() {
    assert_eq!(format_speed(Some(12.3456), Metric), "12.35 km/s");
    assert_eq!(format_speed(Some(1.0), Imperial), "2237 mph");
    assert_eq!(format_speed(Some(0.0), Imperial), "0 mph");
}

#[test]
fn diameter_formats() {
    assert_eq!(format_diameter(Some(45.2), Metric), "45 m");
    assert_eq!(format_diameter(Some(1500.0), Metric), "2 km");
    assert_eq!(format_diameter(Some(100.0), Imperial), "328 ft");
    assert_eq!(format_diameter(Some(500.0), Imperial), "1.6 kft");
}

#[test]
fn imperial_is_scaled_metric() {
    // Both systems describe the same quantity.
    let km = 750.0;
    let mi: f64 = format_distance(Some(km), Imperial)
        .trim_end_matches(" mi")
        .replace(',', "")
        .parse()
        .expect("plain miles");
    assert!((mi - km * KM_TO_MI).abs() < 0.5);

    let m = 250.0;
    let ft: f64 = format_diameter(Some(m), Imperial)
        .trim_end_matches(" ft")
        .parse()
        .expect("plain feet");
    assert!((ft - m * M_TO_FT).abs() < 0.5);
}

#[test]
fn exact_ties_round_up() {
    assert_eq!(format_diameter(Some(2.5), Metric), "3 m");
    assert_eq!(format_diameter(Some(12.5), Metric), "13 m");
    assert_eq!(format_speed(Some(0.125), Metric), "0.13 km/s");
}
