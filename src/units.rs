//! Unit system preference and the unit-aware display formatters.
//!
//! All formatters take the raw upstream number (km, km/s, m) so that a
//! unit switch always re-derives text from the cached payload.

use serde::{Deserialize, Serialize};

/// Placeholder shown for missing or non-finite values.
pub const DASH: &str = "—";

pub const KM_TO_MI: f64 = 0.621371;
pub const M_TO_FT: f64 = 3.28084;

/// Above this many km (or mi) distances switch to the thousands suffix.
pub const DISTANCE_SWITCH: f64 = 1000.0;
/// Above this many m (or ft) diameters switch to the larger unit.
pub const DIAMETER_SWITCH: f64 = 1000.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    #[default]
    Metric,
    Imperial,
}

impl UnitPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitPreference::Metric => "metric",
            UnitPreference::Imperial => "imperial",
        }
    }

    /// Stored values are trusted loosely: anything but "imperial" is metric.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("imperial") => UnitPreference::Imperial,
            _ => UnitPreference::Metric,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitPreference::Metric => UnitPreference::Imperial,
            UnitPreference::Imperial => UnitPreference::Metric,
        }
    }
}

impl std::str::FromStr for UnitPreference {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "metric" | "si" => Ok(UnitPreference::Metric),
            "imperial" | "us" => Ok(UnitPreference::Imperial),
            _ => Err(anyhow::anyhow!(
                "Invalid units '{s}'. Valid options: metric, imperial"
            )),
        }
    }
}

impl std::fmt::Display for UnitPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to `digits` decimals with ties away from zero, like JS `toFixed`.
/// `format!("{:.N}")` alone would round exact ties to even.
pub fn round_half_up(v: f64, digits: usize) -> f64 {
    let scale = 10f64.powi(digits as i32);
    (v * scale).round() / scale
}

/// `v` with exactly `digits` decimals, ties rounded away from zero.
pub fn fixed(v: f64, digits: usize) -> String {
    format!("{:.*}", digits, round_half_up(v, digits))
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Miss distance from kilometers.
/// Examples: "512.346 km", "45.68 Mkm", "620 mi", "28.39 kmi"
pub fn format_distance(km: Option<f64>, unit: UnitPreference) -> String {
    let Some(v) = finite(km) else {
        return DASH.to_string();
    };
    match unit {
        UnitPreference::Imperial => {
            let mi = v * KM_TO_MI;
            if mi >= DISTANCE_SWITCH {
                format!("{} kmi", fixed(mi / 1000.0, 2))
            } else {
                format!("{} mi", group_thousands(mi, 0))
            }
        }
        UnitPreference::Metric => {
            if v >= DISTANCE_SWITCH {
                format!("{} Mkm", fixed(v / 1000.0, 2))
            } else {
                format!("{} km", group_thousands(v, 3))
            }
        }
    }
}

/// Relative velocity from km/s. Imperial is miles per hour, whole numbers.
pub fn format_speed(kms: Option<f64>, unit: UnitPreference) -> String {
    let Some(v) = finite(kms) else {
        return DASH.to_string();
    };
    match unit {
        UnitPreference::Imperial => format!("{} mph", fixed(v * KM_TO_MI * 3600.0, 0)),
        UnitPreference::Metric => format!("{} km/s", fixed(v, 2)),
    }
}

/// Estimated diameter from meters.
pub fn format_diameter(meters: Option<f64>, unit: UnitPreference) -> String {
    let Some(v) = finite(meters) else {
        return DASH.to_string();
    };
    match unit {
        UnitPreference::Imperial => {
            let ft = v * M_TO_FT;
            if ft >= DIAMETER_SWITCH {
                format!("{} kft", fixed(ft / 1000.0, 1))
            } else {
                format!("{} ft", fixed(ft, 0))
            }
        }
        UnitPreference::Metric => {
            if v >= DIAMETER_SWITCH {
                format!("{} km", fixed(v / 1000.0, 0))
            } else {
                format!("{} m", fixed(v, 0))
            }
        }
    }
}

/// en-US style number: comma-grouped integer part, at most `max_frac`
/// fraction digits with trailing zeros dropped. `1234.5` -> "1,234.5".
pub fn group_thousands(v: f64, max_frac: usize) -> String {
    let text = fixed(v, max_frac);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let (sign, digits) = match int_part.strip_prefix('-') {
        Some(d) => ("-", d),
        None => ("", int_part),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 3), "0");
        assert_eq!(group_thousands(999.0, 0), "999");
        assert_eq!(group_thousands(1234.0, 0), "1,234");
        assert_eq!(group_thousands(1234567.891, 3), "1,234,567.891");
        assert_eq!(group_thousands(512.3456, 3), "512.346");
        assert_eq!(group_thousands(12.5, 3), "12.5");
        assert_eq!(group_thousands(-4321.0, 0), "-4,321");
    }

    #[test]
    fn test_stored_value_parsing() {
        assert_eq!(UnitPreference::from_stored(Some("imperial")), UnitPreference::Imperial);
        assert_eq!(UnitPreference::from_stored(Some("metric")), UnitPreference::Metric);
        assert_eq!(UnitPreference::from_stored(Some("IMPERIAL")), UnitPreference::Metric);
        assert_eq!(UnitPreference::from_stored(None), UnitPreference::Metric);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Imperial".parse::<UnitPreference>().unwrap(), UnitPreference::Imperial);
        assert_eq!("metric".parse::<UnitPreference>().unwrap(), UnitPreference::Metric);
        assert!("furlongs".parse::<UnitPreference>().is_err());
    }

    #[test]
    fn test_toggled_round_trips() {
        let u = UnitPreference::Metric;
        assert_eq!(u.toggled().toggled(), u);
        assert_eq!(u.toggled(), UnitPreference::Imperial);
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(fixed(2.5, 0), "3");
        assert_eq!(fixed(12.5, 0), "13");
        assert_eq!(fixed(0.125, 2), "0.13");
        assert_eq!(fixed(-2.5, 0), "-3");
        assert_eq!(fixed(1.25, 1), "1.3");
        assert_eq!(group_thousands(0.0625, 3), "0.063");
    }
}
