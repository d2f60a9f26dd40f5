//! Selection, ordering and card view models for the NEO grid.

use serde::Serialize;
use std::cmp::Ordering;

use crate::types::NearEarthObject;
use crate::units::{fixed, format_diameter, format_distance, format_speed, UnitPreference, DASH};

/// At most this many cards are rendered.
pub const MAX_CARDS: usize = 8;

/// One rendered NEO card (all text already unit-formatted).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoCard {
    pub name: String,
    pub hazardous: bool,
    pub approach: String,
    pub miss_distance: String,
    pub speed: String,
    pub diameter: String,
    pub magnitude: String,
    pub jpl_url: Option<String>,
}

/// Result of selecting the day's objects for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub total: usize,
    pub hazardous: usize,
    pub cards: Vec<NeoCard>,
}

impl Selection {
    /// "1 object" / "10 objects"
    pub fn count_label(&self) -> String {
        format!(
            "{} object{}",
            self.total,
            if self.total == 1 { "" } else { "s" }
        )
    }

    pub fn hazard_label(&self) -> String {
        format!("{} potentially hazardous", self.hazardous)
    }
}

pub fn empty_message(date: &str) -> String {
    format!("No NEOs listed for {date}.")
}

pub fn hazardous_count(list: &[NearEarthObject]) -> usize {
    list.iter()
        .filter(|n| n.is_potentially_hazardous_asteroid)
        .count()
}

/// Ascending by first-approach miss distance; missing distances sort last.
/// Stable, so equal keys keep feed order.
pub fn sort_by_miss_distance(list: &[NearEarthObject]) -> Vec<&NearEarthObject> {
    let mut sorted: Vec<&NearEarthObject> = list.iter().collect();
    sorted.sort_by(|a, b| cmp_miss(a.first_miss_km(), b.first_miss_km()));
    sorted
}

fn cmp_miss(a: Option<f64>, b: Option<f64>) -> Ordering {
    let key = |v: Option<f64>| v.filter(|x| !x.is_nan()).unwrap_or(f64::INFINITY);
    key(a).total_cmp(&key(b))
}

pub fn card_for(neo: &NearEarthObject, unit: UnitPreference) -> NeoCard {
    let approach = neo.first_approach();
    NeoCard {
        name: neo.name.clone().unwrap_or_else(|| DASH.to_string()),
        hazardous: neo.is_potentially_hazardous_asteroid,
        approach: approach
            .and_then(|ca| ca.label())
            .unwrap_or(DASH)
            .to_string(),
        miss_distance: format_distance(approach.and_then(|ca| ca.miss_km()), unit),
        speed: format_speed(approach.and_then(|ca| ca.velocity_kms()), unit),
        diameter: format!(
            "{} – {}",
            format_diameter(neo.diameter_min_m(), unit),
            format_diameter(neo.diameter_max_m(), unit)
        ),
        magnitude: neo
            .absolute_magnitude_h
            .filter(|h| h.is_finite())
            .map(|h| fixed(h, 1))
            .unwrap_or_else(|| DASH.to_string()),
        jpl_url: neo.nasa_jpl_url.clone().filter(|u| !u.is_empty()),
    }
}

/// Count, sort, cap and format one day's list.
pub fn select(list: &[NearEarthObject], unit: UnitPreference) -> Selection {
    let cards = sort_by_miss_distance(list)
        .into_iter()
        .take(MAX_CARDS)
        .map(|neo| card_for(neo, unit))
        .collect();

    Selection {
        total: list.len(),
        hazardous: hazardous_count(list),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_miss_missing_last() {
        assert_eq!(cmp_miss(Some(1.0), None), Ordering::Less);
        assert_eq!(cmp_miss(None, Some(1.0)), Ordering::Greater);
        assert_eq!(cmp_miss(None, None), Ordering::Equal);
        assert_eq!(cmp_miss(Some(f64::NAN), Some(5.0)), Ordering::Greater);
    }

    #[test]
    fn test_count_label_plural() {
        let s = Selection { total: 1, hazardous: 0, cards: vec![] };
        assert_eq!(s.count_label(), "1 object");
        let s = Selection { total: 0, hazardous: 0, cards: vec![] };
        assert_eq!(s.count_label(), "0 objects");
        assert_eq!(s.hazard_label(), "0 potentially hazardous");
    }

    #[test]
    fn test_card_degrades_missing_fields() {
        let card = card_for(&NearEarthObject::default(), UnitPreference::Metric);
        assert_eq!(card.approach, DASH);
        assert_eq!(card.miss_distance, DASH);
        assert_eq!(card.speed, DASH);
        assert_eq!(card.diameter, format!("{DASH} – {DASH}"));
        assert_eq!(card.magnitude, DASH);
        assert_eq!(card.jpl_url, None);
    }
}
