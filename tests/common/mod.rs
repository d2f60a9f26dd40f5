//! Shared NeoWs fixtures for integration tests.

#![allow(dead_code)]

use neowatch::NeoFeedResponse;
use serde_json::{json, Value};

/// One NEO in NeoWs wire shape (numbers as strings, like the live feed).
pub fn neo(id: &str, miss_km: Option<f64>, hazardous: bool) -> Value {
    let approach = match miss_km {
        Some(km) => json!({
            "close_approach_date": "2024-01-01",
            "close_approach_date_full": "2024-Jan-01 12:34",
            "miss_distance": { "kilometers": km.to_string() },
            "relative_velocity": { "kilometers_per_second": "7.5" }
        }),
        None => json!({
            "close_approach_date": "2024-01-01",
            "relative_velocity": { "kilometers_per_second": "7.5" }
        }),
    };
    json!({
        "id": id,
        "name": format!("({id})"),
        "is_potentially_hazardous_asteroid": hazardous,
        "absolute_magnitude_h": 22.1,
        "estimated_diameter": {
            "meters": { "estimated_diameter_min": 20.0, "estimated_diameter_max": 45.0 }
        },
        "close_approach_data": [approach],
        "nasa_jpl_url": format!("https://ssd.jpl.nasa.gov/tools/sbdb_lookup.html#/?sstr={id}")
    })
}

pub fn feed_json(date: &str, objects: Vec<Value>) -> Value {
    let count = objects.len();
    let mut days = serde_json::Map::new();
    days.insert(date.to_string(), Value::Array(objects));
    json!({
        "element_count": count,
        "near_earth_objects": days
    })
}

pub fn feed(date: &str, objects: Vec<Value>) -> NeoFeedResponse {
    serde_json::from_value(feed_json(date, objects)).expect("fixture feed deserializes")
}

/// Ten objects, two hazardous, miss distances out of order.
pub fn ten_objects() -> Vec<Value> {
    let misses = [9.0e6, 1.0e6, 5.0e6, 3.0e6, 7.0e6, 2.0e6, 8.0e6, 4.0e6, 6.0e6, 10.0e6];
    misses
        .iter()
        .enumerate()
        .map(|(i, km)| neo(&format!("n{i}"), Some(*km), i == 1 || i == 9))
        .collect()
}
