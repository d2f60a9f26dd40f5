use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::NeoError;

/// One NeoWs `feed` response. Only the fields the panel reads are typed;
/// everything else in the payload is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeoFeedResponse {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub element_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_days")]
    pub near_earth_objects: BTreeMap<String, Vec<NearEarthObject>>,
}

impl NeoFeedResponse {
    /// Objects listed for one date (empty when the date is absent).
    pub fn objects_for(&self, date: &str) -> &[NearEarthObject] {
        self.near_earth_objects
            .get(date)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All objects across every date in the response, in date order.
    pub fn all_objects(&self) -> impl Iterator<Item = &NearEarthObject> {
        self.near_earth_objects.values().flatten()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearEarthObject {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_potentially_hazardous_asteroid: bool,
    #[serde(default, deserialize_with = "lenient")]
    pub estimated_diameter: Option<EstimatedDiameter>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub absolute_magnitude_h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub close_approach_data: Vec<CloseApproach>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub nasa_jpl_url: Option<String>,
}

impl NearEarthObject {
    pub fn first_approach(&self) -> Option<&CloseApproach> {
        self.close_approach_data.first()
    }

    /// Miss distance of the first close approach, in kilometers.
    pub fn first_miss_km(&self) -> Option<f64> {
        self.first_approach().and_then(CloseApproach::miss_km)
    }

    pub fn diameter_min_m(&self) -> Option<f64> {
        self.estimated_diameter
            .as_ref()
            .and_then(|d| d.meters.as_ref())
            .and_then(|m| m.estimated_diameter_min)
    }

    pub fn diameter_max_m(&self) -> Option<f64> {
        self.estimated_diameter
            .as_ref()
            .and_then(|d| d.meters.as_ref())
            .and_then(|m| m.estimated_diameter_max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EstimatedDiameter {
    #[serde(default, deserialize_with = "lenient")]
    pub meters: Option<DiameterRange>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiameterRange {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_diameter_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_diameter_max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloseApproach {
    #[serde(default, deserialize_with = "lenient_string")]
    pub close_approach_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub close_approach_date_full: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub miss_distance: Option<MissDistance>,
    #[serde(default, deserialize_with = "lenient")]
    pub relative_velocity: Option<RelativeVelocity>,
}

impl CloseApproach {
    pub fn miss_km(&self) -> Option<f64> {
        self.miss_distance.as_ref().and_then(|m| m.kilometers)
    }

    pub fn velocity_kms(&self) -> Option<f64> {
        self.relative_velocity
            .as_ref()
            .and_then(|v| v.kilometers_per_second)
    }

    /// "2024-Jan-01 12:34" when present, else the bare date.
    pub fn label(&self) -> Option<&str> {
        self.close_approach_date_full
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.close_approach_date.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissDistance {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kilometers: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelativeVelocity {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kilometers_per_second: Option<f64>,
}

/// Events delivered to the UI owner from background fetch tasks.
#[derive(Debug)]
pub enum PanelEvent {
    NeoFeed {
        ticket: crate::panel::LoadTicket,
        result: Result<NeoFeedResponse, NeoError>,
    },
    Highlights(Vec<crate::highlights::HighlightItem>),
    Apod(Result<crate::apod::ApodView, NeoError>),
}

/// NeoWs sends most numbers as JSON strings ("12345.678"). Accept either
/// form; anything that does not parse becomes `None`.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(value_as_f64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match v {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(matches!(raw, Some(Value::Bool(true))))
}

/// Null or a value of the wrong shape decodes as `T::default()`.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// Strings pass through, numbers are stringified, anything else is `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn items_of<T: DeserializeOwned>(v: Value) -> Vec<T> {
    match v {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// A non-array decodes as empty; elements that fail to decode are skipped.
fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.map(items_of).unwrap_or_default())
}

fn lenient_days<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<NearEarthObject>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Object(days)) => days
            .into_iter()
            .map(|(date, list)| (date, items_of(list)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

pub fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
