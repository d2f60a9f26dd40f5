//! Highlights timeline: next launch, next ISS pass, recent space weather
//! and the closest NEO of the coming week.
//!
//! Each card is fetched independently and always produces an item: any
//! failure (HTTP, decode, empty data) swaps in that card's fixed fallback.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::dates::{fmt_local_unix, fmt_utc, parse_timestamp, shift_date};
use crate::error::NeoError;
use crate::http::{get_json, via_proxy};
use crate::neo_api::fetch_neo_range;
use crate::types::{lenient_f64, CloseApproach, NearEarthObject, NeoFeedResponse};
use crate::units::{fixed, group_thousands};

pub const SWPC_URL: &str = "https://www.swpc.noaa.gov/";
pub const SPOT_THE_STATION_URL: &str = "https://spotthestation.nasa.gov/";
pub const SIGHTINGS_URL: &str = "https://spotthestation.nasa.gov/sightings/";
pub const CNEOS_URL: &str = "https://cneos.jpl.nasa.gov/ca/";

/// Days of space-weather history to look back over.
const WEATHER_LOOKBACK_DAYS: i64 = 5;
/// Days ahead scanned for the closest NEO card.
const NEO_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighlightItem {
    pub date_label: String,
    pub text: String,
    pub href: Option<String>,
    pub short_title: Option<String>,
    /// Staggered reveal delay, set when the timeline is assembled.
    pub delay_ms: u32,
}

impl HighlightItem {
    fn new(date_label: &str, text: impl Into<String>, href: Option<&str>, short_title: Option<&str>) -> Self {
        HighlightItem {
            date_label: date_label.to_string(),
            text: text.into(),
            href: href.map(str::to_string),
            short_title: short_title.map(str::to_string),
            delay_ms: 0,
        }
    }
}

// ----- upstream payloads -----

#[derive(Debug, Default, Deserialize)]
pub struct LaunchList {
    #[serde(default)]
    pub results: Vec<Launch>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Launch {
    pub name: Option<String>,
    pub net: Option<String>,
    pub window_start: Option<String>,
    pub url: Option<String>,
    pub launch_service_provider: Option<Named>,
    pub pad: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Named {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssPassResponse {
    #[serde(default)]
    pub response: Vec<IssPass>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssPass {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub risetime: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub duration: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GstEvent {
    pub start_time: Option<String>,
    #[serde(default)]
    pub all_kp_index: Vec<KpReading>,
    pub link: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpReading {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub kp_index: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CmeEvent {
    pub start_time: Option<String>,
    pub link: Option<String>,
}

// ----- card builders (pure) -----

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

pub fn launch_item(list: &LaunchList) -> Option<HighlightItem> {
    let launch = list.results.first()?;
    let when = fmt_utc(non_empty(&launch.net).or(non_empty(&launch.window_start)));
    let name = non_empty(&launch.name).unwrap_or("Upcoming launch");
    let provider = launch
        .launch_service_provider
        .as_ref()
        .and_then(|p| non_empty(&p.name))
        .map(|p| format!(" • {p}"))
        .unwrap_or_default();
    let pad = launch
        .pad
        .as_ref()
        .and_then(|p| non_empty(&p.name))
        .map(|p| format!(" — {p}"))
        .unwrap_or_default();
    Some(HighlightItem::new(
        &when,
        format!("{name}{provider}{pad}"),
        non_empty(&launch.url),
        Some("Next Rocket Launch"),
    ))
}

pub fn launch_fallback() -> HighlightItem {
    HighlightItem::new("TBD", "Next major launch window", None, None)
}

pub fn iss_item(passes: &IssPassResponse) -> Option<HighlightItem> {
    let pass = passes.response.first()?;
    let rise = pass.risetime.filter(|t| t.is_finite())?;
    let label = fmt_local_unix(rise as i64)?;
    let mins = (pass.duration.filter(|d| d.is_finite()).unwrap_or(0.0) / 60.0).round() as i64;
    Some(HighlightItem::new(
        &label,
        format!("Next ISS pass near you • ~{mins} min visible"),
        Some(SIGHTINGS_URL),
        Some("ISS Pass"),
    ))
}

pub fn iss_fallback() -> HighlightItem {
    HighlightItem::new(
        "Monthly",
        "ISS visible passes (varies by location)",
        Some(SPOT_THE_STATION_URL),
        None,
    )
}

fn latest_by_start<'a, T>(events: &'a [T], start: impl Fn(&T) -> Option<&str>) -> Option<&'a T> {
    events
        .iter()
        .max_by_key(|e| start(e).and_then(parse_timestamp))
}

/// Latest geomagnetic storm wins; otherwise the latest CME.
pub fn space_weather_item(gst: &[GstEvent], cme: &[CmeEvent]) -> Option<HighlightItem> {
    if let Some(g) = latest_by_start(gst, |g| g.start_time.as_deref()) {
        let kp_max = g
            .all_kp_index
            .iter()
            .filter_map(|k| k.kp_index)
            .filter(|k| k.is_finite())
            .fold(None, |acc: Option<f64>, k| Some(acc.map_or(k, |a| a.max(k))));
        let text = match kp_max {
            Some(kp) => format!("Geomagnetic storm (Kp≈{kp})"),
            None => "Geomagnetic storm".to_string(),
        };
        return Some(HighlightItem::new(
            &fmt_utc(g.start_time.as_deref()),
            text,
            Some(non_empty(&g.link).unwrap_or(SWPC_URL)),
            Some("Space Weather"),
        ));
    }

    let c = latest_by_start(cme, |c| c.start_time.as_deref())?;
    Some(HighlightItem::new(
        &fmt_utc(c.start_time.as_deref()),
        "Coronal Mass Ejection detected",
        Some(non_empty(&c.link).unwrap_or(SWPC_URL)),
        None,
    ))
}

pub fn space_weather_fallback() -> HighlightItem {
    HighlightItem::new(
        "—",
        "Space weather is calm (no recent GST/CME)",
        Some(SWPC_URL),
        None,
    )
}

/// The object with the smallest miss distance in a multi-day feed.
#[derive(Debug, Clone)]
pub struct ClosestNeo<'a> {
    pub neo: &'a NearEarthObject,
    pub approach: &'a CloseApproach,
    pub miss_km: f64,
}

/// For each object use the first approach dated inside `start..=end`
/// (falling back to its first approach); skip objects without a finite
/// miss distance; keep the minimum.
pub fn closest_neo<'a>(feed: &'a NeoFeedResponse, start: &str, end: &str) -> Option<ClosestNeo<'a>> {
    let mut best: Option<ClosestNeo<'a>> = None;
    for neo in feed.all_objects() {
        let in_window = neo.close_approach_data.iter().find(|ca| {
            ca.close_approach_date
                .as_deref()
                .is_some_and(|d| d >= start && d <= end)
        });
        let Some(approach) = in_window.or_else(|| neo.first_approach()) else {
            continue;
        };
        let Some(miss_km) = approach.miss_km().filter(|m| m.is_finite()) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| miss_km < b.miss_km) {
            best = Some(ClosestNeo { neo, approach, miss_km });
        }
    }
    best
}

pub fn closest_neo_item(best: &ClosestNeo<'_>) -> HighlightItem {
    let when = fmt_utc(best.approach.label());
    let miss = if best.miss_km >= 1_000_000.0 {
        format!("{} Mkm", fixed(best.miss_km / 1_000_000.0, 2))
    } else {
        format!("{} km", group_thousands(best.miss_km.round(), 0))
    };
    let size = match (best.neo.diameter_min_m(), best.neo.diameter_max_m()) {
        (Some(min), Some(max)) if min != 0.0 && max != 0.0 => {
            format!("{}–{} m", min.round(), max.round())
        }
        _ => "size n/a".to_string(),
    };
    let pho = if best.neo.is_potentially_hazardous_asteroid { " • PHO" } else { "" };
    let name = best.neo.name.as_deref().unwrap_or("unnamed");
    HighlightItem::new(
        &when,
        format!("Closest NEO: {name} • Miss: {miss} • Est. {size}{pho}"),
        best.neo.nasa_jpl_url.as_deref().filter(|u| !u.is_empty()),
        Some("Near-Earth Object"),
    )
}

pub fn neo_fallback() -> HighlightItem {
    HighlightItem::new(
        "—",
        "Closest NEO this week: data unavailable",
        Some(CNEOS_URL),
        None,
    )
}

// ----- fetchers -----

pub async fn card_launch(cfg: &Config) -> HighlightItem {
    let list: Result<LaunchList, NeoError> = get_json(&cfg.launch_url, "Launch Library").await;
    match list {
        Ok(list) => launch_item(&list).unwrap_or_else(|| {
            log::debug!("[highlights] no upcoming launch listed");
            launch_fallback()
        }),
        Err(e) => {
            log::warn!("[highlights] launch card failed: {e}");
            launch_fallback()
        }
    }
}

pub async fn card_iss(cfg: &Config) -> HighlightItem {
    let url = format!(
        "{}?lat={}&lon={}&n=1",
        cfg.iss_pass_url, cfg.home_lat, cfg.home_lon
    );
    let url = via_proxy(cfg.cors_proxy_url.as_deref(), &url);
    let passes: Result<IssPassResponse, NeoError> = get_json(&url, "ISS pass").await;
    match passes {
        Ok(p) => iss_item(&p).unwrap_or_else(iss_fallback),
        Err(e) => {
            log::warn!("[highlights] ISS card failed: {e}");
            iss_fallback()
        }
    }
}

pub async fn card_space_weather(cfg: &Config, today: &str) -> HighlightItem {
    let start = shift_date(today, -WEATHER_LOOKBACK_DAYS);
    let query = format!(
        "startDate={start}&endDate={today}&api_key={}",
        urlencoding::encode(&cfg.nasa_api_key)
    );
    let base = cfg.donki_url.trim_end_matches('/');
    let gst_url = format!("{base}/GST?{query}");
    let cme_url = format!("{base}/CME?{query}");

    let (gst, cme) = futures::join!(
        get_json::<Vec<GstEvent>>(&gst_url, "DONKI GST"),
        get_json::<Vec<CmeEvent>>(&cme_url, "DONKI CME"),
    );
    match (gst, cme) {
        (Ok(gst), Ok(cme)) => space_weather_item(&gst, &cme).unwrap_or_else(space_weather_fallback),
        (Err(e), _) | (_, Err(e)) => {
            log::warn!("[highlights] space weather card failed: {e}");
            space_weather_fallback()
        }
    }
}

pub async fn card_neo(cfg: &Config, today: &str) -> HighlightItem {
    let end = shift_date(today, NEO_WINDOW_DAYS);
    match fetch_neo_range(&cfg.neo_feed_url, &cfg.nasa_api_key, today, &end).await {
        Ok(feed) => match closest_neo(&feed, today, &end) {
            Some(best) => closest_neo_item(&best),
            None => neo_fallback(),
        },
        Err(e) => {
            log::warn!("[highlights] NEO card failed: {e}");
            neo_fallback()
        }
    }
}

/// Fetch all four cards concurrently and assemble the timeline in order.
pub async fn build_highlights(cfg: &Config, today: &str) -> Vec<HighlightItem> {
    let (launch, iss, weather, neo) = futures::join!(
        card_launch(cfg),
        card_iss(cfg),
        card_space_weather(cfg, today),
        card_neo(cfg, today),
    );
    let mut items = vec![launch, iss, weather, neo];
    for (idx, item) in items.iter_mut().enumerate() {
        item.delay_ms = (idx as u32 + 1) * 100;
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_launch_item_text() {
        let list: LaunchList = serde_json::from_value(json!({
            "results": [{
                "name": "Falcon 9 | Starlink",
                "net": "2024-03-05T14:30:00Z",
                "url": "https://ll.thespacedevs.com/x",
                "launch_service_provider": { "name": "SpaceX" },
                "pad": { "name": "SLC-40" }
            }]
        }))
        .unwrap();
        let item = launch_item(&list).unwrap();
        assert_eq!(item.date_label, "Mar 05, 14:30 UTC");
        assert_eq!(item.text, "Falcon 9 | Starlink • SpaceX — SLC-40");
        assert_eq!(item.short_title.as_deref(), Some("Next Rocket Launch"));
    }

    #[test]
    fn test_launch_empty_is_none() {
        assert!(launch_item(&LaunchList::default()).is_none());
    }

    #[test]
    fn test_space_weather_prefers_latest_gst() {
        let gst: Vec<GstEvent> = serde_json::from_value(json!([
            { "startTime": "2024-03-01T00:00Z", "allKpIndex": [{ "kpIndex": 5 }] },
            { "startTime": "2024-03-03T06:00Z", "allKpIndex": [{ "kpIndex": 6 }, { "kpIndex": 7.33 }] }
        ]))
        .unwrap();
        let item = space_weather_item(&gst, &[]).unwrap();
        assert_eq!(item.text, "Geomagnetic storm (Kp≈7.33)");
        assert_eq!(item.date_label, "Mar 03, 06:00 UTC");
        assert_eq!(item.href.as_deref(), Some(SWPC_URL));
    }

    #[test]
    fn test_space_weather_cme_then_calm() {
        let cme: Vec<CmeEvent> = serde_json::from_value(json!([
            { "startTime": "2024-03-02T10:00Z", "link": "https://kauai.ccmc.gsfc.nasa.gov/x" }
        ]))
        .unwrap();
        let item = space_weather_item(&[], &cme).unwrap();
        assert_eq!(item.text, "Coronal Mass Ejection detected");
        assert!(space_weather_item(&[], &[]).is_none());
    }

    #[test]
    fn test_iss_minutes_rounded() {
        let passes: IssPassResponse = serde_json::from_value(json!({
            "response": [{ "risetime": 1709649000, "duration": 390 }]
        }))
        .unwrap();
        let item = iss_item(&passes).unwrap();
        assert_eq!(item.text, "Next ISS pass near you • ~7 min visible");
        assert!(item.date_label.ends_with("(local)"));
    }

    #[test]
    fn test_closest_neo_uses_window_approach() {
        let feed: NeoFeedResponse = serde_json::from_value(json!({
            "near_earth_objects": {
                "2024-03-05": [
                    {
                        "name": "(far)",
                        "close_approach_data": [
                            { "close_approach_date": "2024-03-05", "miss_distance": { "kilometers": "5000000" } }
                        ]
                    },
                    {
                        "name": "(windowed)",
                        "is_potentially_hazardous_asteroid": true,
                        "estimated_diameter": { "meters": { "estimated_diameter_min": 20.4, "estimated_diameter_max": 45.6 } },
                        "close_approach_data": [
                            { "close_approach_date": "2023-01-01", "miss_distance": { "kilometers": "10" } },
                            { "close_approach_date": "2024-03-06", "close_approach_date_full": "2024-Mar-06 08:15",
                              "miss_distance": { "kilometers": "384123.6" } }
                        ]
                    },
                    { "name": "(no data)" }
                ]
            }
        }))
        .unwrap();
        let best = closest_neo(&feed, "2024-03-05", "2024-03-12").unwrap();
        assert_eq!(best.neo.name.as_deref(), Some("(windowed)"));
        let item = closest_neo_item(&best);
        assert_eq!(item.date_label, "Mar 06, 08:15 UTC");
        assert_eq!(
            item.text,
            "Closest NEO: (windowed) • Miss: 384,124 km • Est. 20–46 m • PHO"
        );
    }

    #[test]
    fn test_closest_neo_far_uses_mkm() {
        let feed: NeoFeedResponse = serde_json::from_value(json!({
            "near_earth_objects": { "2024-03-05": [
                { "name": "(a)", "close_approach_data": [
                    { "close_approach_date": "2024-03-05", "miss_distance": { "kilometers": 4567890 } }
                ] }
            ] }
        }))
        .unwrap();
        let best = closest_neo(&feed, "2024-03-05", "2024-03-12").unwrap();
        let item = closest_neo_item(&best);
        assert_eq!(item.text, "Closest NEO: (a) • Miss: 4.57 Mkm • Est. size n/a");
        assert_eq!(item.href, None);
    }
}
