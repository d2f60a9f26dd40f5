use crate::error::NeoError;
use crate::http::get_json;
use crate::types::NeoFeedResponse;

pub const DEFAULT_FEED_URL: &str = "https://api.nasa.gov/neo/rest/v1/feed";

/// Build the NeoWs feed URL for an inclusive date window.
pub fn feed_url(endpoint: &str, api_key: &str, start: &str, end: &str) -> String {
    format!(
        "{}?start_date={}&end_date={}&api_key={}",
        endpoint.trim_end_matches('?'),
        urlencoding::encode(start),
        urlencoding::encode(end),
        urlencoding::encode(api_key),
    )
}

/// Fetch one day's NeoWs feed (`start_date = end_date = date`).
pub async fn fetch_neo_feed(
    endpoint: &str,
    api_key: &str,
    date: &str,
) -> Result<NeoFeedResponse, NeoError> {
    fetch_neo_range(endpoint, api_key, date, date).await
}

/// Fetch the NeoWs feed over `start..=end`. NeoWs caps the window at 7 days.
pub async fn fetch_neo_range(
    endpoint: &str,
    api_key: &str,
    start: &str,
    end: &str,
) -> Result<NeoFeedResponse, NeoError> {
    log::info!("[neo_api] Fetching NeoWs feed {start}..{end}");
    let url = feed_url(endpoint, api_key, start, end);
    let feed: NeoFeedResponse = get_json(&url, "NeoWs feed").await?;
    log::info!(
        "[neo_api] NeoWs returned {} objects over {} day(s)",
        feed.all_objects().count(),
        feed.near_earth_objects.len()
    );
    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_shape() {
        assert_eq!(
            feed_url(DEFAULT_FEED_URL, "DEMO_KEY", "2024-01-01", "2024-01-01"),
            "https://api.nasa.gov/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-01&api_key=DEMO_KEY"
        );
    }
}
