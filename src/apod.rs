//! Astronomy Picture of the Day.

use serde::{Deserialize, Serialize};

use crate::error::NeoError;
use crate::http::get_json;

pub const APOD_UNAVAILABLE: &str = "APOD unavailable right now. Try again later.";
pub const APOD_DEFAULT_ALT: &str = "Astronomy Picture of the Day";

#[derive(Debug, Default, Deserialize)]
pub struct ApodPayload {
    pub title: Option<String>,
    pub media_type: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub thumbnail_url: Option<String>,
    pub date: Option<String>,
    pub explanation: Option<String>,
}

/// What the APOD container shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApodView {
    pub image_url: String,
    pub title: String,
    pub alt: String,
    pub link: String,
    pub date: Option<String>,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Images use the HD url when present; videos use their thumbnail.
/// Plain `http://` is upgraded so the page never loads mixed content.
pub fn apod_view(payload: &ApodPayload) -> Result<ApodView, NeoError> {
    let picked = if payload.media_type.as_deref() == Some("image") {
        non_empty(&payload.hdurl).or(non_empty(&payload.url))
    } else {
        non_empty(&payload.thumbnail_url)
    };
    let Some(picked) = picked else {
        return Err(NeoError::Decode("no image URL in APOD payload".into()));
    };
    let image_url = upgrade_http(picked);
    let title = non_empty(&payload.title).unwrap_or_default().to_string();
    let link = non_empty(&payload.hdurl)
        .or(non_empty(&payload.url))
        .map(str::to_string)
        .unwrap_or_else(|| image_url.clone());

    Ok(ApodView {
        alt: if title.is_empty() { APOD_DEFAULT_ALT.to_string() } else { title.clone() },
        image_url,
        title,
        link,
        date: payload.date.clone(),
    })
}

fn upgrade_http(url: &str) -> String {
    match url.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => format!("https://{}", &url[7..]),
        _ => url.to_string(),
    }
}

pub async fn fetch_apod(apod_url: &str, api_key: &str) -> Result<ApodView, NeoError> {
    let url = format!(
        "{apod_url}?api_key={}&thumbs=true",
        urlencoding::encode(api_key)
    );
    let payload: ApodPayload = get_json(&url, "APOD").await?;
    let view = apod_view(&payload)?;
    log::info!("[apod] {}", view.title);
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prefers_hdurl_and_upgrades() {
        let p = ApodPayload {
            title: Some("Pillars".into()),
            media_type: Some("image".into()),
            url: Some("https://apod.nasa.gov/a.jpg".into()),
            hdurl: Some("HTTP://apod.nasa.gov/a_hd.jpg".into()),
            ..Default::default()
        };
        let v = apod_view(&p).unwrap();
        assert_eq!(v.image_url, "https://apod.nasa.gov/a_hd.jpg");
        assert_eq!(v.link, "HTTP://apod.nasa.gov/a_hd.jpg");
        assert_eq!(v.alt, "Pillars");
    }

    #[test]
    fn test_video_uses_thumbnail() {
        let p = ApodPayload {
            media_type: Some("video".into()),
            url: Some("https://youtube.com/embed/x".into()),
            thumbnail_url: Some("https://img.youtube.com/x.jpg".into()),
            ..Default::default()
        };
        let v = apod_view(&p).unwrap();
        assert_eq!(v.image_url, "https://img.youtube.com/x.jpg");
        assert_eq!(v.link, "https://youtube.com/embed/x");
        assert_eq!(v.alt, APOD_DEFAULT_ALT);
    }

    #[test]
    fn test_missing_media_is_error() {
        let p = ApodPayload {
            media_type: Some("video".into()),
            ..Default::default()
        };
        assert!(matches!(apod_view(&p), Err(NeoError::Decode(_))));
    }
}
