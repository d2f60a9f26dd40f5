//! HTTP behaviour against a local tiny_http server.

mod common;

use common::{feed_json, neo, ten_objects};
use neowatch::config::Config;
use neowatch::panel::UNAVAILABLE_MESSAGE;
use neowatch::prefs::MemoryStore;
use neowatch::{apod, highlights, neo_api, NeoError, NeoPanel, PanelView};
use std::thread::{self, JoinHandle};
use tiny_http::{Header, Response, Server};

/// Serve exactly one request; the handle yields the requested path+query.
fn serve_once(status: u16, body: String) -> (String, JoinHandle<String>) {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let port = server
        .server_addr()
        .to_ip()
        .map(|addr| addr.port())
        .expect("tcp listener");
    let handle = thread::spawn(move || {
        let request = server.recv().expect("one request");
        let url = request.url().to_string();
        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("static header");
        let response = Response::from_string(body)
            .with_status_code(status)
            .with_header(header);
        request.respond(response).expect("respond");
        url
    });
    (format!("http://127.0.0.1:{port}/neo/rest/v1/feed"), handle)
}

/// A URL nothing is listening on.
fn closed_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/feed")
}

#[tokio::test]
async fn fetch_feed_sends_same_start_and_end_date() {
    let body = feed_json("2024-01-01", ten_objects()).to_string();
    let (url, handle) = serve_once(200, body);

    let feed = neo_api::fetch_neo_feed(&url, "DEMO_KEY", "2024-01-01")
        .await
        .expect("feed decodes");
    assert_eq!(feed.objects_for("2024-01-01").len(), 10);
    assert_eq!(feed.element_count, Some(10));

    let requested = handle.join().expect("server thread");
    assert_eq!(
        requested,
        "/neo/rest/v1/feed?start_date=2024-01-01&end_date=2024-01-01&api_key=DEMO_KEY"
    );
}

#[tokio::test]
async fn rate_limited_response_is_fetch_error() {
    let (url, handle) = serve_once(429, r#"{"error":"OVER_RATE_LIMIT"}"#.to_string());
    let err = neo_api::fetch_neo_feed(&url, "DEMO_KEY", "2024-01-01")
        .await
        .expect_err("429 is a failure");
    assert_eq!(err, NeoError::Fetch { status: 429 });
    assert_eq!(err.status(), Some(429));
    handle.join().expect("server thread");
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let (url, handle) = serve_once(200, "<html>not json</html>".to_string());
    let err = neo_api::fetch_neo_feed(&url, "DEMO_KEY", "2024-01-01")
        .await
        .expect_err("garbage body");
    assert!(matches!(err, NeoError::Decode(_)), "got {err:?}");
    handle.join().expect("server thread");
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let err = neo_api::fetch_neo_feed(&closed_url(), "DEMO_KEY", "2024-01-01")
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, NeoError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn panel_end_to_end_failure_and_success() {
    let mut panel = NeoPanel::new(Box::new(MemoryStore::new()), Some("2024-01-01".into()));

    let (url, handle) = serve_once(503, "{}".to_string());
    let t = panel.refresh();
    let result = neo_api::fetch_neo_feed(&url, "DEMO_KEY", &t.date).await;
    panel.finish_load(&t, result);
    handle.join().expect("server thread");
    assert_eq!(
        panel.view(),
        &PanelView::Unavailable { message: UNAVAILABLE_MESSAGE.to_string() }
    );

    let body = feed_json("2024-01-01", vec![neo("x", Some(10.0), true)]).to_string();
    let (url, handle) = serve_once(200, body);
    let t = panel.refresh();
    let result = neo_api::fetch_neo_feed(&url, "DEMO_KEY", &t.date).await;
    panel.finish_load(&t, result);
    handle.join().expect("server thread");
    assert_eq!(panel.count_label(), "1 object");
    assert_eq!(panel.hazard_label(), "1 potentially hazardous");
}

#[tokio::test]
async fn apod_image_prefers_hd_and_upgrades_http() {
    let body = serde_json::json!({
        "title": "Orion",
        "media_type": "image",
        "url": "http://apod.nasa.gov/orion.jpg",
        "hdurl": "http://apod.nasa.gov/orion_hd.jpg",
        "date": "2024-01-01"
    })
    .to_string();
    let (url, handle) = serve_once(200, body);
    let view = apod::fetch_apod(&url, "DEMO_KEY").await.expect("apod view");
    assert_eq!(view.image_url, "https://apod.nasa.gov/orion_hd.jpg");
    assert_eq!(view.alt, "Orion");
    let requested = handle.join().expect("server thread");
    assert!(requested.ends_with("?api_key=DEMO_KEY&thumbs=true"));
}

#[tokio::test]
async fn highlights_fall_back_when_every_source_fails() {
    let down = closed_url();
    let cfg = Config {
        neo_feed_url: down.clone(),
        launch_url: down.clone(),
        iss_pass_url: down.clone(),
        donki_url: down,
        ..Config::default()
    };
    let items = highlights::build_highlights(&cfg, "2024-01-01").await;

    assert_eq!(items.len(), 4);
    assert_eq!(items[0], {
        let mut f = highlights::launch_fallback();
        f.delay_ms = 100;
        f
    });
    assert_eq!(items[1].text, highlights::iss_fallback().text);
    assert_eq!(items[2].text, highlights::space_weather_fallback().text);
    assert_eq!(items[3].text, highlights::neo_fallback().text);
    let delays: Vec<u32> = items.iter().map(|i| i.delay_ms).collect();
    assert_eq!(delays, [100, 200, 300, 400]);
}
