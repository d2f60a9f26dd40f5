//! Shared HTTP client and the one GET-JSON helper every widget uses.
//!
//! No timeout is configured: the transport's own defaults apply (browser
//! fetch on wasm32, reqwest defaults on native).

use crate::error::NeoError;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

pub fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        #[cfg(not(target_arch = "wasm32"))]
        {
            reqwest::Client::builder()
                .pool_max_idle_per_host(4)
                .user_agent(concat!("neowatch/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|e| {
                    log::warn!("[http] client builder failed ({e}), using defaults");
                    reqwest::Client::new()
                })
        }

        #[cfg(target_arch = "wasm32")]
        {
            reqwest::Client::new()
        }
    })
}

/// GET `url` and decode the JSON body.
///
/// Non-2xx → [`NeoError::Fetch`], transport failure → [`NeoError::Network`],
/// undecodable body → [`NeoError::Decode`].
pub async fn get_json<T: DeserializeOwned>(url: &str, label: &str) -> Result<T, NeoError> {
    log::debug!("[http] GET {label}");

    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(|e| NeoError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("[http] {label} answered HTTP {}", status.as_u16());
        return Err(NeoError::Fetch {
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| NeoError::Network(e.to_string()))?;
    let parsed = serde_json::from_slice::<T>(&body)?;
    Ok(parsed)
}

/// Wrap a URL for a CORS proxy of the `?url=` kind (allorigins style).
pub fn via_proxy(proxy: Option<&str>, url: &str) -> String {
    match proxy {
        Some(p) if !p.is_empty() => format!("{p}?url={}", urlencoding::encode(url)),
        _ => url.to_string(),
    }
}
