//! Failure taxonomy for the remote data widgets.
//!
//! Every variant is caught by the fetch-and-render path and turned into a
//! fixed fallback message; none of them reach the user as a raw error.

/// Errors raised while fetching space-data payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeoError {
    /// Transport failure (DNS, connection reset, CORS rejection in the browser).
    #[error("network error: {0}")]
    Network(String),

    /// Upstream answered with a non-2xx status.
    #[error("HTTP {status}")]
    Fetch { status: u16 },

    /// Body was not JSON of the expected outer shape, or a required
    /// piece of the payload was missing.
    #[error("unexpected payload: {0}")]
    Decode(String),
}

impl NeoError {
    pub fn status(&self) -> Option<u16> {
        match self {
            NeoError::Fetch { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for NeoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            NeoError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            NeoError::Fetch {
                status: status.as_u16(),
            }
        } else {
            NeoError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for NeoError {
    fn from(e: serde_json::Error) -> Self {
        NeoError::Decode(e.to_string())
    }
}
