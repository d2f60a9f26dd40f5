//! neowatch - Near-Earth Object watcher
//!
//! This library provides the core of neowatch: a panel over NASA's NeoWs
//! feed that formats miss distances, speeds and diameters in metric or
//! imperial units, keeps the closest eight objects of a day, and re-renders
//! from its cached payload when the unit toggle changes.
//!
//! ## Architecture
//!
//! neowatch is built to work in two modes:
//! - **Native**: Terminal UI using crossterm and ratatui
//! - **Web**: DOM controller using wasm-bindgen and web-sys
//!
//! ## Usage
//!
//! For native builds:
//! ```bash
//! cargo build --features native
//! ```
//!
//! For web builds:
//! ```bash
//! trunk build --no-default-features --features dom-web
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod dates;
pub mod error;
pub mod types;
pub mod units;

// HTTP + upstream APIs (reqwest on native, browser fetch on wasm32)
pub mod http;
pub mod neo_api;
pub mod apod;
pub mod highlights;

// NEO panel core
pub mod selection;
pub mod panel;
pub mod prefs;

// Rendering (ratatui for the terminal, HTML fragments for the DOM)
pub mod app;
pub mod html;
pub mod ui;

// Re-export commonly used types
pub use app::{App, InputMode};
pub use config::Config;
pub use error::NeoError;
pub use panel::{LoadTicket, NeoPanel, PanelSnapshot, PanelView, ToggleOutcome};
pub use types::{NearEarthObject, NeoFeedResponse, PanelEvent};
pub use units::UnitPreference;
