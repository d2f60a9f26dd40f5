//! Unit preference persistence.
//!
//! One string key (`"units"`) holding `"metric"` or `"imperial"`. The panel
//! reads it once at startup and writes it on every toggle. Backends:
//! in-memory (tests, fallback), a TOML file (native) and `localStorage`
//! (web, implemented in the DOM binary).

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::units::UnitPreference;

pub const UNITS_KEY: &str = "units";

/// Minimal string key-value store, shaped like `localStorage`.
pub trait UnitStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Read the stored preference (defaults to metric).
pub fn load_unit(store: &dyn UnitStore) -> UnitPreference {
    UnitPreference::from_stored(store.get(UNITS_KEY).as_deref())
}

pub fn save_unit(store: &mut dyn UnitStore, unit: UnitPreference) {
    if let Err(e) = store.set(UNITS_KEY, unit.as_str()) {
        log::warn!("[prefs] Failed to persist unit preference: {e:#}");
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl UnitStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// TOML file store for the native binary. A missing or unreadable file
/// reads as empty; writes create the parent directory.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    contents: HashMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let contents = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).unwrap_or_else(|e| {
                log::warn!("[prefs] Ignoring malformed {}: {e}", path.display());
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        FileStore { path, contents }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UnitStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.contents.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.contents.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let text = toml::to_string(&self.contents).context("serializing preferences")?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}
