//! Persisted user preferences: conversion history and favorite currencies.
//!
//! Stored as a single JSON document. Each field is read on its own, so a
//! corrupt history does not wipe the favorites and vice versa.

use fxdash_core::error::PreferencesError;
use fxdash_core::types::CurrencyCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::conversion::Conversion;

/// Default number of conversions kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;
/// Default number of favorite currencies kept.
pub const DEFAULT_FAVORITES_LIMIT: usize = 10;

/// User preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Most recent first
    pub history: Vec<Conversion>,
    pub favorites: Vec<CurrencyCode>,
}

/// JSON file backed preference store.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    history_limit: usize,
    favorites_limit: usize,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>, history_limit: usize, favorites_limit: usize) -> Self {
        Self {
            path: path.into(),
            history_limit,
            favorites_limit,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load preferences. A missing file or unreadable data yields defaults.
    pub fn load(&self) -> Preferences {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read preferences, using defaults");
                return Preferences::default();
            }
        };

        let document: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt preferences file, using defaults");
                return Preferences::default();
            }
        };

        let mut prefs = Preferences {
            history: self.field(&document, "history"),
            favorites: self.field(&document, "favorites"),
        };
        self.enforce_limits(&mut prefs);
        prefs
    }

    fn field<T: serde::de::DeserializeOwned + Default>(&self, document: &Value, name: &str) -> T {
        let Some(value) = document.get(name) else {
            return T::default();
        };
        serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            warn!(field = name, error = %e, "ignoring corrupt preference field");
            T::default()
        })
    }

    fn enforce_limits(&self, prefs: &mut Preferences) {
        prefs.history.truncate(self.history_limit);
        let mut seen = Vec::with_capacity(prefs.favorites.len());
        prefs.favorites.retain(|code| {
            if seen.contains(code) {
                false
            } else {
                seen.push(*code);
                true
            }
        });
        prefs.favorites.truncate(self.favorites_limit);
    }

    /// Write preferences, replacing the file atomically.
    pub fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(prefs)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }

    /// Prepend a conversion to the history and persist.
    pub fn record_conversion(&self, conversion: Conversion) -> Result<Preferences, PreferencesError> {
        let mut prefs = self.load();
        prefs.history.insert(0, conversion);
        prefs.history.truncate(self.history_limit);
        self.save(&prefs)?;
        Ok(prefs)
    }

    /// Add a favorite. Returns `false` if it was already present or the list is full.
    pub fn add_favorite(&self, code: CurrencyCode) -> Result<bool, PreferencesError> {
        let mut prefs = self.load();
        if prefs.favorites.contains(&code) || prefs.favorites.len() >= self.favorites_limit {
            return Ok(false);
        }
        prefs.favorites.push(code);
        self.save(&prefs)?;
        Ok(true)
    }

    /// Remove a favorite. Returns `false` if it was not present.
    pub fn remove_favorite(&self, code: CurrencyCode) -> Result<bool, PreferencesError> {
        let mut prefs = self.load();
        let before = prefs.favorites.len();
        prefs.favorites.retain(|c| *c != code);
        if prefs.favorites.len() == before {
            return Ok(false);
        }
        self.save(&prefs)?;
        Ok(true)
    }

    /// Drop the whole conversion history.
    pub fn clear_history(&self) -> Result<(), PreferencesError> {
        let mut prefs = self.load();
        prefs.history.clear();
        self.save(&prefs)
    }
}
