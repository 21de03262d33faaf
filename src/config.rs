//! Runtime settings.
//!
//! Secrets are looked up in an optional JSON secrets file first, then in the
//! environment. Everything is read once in `main` and handed to the clients.

use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_SECRETS_FILE: &str = "secrets.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_OCR_SPACE_URL: &str = "https://api.ocr.space/parse/image";

pub const OCR_TIMEOUT: Duration = Duration::from_secs(30);
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(20);

/// Flat key/value store read from the secrets file.
#[derive(Debug, Default, Clone)]
pub struct SecretStore {
    values: HashMap<String, String>,
}

impl SecretStore {
    /// Load secrets from a JSON object file. A missing file yields an empty
    /// store; a broken one is logged and also yields an empty store.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Secrets file {:?} unreadable: {}", path, e);
                return Self::default();
            }
        };

        let raw: HashMap<String, serde_json::Value> = match serde_json::from_str(&content) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to parse secrets file {:?}: {}", path, e);
                return Self::default();
            }
        };

        let values = raw
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                serde_json::Value::Null => None,
                other => Some((k, other.to_string())),
            })
            .collect::<HashMap<_, _>>();

        info!("Loaded {} secrets from {:?}", values.len(), path);
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Resolve a secret: secrets store first, then the given lookup (normally the
/// environment). Always trimmed; absence is the empty string.
fn resolve_secret<F>(store: &SecretStore, key: &str, env: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    store
        .get(key)
        .map(str::to_string)
        .or_else(|| env(key))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

/// Immutable process settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Search API base URL. Empty disables search.
    pub api_base: String,
    /// OCR.space API key. Empty disables OCR.
    pub ocr_space_key: String,
    pub ocr_space_url: String,
    pub bind_addr: String,
    pub ocr_timeout: Duration,
    pub search_timeout: Duration,
}

/// What the settings panel is allowed to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsStatus {
    pub api_set: bool,
    pub ocr_key_set: bool,
}

impl Settings {
    /// Build settings from the secrets file named by `PLUMBID_SECRETS_FILE`
    /// (or `secrets.json`) and the process environment.
    pub fn from_env() -> Self {
        let secrets_path = std::env::var("PLUMBID_SECRETS_FILE")
            .unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        let store = SecretStore::load(Path::new(&secrets_path));
        Self::resolve(&store, |key| std::env::var(key).ok())
    }

    /// Build settings from an explicit store and lookup function.
    pub fn resolve<F>(store: &SecretStore, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str, default: &str| {
            env(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            api_base: resolve_secret(store, "API_BASE", &env),
            ocr_space_key: resolve_secret(store, "OCR_SPACE_KEY", &env),
            ocr_space_url: non_empty("OCR_SPACE_URL", DEFAULT_OCR_SPACE_URL),
            bind_addr: non_empty("PLUMBID_BIND", DEFAULT_BIND_ADDR),
            ocr_timeout: OCR_TIMEOUT,
            search_timeout: SEARCH_TIMEOUT,
        }
    }

    pub fn status(&self) -> SettingsStatus {
        SettingsStatus {
            api_set: !self.api_base.is_empty(),
            ocr_key_set: !self.ocr_space_key.is_empty(),
        }
    }
}
