use crate::AUTH_TOKEN_KEY;
use crate::AUTH_USER_KEY;
use crate::TOAST_NOTIFICATIONS_KEY;
use crate::error::SettingsError;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::PoisonError;
use tracing::warn;

/// String key-value store with the semantics of the browser storage the
/// client state originally lived in: reads never fail, writes are
/// whole-value replacements, and a missing key is simply absent.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    fn auth_token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY)
    }

    fn set_auth_token(&self, token: &str) {
        self.set(AUTH_TOKEN_KEY, token);
    }

    /// Whether activity notifications may be shown. Absent means enabled.
    fn notifications_enabled(&self) -> bool {
        match self.get(TOAST_NOTIFICATIONS_KEY) {
            None => true,
            Some(value) => value == "true",
        }
    }

    fn set_notifications_enabled(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        self.set(TOAST_NOTIFICATIONS_KEY, value);
    }

    /// Drops the session credentials on logout. Other keys (including the
    /// notification preference) survive.
    fn clear_session(&self) {
        self.remove(AUTH_TOKEN_KEY);
        self.remove(AUTH_USER_KEY);
    }
}

/// In-memory settings backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values().remove(key);
    }
}

/// Settings persisted as a single pretty-printed JSON object on disk.
pub struct JsonFileSettings {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileSettings {
    /// Load settings from `path`. A missing file yields an empty store; an
    /// unreadable or malformed file is logged and replaced on the next
    /// write rather than blocking client startup.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_values(&path) {
            Ok(values) => values,
            Err(err) => {
                warn!("ignoring unreadable settings file {}: {err}", path.display());
                BTreeMap::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn values(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values();
        values.insert(key.to_string(), value.to_string());
        if let Err(err) = self.save(&values) {
            warn!("failed to persist settings to {}: {err}", self.path.display());
        }
    }

    fn remove(&self, key: &str) {
        let mut values = self.values();
        if values.remove(key).is_some()
            && let Err(err) = self.save(&values)
        {
            warn!("failed to persist settings to {}: {err}", self.path.display());
        }
    }
}

fn read_values(path: &Path) -> Result<BTreeMap<String, String>, SettingsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
