use crate::api::{default_api_url, ApiConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[cfg(target_arch = "wasm32")]
use gloo_storage::{LocalStorage, Storage};

#[cfg(target_arch = "wasm32")]
const SETTINGS_KEY: &str = "media_streamer.app_settings";

#[cfg(not(target_arch = "wasm32"))]
const SETTINGS_ROW: &str = "app_settings";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("settings database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[cfg(target_arch = "wasm32")]
    #[error("browser storage error: {0}")]
    Storage(String),

    #[error("settings are not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// User settings kept between sessions. Queue state is deliberately absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_api_url_string")]
    pub api_url: String,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

fn default_api_url_string() -> String {
    default_api_url().to_string()
}

fn default_volume() -> f64 {
    0.8
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url_string(),
            volume: default_volume(),
        }
    }
}

impl AppSettings {
    /// The configured server, or the default when the stored URL is unusable.
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(&self.api_url).unwrap_or_else(|err| {
            warn!(url = %self.api_url, error = %err, "Ignoring invalid API URL");
            ApiConfig::default()
        })
    }

    fn normalized(mut self) -> Self {
        self.volume = normalize_volume(self.volume);
        self
    }
}

/// Older builds stored volume as a percentage.
pub fn normalize_volume(mut value: f64) -> f64 {
    if !value.is_finite() {
        return default_volume();
    }
    let mut passes = 0;
    while value > 1.0 && passes < 4 {
        value /= 100.0;
        passes += 1;
    }
    value.clamp(0.0, 1.0)
}

#[cfg(not(target_arch = "wasm32"))]
pub struct SettingsStore {
    conn: rusqlite::Connection,
}

#[cfg(not(target_arch = "wasm32"))]
impl SettingsStore {
    pub fn open(path: &std::path::Path) -> Result<Self, SettingsError> {
        let conn = rusqlite::Connection::open(path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(Self { conn })
    }

    pub fn open_default() -> Result<Self, SettingsError> {
        Self::open(&default_db_path())
    }

    pub fn load(&self) -> Result<AppSettings, SettingsError> {
        use rusqlite::OptionalExtension;

        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                [SETTINGS_ROW],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str::<AppSettings>(&json)?.normalized()),
            None => Ok(AppSettings::default()),
        }
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), SettingsError> {
        let json = serde_json::to_string(settings)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            [SETTINGS_ROW, json.as_str()],
        )?;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_db_path() -> std::path::PathBuf {
    let dir = dirs::data_dir()
        .map(|dir| dir.join("media-streamer"))
        .unwrap_or_else(|| std::path::PathBuf::from(".media-streamer"));
    if let Err(err) = std::fs::create_dir_all(&dir) {
        warn!(path = %dir.display(), error = %err, "Could not create data directory");
    }
    dir.join("settings.db")
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load_settings() -> Result<AppSettings, SettingsError> {
    SettingsStore::open_default()?.load()
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn save_settings(settings: AppSettings) -> Result<(), SettingsError> {
    SettingsStore::open_default()?.save(&settings)
}

#[cfg(target_arch = "wasm32")]
pub async fn load_settings() -> Result<AppSettings, SettingsError> {
    match LocalStorage::get::<AppSettings>(SETTINGS_KEY) {
        Ok(settings) => Ok(settings.normalized()),
        Err(_) => Ok(AppSettings::default()),
    }
}

#[cfg(target_arch = "wasm32")]
pub async fn save_settings(settings: AppSettings) -> Result<(), SettingsError> {
    LocalStorage::set(SETTINGS_KEY, settings).map_err(|e| SettingsError::Storage(e.to_string()))
}
