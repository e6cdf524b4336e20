use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::app_dirs::AppDirs;
use crate::crosshair::CrosshairConfig;
use crate::error::StoreError;
use crate::sound::SoundConfig;

pub const CONFIG_VERSION: u32 = 1;

/// Persisted player preferences. Every field falls back to its default when
/// absent, so older or hand-edited files still load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub version: u32,
    pub crosshair: CrosshairConfig,
    pub sound: SoundConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            crosshair: CrosshairConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl Config {
    /// Clamps values into range and stamps the current version
    pub fn normalized(self) -> Self {
        Self {
            version: CONFIG_VERSION,
            crosshair: self.crosshair.clamp(),
            sound: self.sound.clamp(),
        }
    }

    /// Decodes a stored document. The crosshair and sound sections are read
    /// independently, so a bad field in one leaves the other intact.
    pub fn from_json(bytes: &[u8]) -> Self {
        let doc = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(doc)) => doc,
            Ok(_) => {
                warn!("config is not an object, using defaults");
                return Config::default();
            }
            Err(e) => {
                warn!(error = %e, "malformed config, using defaults");
                return Config::default();
            }
        };

        if let Some(version) = doc.get("version").and_then(Value::as_u64) {
            if version > u64::from(CONFIG_VERSION) {
                warn!(version, "config written by a newer version, using defaults");
                return Config::default();
            }
        }

        Config {
            version: CONFIG_VERSION,
            crosshair: section(doc.get("crosshair"), "crosshair"),
            sound: section(doc.get("sound"), "sound"),
        }
        .normalized()
    }
}

fn section<T: DeserializeOwned + Default>(value: Option<&Value>, name: &str) -> T {
    let Some(value) = value else {
        return T::default();
    };
    serde_json::from_value(value.clone()).unwrap_or_else(|e| {
        warn!(section = name, error = %e, "unreadable config section, using its defaults");
        T::default()
    })
}

/// Reads any JSON number into a `u8`, rounding and saturating; callers clamp
/// to the real range afterwards.
pub(crate) fn saturating_u8<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    let n = f64::deserialize(d)?;
    Ok(n.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => Config::from_json(&bytes),
            Err(_) => {
                debug!(path = %self.path.display(), "no config file yet");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
