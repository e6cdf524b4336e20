use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the score tables live
    pub fn data_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("aimtrain")
        } else {
            ProjectDirs::from("", "", "aimtrain")
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("aimtrain_data"))
        }
    }

    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "aimtrain")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("aimtrain_config.json"))
    }

    pub fn log_path() -> PathBuf {
        Self::data_dir().join("aimtrain.log")
    }
}
