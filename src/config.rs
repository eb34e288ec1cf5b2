//! Runtime configuration
//!
//! Read from environment variables at startup.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::CalorieMethod;

pub const DATA_DIR_ENV: &str = "NUTRILOG_DATA_DIR";
pub const CALORIE_METHOD_ENV: &str = "NUTRILOG_CALORIE_METHOD";

pub const CATALOG_FILE: &str = "food_database.txt";
pub const LOG_FILE: &str = "daily_log.txt";
pub const PROFILE_FILE: &str = "user_profile.txt";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub calorie_method: CalorieMethod,
}

impl Config {
    /// Build from `NUTRILOG_DATA_DIR` and `NUTRILOG_CALORIE_METHOD`
    pub fn from_env() -> Self {
        let data_dir = std::env::var(DATA_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let calorie_method = match std::env::var(CALORIE_METHOD_ENV) {
            Ok(value) => CalorieMethod::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "unknown calorie method, using Harris-Benedict");
                CalorieMethod::default()
            }),
            Err(_) => CalorieMethod::default(),
        };

        Self {
            data_dir,
            calorie_method,
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            calorie_method: CalorieMethod::default(),
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(CATALOG_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join(PROFILE_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// `<project root>/data`, where the project root is found by walking up from
/// `target/{debug,release}`; otherwise `data` next to the executable
fn default_data_dir() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(Path::parent) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths() {
        let config = Config::with_data_dir("/tmp/nutrilog");
        assert_eq!(config.catalog_path(), PathBuf::from("/tmp/nutrilog/food_database.txt"));
        assert_eq!(config.log_path(), PathBuf::from("/tmp/nutrilog/daily_log.txt"));
        assert_eq!(config.profile_path(), PathBuf::from("/tmp/nutrilog/user_profile.txt"));
        assert_eq!(config.calorie_method, CalorieMethod::HarrisBenedict);
    }

    #[test]
    fn test_default_data_dir_ends_with_data() {
        assert!(default_data_dir().ends_with("data"));
    }
}
