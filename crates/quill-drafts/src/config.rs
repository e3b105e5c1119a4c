//! Draft store configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::DraftError;
use crate::Result;

const DATA_DIR_ENV: &str = "QUILL_DATA_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite file holding local storage
    pub database_path: PathBuf,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("quill.db"),
        }
    }

    /// `$QUILL_DATA_DIR`, else the platform data directory, else `.quill`
    pub fn data_dir() -> PathBuf {
        std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::data_local_dir().map(|d| d.join("Quill")))
            .unwrap_or_else(|| PathBuf::from(".quill"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(DraftError::Config("database_path is empty".to_string()));
        }
        if self.database_path.is_dir() {
            return Err(DraftError::Config(format!(
                "database_path {} is a directory",
                self.database_path.display()
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path() {
        let config = Config::new(PathBuf::from("/tmp/quill-test"));
        assert_eq!(config.database_path, PathBuf::from("/tmp/quill-test/quill.db"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let config = Config {
            database_path: PathBuf::new(),
        };
        assert!(matches!(config.validate(), Err(DraftError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_directory() {
        let config = Config {
            database_path: std::env::temp_dir(),
        };
        assert!(matches!(config.validate(), Err(DraftError::Config(_))));
    }

    #[test]
    fn test_serde() {
        let config = Config::new(PathBuf::from("data"));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
