//! Client process configuration.
use std::env;
use std::path::PathBuf;

/// Where the client finds its inputs and writes its logs.
///
/// Settings files left unset fall back to the data bundled with
/// `sheet-content`; without a character file a blank sheet is reported.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub attributes: Option<PathBuf>,
    pub general: Option<PathBuf>,
    pub character: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Construct client configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SHEET_ATTRIBUTES` - Attribute definitions (RON)
    /// - `SHEET_GENERAL` - General settings (TOML)
    /// - `SHEET_CHARACTER` - Character file (JSON)
    /// - `SHEET_LOG_DIR` - Log directory (default: platform cache dir)
    pub fn from_env() -> Self {
        Self {
            attributes: read_path("SHEET_ATTRIBUTES"),
            general: read_path("SHEET_GENERAL"),
            character: read_path("SHEET_CHARACTER"),
            log_dir: read_path("SHEET_LOG_DIR"),
        }
    }

    /// Uses `path` as the character file (builder pattern).
    #[must_use]
    pub fn with_character(mut self, path: impl Into<PathBuf>) -> Self {
        self.character = Some(path.into());
        self
    }

    /// Resolved log directory.
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }
}

fn read_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "sheet")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| env::temp_dir().join("sheet").join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_dir_wins() {
        let config = ClientConfig {
            log_dir: Some("/var/log/sheet".into()),
            ..ClientConfig::default()
        };
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/sheet"));
        assert!(ClientConfig::default().log_dir().ends_with("logs"));
    }

    #[test]
    fn character_override() {
        let config = ClientConfig::default().with_character("hero.json");
        assert_eq!(config.character, Some(PathBuf::from("hero.json")));
    }
}
