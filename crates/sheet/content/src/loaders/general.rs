//! General settings loader.

use std::path::Path;

use sheet_core::GeneralSettings;

use crate::loaders::{LoadResult, read_file, write_file};

/// Loader for general settings from TOML files.
///
/// Values may sit at the top level or, in older files, under a `[general]`
/// table. Out-of-range values are reset to their defaults after parsing.
pub struct GeneralLoader;

impl GeneralLoader {
    pub fn load(path: &Path) -> LoadResult<GeneralSettings> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse general settings {}: {}", path.display(), e)
        })
    }

    pub fn parse(content: &str) -> LoadResult<GeneralSettings> {
        let mut table: toml::Table = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse general settings TOML: {}", e))?;
        let value = match table.remove("general") {
            Some(old_location @ toml::Value::Table(_)) => old_location,
            Some(other) => {
                table.insert("general".into(), other);
                toml::Value::Table(table)
            }
            None => toml::Value::Table(table),
        };
        let mut settings: GeneralSettings = value
            .try_into()
            .map_err(|e| anyhow::anyhow!("Invalid general settings: {}", e))?;
        settings.ensure_validity();
        Ok(settings)
    }

    pub fn save(settings: &GeneralSettings, path: &Path) -> LoadResult<()> {
        let content = toml::to_string_pretty(settings)
            .map_err(|e| anyhow::anyhow!("Failed to serialize general settings: {}", e))?;
        write_file(path, &content)
    }
}
