//! Content factory for building the application context from data files.

use std::path::{Path, PathBuf};

use sheet_core::{AppContext, GeneralSettings, SheetSettings};

use crate::loaders::{GeneralLoader, LoadResult, SheetLoader};

/// Content factory that loads settings from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── attributes.ron
/// └── general.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const ATTRIBUTES_FILE: &'static str = "attributes.ron";
    pub const GENERAL_FILE: &'static str = "general.toml";

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    /// Load sheet settings from `attributes.ron`.
    pub fn load_sheet(&self) -> LoadResult<SheetSettings> {
        SheetLoader::load(&self.data_dir.join(Self::ATTRIBUTES_FILE))
    }

    /// Load general settings from `general.toml`, falling back to defaults
    /// when the file does not exist.
    pub fn load_general(&self) -> LoadResult<GeneralSettings> {
        let path = self.data_dir.join(Self::GENERAL_FILE);
        if !path.exists() {
            tracing::debug!("No {} found; using default general settings", path.display());
            return Ok(GeneralSettings::default());
        }
        GeneralLoader::load(&path)
    }

    /// Builds the application context from both settings files.
    pub fn load_context(&self) -> LoadResult<AppContext> {
        Ok(AppContext::new(self.load_general()?, self.load_sheet()?))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
