//! Content loaders for reading sheet data from files.
//!
//! Sheet settings come from RON, general settings from TOML and characters
//! from JSON. Parse failures abort the load of that file and surface as
//! [`anyhow::Error`] with the path in context.

pub mod character;
pub mod factory;
pub mod general;
pub mod sheet;

pub use character::{CharacterFile, CharacterLoader};
pub use factory::ContentFactory;
pub use general::GeneralLoader;
pub use sheet::SheetLoader;

use std::fs;
use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Writes through a temp file and renames it into place.
pub(crate) fn write_file(path: &Path, content: &str) -> LoadResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create {}: {}", parent.display(), e))?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)
        .map_err(|e| anyhow::anyhow!("Failed to write file {}: {}", temp_path.display(), e))?;
    fs::rename(&temp_path, path)
        .map_err(|e| anyhow::anyhow!("Failed to replace file {}: {}", path.display(), e))?;
    Ok(())
}
