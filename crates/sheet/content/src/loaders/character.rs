//! Character file loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sheet_core::{AppContext, Entity, EntityRecord};

use crate::loaders::{LoadResult, read_file, write_file};

/// JSON layout of a character file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterFile {
    pub version: u32,
    #[serde(flatten)]
    pub record: EntityRecord,
}

impl CharacterFile {
    pub const CURRENT_VERSION: u32 = 1;
}

/// Loader for character files (JSON).
pub struct CharacterLoader;

impl CharacterLoader {
    /// Load a character, reconciling its attributes with `ctx`'s sheet
    /// settings.
    pub fn load(ctx: &AppContext, path: &Path) -> LoadResult<Entity> {
        let content = read_file(path)?;
        let entity = Self::parse(ctx, &content)
            .map_err(|e| anyhow::anyhow!("Failed to load character {}: {}", path.display(), e))?;
        tracing::debug!("Loaded character '{}' from {}", entity.profile.name, path.display());
        Ok(entity)
    }

    pub fn parse(ctx: &AppContext, content: &str) -> LoadResult<Entity> {
        let file: CharacterFile = serde_json::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character JSON: {}", e))?;
        if file.version > CharacterFile::CURRENT_VERSION {
            anyhow::bail!(
                "Character file version {} is newer than supported version {}",
                file.version,
                CharacterFile::CURRENT_VERSION
            );
        }
        Ok(Entity::from_record(ctx, file.record))
    }

    pub fn to_string(entity: &Entity) -> LoadResult<String> {
        let file = CharacterFile {
            version: CharacterFile::CURRENT_VERSION,
            record: entity.to_record(),
        };
        serde_json::to_string_pretty(&file)
            .map_err(|e| anyhow::anyhow!("Failed to serialize character: {}", e))
    }

    pub fn save(entity: &Entity, path: &Path) -> LoadResult<()> {
        write_file(path, &Self::to_string(entity)?)?;
        tracing::debug!("Saved character '{}' to {}", entity.profile.name, path.display());
        Ok(())
    }
}
