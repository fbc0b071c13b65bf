//! Character sheet client: composition root for settings, logging and
//! reporting.
//!
//! # Architecture
//!
//! ```text
//! main
//!   ├─→ ClientConfig (environment)
//!   ├─→ logging (stderr + file)
//!   ├─→ AppContext (general + sheet settings, built once)
//!   └─→ Entity (loaded or blank) → report
//! ```

pub mod config;
pub mod logging;
pub mod report;

pub use config::ClientConfig;

use anyhow::{Context, Result};
use sheet_content::{CharacterLoader, ContentFactory, GeneralLoader, SheetLoader};
use sheet_core::{AppContext, Entity};

/// Builds the application context, preferring configured files over the
/// bundled data.
pub fn load_context(config: &ClientConfig) -> Result<AppContext> {
    let bundled = ContentFactory::bundled();
    let sheet = match &config.attributes {
        Some(path) => SheetLoader::load(path)?,
        None => bundled.load_sheet()?,
    };
    let general = match &config.general {
        Some(path) => GeneralLoader::load(path)?,
        None => bundled.load_general()?,
    };
    Ok(AppContext::new(general, sheet))
}

/// Loads the configured character, or creates a blank one.
pub fn load_entity(ctx: &AppContext, config: &ClientConfig) -> Result<Entity> {
    match &config.character {
        Some(path) => CharacterLoader::load(ctx, path)
            .with_context(|| format!("while opening {}", path.display())),
        None => {
            tracing::info!("No character file configured; using a blank sheet");
            Ok(Entity::new(ctx))
        }
    }
}
