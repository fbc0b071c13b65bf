//! Character sheet client binary.
//!
//! Loads settings and a character, then prints a sheet summary.
//!
//! # Examples
//!
//! ```bash
//! # Blank sheet from the bundled settings
//! cargo run -p sheet-client
//!
//! # A saved character against custom attribute definitions
//! SHEET_ATTRIBUTES=my_attributes.ron cargo run -p sheet-client -- hero.json
//! ```

use anyhow::Result;
use sheet_client::{ClientConfig, load_context, load_entity, logging, report};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut config = ClientConfig::from_env();
    if let Some(path) = std::env::args_os().nth(1) {
        config = config.with_character(path);
    }

    let _guard = logging::setup_logging(&config.log_dir())?;
    tracing::info!("Starting sheet client");

    let ctx = load_context(&config)?;
    let entity = load_entity(&ctx, &config)?;
    print!("{}", report::render(&entity)?);

    tracing::info!("Done");
    Ok(())
}
