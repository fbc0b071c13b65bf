//! Data-driven sheet content and loaders.
//!
//! This crate ships factory settings under `data/` and loads:
//! - Attribute definitions (RON)
//! - General settings (TOML)
//! - Character files (JSON)
//!
//! All loaders deserialize `sheet-core` types directly through serde.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CharacterFile, CharacterLoader, ContentFactory, GeneralLoader, LoadResult, SheetLoader,
};
