pub mod storage;
pub mod locale_hint;
pub mod language_store;

pub use storage::*;
pub use locale_hint::*;
pub use language_store::*;

use anyhow::Result;
use std::path::PathBuf;

/// Get the application data directory
pub fn get_data_directory() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?
        .join("cms-site");
    Ok(data_dir)
}

/// Default location of the persisted preferences file
pub fn default_preferences_path() -> Result<PathBuf> {
    Ok(get_data_directory()?.join("preferences.json"))
}
