mod config;
pub mod diary;

pub use config::{Config, EditorConfig, StorageConfig};
pub use diary::{day_file_name, DiaryStore, FsDiaryStore, MemoryDiaryStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/dayline[-dev]/` based on DAYLINE_ENV.
///
/// Set DAYLINE_ENV=dev to use the development data directory, or
/// DAYLINE_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("DAYLINE_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("DAYLINE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("dayline-dev")
            } else {
                base_dir.join("dayline")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
