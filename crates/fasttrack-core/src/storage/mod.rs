mod config;
mod kv;

pub use config::{ApiConfig, Config, FastingConfig};
pub use kv::{FileStore, KvStore, MemoryStore};

use std::path::PathBuf;

/// Returns `~/.config/fasttrack[-dev]/` based on FASTTRACK_ENV.
///
/// Set FASTTRACK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FASTTRACK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("fasttrack-dev")
    } else {
        base_dir.join("fasttrack")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
