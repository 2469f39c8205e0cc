//! # reqcomp configuration
//!
//! Binds [`EncodingSettings`] from external configuration with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Nested or flat dotted keys under a namespace prefix
//! - `${VAR}` / `${VAR:-default}` expansion inside documents
//! - Layered sources, later ones winning
//! - Environment variable overrides
//!
//! Values are bound as given. Only type mismatches are errors.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod builder;
pub mod env;
pub mod loader;
pub mod merger;

pub use builder::SettingsBinder;
pub use env::{env_overrides, env_overrides_from_process, env_var_name};
pub use loader::{load_patch_from_file, load_patch_from_str, load_patch_with};
pub use merger::merge_patches;

use reqcomp_compression::EncodingSettings;
use reqcomp_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Prefix the settings are bound from unless told otherwise
pub const DEFAULT_PREFIX: &str = "http.client.compression.request";

/// Bind settings from files, in order, optionally followed by environment overrides
pub fn bind<P: Into<PathBuf>>(
    paths: Vec<P>,
    prefix: &str,
    use_env: bool,
) -> Result<EncodingSettings> {
    SettingsBinder::new()
        .prefix(prefix)
        .files(paths)
        .env(use_env)
        .bind()
}

/// Bind settings from a single configuration string
pub fn bind_str(content: &str, format: ConfigFormat, prefix: &str) -> Result<EncodingSettings> {
    SettingsBinder::new()
        .prefix(prefix)
        .inline(content, format)
        .bind()
}

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// TOML format
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Config("Unable to detect config format".to_string()))?;

        match ext {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            _ => Err(Error::Config(format!("Unsupported config format: {}", ext))),
        }
    }
}
