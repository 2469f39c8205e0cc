//! Settings binder

use crate::env::{env_overrides, process_env};
use crate::loader::{load_patch_from_file_with, load_patch_with};
use crate::merger::merge_patches;
use crate::{ConfigFormat, DEFAULT_PREFIX};
use reqcomp_compression::EncodingSettings;
use reqcomp_core::Result;
use std::path::PathBuf;

#[derive(Debug, Clone)]
enum Source {
    File(PathBuf),
    Inline { content: String, format: ConfigFormat },
}

/// Builder collecting configuration sources for [`EncodingSettings`].
///
/// Sources are applied in the order they were added, then environment
/// overrides when enabled, all on top of the defaults.
#[derive(Debug, Clone)]
pub struct SettingsBinder {
    prefix: String,
    sources: Vec<Source>,
    use_env: bool,
}

impl Default for SettingsBinder {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            sources: Vec::new(),
            use_env: false,
        }
    }
}

impl SettingsBinder {
    /// Create a binder using [`DEFAULT_PREFIX`] and no sources
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Add a configuration file
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File(path.into()));
        self
    }

    /// Add several configuration files, in order
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.sources
            .extend(paths.into_iter().map(|p| Source::File(p.into())));
        self
    }

    /// Add an in-memory configuration document
    pub fn inline(mut self, content: impl Into<String>, format: ConfigFormat) -> Self {
        self.sources.push(Source::Inline {
            content: content.into(),
            format,
        });
        self
    }

    /// Enable or disable environment variable overrides
    pub fn env(mut self, enabled: bool) -> Self {
        self.use_env = enabled;
        self
    }

    /// Bind using the process environment
    pub fn bind(self) -> Result<EncodingSettings> {
        self.bind_with_env(process_env)
    }

    /// Bind, resolving `${VAR}` references and overrides through `lookup`
    pub fn bind_with_env<F>(self, lookup: F) -> Result<EncodingSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut patches = Vec::with_capacity(self.sources.len() + 1);

        for source in &self.sources {
            let patch = match source {
                Source::File(path) => load_patch_from_file_with(path, &self.prefix, &lookup)?,
                Source::Inline { content, format } => {
                    load_patch_with(content, *format, &self.prefix, &lookup)?
                }
            };
            patches.push(patch);
        }

        if self.use_env {
            patches.push(env_overrides(&self.prefix, &lookup)?);
        }

        tracing::debug!(
            prefix = %self.prefix,
            sources = self.sources.len(),
            env = self.use_env,
            "Binding encoding settings"
        );

        let settings = EncodingSettings::builder()
            .patch(merge_patches(patches))
            .build();

        tracing::info!(prefix = %self.prefix, settings = %settings, "Encoding settings bound");

        Ok(settings)
    }
}
