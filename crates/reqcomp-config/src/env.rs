//! Environment variable overrides
//!
//! A key under a prefix maps to one variable name: join prefix and key with
//! `.`, turn dots into underscores, drop dashes, upper-case the rest. With the
//! default prefix, `min-request-size` is read from
//! `HTTP_CLIENT_COMPRESSION_REQUEST_MINREQUESTSIZE`.
//!
//! List values are comma-separated.

use reqcomp_compression::settings::split_list;
use reqcomp_compression::EncodingSettingsPatch;
use reqcomp_core::{Error, Result};

/// Key for the accepted mime types
pub const MIME_TYPES_KEY: &str = "mime-types";

/// Key for the minimum request size
pub const MIN_REQUEST_SIZE_KEY: &str = "min-request-size";

/// Key for the content encodings
pub const CONTENT_ENCODING_TYPES_KEY: &str = "content-encoding-types";

/// Environment variable name for `key` under `prefix`
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let dotted = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    };

    dotted
        .chars()
        .filter(|c| *c != '-')
        .map(|c| if c == '.' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

/// Read overrides for `prefix` from the process environment
pub fn env_overrides_from_process(prefix: &str) -> Result<EncodingSettingsPatch> {
    env_overrides(prefix, process_env)
}

/// Read overrides for `prefix` through `lookup`
pub fn env_overrides<F>(prefix: &str, lookup: F) -> Result<EncodingSettingsPatch>
where
    F: Fn(&str) -> Option<String>,
{
    let mut patch = EncodingSettingsPatch::default();

    let name = env_var_name(prefix, MIME_TYPES_KEY);
    if let Some(value) = lookup(&name) {
        tracing::debug!(var = %name, "Applying environment override");
        patch.mime_types = Some(split_list(&value));
    }

    let name = env_var_name(prefix, MIN_REQUEST_SIZE_KEY);
    if let Some(value) = lookup(&name) {
        tracing::debug!(var = %name, "Applying environment override");
        let size = value.trim().parse::<i32>().map_err(|e| {
            Error::binding(prefix, format!("{name} is not a valid integer ({value:?}): {e}"))
        })?;
        patch.min_request_size = Some(size);
    }

    let name = env_var_name(prefix, CONTENT_ENCODING_TYPES_KEY);
    if let Some(value) = lookup(&name) {
        tracing::debug!(var = %name, "Applying environment override");
        patch.content_encoding_types = Some(split_list(&value));
    }

    Ok(patch)
}

pub(crate) fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
