//! Configuration loading

use crate::env::process_env;
use crate::ConfigFormat;
use regex::Regex;
use reqcomp_compression::EncodingSettingsPatch;
use reqcomp_core::{Error, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Load the settings patch found under `prefix` in a file
pub fn load_patch_from_file<P: AsRef<Path>>(
    path: P,
    prefix: &str,
) -> Result<EncodingSettingsPatch> {
    load_patch_from_file_with(path, prefix, process_env)
}

/// Like [`load_patch_from_file`], resolving `${VAR}` references through `lookup`
pub fn load_patch_from_file_with<P, F>(
    path: P,
    prefix: &str,
    lookup: F,
) -> Result<EncodingSettingsPatch>
where
    P: AsRef<Path>,
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    let format = ConfigFormat::from_path(path)?;

    let patch = load_patch_with(&content, format, prefix, lookup)?;
    tracing::debug!(
        path = %path.display(),
        prefix,
        found = !patch.is_empty(),
        "Loaded configuration file"
    );

    Ok(patch)
}

/// Load the settings patch found under `prefix` in a configuration string
///
/// `${VAR}` references are resolved from the process environment, see
/// [`load_patch_with`].
pub fn load_patch_from_str(
    content: &str,
    format: ConfigFormat,
    prefix: &str,
) -> Result<EncodingSettingsPatch> {
    load_patch_with(content, format, prefix, process_env)
}

/// Like [`load_patch_from_str`], resolving `${VAR}` references through `lookup`
///
/// Expansion runs over the raw text before it is parsed, so it covers the whole
/// document: comments and sections outside `prefix` included. A reference with
/// no value and no default fails the load wherever it appears; write
/// `${VAR:-}` in text that should tolerate an unset variable.
pub fn load_patch_with<F>(
    content: &str,
    format: ConfigFormat,
    prefix: &str,
    lookup: F,
) -> Result<EncodingSettingsPatch>
where
    F: Fn(&str) -> Option<String>,
{
    // Expand environment variables first
    let expanded = expand_env_vars(content, lookup)?;
    let document = parse_document(&expanded, format)?;

    let Some(section) = find_section(&document, prefix)? else {
        return Ok(EncodingSettingsPatch::default());
    };

    serde_json::from_value(Value::Object(section))
        .map_err(|e| Error::binding(prefix, e.to_string()))
}

fn parse_document(content: &str, format: ConfigFormat) -> Result<Value> {
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let document = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse YAML: {e}")))?,
        ConfigFormat::Toml => toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?,
        ConfigFormat::Json => serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse JSON: {e}")))?,
    };

    Ok(document)
}

/// Expand environment variables in configuration string
/// Supports syntax: ${VAR} and ${VAR:-default}
fn expand_env_vars<F>(content: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}")
        .map_err(|e| Error::Config(format!("Invalid regex: {e}")))?;

    let mut result = String::with_capacity(content.len());
    let mut last_match = 0;

    for cap in re.captures_iter(content) {
        let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let var_name = var_name.as_str();
        let default_value = cap.get(3).map(|m| m.as_str());

        let value = match (lookup(var_name), default_value) {
            (Some(value), _) => value,
            (None, Some(default)) => default.to_string(),
            (None, None) => {
                return Err(Error::Config(format!(
                    "Environment variable '{var_name}' not set and no default provided"
                )));
            }
        };

        result.push_str(&content[last_match..full_match.start()]);
        result.push_str(&value);
        last_match = full_match.end();
    }

    result.push_str(&content[last_match..]);

    Ok(result)
}

/// Locate the map bound to `prefix` in a parsed document.
///
/// Keys may be nested (`http: { client: ... }`), flat
/// (`"http.client.compression.request.mime-types"`) or any mix of the two.
/// Returns `None` when the document mentions nothing under the prefix.
fn find_section(document: &Value, prefix: &str) -> Result<Option<Map<String, Value>>> {
    let segments: Vec<&str> = prefix.split('.').filter(|s| !s.is_empty()).collect();

    match document {
        Value::Null => Ok(None),
        Value::Object(map) if segments.is_empty() => Ok(Some(map.clone())),
        Value::Object(map) => locate(map, &segments, prefix),
        other => Err(Error::binding(
            prefix,
            format!("expected a map at the document root, found {}", kind(other)),
        )),
    }
}

fn locate(
    map: &Map<String, Value>,
    segments: &[&str],
    prefix: &str,
) -> Result<Option<Map<String, Value>>> {
    let mut section: Option<Map<String, Value>> = None;

    // Longest dotted key first, so the most specific spelling wins.
    for take in (1..=segments.len()).rev() {
        let key = segments[..take].join(".");
        let Some(child) = map.get(&key) else {
            continue;
        };

        let rest = &segments[take..];
        let found = match child {
            Value::Object(inner) if rest.is_empty() => Some(inner.clone()),
            Value::Object(inner) => locate(inner, rest, prefix)?,
            Value::Null => None,
            other if rest.is_empty() => {
                return Err(Error::binding(
                    prefix,
                    format!("expected a map, found {}", kind(other)),
                ));
            }
            _ => None,
        };

        if let Some(found) = found {
            let section = section.get_or_insert_with(Map::new);
            for (field, value) in found {
                section.entry(field).or_insert(value);
            }
        }
    }

    let dotted = format!("{}.", segments.join("."));
    for (key, value) in map {
        if let Some(field) = key.strip_prefix(&dotted) {
            section
                .get_or_insert_with(Map::new)
                .entry(field.to_string())
                .or_insert_with(|| value.clone());
        }
    }

    Ok(section)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a map",
    }
}
