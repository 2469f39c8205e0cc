//! Request compression settings

use reqcomp_core::encoding::{DEFLATE_ENCODING, GZIP_ENCODING};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Settings deciding which outgoing requests an HTTP client compresses.
///
/// Holds the accepted MIME types, the minimum request size and the content
/// encodings to advertise. No value is validated: empty lists and negative
/// sizes are stored as given.
///
/// The type has no interior mutability. Build it once at startup and share it
/// by reference or `Arc`; callers that mutate it through the setters are
/// responsible for their own synchronization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingSettings {
    /// The list of supported mime types
    #[serde(
        default = "default_mime_types",
        alias = "mime-types",
        alias = "mime_types",
        deserialize_with = "de::string_or_seq"
    )]
    mime_types: Vec<String>,

    /// The minimum threshold content size (in bytes)
    #[serde(
        default = "default_min_request_size",
        alias = "min-request-size",
        alias = "min_request_size",
        deserialize_with = "de::int_or_string"
    )]
    min_request_size: i32,

    /// The list of content encodings (applicable encodings depend on the client)
    #[serde(
        default = "default_content_encoding_types",
        alias = "content-encoding-types",
        alias = "content_encoding_types",
        deserialize_with = "de::string_or_seq"
    )]
    content_encoding_types: Vec<String>,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            mime_types: default_mime_types(),
            min_request_size: default_min_request_size(),
            content_encoding_types: default_content_encoding_types(),
        }
    }
}

fn default_mime_types() -> Vec<String> {
    vec![
        "text/xml".to_string(),
        "application/xml".to_string(),
        "application/json".to_string(),
    ]
}

fn default_min_request_size() -> i32 {
    2048
}

fn default_content_encoding_types() -> Vec<String> {
    vec![GZIP_ENCODING.to_string(), DEFLATE_ENCODING.to_string()]
}

impl EncodingSettings {
    /// Create settings with the default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder from the default values
    pub fn builder() -> EncodingSettingsBuilder {
        EncodingSettingsBuilder::new()
    }

    /// The accepted mime types, in configured order
    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// Replace the accepted mime types
    pub fn set_mime_types<I, S>(&mut self, mime_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
    }

    /// The minimum request size in bytes
    pub fn min_request_size(&self) -> i32 {
        self.min_request_size
    }

    /// Replace the minimum request size
    pub fn set_min_request_size(&mut self, min_request_size: i32) {
        self.min_request_size = min_request_size;
    }

    /// The content encodings, in configured order
    pub fn content_encoding_types(&self) -> &[String] {
        &self.content_encoding_types
    }

    /// Replace the content encodings
    pub fn set_content_encoding_types<I, S>(&mut self, content_encoding_types: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.content_encoding_types = content_encoding_types.into_iter().map(Into::into).collect();
    }

    /// Overwrite the fields supplied by `patch`, leaving the rest untouched
    pub fn apply(&mut self, patch: EncodingSettingsPatch) {
        if let Some(mime_types) = patch.mime_types {
            self.mime_types = mime_types;
        }
        if let Some(min_request_size) = patch.min_request_size {
            self.min_request_size = min_request_size;
        }
        if let Some(content_encoding_types) = patch.content_encoding_types {
            self.content_encoding_types = content_encoding_types;
        }
    }
}

// Content encodings are compared by `Eq` but left out of the hash.
impl Hash for EncodingSettings {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.mime_types.hash(state);
        self.min_request_size.hash(state);
    }
}

impl fmt::Display for EncodingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EncodingSettings{{mimeTypes=[{}], minRequestSize={}, contentEncodingTypes=[{}]}}",
            self.mime_types.join(", "),
            self.min_request_size,
            self.content_encoding_types.join(", ")
        )
    }
}

/// Builder for constructing settings in one step
#[derive(Debug, Default)]
pub struct EncodingSettingsBuilder {
    settings: EncodingSettings,
}

impl EncodingSettingsBuilder {
    /// Create a builder holding the default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the accepted mime types
    pub fn mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.set_mime_types(mime_types);
        self
    }

    /// Append one accepted mime type
    pub fn add_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.settings.mime_types.push(mime_type.into());
        self
    }

    /// Set the minimum request size
    pub fn min_request_size(mut self, min_request_size: i32) -> Self {
        self.settings.min_request_size = min_request_size;
        self
    }

    /// Set the content encodings
    pub fn content_encoding_types<I, S>(mut self, content_encoding_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.settings.set_content_encoding_types(content_encoding_types);
        self
    }

    /// Apply a partial set of overrides
    pub fn patch(mut self, patch: EncodingSettingsPatch) -> Self {
        self.settings.apply(patch);
        self
    }

    /// Build the settings
    pub fn build(self) -> EncodingSettings {
        self.settings
    }
}

/// Partial settings produced by a single configuration source.
///
/// `None` means the source did not mention the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingSettingsPatch {
    /// Accepted mime types
    #[serde(
        default,
        alias = "mime-types",
        alias = "mime_types",
        deserialize_with = "de::opt_string_or_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub mime_types: Option<Vec<String>>,

    /// Minimum request size
    #[serde(
        default,
        alias = "min-request-size",
        alias = "min_request_size",
        deserialize_with = "de::opt_int_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_request_size: Option<i32>,

    /// Content encodings
    #[serde(
        default,
        alias = "content-encoding-types",
        alias = "content_encoding_types",
        deserialize_with = "de::opt_string_or_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_encoding_types: Option<Vec<String>>,
}

impl EncodingSettingsPatch {
    /// Whether the patch supplies no field at all
    pub fn is_empty(&self) -> bool {
        self.mime_types.is_none()
            && self.min_request_size.is_none()
            && self.content_encoding_types.is_none()
    }

    /// Layer `overlay` on top of `self`; fields present in `overlay` win
    pub fn merge(self, overlay: EncodingSettingsPatch) -> EncodingSettingsPatch {
        EncodingSettingsPatch {
            mime_types: overlay.mime_types.or(self.mime_types),
            min_request_size: overlay.min_request_size.or(self.min_request_size),
            content_encoding_types: overlay
                .content_encoding_types
                .or(self.content_encoding_types),
        }
    }
}

impl From<EncodingSettings> for EncodingSettingsPatch {
    fn from(settings: EncodingSettings) -> Self {
        Self {
            mime_types: Some(settings.mime_types),
            min_request_size: Some(settings.min_request_size),
            content_encoding_types: Some(settings.content_encoding_types),
        }
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrSeq {
        One(String),
        Many(Vec<String>),
    }

    impl From<StringOrSeq> for Vec<String> {
        fn from(value: StringOrSeq) -> Self {
            match value {
                StringOrSeq::One(s) => split_list(&s),
                StringOrSeq::Many(v) => v,
            }
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    fn to_i32<E: serde::de::Error>(value: IntOrString) -> Result<i32, E> {
        let n = match value {
            IntOrString::Int(n) => n,
            IntOrString::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid integer: {s:?}")))?,
        };
        i32::try_from(n).map_err(|_| E::custom(format!("integer out of range: {n}")))
    }

    pub(super) fn string_or_seq<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        StringOrSeq::deserialize(deserializer).map(Into::into)
    }

    pub(super) fn opt_string_or_seq<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Option::<StringOrSeq>::deserialize(deserializer).map(|v| v.map(Into::into))
    }

    pub(super) fn int_or_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<i32, D::Error> {
        to_i32(IntOrString::deserialize(deserializer)?)
    }

    pub(super) fn opt_int_or_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i32>, D::Error> {
        Option::<IntOrString>::deserialize(deserializer)?
            .map(to_i32::<D::Error>)
            .transpose()
    }
}
