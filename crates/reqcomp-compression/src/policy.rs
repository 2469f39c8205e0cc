//! Request compression decisions
//!
//! Answers whether a request would be compressed under a set of
//! [`EncodingSettings`] and which `Content-Encoding` values it receives.
//! Nothing here touches the body.

use crate::settings::EncodingSettings;
use http::header::{CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue};
use reqcomp_core::ContentEncoding;
use std::sync::Arc;
use tracing::{debug, warn};

/// Compression decision helper over shared settings
#[derive(Debug, Clone)]
pub struct RequestCompressionPolicy {
    settings: Arc<EncodingSettings>,
}

impl RequestCompressionPolicy {
    /// Create a new policy
    pub fn new(settings: EncodingSettings) -> Self {
        Self::from_shared(Arc::new(settings))
    }

    /// Create a policy over settings already shared elsewhere
    pub fn from_shared(settings: Arc<EncodingSettings>) -> Self {
        Self { settings }
    }

    /// The settings this policy reads
    pub fn settings(&self) -> &EncodingSettings {
        &self.settings
    }

    /// Check whether a Content-Type value names one of the accepted mime types.
    ///
    /// Parameters such as `; charset=utf-8` are ignored, as is ASCII case.
    pub fn matches_mime_type(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or("").trim();
        if media_type.is_empty() {
            return false;
        }

        self.settings
            .mime_types()
            .iter()
            .any(|accepted| accepted.trim().eq_ignore_ascii_case(media_type))
    }

    /// Check whether a body of `size` bytes reaches the minimum request size
    pub fn meets_size_threshold(&self, size: u64) -> bool {
        // A negative threshold admits everything.
        match u64::try_from(self.settings.min_request_size()) {
            Ok(min) => size >= min,
            Err(_) => true,
        }
    }

    /// Check if a request with these headers should be compressed
    pub fn should_compress(&self, headers: &HeaderMap) -> bool {
        if headers.contains_key(CONTENT_ENCODING) {
            debug!("Request already has a Content-Encoding, skipping compression");
            return false;
        }

        let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            debug!("Request has no readable Content-Type, skipping compression");
            return false;
        };

        if !self.matches_mime_type(content_type) {
            debug!(content_type, "Content-Type not accepted for compression");
            return false;
        }

        let Some(size) = headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
        else {
            debug!("Request has no valid Content-Length, skipping compression");
            return false;
        };

        if !self.meets_size_threshold(size) {
            debug!(
                size,
                min_request_size = self.settings.min_request_size(),
                "Request below minimum size, skipping compression"
            );
            return false;
        }

        true
    }

    /// Header values for the configured content encodings, in order
    pub fn content_encoding_values(&self) -> Vec<HeaderValue> {
        self.settings
            .content_encoding_types()
            .iter()
            .filter_map(|encoding| match HeaderValue::from_str(encoding.trim()) {
                Ok(value) if !value.is_empty() => {
                    if ContentEncoding::from_name(encoding).is_none() {
                        debug!(
                            encoding = %encoding,
                            "Passing through unrecognized content encoding"
                        );
                    }
                    Some(value)
                }
                Ok(_) => None,
                Err(e) => {
                    warn!(encoding = %encoding, error = %e, "Ignoring invalid content encoding");
                    None
                }
            })
            .collect()
    }

    /// Configured encodings that are not a registered token.
    ///
    /// They are still sent; whether the peer understands them is up to the client.
    pub fn unrecognized_encodings(&self) -> Vec<&str> {
        self.settings
            .content_encoding_types()
            .iter()
            .map(|encoding| encoding.trim())
            .filter(|encoding| {
                !encoding.is_empty() && ContentEncoding::from_name(encoding).is_none()
            })
            .collect()
    }

    /// Add the configured Content-Encoding headers when the request qualifies.
    ///
    /// Returns `true` if headers were added. The map is untouched otherwise.
    pub fn apply(&self, headers: &mut HeaderMap) -> bool {
        if !self.should_compress(headers) {
            return false;
        }

        let values = self.content_encoding_values();
        if values.is_empty() {
            debug!("No usable content encodings configured");
            return false;
        }

        for value in values {
            headers.append(CONTENT_ENCODING, value);
        }

        true
    }
}

impl From<EncodingSettings> for RequestCompressionPolicy {
    fn from(settings: EncodingSettings) -> Self {
        Self::new(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(content_type: &str, content_length: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers.insert(CONTENT_LENGTH, HeaderValue::from_str(content_length).unwrap());
        headers
    }

    #[test]
    fn test_matches_mime_type() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());

        assert!(policy.matches_mime_type("application/json"));
        assert!(policy.matches_mime_type("Application/JSON; charset=utf-8"));
        assert!(policy.matches_mime_type(" text/xml "));
        assert!(!policy.matches_mime_type("text/plain"));
        assert!(!policy.matches_mime_type(""));
        assert!(!policy.matches_mime_type("; charset=utf-8"));
    }

    #[test]
    fn test_empty_mime_types_match_nothing() {
        let settings = EncodingSettings::builder()
            .mime_types(Vec::<String>::new())
            .build();
        let policy = RequestCompressionPolicy::new(settings);
        assert!(!policy.matches_mime_type("application/json"));
    }

    #[test]
    fn test_size_threshold_is_inclusive() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        assert!(!policy.meets_size_threshold(2047));
        assert!(policy.meets_size_threshold(2048));
        assert!(policy.meets_size_threshold(1 << 20));
    }

    #[test]
    fn test_negative_threshold_admits_everything() {
        let settings = EncodingSettings::builder().min_request_size(-1).build();
        let policy = RequestCompressionPolicy::new(settings);
        assert!(policy.meets_size_threshold(0));
    }

    #[test]
    fn test_should_compress() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());

        assert!(policy.should_compress(&headers("application/json", "4096")));
        assert!(!policy.should_compress(&headers("application/json", "10")));
        assert!(!policy.should_compress(&headers("image/png", "4096")));
        assert!(!policy.should_compress(&headers("application/json", "lots")));
    }

    #[test]
    fn test_should_not_compress_without_headers() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        assert!(!policy.should_compress(&HeaderMap::new()));

        let mut no_length = HeaderMap::new();
        no_length.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert!(!policy.should_compress(&no_length));
    }

    #[test]
    fn test_already_encoded_request() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        let mut headers = headers("application/json", "4096");
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("br"));

        assert!(!policy.should_compress(&headers));
        assert!(!policy.apply(&mut headers));
        assert_eq!(headers.get_all(CONTENT_ENCODING).iter().count(), 1);
    }

    #[test]
    fn test_apply_adds_encodings_in_order() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        let mut headers = headers("application/xml", "2048");

        assert!(policy.apply(&mut headers));

        let encodings: Vec<_> = headers
            .get_all(CONTENT_ENCODING)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(encodings, ["gzip", "deflate"]);
    }

    #[test]
    fn test_apply_skips_small_requests() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        let mut headers = headers("application/json", "100");
        let before = headers.clone();

        assert!(!policy.apply(&mut headers));
        assert_eq!(headers, before);
    }

    #[test]
    fn test_invalid_encodings_are_skipped() {
        let settings = EncodingSettings::builder()
            .content_encoding_types(["gzip", "bad\nvalue", " "])
            .build();
        let policy = RequestCompressionPolicy::new(settings);

        let values = policy.content_encoding_values();
        assert_eq!(values, [HeaderValue::from_static("gzip")]);
    }

    #[test]
    fn test_unrecognized_encodings() {
        let policy = RequestCompressionPolicy::new(EncodingSettings::default());
        assert!(policy.unrecognized_encodings().is_empty());

        let settings = EncodingSettings::builder()
            .content_encoding_types(["GZIP", " snappy ", "br", "", "lz4"])
            .build();
        let policy = RequestCompressionPolicy::new(settings);
        assert_eq!(policy.unrecognized_encodings(), ["snappy", "lz4"]);

        // Unrecognized names are still sent as configured.
        let values = policy.content_encoding_values();
        assert_eq!(values.len(), 4);
        assert_eq!(values[1], HeaderValue::from_static("snappy"));
    }

    #[test]
    fn test_apply_without_usable_encodings() {
        let settings = EncodingSettings::builder()
            .content_encoding_types(Vec::<String>::new())
            .build();
        let policy = RequestCompressionPolicy::from(settings);
        let mut headers = headers("application/json", "4096");

        assert!(!policy.apply(&mut headers));
        assert!(!headers.contains_key(CONTENT_ENCODING));
    }
}
