//! Well-known HTTP content-encoding names

/// `gzip` content encoding
pub const GZIP_ENCODING: &str = "gzip";

/// `deflate` content encoding
pub const DEFLATE_ENCODING: &str = "deflate";

/// `br` (brotli) content encoding
pub const BROTLI_ENCODING: &str = "br";

/// `zstd` content encoding
pub const ZSTD_ENCODING: &str = "zstd";

/// `identity` content encoding (no transformation)
pub const IDENTITY_ENCODING: &str = "identity";

/// Content encodings with a registered token
///
/// Settings carry encodings as free-form strings since the set a client
/// understands varies; this enum only recognizes the common ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentEncoding {
    /// gzip
    Gzip,
    /// deflate
    Deflate,
    /// brotli
    Brotli,
    /// zstd
    Zstd,
    /// identity
    Identity,
}

impl ContentEncoding {
    /// Parse a Content-Encoding token, ignoring case and surrounding whitespace
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            GZIP_ENCODING | "x-gzip" => Some(Self::Gzip),
            DEFLATE_ENCODING => Some(Self::Deflate),
            BROTLI_ENCODING => Some(Self::Brotli),
            ZSTD_ENCODING => Some(Self::Zstd),
            IDENTITY_ENCODING => Some(Self::Identity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(ContentEncoding::from_name("gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_name(" GZIP "), Some(ContentEncoding::Gzip));
        assert_eq!(ContentEncoding::from_name("x-gzip"), Some(ContentEncoding::Gzip));
        assert_eq!(
            ContentEncoding::from_name("Deflate"),
            Some(ContentEncoding::Deflate)
        );
        assert_eq!(ContentEncoding::from_name("br"), Some(ContentEncoding::Brotli));
        assert_eq!(ContentEncoding::from_name("zstd"), Some(ContentEncoding::Zstd));
        assert_eq!(
            ContentEncoding::from_name("identity"),
            Some(ContentEncoding::Identity)
        );
        assert_eq!(ContentEncoding::from_name("compress"), None);
    }
}
