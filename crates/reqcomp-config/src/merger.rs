//! Layering of configuration sources
//!
//! Sources are merged in order, later ones overriding earlier ones field by
//! field, allowing for layered configuration:
//! - base.yaml (defaults)
//! - environment.yaml (env-specific)
//! - local.yaml (developer overrides)
//! - environment variables

use reqcomp_compression::EncodingSettingsPatch;

/// Merge several patches; a field set in a later patch wins.
///
/// Lists are replaced, never concatenated. An empty input gives an empty patch.
///
/// # Example
///
/// ```
/// use reqcomp_compression::EncodingSettingsPatch;
/// use reqcomp_config::merge_patches;
///
/// let base = EncodingSettingsPatch { min_request_size: Some(1024), ..Default::default() };
/// let local = EncodingSettingsPatch { min_request_size: Some(64), ..Default::default() };
///
/// assert_eq!(merge_patches(vec![base, local]).min_request_size, Some(64));
/// ```
pub fn merge_patches<I>(patches: I) -> EncodingSettingsPatch
where
    I: IntoIterator<Item = EncodingSettingsPatch>,
{
    patches
        .into_iter()
        .fold(EncodingSettingsPatch::default(), EncodingSettingsPatch::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: i32) -> EncodingSettingsPatch {
        EncodingSettingsPatch {
            min_request_size: Some(n),
            ..Default::default()
        }
    }

    fn mime(types: &[&str]) -> EncodingSettingsPatch {
        EncodingSettingsPatch {
            mime_types: Some(types.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_multiple_patches() {
        let merged = merge_patches(vec![size(1), mime(&["text/xml"]), size(3)]);

        // Last value for each field should win
        assert_eq!(merged.min_request_size, Some(3));
        assert_eq!(merged.mime_types, Some(vec!["text/xml".to_string()]));
        assert_eq!(merged.content_encoding_types, None);
    }

    #[test]
    fn test_lists_are_replaced() {
        let merged = merge_patches(vec![mime(&["a/b", "c/d"]), mime(&["e/f"])]);
        assert_eq!(merged.mime_types, Some(vec!["e/f".to_string()]));
    }

    #[test]
    fn test_empty_patch_keeps_values() {
        let merged = merge_patches(vec![size(9), EncodingSettingsPatch::default()]);
        assert_eq!(merged.min_request_size, Some(9));
    }

    #[test]
    fn test_merge_empty_input() {
        assert!(merge_patches(Vec::new()).is_empty());
    }
}
