//! Equality and hashing properties of EncodingSettings

use proptest::prelude::*;
use reqcomp_compression::EncodingSettings;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

fn hash_of(settings: &EncodingSettings) -> u64 {
    let mut hasher = DefaultHasher::new();
    settings.hash(&mut hasher);
    hasher.finish()
}

fn arb_list() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[a-z]{1,6}(/[a-z+]{1,8})?", 0..4)
}

fn arb_settings() -> impl Strategy<Value = EncodingSettings> {
    (arb_list(), any::<i32>(), arb_list()).prop_map(|(mime_types, size, encodings)| {
        EncodingSettings::builder()
            .mime_types(mime_types)
            .min_request_size(size)
            .content_encoding_types(encodings)
            .build()
    })
}

proptest! {
    #[test]
    fn equal_settings_hash_equally(a in arb_settings()) {
        let b = a.clone();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn equality_is_symmetric(a in arb_settings(), b in arb_settings()) {
        prop_assert_eq!(a == b, b == a);
        if a == b {
            prop_assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn setters_read_back_exactly(list in arb_list(), size in any::<i32>()) {
        let mut settings = EncodingSettings::new();
        settings.set_mime_types(list.clone());
        settings.set_min_request_size(size);
        settings.set_content_encoding_types(list.iter().rev().cloned());

        let reversed: Vec<String> = list.iter().rev().cloned().collect();
        prop_assert_eq!(settings.mime_types(), list.as_slice());
        prop_assert_eq!(settings.min_request_size(), size);
        prop_assert_eq!(settings.content_encoding_types(), reversed.as_slice());
    }

    #[test]
    fn encodings_never_change_the_hash(a in arb_settings(), encodings in arb_list()) {
        let mut b = a.clone();
        b.set_content_encoding_types(encodings.clone());

        prop_assert_eq!(hash_of(&a), hash_of(&b));
        prop_assert_eq!(a == b, a.content_encoding_types() == encodings.as_slice());
    }
}

#[test]
fn settings_work_as_set_keys() {
    let mut set = HashSet::new();
    set.insert(EncodingSettings::default());
    set.insert(EncodingSettings::default());

    let mut other = EncodingSettings::default();
    other.set_content_encoding_types(["br"]);
    set.insert(other);

    assert_eq!(set.len(), 2);
}
