//! Request compression settings for HTTP clients
//!
//! Provides:
//! - [`EncodingSettings`]: accepted mime types, minimum request size and
//!   content encodings, with defaults
//! - [`EncodingSettingsPatch`]: the partial form produced by configuration sources
//! - [`RequestCompressionPolicy`]: decides from request headers whether the
//!   settings call for compression
//!
//! Compressing bytes and sending requests belong to the HTTP client.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod policy;
pub mod settings;

pub use policy::RequestCompressionPolicy;
pub use settings::{EncodingSettings, EncodingSettingsBuilder, EncodingSettingsPatch};
