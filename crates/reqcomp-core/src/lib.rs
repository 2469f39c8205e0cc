//! # reqcomp core
//!
//! Shared error type and content-encoding names used by the other reqcomp crates.

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod encoding;
pub mod error;

pub use encoding::{ContentEncoding, DEFLATE_ENCODING, GZIP_ENCODING};
pub use error::{Error, Result};
