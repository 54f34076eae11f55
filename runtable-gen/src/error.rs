//! Top-level error type for the generator

use crate::config::GenConfigError;
use crate::ucd::UcdError;

/// Errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings could not be loaded.
    #[error("could not load settings: {0}")]
    Config(#[from] config::ConfigError),

    /// The settings do not fit the input.
    #[error(transparent)]
    GenConfig(#[from] GenConfigError),

    /// The artifact could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The range file is invalid.
    #[error("invalid range file: {0}")]
    Ucd(#[from] UcdError),

    /// The table could not be encoded.
    #[error(transparent)]
    Encode(#[from] runtable::EncodeError),

    /// The artifact's payload could not be decoded.
    #[error(transparent)]
    Decode(#[from] runtable::DecodeError),

    /// A lookup failed.
    #[error(transparent)]
    Lookup(#[from] runtable::LookupError),

    /// A command line argument is not a code point.
    #[error("invalid code point `{0}`: expected U+XXXX, 0xXXXX or a decimal number")]
    InvalidCodePoint(String),
}
