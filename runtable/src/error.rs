//! Top-level error type for the runtable library
//!

use crate::codec::DecodeError;
use crate::codec::EncodeError;
use crate::config::ConfigError;
use crate::run::RunError;
use crate::table::LookupError;

/// Errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The configuration was invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A run could not be built.
    #[error(transparent)]
    Run(#[from] RunError),
    /// The runs could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The stream could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// A lookup failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}
