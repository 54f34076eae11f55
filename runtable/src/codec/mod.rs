//! Serialization of runs into the field stream and back.
//!
//! ## Format
//!
//! Each run becomes one field:
//!
//! ```text
//! combined = ((length - 1) << value_bits) | value_index
//! ```
//!
//! written as a big-endian base-128 integer (see [`crate::varint`]). Fields
//! are concatenated with no length prefix or terminator; the stream ends
//! where the bytes end.

use crate::config::ConfigError;
use crate::config::CodecConfig;

mod decoder;
mod encoder;

pub use encoder::pack_field;

/// Types that can be encoded into a field stream.
pub trait Encodable {
    /// Encodes the implementing type under `config`.
    fn encode(&self, config: &CodecConfig) -> Result<Vec<u8>, EncodeError>;

    /// Returns the exact number of bytes [`Encodable::encode`] produces,
    /// without encoding.
    fn encoded_len(&self, config: &CodecConfig) -> Result<usize, EncodeError>;
}

/// Types that can be decoded from a field stream.
pub trait Decodable: Sized {
    /// Decodes an instance from `bytes` under `config`.
    fn decode(bytes: &[u8], config: &CodecConfig) -> Result<Self, DecodeError>;
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The run is longer than one field can describe. The encoder recovers
    /// from this by splitting the run; only [`pack_field`] returns it.
    #[error("run of {length} keys exceeds the field limit of {max}")]
    EncodingOverflow {
        /// Length of the offending run
        length: u64,
        /// Longest run a field can hold
        max: u64,
    },

    /// The value index does not fit in `value_bits`.
    #[error("value index {index} exceeds the maximum of {max}")]
    ValueIndexOutOfRange {
        /// The offending value index
        index: u32,
        /// Largest index that fits
        max: u32,
    },

    /// The runs do not cover exactly the configured domain.
    #[error("runs cover {actual} keys but the domain has {expected}")]
    CoverageMismatch {
        /// Number of keys in the domain
        expected: u64,
        /// Number of keys covered by the runs
        actual: u128,
    },

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Errors that can occur during decoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The stream ended inside a field (the last byte has the continuation
    /// flag set).
    #[error("malformed encoding: field starting at byte {offset} is not terminated")]
    MalformedEncoding {
        /// Byte offset of the unterminated field
        offset: usize,
    },

    /// A field is wider than `field_bits`.
    #[error("field starting at byte {offset} exceeds {field_bits} bits")]
    FieldOverflow {
        /// Byte offset of the field
        offset: usize,
        /// Configured field width
        field_bits: u8,
    },

    /// The decoded runs do not cover exactly the configured domain.
    #[error("stream covers {actual} keys but the domain has {expected}")]
    CoverageMismatch {
        /// Number of keys in the domain
        expected: u64,
        /// Number of keys covered by the stream
        actual: u128,
    },

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The embedded text is not valid base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
