//! # Big-Endian Base-128 Variable-Length Integers
//!
//! Every run of a table is stored as a single unsigned integer field written
//! in 7-bit groups, most significant group first. Small fields (short runs
//! of low value indices) take a single byte, which keeps the long tail of
//! one- and two-code-point runs in a property table cheap.
//!
//! ## Encoding Format
//!
//! Each byte uses:
//! - Lower 7 bits for value data
//! - High bit (0x80) as continuation flag, set on every byte but the last
//!
//! For example, decimal 300 encodes as: [0x82, 0x2C]
//! - 0x82 = 10000010: High bit set (more bytes follow) + bits 7-13 of value
//! - 0x2C = 00101100: High bit clear (final byte) + bits 0-6 of value
//!
//! Decoding accepts redundant leading `0x80` groups; the encoder never
//! produces them.

use std::io::Cursor;

/// Maximum number of bytes required to encode a u64.
/// 9 bytes cover 63 bits and the 10th byte provides the final bit.
pub const MAX_BYTES: usize = 10;

/// Number of value bits stored in each byte.
const BITS_PER_BYTE: u32 = 7;

/// Bit mask to extract the lower 7 bits (value data) from a byte.
const LOWER_BITS_MASK: u8 = 0x7F;

/// Flag bit indicating that more bytes of the same field follow.
pub const CONTINUATION_FLAG: u8 = 0x80;

/// Largest accumulator that can still absorb another 7-bit group without
/// overflowing a u64.
const MAX_BEFORE_SHIFT: u64 = u64::MAX >> BITS_PER_BYTE;

/// Errors that can occur during varint operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The sequence ended on a byte with the continuation bit set.
    #[error("incomplete varint sequence")]
    IncompleteSequence,

    /// Attempted to decode from an empty input.
    #[error("empty input")]
    EmptyInput,

    /// Value exceeds 64 bits (u64 maximum).
    #[error("attempted to decode a value exceeding {} bits", u64::BITS)]
    ValueOutOfBounds,

    /// Attempted to access an index outside the bounds of the input.
    #[error("attempted to access an index outside the bounds of the input")]
    IndexOutOfBounds,
}

/// Utility for big-endian base-128 encoding/decoding operations.
#[derive(Debug, Clone)]
pub struct Varint;

impl Varint {
    /// Encodes a u64, most significant group first, appending to the
    /// provided buffer.
    pub fn encode_into(value: u64, bytes: &mut Vec<u8>) {
        let size = Self::calculate_size(value);

        for group in (0..size).rev() {
            // `group` is at most 9, so the shift stays below 64 bits.
            let shift = group as u32 * BITS_PER_BYTE;
            let mut byte = ((value >> shift) as u8) & LOWER_BITS_MASK;

            if group != 0 {
                byte |= CONTINUATION_FLAG;
            }

            bytes.push(byte);
        }
    }

    /// Decodes a single field from the start of `bytes`.
    ///
    /// ## Returns
    /// * `Ok((value, bytes_read))` - The decoded value and consumed bytes
    /// * `Err(Error)` - If the input is empty, truncated or too wide
    pub fn try_decode(bytes: &[u8]) -> Result<(u64, usize), Error> {
        if bytes.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut result: u64 = 0;

        for (position, &byte) in bytes.iter().enumerate() {
            if result > MAX_BEFORE_SHIFT {
                return Err(Error::ValueOutOfBounds);
            }

            result = (result << BITS_PER_BYTE) | (byte & LOWER_BITS_MASK) as u64;

            // No continuation bit - the field is closed.
            if byte & CONTINUATION_FLAG == 0 {
                return Ok((result, position + 1));
            }
        }

        Err(Error::IncompleteSequence)
    }

    /// Calculates the size in bytes that a value occupies once encoded,
    /// without performing the encoding.
    pub fn calculate_size(value: u64) -> usize {
        let significant_bits = u64::BITS - value.leading_zeros();
        (significant_bits.div_ceil(BITS_PER_BYTE) as usize).max(1)
    }
}

/// Trait for reading varint-encoded fields from a data source.
pub trait ReadVarint {
    /// Reads one field from the source, advancing past it on success.
    fn read_varint(&mut self) -> Result<u64, Error>;
}

impl ReadVarint for Cursor<&[u8]> {
    fn read_varint(&mut self) -> Result<u64, Error> {
        // Safely convert u64 position to usize, preventing truncation on 32-bit platforms
        let start_pos: usize = self
            .position()
            .try_into()
            .map_err(|_| Error::IndexOutOfBounds)?;

        let buffer = self.get_ref();

        if start_pos >= buffer.len() {
            return Err(Error::IndexOutOfBounds);
        }

        let (value, bytes_read) = Varint::try_decode(&buffer[start_pos..])?;

        self.set_position((start_pos + bytes_read) as u64);

        Ok(value)
    }
}
