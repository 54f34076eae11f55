//! Field stream parsing.
//!
//! The decoder folds each byte's low 7 bits into an accumulator that is
//! shifted left first, so the first byte of a field carries its most
//! significant group. A byte with the high bit clear closes the field and
//! the accumulator is split into `length - 1` (high bits) and the value
//! index (low `value_bits` bits).
//!
//! ## Safety Considerations
//!
//! The stream is usually a constant compiled into the program, but the
//! decoder still treats it as untrusted:
//!
//! - A stream ending inside a field is rejected, never silently truncated
//! - Fields wider than the configured width are rejected
//! - All arithmetic is overflow-free by construction of [`CodecConfig`]

use std::io::Cursor;

use crate::config::CodecConfig;
use crate::varint;
use crate::varint::ReadVarint;
use crate::Run;
use crate::Runs;

use super::Decodable;
use super::DecodeError;

impl Decodable for Runs {
    /// Decodes a field stream into runs.
    ///
    /// Empty input decodes to an empty collection; whether that covers the
    /// domain is for the caller to decide (see [`crate::RunTable::parse`]).
    fn decode(bytes: &[u8], config: &CodecConfig) -> Result<Self, DecodeError> {
        let mut runs = Runs::default();
        let mut cursor = Cursor::new(bytes);

        while cursor.position() < bytes.len() as u64 {
            runs.push(read_run(&mut cursor, config)?);
        }

        Ok(runs)
    }
}

/// Reads a single run from the cursor.
///
/// ## Errors
/// * `MalformedEncoding` - the bytes end before the field is closed
/// * `FieldOverflow` - the field is wider than `field_bits`
pub fn read_run(cursor: &mut Cursor<&[u8]>, config: &CodecConfig) -> Result<Run, DecodeError> {
    let offset = cursor.position() as usize;
    let overflow = DecodeError::FieldOverflow { offset, field_bits: config.field_bits() };

    let field = cursor.read_varint().map_err(|error| match error {
        varint::Error::ValueOutOfBounds => overflow.clone(),
        _ => DecodeError::MalformedEncoding { offset },
    })?;

    if field > config.max_field() {
        return Err(overflow);
    }

    // field < 2^64 and value_bits >= 1, so the increment cannot overflow.
    let length = (field >> config.value_bits()) + 1;
    let value_index = (field & config.max_value_index() as u64) as u32;

    // Lengths decoded this way are never zero.
    Run::try_new(length, value_index).map_err(|_| overflow)
}
