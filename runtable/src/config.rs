//! Field layout and domain parameters shared by the encoder and decoder.
//!
//! A byte stream does not describe itself: the number of bits reserved for
//! the value index, the total width of a field and the largest valid key
//! travel next to the stream and must match on both sides.

use serde::Deserialize;
use serde::Serialize;

/// The largest Unicode scalar value, the default domain bound.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// Default width of a combined `(length - 1, value_index)` field. Fields fit
/// the 32-bit integer arithmetic of the decoders the tables are embedded in.
pub const DEFAULT_FIELD_BITS: u8 = 32;

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// At least one bit is required for the value index.
    #[error("value_bits must be greater than zero")]
    ZeroValueBits,

    /// Value indices are `u32`.
    #[error("value_bits ({0}) must not exceed {} bits", u32::BITS)]
    ValueBitsTooWide(u8),

    /// The value index leaves no bits for the run length.
    #[error("value_bits ({value_bits}) must be smaller than field_bits ({field_bits})")]
    NoLengthBits {
        /// Bits reserved for the value index
        value_bits: u8,
        /// Total field width
        field_bits: u8,
    },

    /// The field does not fit the 64-bit accumulator.
    #[error("field_bits ({0}) must not exceed {} bits", u64::BITS)]
    FieldTooWide(u8),
}

/// Layout of a combined field and the domain it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCodecConfig", into = "RawCodecConfig")]
pub struct CodecConfig {
    value_bits: u8,
    field_bits: u8,
    domain_max: u32,
}

impl CodecConfig {
    /// Creates a validated configuration.
    pub const fn try_new(value_bits: u8, field_bits: u8, domain_max: u32) -> Result<Self, ConfigError> {
        if value_bits == 0 {
            return Err(ConfigError::ZeroValueBits);
        }
        if value_bits as u32 > u32::BITS {
            return Err(ConfigError::ValueBitsTooWide(value_bits));
        }
        if field_bits as u32 > u64::BITS {
            return Err(ConfigError::FieldTooWide(field_bits));
        }
        if value_bits >= field_bits {
            return Err(ConfigError::NoLengthBits { value_bits, field_bits });
        }

        Ok(Self { value_bits, field_bits, domain_max })
    }

    /// Creates a code point configuration with the default field width and
    /// just enough value bits for `value_count` distinct values.
    pub fn for_value_count(value_count: usize) -> Result<Self, ConfigError> {
        Self::try_new(value_bits_for(value_count), DEFAULT_FIELD_BITS, MAX_CODE_POINT)
    }

    /// Bits reserved for the value index.
    pub const fn value_bits(&self) -> u8 {
        self.value_bits
    }

    /// Total width of a combined field.
    pub const fn field_bits(&self) -> u8 {
        self.field_bits
    }

    /// Bits left for `length - 1`.
    pub const fn length_bits(&self) -> u8 {
        self.field_bits - self.value_bits
    }

    /// Largest valid key.
    pub const fn domain_max(&self) -> u32 {
        self.domain_max
    }

    /// Number of keys in the domain, `domain_max + 1`.
    pub const fn domain_len(&self) -> u64 {
        self.domain_max as u64 + 1
    }

    /// Largest value index a field can hold.
    pub const fn max_value_index(&self) -> u32 {
        // 1 <= value_bits <= 32, so the shift is in range.
        u32::MAX >> (u32::BITS - self.value_bits as u32)
    }

    /// Longest run a single field can hold.
    pub const fn max_run_length(&self) -> u64 {
        // length_bits <= 63 since value_bits >= 1.
        1u64 << self.length_bits()
    }

    /// Largest combined field value.
    pub const fn max_field(&self) -> u64 {
        u64::MAX >> (u64::BITS - self.field_bits as u32)
    }

    /// Returns a copy covering `[0, domain_max]` instead.
    pub const fn with_domain_max(self, domain_max: u32) -> Self {
        Self { domain_max, ..self }
    }
}

/// Number of bits needed to represent `value_count`, the way the generated
/// tables size their value index (never less than one bit).
pub fn value_bits_for(value_count: usize) -> u8 {
    let bits = usize::BITS - value_count.leading_zeros();
    bits.max(1) as u8
}

/// Unvalidated serde form of [`CodecConfig`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCodecConfig {
    value_bits: u8,
    #[serde(default = "default_field_bits")]
    field_bits: u8,
    #[serde(default = "default_domain_max")]
    domain_max: u32,
}

fn default_field_bits() -> u8 {
    DEFAULT_FIELD_BITS
}

fn default_domain_max() -> u32 {
    MAX_CODE_POINT
}

impl TryFrom<RawCodecConfig> for CodecConfig {
    type Error = ConfigError;

    fn try_from(raw: RawCodecConfig) -> Result<Self, Self::Error> {
        Self::try_new(raw.value_bits, raw.field_bits, raw.domain_max)
    }
}

impl From<CodecConfig> for RawCodecConfig {
    fn from(config: CodecConfig) -> Self {
        Self {
            value_bits: config.value_bits,
            field_bits: config.field_bits,
            domain_max: config.domain_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 32 => Err(ConfigError::ZeroValueBits); "zero value bits")]
    #[test_case(32, 32 => Err(ConfigError::NoLengthBits { value_bits: 32, field_bits: 32 }); "no length bits")]
    #[test_case(8, 65 => Err(ConfigError::FieldTooWide(65)); "wider than u64")]
    #[test_case(33, 64 => Err(ConfigError::ValueBitsTooWide(33)); "index wider than u32")]
    #[test_case(4, 32 => Ok((4, 28)); "default width")]
    #[test_case(1, 64 => Ok((1, 63)); "widest field")]
    fn test_validation(value_bits: u8, field_bits: u8) -> Result<(u8, u8), ConfigError> {
        let config = CodecConfig::try_new(value_bits, field_bits, MAX_CODE_POINT)?;
        Ok((config.value_bits(), config.length_bits()))
    }

    #[test_case(0 => 1; "no values")]
    #[test_case(1 => 1; "one value")]
    #[test_case(2 => 2; "two values")]
    #[test_case(3 => 2; "three values")]
    #[test_case(4 => 3; "four values")]
    #[test_case(43 => 6; "line break classes")]
    fn test_value_bits_for(count: usize) -> u8 {
        value_bits_for(count)
    }

    #[test]
    fn test_derived_limits() {
        let config = CodecConfig::try_new(4, 8, 5).unwrap();
        assert_eq!(config.max_value_index(), 15);
        assert_eq!(config.max_run_length(), 16);
        assert_eq!(config.max_field(), 0xFF);
        assert_eq!(config.domain_len(), 6);

        let wide = CodecConfig::try_new(1, 64, u32::MAX).unwrap();
        assert_eq!(wide.max_run_length(), 1 << 63);
        assert_eq!(wide.max_field(), u64::MAX);
        assert_eq!(wide.domain_len(), 1 << 32);
    }

    #[test]
    fn test_serde_validates() {
        let config: CodecConfig = serde_json::from_str(r#"{"value_bits": 6}"#).unwrap();
        assert_eq!(config, CodecConfig::for_value_count(43).unwrap());

        serde_json::from_str::<CodecConfig>(r#"{"value_bits": 0}"#)
            .expect_err("zero value bits should be rejected");
    }
}
