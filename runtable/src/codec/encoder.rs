//! Run serialization with transparent splitting of over-long runs.

use crate::config::CodecConfig;
use crate::varint::Varint;
use crate::Run;
use crate::Runs;

use super::EncodeError;
use super::Encodable;

/// Packs a run into its combined field value.
///
/// ## Errors
/// * `EncodingOverflow` - `length - 1` does not fit in the length bits
/// * `ValueIndexOutOfRange` - the index does not fit in `value_bits`
pub fn pack_field(run: &Run, config: &CodecConfig) -> Result<u64, EncodeError> {
    if run.value_index() > config.max_value_index() {
        return Err(EncodeError::ValueIndexOutOfRange {
            index: run.value_index(),
            max: config.max_value_index(),
        });
    }

    if run.length() > config.max_run_length() {
        return Err(EncodeError::EncodingOverflow {
            length: run.length(),
            max: config.max_run_length(),
        });
    }

    // `length - 1 < 2^length_bits`, so the shifted value stays within
    // `field_bits` and cannot overflow.
    Ok(((run.length() - 1) << config.value_bits()) | run.value_index() as u64)
}

/// Feeds every field of `runs` to `sink`, splitting runs that overflow a
/// field into consecutive runs with the same value index.
fn for_each_field<F>(runs: &Runs, config: &CodecConfig, mut sink: F) -> Result<(), EncodeError>
where
    F: FnMut(u64),
{
    let actual = runs.coverage();
    if actual != config.domain_len() as u128 {
        return Err(EncodeError::CoverageMismatch { expected: config.domain_len(), actual });
    }

    let mut start = 0u64;

    for run in runs {
        match pack_field(run, config) {
            Ok(field) => sink(field),
            Err(EncodeError::EncodingOverflow { length, max }) => {
                tracing::warn!(start, length, max, "splitting run that overflows a field");
                for chunk in run.chunks(max) {
                    sink(pack_field(&chunk, config)?);
                }
            }
            Err(error) => return Err(error),
        }

        start = start.saturating_add(run.length());
    }

    Ok(())
}

impl Encodable for Runs {
    /// Encodes the runs as a concatenation of fields.
    ///
    /// ## Errors
    /// * `CoverageMismatch` - the runs do not cover `[0, domain_max]`
    /// * `ValueIndexOutOfRange` - an index does not fit in `value_bits`
    fn encode(&self, config: &CodecConfig) -> Result<Vec<u8>, EncodeError> {
        let mut result = Vec::with_capacity(self.len() * 2);
        let mut start = 0u64;

        for_each_field(self, config, |field| {
            let length = (field >> config.value_bits()) + 1;
            tracing::debug!(
                start,
                length,
                value_index = field & config.max_value_index() as u64,
                field,
                "encoding run"
            );
            start += length;
            Varint::encode_into(field, &mut result);
        })?;

        Ok(result)
    }

    fn encoded_len(&self, config: &CodecConfig) -> Result<usize, EncodeError> {
        let mut size = 0;
        for_each_field(self, config, |field| size += Varint::calculate_size(field))?;
        Ok(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunBuilder;
    use assert_matches::assert_matches;
    use test_case::test_case;

    fn config(value_bits: u8, field_bits: u8, domain_max: u32) -> CodecConfig {
        CodecConfig::try_new(value_bits, field_bits, domain_max).unwrap()
    }

    #[test_case(1, 0 => Ok(0x00); "single key zero index")]
    #[test_case(3, 0 => Ok(0x20); "three keys")]
    #[test_case(2, 1 => Ok(0x11); "two keys index one")]
    #[test_case(1, 15 => Ok(0x0F); "largest index")]
    #[test_case(1, 16 => Err(EncodeError::ValueIndexOutOfRange { index: 16, max: 15 }); "index too wide")]
    #[test_case(16, 3 => Ok(0xF3); "longest run")]
    #[test_case(17, 3 => Err(EncodeError::EncodingOverflow { length: 17, max: 16 }); "run too long")]
    fn test_pack_field(length: u64, value_index: u32) -> Result<u64, EncodeError> {
        let run = Run::try_new(length, value_index).unwrap();
        pack_field(&run, &config(4, 8, 100))
    }

    #[test]
    fn test_three_run_scenario() -> Result<(), Box<dyn std::error::Error>> {
        let runs = RunBuilder::from_indices([0, 0, 0, 1, 1, 0])?;
        let config = config(4, 32, 5);

        let encoded = runs.encode(&config)?;
        assert_eq!(encoded, vec![0x20, 0x11, 0x00]);
        assert_eq!(runs.encoded_len(&config)?, 3);
        Ok(())
    }

    #[test]
    fn test_multi_byte_fields() -> Result<(), Box<dyn std::error::Error>> {
        // (200 - 1) << 4 | 2 = 0xC72 -> [0x80 | 0x18, 0x72]
        // (56 - 1) << 4 | 0 = 0x370 -> [0x80 | 0x06, 0x70]
        let runs = Runs::new_from([Run::try_new(200, 2)?, Run::try_new(56, 0)?]);
        let config = config(4, 32, 255);

        let encoded = runs.encode(&config)?;
        assert_eq!(encoded, vec![0x98, 0x72, 0x86, 0x70]);
        assert_eq!(runs.encoded_len(&config)?, encoded.len());
        Ok(())
    }

    #[test]
    fn test_overflowing_run_is_split() -> Result<(), Box<dyn std::error::Error>> {
        // 4 length bits: at most 16 keys per field, so 16 + 16 + 8.
        let config = config(4, 8, 39);
        let runs = Runs::new_from([Run::try_new(40, 5)?]);

        let encoded = runs.encode(&config)?;
        assert_eq!(encoded, vec![0x81, 0x75, 0x81, 0x75, 0x75]);
        assert_eq!(runs.encoded_len(&config)?, 5);
        Ok(())
    }

    #[test_case(4 => matches Err(EncodeError::CoverageMismatch { expected: 6, actual: 5 }); "short")]
    #[test_case(6 => matches Err(EncodeError::CoverageMismatch { expected: 6, actual: 7 }); "long")]
    #[test_case(5 => matches Ok(_); "exact")]
    fn test_coverage_checked(last: u64) -> Result<Vec<u8>, EncodeError> {
        let runs = Runs::new_from([Run::single(0), Run::try_new(last, 1).unwrap()]);
        runs.encode(&config(4, 32, 5))
    }

    #[test]
    fn test_index_error_is_not_recovered() {
        let runs = Runs::new_from([Run::try_new(40, 16).unwrap()]);
        assert_matches!(
            runs.encode(&config(4, 8, 39)),
            Err(EncodeError::ValueIndexOutOfRange { index: 16, max: 15 })
        );
    }
}
