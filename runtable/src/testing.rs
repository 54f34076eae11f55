//! Fixtures shared by unit and integration tests
//!

use crate::config::CodecConfig;
use crate::Run;
use crate::Runs;

/// Field stream of the assignment `[0, 0, 0, 1, 1, 0]` with four value
/// bits.
pub const SCENARIO_BYTES: [u8; 3] = [0x20, 0x11, 0x00];

/// The configuration [`SCENARIO_BYTES`] was encoded with: four value bits,
/// 32-bit fields, keys `0..=5`.
pub fn scenario_config() -> CodecConfig {
    CodecConfig::try_new(4, 32, 5).unwrap()
}

/// Builds runs from `(length, value_index)` pairs.
///
/// Panics on zero lengths.
pub fn runs_from_spans(spans: &[(u64, u32)]) -> Runs {
    spans
        .iter()
        .map(|&(length, value_index)| Run::try_new(length, value_index).unwrap())
        .collect()
}

/// Expands `(length, value_index)` pairs into one index per key.
pub fn assignment_from_spans(spans: &[(u64, u32)]) -> Vec<u32> {
    spans
        .iter()
        .flat_map(|&(length, value_index)| std::iter::repeat(value_index).take(length as usize))
        .collect()
}
