//! A single stretch of consecutive keys sharing one value index.
//!
//! # Invariants
//!
//! A `Run` always covers at least one key. This is enforced by the
//! constructor so the encoder can store `length - 1` without underflow.

/// Error types that can occur when working with runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// Runs must cover at least one key.
    #[error("a run must cover at least one key")]
    ZeroLength,

    /// Extending the run would overflow its length.
    #[error("run length overflow")]
    LengthOverflow,
}

/// `length` consecutive keys that all map to `value_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    length: u64,
    value_index: u32,
}

impl Run {
    /// Creates a run of `length` keys.
    pub fn try_new(length: u64, value_index: u32) -> Result<Self, RunError> {
        if length == 0 {
            return Err(RunError::ZeroLength);
        }
        Ok(Self { length, value_index })
    }

    /// Creates a run covering exactly one key.
    pub fn single(value_index: u32) -> Self {
        Self { length: 1, value_index }
    }

    /// Number of keys covered.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Index into the values table.
    pub fn value_index(&self) -> u32 {
        self.value_index
    }

    /// Adds `count` keys to the end of the run.
    pub fn try_extend(&mut self, count: u64) -> Result<(), RunError> {
        self.length = self
            .length
            .checked_add(count)
            .ok_or(RunError::LengthOverflow)?;
        Ok(())
    }

    /// Splits the run into consecutive runs of at most `max_length` keys
    /// with the same value index. All chunks but the last are full.
    pub fn chunks(&self, max_length: u64) -> impl Iterator<Item = Run> + '_ {
        let max_length = max_length.max(1);
        let value_index = self.value_index;
        let mut remaining = self.length;

        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let length = remaining.min(max_length);
            remaining -= length;
            Some(Run { length, value_index })
        })
    }
}

/// String representation for runs: `Run(length×value_index)`.
impl std::fmt::Display for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Run({}×{})", self.length, self.value_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use test_case::test_case;

    #[test]
    fn test_zero_length_rejected() {
        assert_matches!(Run::try_new(0, 3), Err(RunError::ZeroLength));
    }

    #[test]
    fn test_extend() -> Result<(), RunError> {
        let mut run = Run::single(7);
        run.try_extend(4)?;
        assert_eq!(run.length(), 5);
        assert_eq!(run.value_index(), 7);

        let mut full = Run::try_new(u64::MAX, 0)?;
        assert_matches!(full.try_extend(1), Err(RunError::LengthOverflow));
        assert_eq!(full.length(), u64::MAX);
        Ok(())
    }

    #[test_case(10, 16 => vec![10]; "fits")]
    #[test_case(16, 16 => vec![16]; "exactly full")]
    #[test_case(17, 16 => vec![16, 1]; "one over")]
    #[test_case(40, 16 => vec![16, 16, 8]; "several chunks")]
    #[test_case(3, 1 => vec![1, 1, 1]; "single key chunks")]
    fn test_chunks(length: u64, max_length: u64) -> Vec<u64> {
        let run = Run::try_new(length, 2).unwrap();
        let chunks: Vec<Run> = run.chunks(max_length).collect();

        assert!(chunks.iter().all(|chunk| chunk.value_index() == 2));
        chunks.iter().map(Run::length).collect()
    }

    #[test]
    fn test_display() {
        let run = Run::try_new(3, 1).unwrap();
        assert_eq!(run.to_string(), "Run(3×1)");
    }
}
