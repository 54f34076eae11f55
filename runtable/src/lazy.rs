//! One-time, thread-safe construction of a table from a constant stream.

use std::sync::OnceLock;

use crate::codec::DecodeError;
use crate::config::CodecConfig;
use crate::error::Error;
use crate::RunTable;

/// A run table parsed from a `'static` stream on first use.
///
/// Meant for `static` items: the stream is parsed at most once, even when
/// the first lookups race on several threads, and the outcome (table or
/// error) is kept for the lifetime of the process.
///
/// ```
/// use runtable::{CodecConfig, LazyRunTable};
///
/// const CONFIG: CodecConfig = match CodecConfig::try_new(4, 32, 5) {
///     Ok(config) => config,
///     Err(_) => panic!("invalid configuration"),
/// };
///
/// static TABLE: LazyRunTable = LazyRunTable::new(&[0x20, 0x11, 0x00], CONFIG);
///
/// assert_eq!(TABLE.value_index(3).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct LazyRunTable {
    bytes: &'static [u8],
    config: CodecConfig,
    table: OnceLock<Result<RunTable, DecodeError>>,
}

impl LazyRunTable {
    /// Creates the wrapper without parsing anything.
    pub const fn new(bytes: &'static [u8], config: CodecConfig) -> Self {
        Self { bytes, config, table: OnceLock::new() }
    }

    /// Returns the table, parsing the stream on the first call.
    pub fn get(&self) -> Result<&RunTable, DecodeError> {
        self.table
            .get_or_init(|| RunTable::parse(self.bytes, self.config))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Returns the value index of `key`.
    pub fn value_index(&self, key: u32) -> Result<u32, Error> {
        Ok(self.get()?.value_index(key)?)
    }

    /// Returns `true` once the stream has been parsed.
    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LookupError;
    use assert_matches::assert_matches;

    const CONFIG: CodecConfig = match CodecConfig::try_new(4, 32, 5) {
        Ok(config) => config,
        Err(_) => panic!("invalid configuration"),
    };

    static SCENARIO: LazyRunTable = LazyRunTable::new(&[0x20, 0x11, 0x00], CONFIG);

    #[test]
    fn test_parses_once_across_threads() {
        let lookups: Vec<u32> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..=5)
                .map(|key| scope.spawn(move || SCENARIO.value_index(key).unwrap()))
                .collect();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect()
        });

        assert_eq!(lookups, vec![0, 0, 0, 1, 1, 0]);
        assert!(SCENARIO.is_initialized());

        let first = SCENARIO.get().unwrap() as *const RunTable;
        let second = SCENARIO.get().unwrap() as *const RunTable;
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_domain() {
        assert_matches!(
            SCENARIO.value_index(6),
            Err(Error::Lookup(LookupError::OutOfDomain { key: 6, domain_max: 5 }))
        );
    }

    #[test]
    fn test_decode_error_is_cached() {
        let table = LazyRunTable::new(&[0x20, 0x91], CONFIG);
        assert!(!table.is_initialized());

        assert_eq!(table.get(), Err(DecodeError::MalformedEncoding { offset: 1 }));
        assert!(table.is_initialized());
        assert_matches!(table.value_index(0), Err(Error::Decode(_)));
    }
}
