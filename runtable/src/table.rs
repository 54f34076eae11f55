//! Point queries against a decoded table.
//!
//! A lookup walks the runs in key order, subtracting each run's length from
//! the queried key; the first run that takes the remainder below zero holds
//! the key. The cost is linear in the number of runs, which for property
//! tables is a few thousand at most against a domain of over a million keys.

use std::ops::RangeInclusive;

use crate::codec::Decodable;
use crate::codec::DecodeError;
use crate::config::CodecConfig;
use crate::values::IndexResolver;
use crate::values::ValueResolver;
use crate::Run;
use crate::Runs;

/// Errors returned by lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The key lies past the end of the table.
    #[error("key {key:#X} is outside the domain [0, {domain_max:#X}]")]
    OutOfDomain {
        /// The queried key
        key: u32,
        /// Largest valid key
        domain_max: u32,
    },

    /// The resolver has no value for the decoded index.
    #[error("no value for index {0}")]
    UnknownValueIndex(u32),
}

/// Immutable, decoded run table.
///
/// Build one with [`RunTable::parse`] (or [`RunTable::from_runs`]) when it
/// suits the caller, eagerly at startup or through a
/// [`crate::LazyRunTable`]. All queries take `&self`, so a table can be
/// shared freely between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTable {
    runs: Runs,
    config: CodecConfig,
}

impl RunTable {
    /// Parses a field stream, requiring it to cover exactly
    /// `[0, config.domain_max()]`.
    pub fn parse(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        let runs = Runs::decode(bytes, &config)?;
        let table = Self::from_runs(runs, config)?;

        tracing::debug!(
            bytes = bytes.len(),
            runs = table.runs.len(),
            domain_max = config.domain_max(),
            "parsed run table"
        );

        Ok(table)
    }

    /// Wraps already decoded runs, checking their coverage.
    pub fn from_runs(runs: Runs, config: CodecConfig) -> Result<Self, DecodeError> {
        let actual = runs.coverage();
        if actual != config.domain_len() as u128 {
            return Err(DecodeError::CoverageMismatch { expected: config.domain_len(), actual });
        }
        Ok(Self { runs, config })
    }

    /// Returns the value index of `key`.
    pub fn value_index(&self, key: u32) -> Result<u32, LookupError> {
        let out_of_domain = LookupError::OutOfDomain { key, domain_max: self.config.domain_max() };
        if key > self.config.domain_max() {
            return Err(out_of_domain);
        }

        let mut remaining = key as u64;
        for run in &self.runs {
            if remaining < run.length() {
                return Ok(run.value_index());
            }
            remaining -= run.length();
        }

        // Unreachable for tables built through `from_runs`, which checks
        // that the runs cover the whole domain.
        Err(out_of_domain)
    }

    /// Returns the run containing `key` and its key span.
    pub fn run_containing(&self, key: u32) -> Result<(RangeInclusive<u64>, u32), LookupError> {
        let domain_max = self.config.domain_max();
        if key > domain_max {
            return Err(LookupError::OutOfDomain { key, domain_max });
        }

        self.runs
            .ranges()
            .find(|(span, _)| span.contains(&(key as u64)))
            .ok_or(LookupError::OutOfDomain { key, domain_max })
    }

    /// The decoded runs.
    pub fn runs(&self) -> &Runs {
        &self.runs
    }

    /// The configuration the table was decoded with.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Returns an iterator over the runs.
    pub fn iter(&self) -> impl Iterator<Item = &Run> {
        self.runs.iter()
    }
}

/// A decoded table paired with a resolver for its value indices.
///
/// `RunLengthCodec<IndexResolver>` answers with value indices;
/// `RunLengthCodec<ValueTable<V>>` (or any other [`ValueResolver`]) answers
/// with the values themselves.
#[derive(Debug, Clone)]
pub struct RunLengthCodec<R = IndexResolver> {
    table: RunTable,
    resolver: R,
}

impl RunLengthCodec<IndexResolver> {
    /// Parses a stream into a codec returning value indices.
    pub fn parse(bytes: &[u8], config: CodecConfig) -> Result<Self, DecodeError> {
        Ok(Self::new(RunTable::parse(bytes, config)?, IndexResolver))
    }
}

impl<R: ValueResolver> RunLengthCodec<R> {
    /// Pairs a table with a resolver.
    pub fn new(table: RunTable, resolver: R) -> Self {
        Self { table, resolver }
    }

    /// Parses a stream and pairs it with `resolver`.
    pub fn parse_with(bytes: &[u8], config: CodecConfig, resolver: R) -> Result<Self, DecodeError> {
        Ok(Self::new(RunTable::parse(bytes, config)?, resolver))
    }

    /// Returns the value for `key`.
    pub fn decode(&self, key: u32) -> Result<R::Value, LookupError> {
        let index = self.table.value_index(key)?;
        self.resolver
            .resolve(index)
            .ok_or(LookupError::UnknownValueIndex(index))
    }

    /// Returns the value for a character.
    pub fn decode_char(&self, c: char) -> Result<R::Value, LookupError> {
        self.decode(c as u32)
    }

    /// The underlying table.
    pub fn table(&self) -> &RunTable {
        &self.table
    }

    /// The resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Splits the codec into its table and resolver.
    pub fn into_parts(self) -> (RunTable, R) {
        (self.table, self.resolver)
    }
}
