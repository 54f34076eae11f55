//! Reader for Unicode Character Database style range files.
//!
//! Data lines look like
//!
//! ```text
//! 0041..005A    ; Lu # Latin capital letters
//! 00AA          ; Lo
//! ```
//!
//! Everything after `#` is a comment, except for `# @missing:` lines which
//! use the data line syntax to name the value of code points no data line
//! lists. When several `@missing` lines cover a code point, the last one
//! wins. Lines with more than two columns keep the extra columns in the
//! value, joined with `;`.

use std::ops::RangeInclusive;

use runtable::Run;
use runtable::RunBuilder;
use runtable::RunError;
use runtable::Runs;
use runtable::ValueTable;

const MISSING_PREFIX: &str = "@missing:";

/// Errors raised while reading or assigning a range file.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UcdError {
    /// The line is not `<code points> ; <value>`.
    #[error("line {line}: expected `<code points> ; <value>`")]
    BadLine {
        /// 1-based line number
        line: usize,
    },

    /// A code point is not a hexadecimal number.
    #[error("line {line}: invalid code point `{text}`")]
    BadCodePoint {
        /// 1-based line number
        line: usize,
        /// The offending text
        text: String,
    },

    /// A range ends before it starts.
    #[error("line {line}: range {start:04X}..{end:04X} ends before it starts")]
    InvertedRange {
        /// 1-based line number
        line: usize,
        /// First code point
        start: u32,
        /// Last code point
        end: u32,
    },

    /// Two data lines assign the same code point.
    #[error("range {start:04X}..{end:04X} overlaps a range ending at {previous_end:04X}")]
    OverlappingRanges {
        /// First code point of the later range
        start: u32,
        /// Last code point of the later range
        end: u32,
        /// Last code point of the earlier range
        previous_end: u32,
    },

    /// A data line lies past the end of the domain.
    #[error("range {start:04X}..{end:04X} exceeds the domain [0, {domain_max:04X}]")]
    OutOfDomain {
        /// First code point
        start: u32,
        /// Last code point
        end: u32,
        /// Largest valid code point
        domain_max: u32,
    },

    /// Code points are neither listed nor covered by a default.
    #[error("no value for code points {start:04X}..{end:04X} and no default given")]
    NoDefault {
        /// First unassigned code point
        start: u32,
        /// Last unassigned code point
        end: u32,
    },

    /// A run could not be built.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// A code point range and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Code points the value applies to.
    pub range: RangeInclusive<u32>,
    /// The property value.
    pub value: String,
}

/// The contents of a range file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UcdFile {
    /// Data lines in file order.
    pub entries: Vec<Entry>,
    /// `@missing` lines in file order.
    pub missing: Vec<Entry>,
}

impl UcdFile {
    /// Parses the text of a range file.
    pub fn parse(text: &str) -> Result<Self, UcdError> {
        let mut file = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();

            if let Some(comment) = trimmed.strip_prefix('#') {
                if let Some(data) = comment.trim_start().strip_prefix(MISSING_PREFIX) {
                    file.missing.push(parse_data(data, line)?);
                }
                continue;
            }

            let data = trimmed.split('#').next().unwrap_or_default().trim();
            if data.is_empty() {
                continue;
            }
            file.entries.push(parse_data(data, line)?);
        }

        tracing::debug!(
            entries = file.entries.len(),
            missing = file.missing.len(),
            "parsed range file"
        );

        Ok(file)
    }

    /// Assigns a value to every code point in `[0, domain_max]` and returns
    /// the runs along with the values table, interned in code point order.
    ///
    /// Code points without a data line take the `@missing` value covering
    /// them, or `default` when there is none.
    pub fn assign(
        &self,
        default: Option<&str>,
        domain_max: u32,
    ) -> Result<(Runs, ValueTable<String>), UcdError> {
        let mut entries: Vec<&Entry> = self.entries.iter().collect();
        entries.sort_by_key(|entry| *entry.range.start());

        let mut builder = RunBuilder::new();
        let mut values = ValueTable::new();
        let mut next = 0u64;
        let mut previous_end = None;

        for entry in entries {
            let (start, end) = (*entry.range.start(), *entry.range.end());

            if let Some(previous_end) = previous_end.filter(|&previous_end| start <= previous_end) {
                return Err(UcdError::OverlappingRanges { start, end, previous_end });
            }
            if end > domain_max {
                return Err(UcdError::OutOfDomain { start, end, domain_max });
            }

            if (start as u64) > next {
                self.fill_gap(next, start as u64 - 1, default, &mut builder, &mut values)?;
            }

            let run = Run::try_new(end as u64 - start as u64 + 1, values.intern(entry.value.clone()))?;
            builder.push_run(run)?;

            next = end as u64 + 1;
            previous_end = Some(end);
        }

        if next <= domain_max as u64 {
            self.fill_gap(next, domain_max as u64, default, &mut builder, &mut values)?;
        }

        Ok((builder.finish(), values))
    }

    /// Assigns `[start, end]` from the `@missing` lines or `default`.
    fn fill_gap(
        &self,
        start: u64,
        end: u64,
        default: Option<&str>,
        builder: &mut RunBuilder,
        values: &mut ValueTable<String>,
    ) -> Result<(), UcdError> {
        let mut key = start;

        while key <= end {
            let covering = self
                .missing
                .iter()
                .rposition(|entry| entry.range.contains(&(key as u32)));

            let mut stop = end;
            let value = match covering {
                Some(position) => {
                    stop = stop.min(*self.missing[position].range.end() as u64);
                    self.missing[position].value.as_str()
                }
                None => {
                    let last = self.next_missing_start(key, 0).map_or(end, |next| end.min(next - 1));
                    default.ok_or(UcdError::NoDefault { start: key as u32, end: last as u32 })?
                }
            };

            // A later `@missing` line starting inside the stretch takes over.
            let first_later = covering.map_or(0, |position| position + 1);
            if let Some(next) = self.next_missing_start(key, first_later) {
                stop = stop.min(next - 1);
            }

            tracing::trace!(start = key, end = stop, value, "filling unlisted code points");
            builder.push_run(Run::try_new(stop - key + 1, values.intern(value.to_string()))?)?;
            key = stop + 1;
        }

        Ok(())
    }

    /// Smallest start after `key` among the `@missing` lines from `from` on.
    fn next_missing_start(&self, key: u64, from: usize) -> Option<u64> {
        self.missing[from..]
            .iter()
            .map(|entry| *entry.range.start() as u64)
            .filter(|&start| start > key)
            .min()
    }
}

fn parse_data(data: &str, line: usize) -> Result<Entry, UcdError> {
    let mut columns = data.split(';').map(str::trim);

    let code_points = columns.next().unwrap_or_default();
    let value = columns.collect::<Vec<_>>().join(";");
    if code_points.is_empty() || value.is_empty() {
        return Err(UcdError::BadLine { line });
    }

    let range = match code_points.split_once("..") {
        Some((start, end)) => parse_code_point(start, line)?..=parse_code_point(end, line)?,
        None => {
            let code_point = parse_code_point(code_points, line)?;
            code_point..=code_point
        }
    };

    if range.is_empty() {
        return Err(UcdError::InvertedRange {
            line,
            start: *range.start(),
            end: *range.end(),
        });
    }

    Ok(Entry { range, value })
}

fn parse_code_point(text: &str, line: usize) -> Result<u32, UcdError> {
    let text = text.trim();
    u32::from_str_radix(text, 16).map_err(|_| UcdError::BadCodePoint { line, text: text.to_string() })
}
