//! Coalesces key-ordered value assignments into maximal runs.
//!
//! The builder sees keys implicitly: the n-th pushed index belongs to key n.
//! Consecutive equal indices extend the open run; a different index closes
//! it and opens a new run of length one. Every maximal stretch of a constant
//! index therefore becomes exactly one [`Run`], which is the smallest number
//! of runs that can describe the assignment.

use std::hash::Hash;

use crate::run::RunError;
use crate::Run;
use crate::Runs;
use crate::ValueTable;

/// Incremental run-length builder.
#[derive(Debug, Default)]
pub struct RunBuilder {
    runs: Runs,
    current: Option<Run>,
}

impl RunBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds runs from one value index per key, in key order.
    pub fn from_indices<I>(indices: I) -> Result<Runs, RunError>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut builder = Self::new();
        for index in indices {
            builder.push(index)?;
        }
        Ok(builder.finish())
    }

    /// Builds runs from one value per key, interning each distinct value
    /// into `table` in first-seen order.
    pub fn from_values<V, I>(values: I, table: &mut ValueTable<V>) -> Result<Runs, RunError>
    where
        V: Eq + Hash + Clone,
        I: IntoIterator<Item = V>,
    {
        let mut builder = Self::new();
        for value in values {
            builder.push(table.intern(value))?;
        }
        Ok(builder.finish())
    }

    /// Assigns `value_index` to the next key.
    pub fn push(&mut self, value_index: u32) -> Result<(), RunError> {
        self.push_run(Run::single(value_index))
    }

    /// Assigns `run.value_index()` to the next `run.length()` keys.
    pub fn push_run(&mut self, run: Run) -> Result<(), RunError> {
        if let Some(current) = self.current.as_mut() {
            if current.value_index() == run.value_index() {
                return current.try_extend(run.length());
            }
        }

        if let Some(previous) = self.current.replace(run) {
            self.runs.push(previous);
        }
        Ok(())
    }

    /// Number of keys assigned so far.
    pub fn coverage(&self) -> u128 {
        self.runs.coverage() + self.current.map_or(0, |run| run.length() as u128)
    }

    /// Closes the open run and returns all runs.
    pub fn finish(mut self) -> Runs {
        if let Some(run) = self.current.take() {
            self.runs.push(run);
        }

        tracing::debug!(
            runs = self.runs.len(),
            coverage = %self.runs.coverage(),
            "built run-length table"
        );

        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn lengths_and_indices(runs: &Runs) -> Vec<(u64, u32)> {
        runs.iter().map(|run| (run.length(), run.value_index())).collect()
    }

    #[test_case(&[] => Vec::<(u64, u32)>::new(); "empty input")]
    #[test_case(&[5] => vec![(1, 5)]; "single key")]
    #[test_case(&[0, 0, 0, 1, 1, 0] => vec![(3, 0), (2, 1), (1, 0)]; "three runs")]
    #[test_case(&[2, 2, 2, 2] => vec![(4, 2)]; "constant")]
    #[test_case(&[0, 1, 0, 1] => vec![(1, 0), (1, 1), (1, 0), (1, 1)]; "alternating")]
    fn test_from_indices(indices: &[u32]) -> Vec<(u64, u32)> {
        let runs = RunBuilder::from_indices(indices.iter().copied()).unwrap();
        lengths_and_indices(&runs)
    }

    #[test]
    fn test_push_run_merges_equal_neighbours() -> Result<(), RunError> {
        let mut builder = RunBuilder::new();
        builder.push_run(Run::try_new(10, 1)?)?;
        builder.push_run(Run::try_new(5, 1)?)?;
        builder.push(2)?;
        builder.push_run(Run::try_new(3, 2)?)?;
        assert_eq!(builder.coverage(), 19);

        let runs = builder.finish();
        assert_eq!(lengths_and_indices(&runs), vec![(15, 1), (4, 2)]);
        Ok(())
    }

    #[test]
    fn test_from_values_interns_in_first_seen_order() -> Result<(), RunError> {
        let mut table = ValueTable::new();
        let runs = RunBuilder::from_values(["XX", "XX", "AL", "AL", "XX", "BA"], &mut table)?;

        assert_eq!(table.as_slice(), &["XX", "AL", "BA"]);
        assert_eq!(lengths_and_indices(&runs), vec![(2, 0), (2, 1), (1, 0), (1, 2)]);
        Ok(())
    }

    proptest! {
        /// The number of runs equals the number of positions where the
        /// index changes plus one, and expanding restores the input.
        #[test]
        fn prop_minimal_and_lossless(indices in prop::collection::vec(0..4u32, 1..500)) {
            let runs = RunBuilder::from_indices(indices.iter().copied()).unwrap();

            let changes = indices.windows(2).filter(|pair| pair[0] != pair[1]).count();
            prop_assert_eq!(runs.len(), changes + 1);
            prop_assert_eq!(runs.coverage(), indices.len() as u128);
            prop_assert_eq!(runs.expand(), indices);
        }
    }
}
