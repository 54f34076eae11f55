use std::ops::Index;
use std::ops::RangeInclusive;

use super::Run;

/// Ordered runs covering the keys `0..coverage()` without gaps or overlaps.
///
/// The first run starts at key zero and every following run starts right
/// after the previous one ends, so only lengths are stored.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Runs(Vec<Run>);

impl IntoIterator for Runs {
    type Item = Run;
    type IntoIter = std::vec::IntoIter<Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Runs {
    type Item = &'a Run;
    type IntoIter = std::slice::Iter<'a, Run>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Run> for Runs {
    fn from_iter<I: IntoIterator<Item = Run>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for Runs {
    type Output = Run;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Runs {
    /// Creates a new `Runs` instance from an iterator of runs, in key order.
    pub fn new_from<I>(runs: I) -> Self
    where
        I: IntoIterator<Item = Run>,
    {
        Self(runs.into_iter().collect())
    }

    /// Pushes a run after the last one.
    pub fn push(&mut self, run: Run) {
        self.0.push(run);
    }

    /// Returns the number of runs in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no runs in the collection.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the runs.
    pub fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.0.iter()
    }

    /// Returns the runs as a slice.
    pub fn as_slice(&self) -> &[Run] {
        &self.0
    }

    /// Total number of keys covered, the sum of all run lengths.
    pub fn coverage(&self) -> u128 {
        self.0.iter().map(|run| run.length() as u128).sum()
    }

    /// Returns each run's inclusive key span together with its value index.
    pub fn ranges(&self) -> impl Iterator<Item = (RangeInclusive<u64>, u32)> + '_ {
        let mut start = 0u64;
        self.0.iter().map(move |run| {
            let end = start.saturating_add(run.length() - 1);
            let span = (start..=end, run.value_index());
            start = end.saturating_add(1);
            span
        })
    }

    /// Expands the runs back into one value index per key.
    ///
    /// Intended for tests and small domains; the output has `coverage()`
    /// entries.
    pub fn expand(&self) -> Vec<u32> {
        self.0
            .iter()
            .flat_map(|run| std::iter::repeat(run.value_index()).take(run.length() as usize))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(spans: &[(u64, u32)]) -> Runs {
        Runs::new_from(
            spans.iter()
                .map(|&(length, index)| Run::try_new(length, index).unwrap()),
        )
    }

    #[test]
    fn test_coverage_and_ranges() {
        let runs = runs(&[(3, 0), (2, 1), (1, 0)]);

        assert_eq!(runs.len(), 3);
        assert_eq!(runs.coverage(), 6);
        assert_eq!(
            runs.ranges().collect::<Vec<_>>(),
            vec![(0..=2, 0), (3..=4, 1), (5..=5, 0)]
        );
        assert_eq!(runs.expand(), vec![0, 0, 0, 1, 1, 0]);
    }

    #[test]
    fn test_empty() {
        let runs = Runs::default();
        assert!(runs.is_empty());
        assert_eq!(runs.coverage(), 0);
        assert_eq!(runs.ranges().count(), 0);
    }

    #[test]
    fn test_coverage_beyond_u64() {
        let runs = runs(&[(u64::MAX, 0), (2, 1)]);
        assert_eq!(runs.coverage(), u64::MAX as u128 + 2);
    }
}
