//! Batch planning
//!
//! Splits a resolved entry list into consecutive, bounded batches.

use crate::domain::{Entry, Result, SitepackError};

/// An ordered slice of entries processed as one unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    /// Zero-based position of the batch within the run
    pub index: usize,
    pub entries: Vec<Entry>,
}

impl Batch {
    /// One-based batch number, as shown in progress messages
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `entries` into batches of at most `chunk_size` entries
///
/// Order is preserved and only the last batch may be smaller. An empty entry
/// list yields no batches.
///
/// # Errors
///
/// Returns [`SitepackError::InvalidChunkSize`] if `chunk_size` is zero.
///
/// # Examples
///
/// ```
/// use sitepack::core::export::planner::plan;
/// use sitepack::domain::Entry;
///
/// let entries: Vec<Entry> = (0..7)
///     .map(|i| Entry::classify(&format!("system.item_{i}")).unwrap())
///     .collect();
/// let batches = plan(entries, 3).unwrap();
/// assert_eq!(batches.len(), 3);
/// assert_eq!(batches[2].len(), 1);
/// ```
pub fn plan(entries: Vec<Entry>, chunk_size: usize) -> Result<Vec<Batch>> {
    if chunk_size == 0 {
        return Err(SitepackError::InvalidChunkSize(chunk_size));
    }

    let mut batches = Vec::with_capacity(entries.len().div_ceil(chunk_size));
    let mut current = Vec::with_capacity(chunk_size.min(entries.len()));

    for entry in entries {
        current.push(entry);
        if current.len() == chunk_size {
            let index = batches.len();
            batches.push(Batch {
                index,
                entries: std::mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        let index = batches.len();
        batches.push(Batch {
            index,
            entries: current,
        });
    }

    Ok(batches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    fn entries(count: usize) -> Vec<Entry> {
        (0..count)
            .map(|i| Entry::classify(&format!("system.entry_{i:03}")).unwrap())
            .collect()
    }

    #[test_case(0, 5, &[] ; "empty input")]
    #[test_case(15, 5, &[5, 5, 5] ; "exact multiple")]
    #[test_case(12, 5, &[5, 5, 2] ; "short tail")]
    #[test_case(3, 10, &[3] ; "single short batch")]
    #[test_case(4, 1, &[1, 1, 1, 1] ; "chunk of one")]
    fn test_plan_sizes(count: usize, chunk_size: usize, expected: &[usize]) {
        let batches = plan(entries(count), chunk_size).unwrap();
        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, expected);
    }

    #[test]
    fn test_plan_rejects_zero_chunk_size() {
        let err = plan(entries(3), 0).unwrap_err();
        assert!(matches!(err, SitepackError::InvalidChunkSize(0)));
    }

    #[test]
    fn test_batch_numbers() {
        let batches = plan(entries(6), 4).unwrap();
        assert_eq!(batches[0].index, 0);
        assert_eq!(batches[1].number(), 2);
    }

    proptest! {
        #[test]
        fn prop_batches_reproduce_input(count in 0usize..60, chunk_size in 1usize..12) {
            let input = entries(count);
            let batches = plan(input.clone(), chunk_size).unwrap();

            let flattened: Vec<Entry> = batches.iter().flat_map(|b| b.entries.clone()).collect();
            prop_assert_eq!(flattened, input);

            for (i, batch) in batches.iter().enumerate() {
                prop_assert_eq!(batch.index, i);
                prop_assert!(!batch.is_empty());
                prop_assert!(batch.len() <= chunk_size);
                if i + 1 < batches.len() {
                    prop_assert_eq!(batch.len(), chunk_size);
                }
            }
        }
    }
}
