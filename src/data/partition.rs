//! Positional train/test split.

use super::{RowRange, Table};

/// Training and testing tables produced by [`partition`].
#[derive(Debug, Clone)]
pub struct Partition {
    pub training: Table,
    pub testing: Table,
}

/// Number of training rows for a table of `rows` rows: `floor(3 * rows / 4)`.
pub fn split_point(rows: usize) -> usize {
    (3 * rows) / 4
}

/// Row ranges of the training prefix and the testing suffix.
pub fn split_ranges(rows: usize) -> (RowRange, RowRange) {
    let k = split_point(rows);
    (RowRange::new(0, k), RowRange::new(k, rows))
}

/// Split `table` into a training prefix and a testing suffix.
///
/// Rows are not shuffled, so identical input always yields identical
/// partitions. Empty and single-row tables get an empty training set.
pub fn partition(table: &Table) -> Partition {
    let (train, test) = split_ranges(table.height());
    tracing::debug!(
        training = train.len(),
        testing = test.len(),
        "partitioned table"
    );
    Partition {
        training: table.slice(train),
        testing: table.slice(test),
    }
}
