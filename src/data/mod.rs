//! Data module - CSV loading, tabular access and partitioning

mod loader;
mod partition;
mod table;

pub use loader::{load_csv, LoaderError};
pub use partition::{partition, split_point, split_ranges, Partition};
pub use table::{ColumnData, ColumnKind, RowRange, Table, TableError};
