//! Column-oriented table over a Polars DataFrame.
//! Numeric cells are materialized as `Option<f64>`; `None` marks a missing value.

use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TableError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },
    #[error("column '{column}' is not numeric")]
    NotNumeric { column: String },
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        }
    }
}

/// Materialized values of a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// Number of missing cells.
    pub fn missing(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.iter().filter(|v| v.is_none()).count(),
            ColumnData::Text(values) => values.iter().filter(|v| v.is_none()).count(),
        }
    }
}

/// Half-open row range `[lo, hi)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub lo: usize,
    pub hi: usize,
}

impl RowRange {
    pub fn new(lo: usize, hi: usize) -> Self {
        Self { lo, hi: hi.max(lo) }
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.hi == self.lo
    }
}

/// In-memory dataset with named, typed columns of equal length.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
}

impl Table {
    pub fn new(df: DataFrame) -> Self {
        Self { df }
    }

    /// Get a reference to the underlying DataFrame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn column_kind(&self, name: &str) -> Result<ColumnKind, TableError> {
        let column = self.lookup(name)?;
        Ok(Self::kind_of(column.dtype()))
    }

    /// Names of all numeric columns, in table order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .filter(|col| Self::kind_of(col.dtype()) == ColumnKind::Numeric)
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Materialize a column as numeric or text values.
    pub fn column(&self, name: &str) -> Result<ColumnData, TableError> {
        match self.column_kind(name)? {
            ColumnKind::Numeric => self.numeric(name).map(ColumnData::Numeric),
            ColumnKind::Text => {
                let column = self.lookup(name)?;
                let text = column.cast(&DataType::String)?;
                let values = text
                    .as_materialized_series()
                    .str()?
                    .into_iter()
                    .map(|v| v.map(str::to_owned))
                    .collect();
                Ok(ColumnData::Text(values))
            }
        }
    }

    /// Numeric values of a column. Nulls and NaN both come back as `None`.
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>, TableError> {
        let column = self.lookup(name)?;
        if Self::kind_of(column.dtype()) != ColumnKind::Numeric {
            return Err(TableError::NotNumeric {
                column: name.to_owned(),
            });
        }

        let values = column.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// Rows `[range.lo, range.hi)` as a new table sharing the source buffers.
    pub fn slice(&self, range: RowRange) -> Table {
        let lo = range.lo.min(self.height());
        let hi = range.hi.min(self.height()).max(lo);
        Table::new(self.df.slice(lo as i64, hi - lo))
    }

    fn lookup(&self, name: &str) -> Result<&Column, TableError> {
        self.df
            .column(name)
            .map_err(|_| TableError::ColumnNotFound {
                column: name.to_owned(),
            })
    }

    fn kind_of(dtype: &DataType) -> ColumnKind {
        match dtype {
            DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => ColumnKind::Numeric,
            _ => ColumnKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let df = DataFrame::new(vec![
            Column::new("Suburb".into(), vec![Some("Abbotsford"), None, Some("Carlton")]),
            Column::new("Rooms".into(), vec![2i64, 3, 4]),
            Column::new("Price".into(), vec![Some(1.2e6), None, Some(f64::NAN)]),
        ])
        .unwrap();
        Table::new(df)
    }

    #[test]
    fn numeric_treats_null_and_nan_as_missing() {
        let table = sample();
        assert_eq!(table.numeric("Price").unwrap(), vec![Some(1.2e6), None, None]);
    }

    #[test]
    fn integer_columns_are_numeric() {
        let table = sample();
        assert_eq!(table.column_kind("Rooms").unwrap(), ColumnKind::Numeric);
        assert_eq!(
            table.numeric("Rooms").unwrap(),
            vec![Some(2.0), Some(3.0), Some(4.0)]
        );
        assert_eq!(table.numeric_columns(), vec!["Rooms", "Price"]);
    }

    #[test]
    fn kinds_follow_dtype() {
        assert_eq!(Table::kind_of(&DataType::Int32), ColumnKind::Numeric);
        assert_eq!(Table::kind_of(&DataType::UInt64), ColumnKind::Numeric);
        assert_eq!(Table::kind_of(&DataType::Float32), ColumnKind::Numeric);
        assert_eq!(Table::kind_of(&DataType::String), ColumnKind::Text);
        assert_eq!(Table::kind_of(&DataType::Boolean), ColumnKind::Text);
    }

    #[test]
    fn text_column_materializes_with_missing_cells() {
        let table = sample();
        let data = table.column("Suburb").unwrap();
        assert_eq!(data.kind(), ColumnKind::Text);
        assert_eq!(data.missing(), 1);
        assert!(matches!(
            table.numeric("Suburb"),
            Err(TableError::NotNumeric { .. })
        ));
    }

    #[test]
    fn unknown_column_is_reported_by_name() {
        let table = sample();
        let err = table.numeric("Landsize").unwrap_err();
        assert!(matches!(err, TableError::ColumnNotFound { ref column } if column == "Landsize"));
        assert_eq!(err.to_string(), "column 'Landsize' not found");
    }

    #[test]
    fn slice_clamps_to_height() {
        let table = sample();
        assert_eq!(table.slice(RowRange::new(1, 10)).height(), 2);
        assert_eq!(table.slice(RowRange::new(5, 10)).height(), 0);
        assert_eq!(table.slice(RowRange::new(0, 3)).width(), 3);
    }
}
