//! Column Summary Module
//! Descriptive statistics per column for exploratory inspection.

use crate::data::{ColumnData, ColumnKind, Table, TableError};
use rayon::prelude::*;
use statrs::statistics::{Data, Distribution, Max, Median, Min, OrderStatistics};
use std::collections::HashSet;
use std::fmt;

/// Statistics for a single column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub p05: f64,
    pub median: f64,
    pub p95: f64,
    pub max: f64,
    /// Distinct non-missing values; text columns only.
    pub distinct: Option<usize>,
}

impl ColumnSummary {
    fn empty(name: &str, kind: ColumnKind, missing: usize) -> Self {
        Self {
            name: name.to_owned(),
            kind,
            count: 0,
            missing,
            mean: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            p05: f64::NAN,
            median: f64::NAN,
            p95: f64::NAN,
            max: f64::NAN,
            distinct: None,
        }
    }

    /// Descriptive statistics of the present values of a numeric column.
    pub fn numeric(name: &str, values: &[Option<f64>]) -> Self {
        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let missing = values.len() - present.len();
        if present.is_empty() {
            return Self::empty(name, ColumnKind::Numeric, missing);
        }

        let count = present.len();
        let mut data = Data::new(present);
        let std_dev = if count > 1 {
            data.std_dev().unwrap_or(f64::NAN)
        } else {
            0.0
        };

        Self {
            name: name.to_owned(),
            kind: ColumnKind::Numeric,
            count,
            missing,
            mean: data.mean().unwrap_or(f64::NAN),
            std_dev,
            min: data.min(),
            p05: data.percentile(5),
            median: data.median(),
            p95: data.percentile(95),
            max: data.max(),
            distinct: None,
        }
    }

    pub fn text(name: &str, values: &[Option<String>]) -> Self {
        let present: Vec<&str> = values.iter().flatten().map(String::as_str).collect();
        let distinct: HashSet<&str> = present.iter().copied().collect();
        let mut summary = Self::empty(name, ColumnKind::Text, values.len() - present.len());
        summary.count = present.len();
        summary.distinct = Some(distinct.len());
        summary
    }
}

impl fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ColumnKind::Numeric => write!(
                f,
                "{:<16} {:<8} {:>8} {:>8} {:>14.2} {:>14.2} {:>14.2} {:>14.2} {:>14.2}",
                self.name,
                self.kind.as_str(),
                self.count,
                self.missing,
                self.mean,
                self.std_dev,
                self.min,
                self.median,
                self.max
            ),
            ColumnKind::Text => write!(
                f,
                "{:<16} {:<8} {:>8} {:>8} {:>14}",
                self.name,
                self.kind.as_str(),
                self.count,
                self.missing,
                format!("{} distinct", self.distinct.unwrap_or(0))
            ),
        }
    }
}

/// Summarize a single column.
pub fn summarize_column(table: &Table, name: &str) -> Result<ColumnSummary, TableError> {
    Ok(match table.column(name)? {
        ColumnData::Numeric(values) => ColumnSummary::numeric(name, &values),
        ColumnData::Text(values) => ColumnSummary::text(name, &values),
    })
}

/// Summarize every column in parallel, keeping table order.
pub fn summarize(table: &Table) -> Result<Vec<ColumnSummary>, TableError> {
    table
        .column_names()
        .par_iter()
        .map(|name| summarize_column(table, name))
        .collect()
}
