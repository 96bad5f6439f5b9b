//! CSV Data Loader Module
//! Reads a delimited file into a [`Table`] using Polars.

use super::Table;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows scanned when inferring column types.
pub const INFER_SCHEMA_ROWS: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("cannot open '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse CSV '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Load a CSV file with a header row. Column types are inferred from content;
/// cells that do not parse as the inferred type become nulls.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Table, LoaderError> {
    let path = path.as_ref();

    // Polars defers opening the file until collect, so surface IO errors first
    File::open(path).map_err(|source| LoaderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_ignore_errors(true)
        .finish()
        .and_then(|lazy| lazy.collect())
        .map_err(|source| LoaderError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded dataset"
    );

    Ok(Table::new(df))
}
