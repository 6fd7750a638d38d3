//! CSV Data Loader Module
//! Loads the accident CSV into an in-memory table and serves column reads,
//! appends and identifier lookups on it.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
}

#[derive(Error, Debug)]
pub enum TableError {
    #[error("Column '{0}' not found.")]
    ColumnNotFound(String),
    #[error("Expected {expected} values but got {got}")]
    FieldCount { expected: usize, got: usize },
    #[error("Age must be a whole number, got '{0}'")]
    InvalidAge(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One row as ordered `(column, value)` pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub fields: Vec<(String, Option<String>)>,
}

impl Record {
    /// Multi-line `column: value` listing, missing values shown as `NaN`.
    pub fn listing(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{}: {}\n", name, value.as_deref().unwrap_or("NaN")))
            .collect()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, value)| value.as_deref())
    }
}

/// Columns polars renamed because the header repeated a name.
fn renamed_duplicates(columns: &[String]) -> Vec<&str> {
    columns
        .iter()
        .map(String::as_str)
        .filter(|name| name.contains("_duplicated_"))
        .collect()
}

/// The loaded dataset. Every column is held as text so values round-trip as written.
pub struct Table {
    df: DataFrame,
    file_path: PathBuf,
}

impl Table {
    /// Load a `separator`-delimited CSV with a header row.
    pub fn load_csv(file_path: &Path, separator: u8) -> Result<Self, LoaderError> {
        // Schema inference disabled: all columns are read as String.
        let df = LazyCsvReader::new(file_path)
            .with_separator(separator)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;

        info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "csv loaded"
        );
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        for name in renamed_duplicates(&names) {
            warn!(path = %file_path.display(), column = name, "duplicate header renamed");
        }

        Ok(Self {
            df,
            file_path: file_path.to_path_buf(),
        })
    }

    /// Column names in file order.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.df.column(column).is_ok()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// All values of a column as text, `None` for missing.
    pub fn text_values(&self, column: &str) -> Result<Vec<Option<String>>, TableError> {
        let col = self
            .df
            .column(column)
            .map_err(|_| TableError::ColumnNotFound(column.to_string()))?;
        let series = col.as_materialized_series().cast(&DataType::String)?;
        let values = series
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Ok(values)
    }

    /// Append one row; `values` must line up with [`Table::columns`].
    pub fn append_row(&mut self, values: Vec<Option<String>>) -> Result<(), TableError> {
        let names = self.columns();
        if values.len() != names.len() {
            return Err(TableError::FieldCount {
                expected: names.len(),
                got: values.len(),
            });
        }

        let columns: Vec<Column> = names
            .iter()
            .zip(values)
            .map(|(name, value)| Column::new(name.as_str().into(), vec![value]))
            .collect();
        let row = DataFrame::new(columns)?;

        self.df.vstack_mut(&row)?;
        debug!(rows = self.df.height(), "row appended");
        Ok(())
    }

    /// First row whose `column` equals `code` exactly, if any.
    pub fn find_first(&self, column: &str, code: &str) -> Result<Option<Record>, TableError> {
        if !self.has_column(column) {
            return Err(TableError::ColumnNotFound(column.to_string()));
        }

        let matched = self
            .df
            .clone()
            .lazy()
            .filter(col(column).eq(lit(code)))
            .limit(1)
            .collect()?;

        if matched.height() == 0 {
            return Ok(None);
        }

        let mut fields = Vec::with_capacity(matched.width());
        for column in matched.get_columns() {
            let series = column.as_materialized_series().cast(&DataType::String)?;
            let value = series.str()?.get(0).map(str::to_string);
            fields.push((column.name().to_string(), value));
        }

        Ok(Some(Record { fields }))
    }
}
