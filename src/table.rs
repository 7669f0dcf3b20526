use itertools::Itertools as _;
use thiserror::Error;

/// Column-major table of `f64` values.
///
/// A table either carries one name per column (a named table) or no names at all,
/// which is how a bare numeric matrix is represented.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    names: Option<Vec<String>>,
    columns: Vec<Vec<f64>>,
    rows_len: usize,
}

impl Table {
    /// Makes a named table from `(name, values)` pairs.
    pub fn new<N>(columns: impl IntoIterator<Item = (N, Vec<f64>)>) -> Result<Self, TableError>
    where
        N: Into<String>,
    {
        let (names, columns): (Vec<String>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(name, values)| (name.into(), values))
            .unzip();

        if let Some(name) = names.iter().duplicates().next() {
            return Err(TableError::DuplicateColumnName { name: name.clone() });
        }

        let rows_len = Self::check_columns(&columns)?;
        Ok(Self {
            names: Some(names),
            columns,
            rows_len,
        })
    }

    /// Makes a table without column names.
    pub fn unnamed(columns: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let rows_len = Self::check_columns(&columns)?;
        Ok(Self {
            names: None,
            columns,
            rows_len,
        })
    }

    /// Makes a table without column names from row-major data.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TableError> {
        let width = rows.first().map(Vec::len).ok_or(TableError::EmptyTable)?;
        if rows.iter().any(|row| row.len() != width) {
            return Err(TableError::RowSizeMismatch);
        }

        let columns = (0..width)
            .map(|i| rows.iter().map(|row| row[i]).collect())
            .collect();
        Self::unnamed(columns)
    }

    /// Makes a table with no columns and `rows_len` rows.
    pub fn empty(rows_len: usize, named: bool) -> Self {
        Self {
            names: if named { Some(Vec::new()) } else { None },
            columns: Vec::new(),
            rows_len,
        }
    }

    fn check_columns(columns: &[Vec<f64>]) -> Result<usize, TableError> {
        let rows_len = columns.first().map(Vec::len).ok_or(TableError::EmptyTable)?;
        if rows_len == 0 {
            return Err(TableError::EmptyTable);
        }
        if columns.iter().skip(1).any(|c| c.len() != rows_len) {
            return Err(TableError::RowSizeMismatch);
        }
        Ok(rows_len)
    }

    pub fn is_named(&self) -> bool {
        self.names.is_some()
    }

    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    pub fn name(&self, column_index: usize) -> Option<&str> {
        self.names
            .as_ref()
            .and_then(|names| names.get(column_index))
            .map(String::as_str)
    }

    /// Returns the position of the column called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.as_ref()?.iter().position(|n| n == name)
    }

    pub fn column(&self, column_index: usize) -> Option<&[f64]> {
        self.columns.get(column_index).map(Vec::as_slice)
    }

    pub fn columns_len(&self) -> usize {
        self.columns.len()
    }

    pub fn rows_len(&self) -> usize {
        self.rows_len
    }

    pub fn row(&self, row_index: usize) -> Option<impl '_ + Iterator<Item = f64>> {
        if row_index >= self.rows_len {
            return None;
        }
        Some(self.columns.iter().map(move |c| c[row_index]))
    }

    /// Copies the columns at `positions`, in that order, into a new table.
    ///
    /// Fails with the first position that is not a column of this table.
    pub fn select(&self, positions: &[usize]) -> Result<Self, usize> {
        if let Some(&index) = positions.iter().find(|&&i| i >= self.columns.len()) {
            return Err(index);
        }

        let columns = positions.iter().map(|&i| self.columns[i].clone()).collect();
        let names = self
            .names
            .as_ref()
            .map(|names| positions.iter().map(|&i| names[i].clone()).collect());
        Ok(Self {
            names,
            columns,
            rows_len: self.rows_len,
        })
    }
}

#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("table must have at least one column and one row")]
    EmptyTable,

    #[error("some of columns have a different row count from others")]
    RowSizeMismatch,

    #[error("column name {name:?} appears more than once")]
    DuplicateColumnName { name: String },
}
