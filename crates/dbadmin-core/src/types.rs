//! Core types for dbadmin

use serde::{Deserialize, Serialize};

/// Uniform in-memory shape of any query output.
///
/// Every cell is text: the executor renders each value through the server's
/// text representation and maps SQL `NULL` to an empty string. `columns` is
/// authoritative for ordering; each row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularResult {
    /// Table or routine name, or a generated placeholder for ad-hoc queries
    #[serde(default)]
    pub name: String,
    /// Set by the presentation layer only
    #[serde(default)]
    pub is_editable: bool,
    /// Index of the primary-key column; meaningful only for full table scans
    #[serde(default)]
    pub primary_key_column_index: usize,
    /// Ordered column names
    #[serde(default)]
    pub columns: Vec<String>,
    /// Ordered rows of text cells aligned with `columns`
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl TabularResult {
    /// Create an unnamed result from columns and rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(
            rows.iter().all(|row| row.len() == columns.len()),
            "every row must have one cell per column"
        );
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    /// Result of a statement that produced no result set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Set the identifying label
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the statement described any output columns.
    ///
    /// A `CALL` or `DO` without output returns no columns; callers use this to
    /// tell "succeeded with no data" apart from a failure.
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// First cell of the first row, used by single-value catalog lookups
    pub fn first_value(&self) -> Option<&str> {
        self.rows
            .first()
            .and_then(|row| row.first())
            .map(String::as_str)
    }

    /// Values of the first column across all rows
    pub fn first_column(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect()
    }

    /// Project the first row into a [`Record`] keyed by this result's columns.
    ///
    /// Returns `None` when the result has no rows.
    pub fn first_row_record(
        &self,
        name: impl Into<String>,
        primary_key_column_index: usize,
    ) -> Option<Record> {
        let values = self.rows.first()?.clone();
        Some(Record::new(
            name,
            primary_key_column_index,
            self.columns.clone(),
            values,
        ))
    }
}

/// A single row, or a routine's parameter list, as aligned keys and values.
///
/// Used both as the skeleton of a "new row" / "run routine" form (blank values)
/// and as the payload of exactly one write or invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Target table or routine
    #[serde(default)]
    pub name: String,
    /// Index into `keys`/`values` of the primary-key column, when applicable
    #[serde(default)]
    pub primary_key_column_index: usize,
    /// Column or parameter names
    #[serde(default)]
    pub keys: Vec<String>,
    /// Values aligned with `keys`
    #[serde(default)]
    pub values: Vec<String>,
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        primary_key_column_index: usize,
        keys: Vec<String>,
        values: Vec<String>,
    ) -> Self {
        debug_assert_eq!(keys.len(), values.len(), "keys and values must align");
        Self {
            name: name.into(),
            primary_key_column_index,
            keys,
            values,
        }
    }

    /// A record with the given keys and one blank value per key
    pub fn skeleton(name: impl Into<String>, keys: Vec<String>) -> Self {
        let values = vec![String::new(); keys.len()];
        Self {
            name: name.into(),
            primary_key_column_index: 0,
            keys,
            values,
        }
    }

    /// Whether the key and value lists line up
    pub fn is_aligned(&self) -> bool {
        self.keys.len() == self.values.len()
    }

    /// The value sitting at `primary_key_column_index`, if in range
    pub fn key_value(&self) -> Option<&str> {
        self.values
            .get(self.primary_key_column_index)
            .map(String::as_str)
    }

    /// Iterate `(key, value)` pairs in order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}
