//! Schema introspection traits and types

use crate::{Result, TabularResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Catalog lookups needed to edit tables and invoke routines generically.
///
/// Nothing here is cached: every call re-queries the catalog so that concurrent
/// schema changes are always visible.
#[async_trait]
pub trait SchemaIntrospection: Send + Sync {
    /// Names of the tables and views in the configured schema
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// First column of the table's primary-key index.
    ///
    /// `None` when the table has no primary key or does not exist.
    async fn primary_key_column(&self, table: &str) -> Result<Option<String>>;

    /// Catalog classification of a routine, matched case-insensitively
    async fn routine_kind(&self, routine: &str) -> Result<RoutineKind>;

    /// Name of the routine's `IN` parameter of cursor type, if any
    async fn cursor_parameter(&self, routine: &str) -> Result<Option<String>>;

    /// Names of the routine's `IN` parameters, excluding cursor parameters
    async fn routine_parameters(&self, routine: &str) -> Result<Vec<String>>;

    /// Routines that carry a catalog comment, as `routine`/`description` rows
    async fn list_documented_routines(&self) -> Result<TabularResult>;

    /// Server-side directory the bulk CSV routines read from and write to
    async fn data_directory(&self) -> Result<String>;
}

/// Catalog classification of a stored routine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineKind {
    Function,
    Procedure,
    /// Aggregates, window functions, or a name the catalog does not know
    Unknown,
}

impl RoutineKind {
    /// Map a PostgreSQL `pg_proc.prokind` code
    pub fn from_prokind(code: &str) -> Self {
        match code {
            "f" => RoutineKind::Function,
            "p" => RoutineKind::Procedure,
            _ => RoutineKind::Unknown,
        }
    }
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutineKind::Function => write!(f, "function"),
            RoutineKind::Procedure => write!(f, "procedure"),
            RoutineKind::Unknown => write!(f, "unknown"),
        }
    }
}

/// Position of `key_column` within `columns`.
///
/// Returns `columns.len()` when the column is absent (including when
/// `key_column` is empty), so callers must range-check before indexing.
pub fn primary_key_column_index(columns: &[String], key_column: &str) -> usize {
    columns
        .iter()
        .take_while(|column| column.as_str() != key_column)
        .count()
}
