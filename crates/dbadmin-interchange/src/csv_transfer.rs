//! CSV export and import against the connected database

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use dbadmin_core::{AdminError, Connection, SchemaIntrospection, TabularResult};

use crate::csv_format::render_csv;

/// Errors during CSV transfer
#[derive(Debug, Error)]
pub enum CsvTransferError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Query error: {0}")]
    QueryError(#[from] AdminError),

    #[error("Connection does not expose schema introspection")]
    IntrospectionUnavailable,

    #[error("Data directory is unknown")]
    UnknownDataDirectory,

    #[error("Invalid export name: {0:?}")]
    InvalidName(String),
}

/// `<name>.csv`, provided the name stays inside the data directory
fn csv_file_name(name: &str) -> Result<String, CsvTransferError> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(CsvTransferError::InvalidName(name.to_string()));
    }
    Ok(format!("{}.csv", name))
}

/// CSV exporter/importer bound to one connection.
///
/// Files live in the database server's data directory, which is where the
/// server-side `export_table` and `import_table` routines read and write.
pub struct CsvTransfer {
    connection: Arc<dyn Connection>,
    data_dir_override: Option<PathBuf>,
}

impl CsvTransfer {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            data_dir_override: None,
        }
    }

    /// Use a fixed directory instead of asking the server for `data_directory`
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir_override = Some(data_dir.into());
        self
    }

    fn introspection(&self) -> Result<&dyn SchemaIntrospection, CsvTransferError> {
        self.connection
            .as_schema_introspection()
            .ok_or(CsvTransferError::IntrospectionUnavailable)
    }

    /// Directory CSV files are written to and read from
    pub async fn data_directory(&self) -> Result<PathBuf, CsvTransferError> {
        if let Some(dir) = &self.data_dir_override {
            return Ok(dir.clone());
        }

        let dir = self.introspection()?.data_directory().await?;
        if dir.is_empty() {
            return Err(CsvTransferError::UnknownDataDirectory);
        }
        Ok(PathBuf::from(dir))
    }

    /// Export a result as `<data dir>/<name>.csv`.
    ///
    /// A result named after a table of the schema is exported in full by the
    /// server-side routine; anything else (console output, routine results)
    /// is rendered from the rows in memory.
    #[tracing::instrument(skip(self, result), fields(name = %result.name))]
    pub async fn export_table(&self, result: &TabularResult) -> Result<PathBuf, CsvTransferError> {
        let file_name = csv_file_name(&result.name)?;
        let path = self.data_directory().await?.join(&file_name);

        let tables = self.introspection()?.list_tables().await?;
        if tables.iter().any(|table| table == &result.name) {
            self.export_stored_table(&result.name, &file_name).await?;
        } else {
            write_csv(result, &path).await?;
        }

        tracing::debug!(path = %path.display(), rows = result.row_count(), "CSV export finished");
        Ok(path)
    }

    async fn export_stored_table(&self, table: &str, file_name: &str) -> Result<(), CsvTransferError> {
        let sql = format!("CALL export_table('{}', '{}', ',')", file_name, table);
        self.connection.query(&sql).await?;
        Ok(())
    }

    /// Load `file_name` (relative to the data directory) into `table` through
    /// the server-side `import_table` routine
    #[tracing::instrument(skip(self))]
    pub async fn import_table(&self, table: &str, file_name: &str) -> Result<(), CsvTransferError> {
        let sql = format!("CALL import_table('{}', '{}', ',')", file_name, table);
        self.connection.query(&sql).await?;
        tracing::debug!("CSV import finished");
        Ok(())
    }
}

async fn write_csv(result: &TabularResult, path: &Path) -> Result<(), CsvTransferError> {
    tokio::fs::write(path, render_csv(result)).await?;
    Ok(())
}
