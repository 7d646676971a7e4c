//! Data administration service
//!
//! Table browsing and row editing, the SQL console, stored routine
//! invocation, and CSV transfer, all against one shared connection.

use std::path::PathBuf;
use std::sync::Arc;

use dbadmin_core::{
    Connection, Record, RoutineKind, SchemaIntrospection, TabularResult, primary_key_column_index,
};
use dbadmin_interchange::{CsvTransfer, CsvTransferError};
use dbadmin_objects::{
    build_delete, build_insert, build_routine_call, build_select_all, build_select_by_key,
    build_update,
};

use crate::error::{ServiceError, ServiceResult};
use crate::outcome::QueryOutcome;

/// Label used for failures of ad-hoc console input
const CONSOLE: &str = "console";

/// Service for generic table, routine and file operations
///
/// Metadata is looked up on every call; nothing is cached between operations.
pub struct DataService {
    connection: Arc<dyn Connection>,
    transfer: CsvTransfer,
}

impl DataService {
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            transfer: CsvTransfer::new(connection.clone()),
            connection,
        }
    }

    /// Read and write CSV files in `data_dir` instead of the server-reported
    /// data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.transfer = CsvTransfer::new(self.connection.clone()).with_data_dir(data_dir);
        self
    }

    fn introspection(&self) -> ServiceResult<&dyn SchemaIntrospection> {
        self.connection
            .as_schema_introspection()
            .ok_or(ServiceError::SchemaNotSupported)
    }

    /// Run generated SQL, reporting failures against `object`
    async fn execute(&self, object: &str, sql: &str) -> ServiceResult<TabularResult> {
        self.connection.query(sql).await.map_err(|e| {
            tracing::warn!(object = %object, error = %e, "statement failed");
            ServiceError::InvalidQuery(object.to_string())
        })
    }

    async fn primary_key_column(&self, table: &str) -> ServiceResult<Option<String>> {
        self.introspection()?
            .primary_key_column(table)
            .await
            .map_err(|e| {
                tracing::warn!(table = %table, error = %e, "primary key lookup failed");
                ServiceError::InvalidQuery(table.to_string())
            })
    }

    async fn require_primary_key_column(&self, table: &str) -> ServiceResult<String> {
        self.primary_key_column(table).await?.ok_or_else(|| {
            tracing::warn!(table = %table, "table has no primary key");
            ServiceError::NotFound(table.to_string())
        })
    }

    /// Check that the database answers at all
    pub async fn ping(&self) -> ServiceResult<()> {
        self.connection.ping().await.map_err(|e| {
            tracing::error!(error = %e, "database is unreachable");
            ServiceError::InvalidQuery(self.connection.driver_name().to_string())
        })
    }

    /// Run arbitrary SQL from the console
    pub async fn run_query(&self, query: &str) -> ServiceResult<QueryOutcome> {
        tracing::info!(query = %query, "run_query");

        let result = self.execute(CONSOLE, query).await?;
        Ok(QueryOutcome::from_result(result))
    }

    /// Names of the tables in the configured schema
    pub async fn list_tables(&self) -> ServiceResult<Vec<String>> {
        tracing::info!("list_tables");

        self.introspection()?.list_tables().await.map_err(|e| {
            tracing::warn!(error = %e, "listing tables failed");
            ServiceError::InvalidQuery("tables".to_string())
        })
    }

    /// Full scan of a table, labelled with its name and primary-key position.
    ///
    /// A table without a primary key gets `columns.len()` as its key index.
    pub async fn get_table(&self, table: &str) -> ServiceResult<TabularResult> {
        tracing::info!(table = %table, "get_table");

        let mut result = self.execute(table, &build_select_all(table)).await?;
        let key_column = self.primary_key_column(table).await?.unwrap_or_default();

        result.primary_key_column_index = primary_key_column_index(&result.columns, &key_column);
        result.name = table.to_string();
        Ok(result)
    }

    /// The row of `table` whose primary key equals `key_value`
    pub async fn get_record(&self, table: &str, key_value: &str) -> ServiceResult<Record> {
        tracing::info!(table = %table, key_value = %key_value, "get_record");

        let key_column = self.require_primary_key_column(table).await?;
        let result = self
            .execute(table, &build_select_by_key(table, &key_column, key_value))
            .await?;
        let key_index = primary_key_column_index(&result.columns, &key_column);

        result.first_row_record(table, key_index).ok_or_else(|| {
            tracing::debug!(table = %table, key_value = %key_value, "no row with this key");
            ServiceError::NotFound(table.to_string())
        })
    }

    /// Blank record with one entry per column of `table`, for a create form
    pub async fn new_record(&self, table: &str) -> ServiceResult<Record> {
        tracing::info!(table = %table, "new_record");

        let result = self.get_table(table).await?;
        let mut record = Record::skeleton(table, result.columns);
        record.primary_key_column_index = result.primary_key_column_index;
        Ok(record)
    }

    /// Insert one row built from the record's pairs
    pub async fn create(&self, record: &Record) -> ServiceResult<()> {
        tracing::info!(table = %record.name, keys = ?record.keys, values = ?record.values, "create");

        self.execute(&record.name, &build_insert(record)).await?;
        Ok(())
    }

    /// Update the row addressed by the record's primary-key value
    pub async fn update(&self, record: &Record) -> ServiceResult<()> {
        tracing::info!(table = %record.name, keys = ?record.keys, values = ?record.values, "update");

        let key_column = self.require_primary_key_column(&record.name).await?;
        let sql = build_update(record, &key_column).ok_or_else(|| {
            tracing::warn!(table = %record.name, key_column = %key_column, "record lacks the key column");
            ServiceError::NotFound(record.name.clone())
        })?;

        self.execute(&record.name, &sql).await?;
        Ok(())
    }

    /// Delete the row of `table` whose primary key equals `key_value`
    pub async fn delete(&self, table: &str, key_value: &str) -> ServiceResult<()> {
        tracing::info!(table = %table, key_value = %key_value, "delete");

        let key_column = self.require_primary_key_column(table).await?;
        self.execute(table, &build_delete(table, &key_column, key_value))
            .await?;
        Ok(())
    }

    /// Routines that carry a catalog comment, as `routine`/`description` rows
    pub async fn list_routines(&self) -> ServiceResult<TabularResult> {
        tracing::info!("list_routines");

        self.introspection()?
            .list_documented_routines()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "listing routines failed");
                ServiceError::InvalidQuery("routines".to_string())
            })
    }

    /// Blank argument record for a routine's non-cursor `IN` parameters
    pub async fn get_routine(&self, routine: &str) -> ServiceResult<Record> {
        tracing::info!(routine = %routine, "get_routine");

        let parameters = self
            .introspection()?
            .routine_parameters(routine)
            .await
            .map_err(|e| {
                tracing::warn!(routine = %routine, error = %e, "parameter lookup failed");
                ServiceError::InvalidQuery(routine.to_string())
            })?;

        Ok(Record::skeleton(routine, parameters))
    }

    /// Invoke `record.name` with the record's pairs as named arguments
    pub async fn execute_routine(&self, record: &Record) -> ServiceResult<QueryOutcome> {
        tracing::info!(routine = %record.name, keys = ?record.keys, values = ?record.values, "execute_routine");

        let routine = record.name.as_str();
        let introspection = self.introspection()?;
        let lookup_failed = |e: dbadmin_core::AdminError| {
            tracing::warn!(routine = %routine, error = %e, "routine lookup failed");
            ServiceError::InvalidQuery(routine.to_string())
        };

        let kind = introspection.routine_kind(routine).await.map_err(lookup_failed)?;
        let cursor_parameter = match kind {
            RoutineKind::Procedure => introspection
                .cursor_parameter(routine)
                .await
                .map_err(lookup_failed)?,
            _ => None,
        };

        let Some(sql) = build_routine_call(kind, cursor_parameter, record) else {
            tracing::warn!(routine = %routine, kind = %kind, "unknown routine kind");
            return Err(ServiceError::UnsupportedRoutineKind(routine.to_string()));
        };

        let result = self.execute(routine, &sql).await?;
        Ok(QueryOutcome::from_result(result.with_name(routine)))
    }

    /// Write `result` to `<data dir>/<name>.csv` and return that path
    pub async fn export(&self, result: &TabularResult) -> ServiceResult<PathBuf> {
        tracing::info!(name = %result.name, rows = result.row_count(), "export");

        self.transfer.export_table(result).await.map_err(|e| {
            tracing::warn!(name = %result.name, error = %e, "export failed");
            match e {
                CsvTransferError::InvalidName(name) => ServiceError::InvalidName(name),
                _ => ServiceError::ExportFailed(result.name.clone()),
            }
        })
    }

    /// Load a CSV file already present in the data directory into `table`
    pub async fn import(&self, table: &str, file_name: &str) -> ServiceResult<()> {
        tracing::info!(table = %table, file_name = %file_name, "import");

        self.transfer
            .import_table(table, file_name)
            .await
            .map_err(|e| {
                tracing::warn!(table = %table, error = %e, "import failed");
                ServiceError::ImportFailed(table.to_string())
            })
    }

    /// Directory uploads must be written to before calling [`Self::import`]
    pub async fn data_directory(&self) -> ServiceResult<PathBuf> {
        self.transfer.data_directory().await.map_err(|e| {
            tracing::warn!(error = %e, "data directory lookup failed");
            ServiceError::InvalidQuery("data_directory".to_string())
        })
    }

    /// Path of `file_name` inside the data directory
    pub async fn data_file(&self, file_name: &str) -> ServiceResult<PathBuf> {
        Ok(self.data_directory().await?.join(file_name))
    }
}
