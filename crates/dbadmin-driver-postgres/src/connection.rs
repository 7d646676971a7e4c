//! PostgreSQL connection implementation

use async_trait::async_trait;
use dbadmin_core::{AdminError, Connection, Result, SchemaIntrospection, TabularResult};
use postgres_native_tls::MakeTlsConnector;
use tokio::sync::Mutex;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage, SimpleQueryRow};

use crate::schema::quote_identifier;
use crate::tls::{TlsSettings, build_tls_connector};

pub(crate) fn format_postgres_error(error: &tokio_postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let code = db_error.code();
    let mut message = db_error.message().to_string();

    if let Some(detail) = db_error.detail() {
        if !detail.trim().is_empty() {
            message.push_str(&format!(" (detail: {})", detail));
        }
    }

    if let Some(hint) = db_error.hint() {
        if !hint.trim().is_empty() {
            message.push_str(&format!(" (hint: {})", hint));
        }
    }

    match code.code() {
        "23505" => format!("duplicate value violates unique constraint: {}", message),
        "23503" => format!("foreign key violation: {}", message),
        "23502" => format!("null value violates not-null constraint: {}", message),
        "22P02" => format!("invalid input syntax: {}", message),
        "42P01" => format!("undefined table: {}", message),
        "42601" => format!("syntax error: {}", message),
        _ => format!("{} (code: {:?})", message, code),
    }
}

/// Startup option that puts `schema` first on the session's `search_path`.
///
/// `public` stays reachable after it for the server-side helper routines.
fn search_path_option(schema: &str) -> String {
    let mut search_path = quote_identifier(schema);
    if schema != "public" {
        search_path.push_str(",public");
    }
    // Options are split on whitespace; backslash escapes a literal one.
    let search_path = search_path.replace('\\', "\\\\").replace(' ', "\\ ");
    format!("-c search_path={}", search_path)
}

/// PostgreSQL connection handle.
///
/// Holds connection parameters, not a live session: every call opens a fresh
/// session, runs its batch, and drops the session before returning. Calls are
/// serialized through `session_gate`, so at most one session is open at a time.
///
/// Every session resolves unqualified names in the administered schema first,
/// so generated statements and catalog lookups agree on which table they mean.
pub struct PostgresConnection {
    config: Config,
    tls: Option<MakeTlsConnector>,
    schema: String,
    session_gate: Mutex<()>,
}

impl PostgresConnection {
    /// Create a handle from a parsed config
    pub fn new(mut config: Config, tls: &TlsSettings, schema: impl Into<String>) -> Result<Self> {
        tls.apply(&mut config);
        let tls = build_tls_connector(tls).map_err(|e| AdminError::Configuration(e.to_string()))?;
        let schema = schema.into();

        let search_path = search_path_option(&schema);
        let options = match config.get_options() {
            Some(existing) if !existing.trim().is_empty() => format!("{} {}", existing, search_path),
            _ => search_path,
        };
        config.options(&options);

        tracing::info!(
            hosts = ?config.get_hosts(),
            database = ?config.get_dbname(),
            schema = %schema,
            tls = tls.is_some(),
            "PostgreSQL connection configured"
        );

        Ok(Self {
            config,
            tls,
            schema,
            session_gate: Mutex::new(()),
        })
    }

    /// Create a handle from a libpq-style or URL connection string
    pub fn from_connection_string(
        connection_string: &str,
        tls: &TlsSettings,
        schema: impl Into<String>,
    ) -> Result<Self> {
        let config = connection_string.parse::<Config>().map_err(|e| {
            AdminError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
        })?;
        Self::new(config, tls, schema)
    }

    /// Schema whose tables and routines are administered
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Open a session and spawn its connection task on the current runtime.
    ///
    /// The task ends once the returned client is dropped.
    async fn open_session(&self) -> Result<Client> {
        match &self.tls {
            Some(tls) => {
                let (client, connection) = self
                    .config
                    .connect(tls.clone())
                    .await
                    .map_err(|e| connect_error(&e))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::error!(error = %e, "PostgreSQL connection error");
                    }
                });
                Ok(client)
            }
            None => {
                let (client, connection) = self
                    .config
                    .connect(NoTls)
                    .await
                    .map_err(|e| connect_error(&e))?;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        tracing::error!(error = %e, "PostgreSQL connection error");
                    }
                });
                Ok(client)
            }
        }
    }
}

fn connect_error(error: &tokio_postgres::Error) -> AdminError {
    let message = format_postgres_error(error);
    tracing::warn!(error = %message, "failed to open PostgreSQL session");
    AdminError::Connection(format!("Failed to connect to PostgreSQL: {}", message))
}

#[async_trait]
impl Connection for PostgresConnection {
    fn driver_name(&self) -> &str {
        "postgresql"
    }

    #[tracing::instrument(skip(self, sql), fields(sql_preview = %sql.chars().take(100).collect::<String>()))]
    async fn query(&self, sql: &str) -> Result<TabularResult> {
        let _session = self.session_gate.lock().await;
        let start_time = std::time::Instant::now();

        let client = self.open_session().await?;

        // The simple-query protocol runs multi-statement batches and returns
        // every value in its text form.
        let messages = client.simple_query(sql).await.map_err(|e| {
            let message = format_postgres_error(&e);
            tracing::warn!(error = %message, query = %sql, "Incorrect query");
            AdminError::InvalidQuery(message)
        })?;

        drop(client);

        let result = first_result_set(messages);

        tracing::debug!(
            columns = result.column_count(),
            row_count = result.row_count(),
            execution_time_ms = start_time.elapsed().as_millis() as u64,
            "query executed successfully"
        );

        Ok(result)
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

/// Collect the first result set of a batch.
///
/// Statements without a row description (`BEGIN`, `CALL` with no output,
/// `COMMIT`) are skipped; once a described result set completes, later
/// statements are ignored.
fn first_result_set(messages: Vec<SimpleQueryMessage>) -> TabularResult {
    let mut columns: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(description) => {
                if columns.is_none() {
                    columns = Some(
                        description
                            .iter()
                            .map(|column| column.name().to_string())
                            .collect(),
                    );
                }
            }
            SimpleQueryMessage::Row(row) => {
                let columns = columns.get_or_insert_with(|| {
                    row.columns()
                        .iter()
                        .map(|column| column.name().to_string())
                        .collect()
                });
                rows.push(row_cells(&row, columns.len()));
            }
            SimpleQueryMessage::CommandComplete(_) => {
                if columns.is_some() {
                    break;
                }
            }
            _ => {}
        }
    }

    match columns {
        Some(columns) => TabularResult::new(columns, rows),
        None => TabularResult::empty(),
    }
}

/// Text cells of a row; SQL `NULL` becomes an empty string
fn row_cells(row: &SimpleQueryRow, width: usize) -> Vec<String> {
    (0..width)
        .map(|idx| {
            row.try_get(idx)
                .ok()
                .flatten()
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}
