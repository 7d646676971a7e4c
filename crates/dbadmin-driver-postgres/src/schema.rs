//! PostgreSQL schema introspection implementation
//!
//! Lookups run as plain text batches through [`Connection::query`], so names
//! are embedded as quoted literals instead of bound parameters.

use async_trait::async_trait;
use dbadmin_core::{Connection, Result, RoutineKind, SchemaIntrospection, TabularResult};

use crate::PostgresConnection;

/// Quote a value as a SQL string literal
pub(crate) fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Quote a name as a SQL identifier, preserving its case
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub(crate) fn list_tables_sql(schema: &str) -> String {
    format!(
        "SELECT table_name FROM information_schema.tables \
         WHERE table_schema = {} \
         ORDER BY table_name",
        quote_literal(schema)
    )
}

/// The table name is resolved with `to_regclass`, so it folds to lower case
/// unless quoted, exactly as in `SELECT * FROM <table>`.
pub(crate) fn primary_key_sql(schema: &str, table: &str) -> String {
    let qualified = format!("{}.{}", quote_identifier(schema), table);
    format!(
        "SELECT a.attname AS column_name \
         FROM pg_index i \
         JOIN pg_attribute a ON a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey) \
         WHERE i.indisprimary AND i.indrelid = to_regclass({}) \
         ORDER BY array_position(i.indkey::int2[], a.attnum)",
        quote_literal(&qualified)
    )
}

pub(crate) fn routine_kind_sql(schema: &str, routine: &str) -> String {
    format!(
        "SELECT p.prokind \
         FROM pg_proc p \
         JOIN pg_namespace n ON n.oid = p.pronamespace \
         WHERE n.nspname = {} AND p.proname = lower({})",
        quote_literal(schema),
        quote_literal(routine)
    )
}

fn in_parameters_sql(schema: &str, routine: &str, cursor: bool) -> String {
    let type_filter = if cursor { "=" } else { "<>" };
    format!(
        "SELECT p.parameter_name \
         FROM information_schema.routines r \
         LEFT JOIN information_schema.parameters p ON p.specific_name = r.specific_name \
         WHERE r.routine_schema = {} AND r.routine_name = lower({}) \
         AND p.parameter_mode = 'IN' AND p.data_type {} 'refcursor' \
         ORDER BY p.ordinal_position",
        quote_literal(schema),
        quote_literal(routine),
        type_filter
    )
}

pub(crate) fn cursor_parameter_sql(schema: &str, routine: &str) -> String {
    in_parameters_sql(schema, routine, true)
}

pub(crate) fn routine_parameters_sql(schema: &str, routine: &str) -> String {
    in_parameters_sql(schema, routine, false)
}

pub(crate) fn documented_routines_sql(schema: &str) -> String {
    format!(
        "WITH documented AS ( \
            SELECT p.proname AS routine, obj_description(p.oid, 'pg_proc') AS description \
            FROM pg_proc p \
            JOIN pg_namespace n ON n.oid = p.pronamespace \
            WHERE n.nspname = {} \
         ) \
         SELECT routine, description FROM documented \
         WHERE description IS NOT NULL \
         ORDER BY routine",
        quote_literal(schema)
    )
}

pub(crate) const DATA_DIRECTORY_SQL: &str = "SHOW data_directory";

#[async_trait]
impl SchemaIntrospection for PostgresConnection {
    #[tracing::instrument(skip(self))]
    async fn list_tables(&self) -> Result<Vec<String>> {
        let result = self.query(&list_tables_sql(self.schema())).await?;
        Ok(result.first_column())
    }

    #[tracing::instrument(skip(self))]
    async fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        let result = self.query(&primary_key_sql(self.schema(), table)).await?;
        let column = result.first_value().map(str::to_string);

        if column.is_none() {
            tracing::debug!(table = %table, "table has no primary key");
        }

        Ok(column)
    }

    #[tracing::instrument(skip(self))]
    async fn routine_kind(&self, routine: &str) -> Result<RoutineKind> {
        let result = self.query(&routine_kind_sql(self.schema(), routine)).await?;
        Ok(result
            .first_value()
            .map(RoutineKind::from_prokind)
            .unwrap_or(RoutineKind::Unknown))
    }

    #[tracing::instrument(skip(self))]
    async fn cursor_parameter(&self, routine: &str) -> Result<Option<String>> {
        let result = self
            .query(&cursor_parameter_sql(self.schema(), routine))
            .await?;
        Ok(result
            .first_value()
            .filter(|name| !name.is_empty())
            .map(str::to_string))
    }

    #[tracing::instrument(skip(self))]
    async fn routine_parameters(&self, routine: &str) -> Result<Vec<String>> {
        let result = self
            .query(&routine_parameters_sql(self.schema(), routine))
            .await?;
        Ok(result
            .first_column()
            .into_iter()
            .filter(|name| !name.is_empty())
            .collect())
    }

    #[tracing::instrument(skip(self))]
    async fn list_documented_routines(&self) -> Result<TabularResult> {
        self.query(&documented_routines_sql(self.schema())).await
    }

    #[tracing::instrument(skip(self))]
    async fn data_directory(&self) -> Result<String> {
        let result = self.query(DATA_DIRECTORY_SQL).await?;
        Ok(result.first_value().unwrap_or_default().to_string())
    }
}
