//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Arc;
use dbadmin_core::{
    AdminError, Connection, Result, RoutineKind, SchemaIntrospection, TabularResult,
};

/// A routine known to the mock catalog
#[derive(Debug, Clone)]
pub struct MockRoutine {
    pub name: String,
    pub kind: RoutineKind,
    pub cursor_parameter: Option<String>,
    pub parameters: Vec<String>,
    pub description: Option<String>,
}

impl MockRoutine {
    pub fn function(name: &str, parameters: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: RoutineKind::Function,
            cursor_parameter: None,
            parameters: strings(parameters),
            description: None,
        }
    }

    pub fn procedure(name: &str, parameters: &[&str]) -> Self {
        Self {
            kind: RoutineKind::Procedure,
            ..Self::function(name, parameters)
        }
    }

    pub fn with_kind(mut self, kind: RoutineKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_cursor(mut self, cursor_parameter: &str) -> Self {
        self.cursor_parameter = Some(cursor_parameter.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Mock connection for testing service-layer logic without a real database.
///
/// Registered tables answer `SELECT * FROM <table>` and
/// `SELECT * FROM <table> WHERE <column> = '<value>'` by filtering their rows.
/// Other statements get the first pattern-matched response, or an empty
/// result. Every statement is recorded in `query_log`.
pub struct MockConnection {
    pub should_fail: bool,
    /// Statements containing any of these patterns fail with `InvalidQuery`
    pub failing_patterns: Vec<String>,
    /// SQL-pattern-based responses for statements that hit no table
    pub query_responses: Vec<(String, TabularResult)>,
    /// Table name, primary-key column, contents
    pub tables: Vec<(String, Option<String>, TabularResult)>,
    pub routines: Vec<MockRoutine>,
    pub data_dir: String,
    /// Log of all SQL statements executed, for assertion in tests
    pub query_log: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            failing_patterns: vec![],
            query_responses: vec![],
            tables: vec![],
            routines: vec![],
            data_dir: String::new(),
            query_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn with_failing_pattern(mut self, sql_contains: impl Into<String>) -> Self {
        self.failing_patterns.push(sql_contains.into());
        self
    }

    /// Register a response for statements containing the given SQL pattern.
    pub fn with_query_response(
        mut self,
        sql_contains: impl Into<String>,
        result: TabularResult,
    ) -> Self {
        self.query_responses.push((sql_contains.into(), result));
        self
    }

    pub fn with_table(mut self, name: &str, primary_key: Option<&str>, contents: TabularResult) -> Self {
        self.tables.push((
            name.to_string(),
            primary_key.map(str::to_string),
            contents,
        ));
        self
    }

    pub fn with_routine(mut self, routine: MockRoutine) -> Self {
        self.routines.push(routine);
        self
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<String>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    pub fn query_log(&self) -> Vec<String> {
        self.query_log.lock().clone()
    }

    pub fn last_query(&self) -> Option<String> {
        self.query_log.lock().last().cloned()
    }

    fn routine(&self, name: &str) -> Option<&MockRoutine> {
        let name = name.to_lowercase();
        self.routines.iter().find(|routine| routine.name == name)
    }

    fn scan(&self, sql: &str) -> Option<TabularResult> {
        let rest = sql.strip_prefix("SELECT * FROM ")?;
        let (table, filter) = match rest.split_once(" WHERE ") {
            Some((table, filter)) => (table, Some(filter)),
            None => (rest, None),
        };
        let (_, _, contents) = self.tables.iter().find(|(name, _, _)| name == table)?;

        let Some(filter) = filter else {
            return Some(contents.clone());
        };

        let (column, value) = filter.split_once(" = ")?;
        let value = value.trim_matches('\'');
        let idx = contents.column_index(column)?;
        let rows = contents
            .rows
            .iter()
            .filter(|row| row[idx] == value)
            .cloned()
            .collect();
        Some(TabularResult::new(contents.columns.clone(), rows))
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn query(&self, sql: &str) -> Result<TabularResult> {
        self.query_log.lock().push(sql.to_string());

        if self.should_fail || self.failing_patterns.iter().any(|p| sql.contains(p.as_str())) {
            return Err(AdminError::InvalidQuery("Query failed".into()));
        }

        if let Some(result) = self.scan(sql) {
            return Ok(result);
        }

        for (pattern, result) in &self.query_responses {
            if sql.contains(pattern.as_str()) {
                return Ok(result.clone());
            }
        }

        Ok(TabularResult::empty())
    }

    fn as_schema_introspection(&self) -> Option<&dyn SchemaIntrospection> {
        Some(self)
    }
}

#[async_trait]
impl SchemaIntrospection for MockConnection {
    async fn list_tables(&self) -> Result<Vec<String>> {
        if self.should_fail {
            return Err(AdminError::InvalidQuery("Failed to list tables".into()));
        }
        Ok(self.tables.iter().map(|(name, _, _)| name.clone()).collect())
    }

    async fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        if self.should_fail {
            return Err(AdminError::InvalidQuery("Failed to read primary key".into()));
        }
        Ok(self
            .tables
            .iter()
            .find(|(name, _, _)| name == table)
            .and_then(|(_, key, _)| key.clone()))
    }

    async fn routine_kind(&self, routine: &str) -> Result<RoutineKind> {
        if self.should_fail {
            return Err(AdminError::InvalidQuery("Failed to read routine kind".into()));
        }
        Ok(self
            .routine(routine)
            .map(|r| r.kind)
            .unwrap_or(RoutineKind::Unknown))
    }

    async fn cursor_parameter(&self, routine: &str) -> Result<Option<String>> {
        Ok(self.routine(routine).and_then(|r| r.cursor_parameter.clone()))
    }

    async fn routine_parameters(&self, routine: &str) -> Result<Vec<String>> {
        if self.should_fail {
            return Err(AdminError::InvalidQuery("Failed to read parameters".into()));
        }
        Ok(self
            .routine(routine)
            .map(|r| r.parameters.clone())
            .unwrap_or_default())
    }

    async fn list_documented_routines(&self) -> Result<TabularResult> {
        if self.should_fail {
            return Err(AdminError::InvalidQuery("Failed to list routines".into()));
        }
        let mut rows: Vec<Vec<String>> = self
            .routines
            .iter()
            .filter_map(|r| {
                r.description
                    .as_ref()
                    .map(|description| vec![r.name.clone(), description.clone()])
            })
            .collect();
        rows.sort();
        Ok(TabularResult::new(strings(&["routine", "description"]), rows))
    }

    async fn data_directory(&self) -> Result<String> {
        Ok(self.data_dir.clone())
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Create a result from string literals
pub fn mock_result(columns: &[&str], rows: &[&[&str]]) -> TabularResult {
    TabularResult::new(strings(columns), rows.iter().map(|row| strings(row)).collect())
}

pub fn peers() -> TabularResult {
    mock_result(
        &["nickname", "email", "birthday"],
        &[
            &["ann", "ann@school.io", "2001-04-02"],
            &["bob", "bob@school.io", "1999-12-31"],
            &["eve", "", "2000-06-15"],
        ],
    )
}

pub fn record(name: &str, keys: &[&str], values: &[&str]) -> dbadmin_core::Record {
    dbadmin_core::Record::new(name, 0, strings(keys), strings(values))
}

/// Route test logs through the test harness
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}
