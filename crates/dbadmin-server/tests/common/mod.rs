//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use dbadmin_core::{
    AdminError, Connection, Result, RoutineKind, SchemaIntrospection, TabularResult,
};
use std::sync::Arc;

/// Mock connection answering a fixed `peers` table and a couple of routines.
///
/// `SELECT * FROM peers` returns all rows, `... WHERE nickname = 'x'` the
/// matching ones; statements containing a failing pattern return
/// `InvalidQuery`; everything else returns the first pattern-matched
/// response or an empty result.
pub struct MockConnection {
    pub peers: TabularResult,
    pub failing_patterns: Vec<String>,
    pub query_responses: Vec<(String, TabularResult)>,
    pub data_dir: String,
    pub query_log: Arc<parking_lot::Mutex<Vec<String>>>,
    /// Contents of each file `import_table` was asked to load
    pub imported_files: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self {
            peers: peers(),
            failing_patterns: vec![],
            query_responses: vec![],
            data_dir: String::new(),
            query_log: Arc::new(parking_lot::Mutex::new(Vec::new())),
            imported_files: Arc::new(parking_lot::Mutex::new(Vec::new())),
        }
    }

    pub fn with_failing_pattern(mut self, sql_contains: impl Into<String>) -> Self {
        self.failing_patterns.push(sql_contains.into());
        self
    }

    pub fn with_query_response(mut self, sql_contains: impl Into<String>, result: TabularResult) -> Self {
        self.query_responses.push((sql_contains.into(), result));
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

    pub fn imported_files(&self) -> Vec<String> {
        self.imported_files.lock().clone()
    }
}

#[async_trait]
impl Connection for MockConnection {
    fn driver_name(&self) -> &str {
        "mock"
    }

    async fn query(&self, sql: &str) -> Result<TabularResult> {
        self.query_log.lock().push(sql.to_string());

        if let Some(rest) = sql.strip_prefix("CALL import_table('") {
            let file_name = rest.split('\'').next().unwrap_or_default();
            let path = std::path::Path::new(&self.data_dir).join(file_name);
            let contents = std::fs::read_to_string(path).unwrap_or_default();
            self.imported_files.lock().push(contents);
        }

        if self.failing_patterns.iter().any(|p| sql.contains(p.as_str())) {
            return Err(AdminError::InvalidQuery("Query failed".into()));
        }

        if sql == "SELECT * FROM peers" {
            return Ok(self.peers.clone());
        }
        if let Some(key) = sql.strip_prefix("SELECT * FROM peers WHERE nickname = ") {
            let key = key.trim_matches('\'');
            let rows = self
                .peers
                .rows
                .iter()
                .filter(|row| row[0] == key)
                .cloned()
                .collect();
            return Ok(TabularResult::new(self.peers.columns.clone(), rows));
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
        Ok(vec!["peers".to_string()])
    }

    async fn primary_key_column(&self, table: &str) -> Result<Option<String>> {
        Ok((table == "peers").then(|| "nickname".to_string()))
    }

    async fn routine_kind(&self, routine: &str) -> Result<RoutineKind> {
        Ok(match routine.to_lowercase().as_str() {
            "fnc_points" => RoutineKind::Function,
            "prc_noop" => RoutineKind::Procedure,
            _ => RoutineKind::Unknown,
        })
    }

    async fn cursor_parameter(&self, _routine: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn routine_parameters(&self, routine: &str) -> Result<Vec<String>> {
        Ok(match routine {
            "fnc_points" => vec!["peer".to_string()],
            _ => vec![],
        })
    }

    async fn list_documented_routines(&self) -> Result<TabularResult> {
        Ok(TabularResult::new(
            vec!["routine".into(), "description".into()],
            vec![vec!["fnc_points".into(), "Points of a peer".into()]],
        ))
    }

    async fn data_directory(&self) -> Result<String> {
        Ok(self.data_dir.clone())
    }
}

pub fn peers() -> TabularResult {
    TabularResult::new(
        vec!["nickname".into(), "email".into()],
        vec![
            vec!["ann".into(), "ann@school.io".into()],
            vec!["bob".into(), "".into()],
        ],
    )
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
