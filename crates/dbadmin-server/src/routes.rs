//! HTTP routes
//!
//! Thin handlers: each one validates its input, calls one [`DataService`]
//! operation, and renders the result as JSON.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dbadmin_core::{Record, TabularResult};
use dbadmin_services::{DataService, QueryOutcome, ServiceError};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Largest accepted CSV upload
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

type ApiResult<T> = Result<T, ApiError>;

/// Build the application router around a shared service
pub fn router(service: Arc<DataService>) -> Router {
    Router::new()
        .route("/tables", get(list_tables))
        .route("/tables/{table}", get(get_table))
        .route("/tables/{table}/new", get(new_record))
        .route("/tables/{table}/records/{key}", get(get_record))
        .route(
            "/records",
            post(create_record).put(update_record).delete(delete_record),
        )
        .route("/console", post(run_console))
        .route("/routines", get(list_routines).post(execute_routine))
        .route("/routines/{name}", get(get_routine))
        .route("/export", post(export))
        .route("/import/{table}", post(import))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

/// Random label for results that do not come from a named table
fn placeholder_name() -> String {
    Uuid::new_v4().simple().to_string()
}

fn outcome_response(outcome: QueryOutcome) -> Response {
    match outcome {
        QueryOutcome::Rows(result) => Json(result).into_response(),
        QueryOutcome::Completed => Json(serde_json::json!({ "status": "success" })).into_response(),
    }
}

async fn list_tables(State(service): State<Arc<DataService>>) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(service.list_tables().await?))
}

async fn get_table(
    State(service): State<Arc<DataService>>,
    Path(table): Path<String>,
) -> ApiResult<Json<TabularResult>> {
    let mut result = service.get_table(&table).await?;
    result.is_editable = true;
    Ok(Json(result))
}

async fn new_record(
    State(service): State<Arc<DataService>>,
    Path(table): Path<String>,
) -> ApiResult<Json<Record>> {
    Ok(Json(service.new_record(&table).await?))
}

async fn get_record(
    State(service): State<Arc<DataService>>,
    Path((table, key)): Path<(String, String)>,
) -> ApiResult<Json<Record>> {
    Ok(Json(service.get_record(&table, &key).await?))
}

async fn create_record(
    State(service): State<Arc<DataService>>,
    Json(record): Json<Record>,
) -> ApiResult<StatusCode> {
    ensure_aligned(&record)?;
    service.create(&record).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_record(
    State(service): State<Arc<DataService>>,
    Json(record): Json<Record>,
) -> ApiResult<StatusCode> {
    ensure_aligned(&record)?;
    service.update(&record).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_record(
    State(service): State<Arc<DataService>>,
    Json(record): Json<Record>,
) -> ApiResult<StatusCode> {
    let key_value = record
        .key_value()
        .ok_or_else(|| ServiceError::EmptyInput("primary key value".to_string()))?;
    service.delete(&record.name, key_value).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn ensure_aligned(record: &Record) -> ApiResult<()> {
    if record.is_aligned() {
        Ok(())
    } else {
        Err(ServiceError::EmptyInput("values for every key".to_string()).into())
    }
}

#[derive(Debug, Deserialize)]
struct ConsoleRequest {
    #[serde(default)]
    query: String,
}

async fn run_console(
    State(service): State<Arc<DataService>>,
    Json(request): Json<ConsoleRequest>,
) -> ApiResult<Response> {
    if request.query.trim().is_empty() {
        return Err(ServiceError::EmptyInput("query".to_string()).into());
    }

    let outcome = service.run_query(&request.query).await?;
    Ok(outcome_response(outcome.with_name(placeholder_name())))
}

async fn list_routines(
    State(service): State<Arc<DataService>>,
) -> ApiResult<Json<TabularResult>> {
    Ok(Json(service.list_routines().await?))
}

async fn get_routine(
    State(service): State<Arc<DataService>>,
    Path(name): Path<String>,
) -> ApiResult<Json<Record>> {
    Ok(Json(service.get_routine(&name).await?))
}

async fn execute_routine(
    State(service): State<Arc<DataService>>,
    Json(record): Json<Record>,
) -> ApiResult<Response> {
    if record.name.trim().is_empty() {
        return Err(ServiceError::EmptyInput("routine name".to_string()).into());
    }
    ensure_aligned(&record)?;

    let outcome = service.execute_routine(&record).await?;
    Ok(outcome_response(outcome.with_name(placeholder_name())))
}

async fn export(
    State(service): State<Arc<DataService>>,
    Json(result): Json<TabularResult>,
) -> ApiResult<Response> {
    if result.name.trim().is_empty() {
        return Err(ServiceError::EmptyInput("result name".to_string()).into());
    }

    let path = service.export(&result).await?;
    let contents = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "exported file is not readable");
        ServiceError::ExportFailed(result.name.clone())
    })?;

    let disposition = format!("attachment; filename=\"{}.csv\"", result.name);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        contents,
    )
        .into_response())
}

async fn import(
    State(service): State<Arc<DataService>>,
    Path(table): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    if body.is_empty() {
        return Err(ServiceError::EmptyInput("file".to_string()).into());
    }

    let file_name = format!("{}.csv", placeholder_name());
    let path = service.data_file(&file_name).await?;
    tokio::fs::write(&path, &body).await.map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "failed to store upload");
        ServiceError::ImportFailed(table.clone())
    })?;

    let imported = service.import(&table, &file_name).await;
    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove upload");
    }

    imported?;
    Ok(StatusCode::NO_CONTENT)
}
