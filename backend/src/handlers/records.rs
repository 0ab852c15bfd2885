//! HTTP handlers for query record endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::records::{
    CreateRecordInput, ExportFormat, RecordDetail, RecordService, RecordSummary, UpdateRecordInput,
};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

fn record_service(state: AppState) -> RecordService {
    RecordService::new(state.db, state.weather)
}

/// List all records, newest first
pub async fn list_records(State(state): State<AppState>) -> AppResult<Json<Vec<RecordSummary>>> {
    let records = record_service(state).list().await?;
    Ok(Json(records))
}

/// Create a record by fetching weather for the input
pub async fn create_record(
    State(state): State<AppState>,
    Json(input): Json<CreateRecordInput>,
) -> AppResult<(StatusCode, Json<RecordDetail>)> {
    let record = record_service(state).create(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get a record by ID
pub async fn get_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<Json<RecordDetail>> {
    let record = record_service(state).get(record_id).await?;
    Ok(Json(record))
}

/// Update a record
pub async fn update_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
    Json(input): Json<UpdateRecordInput>,
) -> AppResult<Json<RecordDetail>> {
    let record = record_service(state).update(record_id, input).await?;
    Ok(Json(record))
}

/// Delete a record
pub async fn delete_record(
    State(state): State<AppState>,
    Path(record_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    record_service(state).delete(record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Export all records
pub async fn export_records(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> AppResult<impl IntoResponse> {
    let format = ExportFormat::parse(query.format.as_deref().unwrap_or("csv"))?;
    let body = record_service(state).export(format).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"weather_records.csv\"",
            ),
        ],
        body,
    ))
}
