//! Query record service
//!
//! Persists user-initiated weather queries together with the payload fetched
//! for them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use shared::{validate_location_query, QueryKind, RecordQuery};

use super::weather::{FetchedWeather, WeatherService};
use crate::error::{AppError, AppResult};

const RECORD_COLUMNS: &str = "id, input_location, resolved_name, latitude, longitude, kind, \
     start_date, end_date, result_payload, created_at, updated_at";

/// Record service for managing stored weather queries
#[derive(Clone)]
pub struct RecordService {
    db: PgPool,
    weather: WeatherService,
}

/// Raw row from the `query_records` table
#[derive(Debug, FromRow)]
struct QueryRecordRow {
    id: Uuid,
    input_location: String,
    resolved_name: Option<String>,
    latitude: f64,
    longitude: f64,
    kind: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    result_payload: Option<Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// A stored query with its decoded kind
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub id: Uuid,
    pub input_location: String,
    pub resolved_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub query: RecordQuery,
    pub result_payload: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<QueryRecordRow> for QueryRecord {
    type Error = AppError;

    fn try_from(row: QueryRecordRow) -> Result<Self, Self::Error> {
        let kind: QueryKind = row.kind.parse().map_err(|e| {
            AppError::Internal(format!("Record {} has an invalid kind: {}", row.id, e))
        })?;
        let query = RecordQuery::from_parts(kind, row.start_date, row.end_date).map_err(|e| {
            AppError::Internal(format!("Record {} is inconsistent: {}", row.id, e))
        })?;

        Ok(QueryRecord {
            id: row.id,
            input_location: row.input_location,
            resolved_name: row.resolved_name,
            latitude: row.latitude,
            longitude: row.longitude,
            query,
            result_payload: row.result_payload,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Flat record view used by listings and exports
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecordSummary {
    pub id: Uuid,
    pub input_location: String,
    pub resolved_name: Option<String>,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub kind: QueryKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Full record including the fetched payload
#[derive(Debug, Clone, Serialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub summary: RecordSummary,
    pub result_payload: Option<Value>,
}

impl From<&QueryRecord> for RecordSummary {
    fn from(record: &QueryRecord) -> Self {
        let range = record.query.date_range();
        RecordSummary {
            id: record.id,
            input_location: record.input_location.clone(),
            resolved_name: record.resolved_name.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            kind: record.query.kind(),
            start_date: range.map(|r| r.start()),
            end_date: range.map(|r| r.end()),
            created_at: record.created_at,
        }
    }
}

impl From<QueryRecord> for RecordDetail {
    fn from(record: QueryRecord) -> Self {
        RecordDetail {
            summary: RecordSummary::from(&record),
            result_payload: record.result_payload,
        }
    }
}

/// Input for creating a record
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRecordInput {
    #[validate(length(min = 1, message = "Location is required"))]
    pub input_location: String,
    #[serde(default)]
    pub kind: QueryKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Input for updating a record
#[derive(Debug, Deserialize)]
pub struct UpdateRecordInput {
    pub input_location: Option<String>,
    pub resolved_name: Option<String>,
    pub kind: Option<QueryKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_refetch")]
    pub refetch: bool,
}

fn default_refetch() -> bool {
    true
}

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
}

impl ExportFormat {
    pub fn parse(format: &str) -> AppResult<Self> {
        match format.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            other => Err(AppError::validation(
                "format",
                format!("Unsupported export format: {}", other),
            )),
        }
    }
}

impl RecordService {
    pub fn new(db: PgPool, weather: WeatherService) -> Self {
        Self { db, weather }
    }

    /// Fetch weather for the input and store it as a new record
    ///
    /// Nothing is stored when the fetch fails.
    pub async fn create(&self, input: CreateRecordInput) -> AppResult<RecordDetail> {
        input.validate()?;

        let input_location = input.input_location.trim().to_string();
        validate_location_query(&input_location)
            .map_err(|msg| AppError::validation("input_location", msg))?;
        let query = RecordQuery::from_parts(input.kind, input.start_date, input.end_date)?;
        let fetched = self.weather.fetch_for_query(&input_location, query).await?;
        let range = query.date_range();

        let row = sqlx::query_as::<_, QueryRecordRow>(&format!(
            r#"
            INSERT INTO query_records
                (input_location, resolved_name, latitude, longitude, kind, start_date, end_date, result_payload)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(&input_location)
        .bind(&fetched.resolved.display_name)
        .bind(fetched.resolved.latitude)
        .bind(fetched.resolved.longitude)
        .bind(query.kind().as_str())
        .bind(range.map(|r| r.start()))
        .bind(range.map(|r| r.end()))
        .bind(&fetched.payload)
        .fetch_one(&self.db)
        .await?;

        let record = QueryRecord::try_from(row)?;
        tracing::info!(record_id = %record.id, kind = %query.kind(), "Stored query record");

        Ok(record.into())
    }

    /// Get a record by ID
    pub async fn get(&self, record_id: Uuid) -> AppResult<RecordDetail> {
        let row = sqlx::query_as::<_, QueryRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM query_records WHERE id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Record".to_string()))?;

        Ok(QueryRecord::try_from(row)?.into())
    }

    /// List all records, newest first
    pub async fn list(&self) -> AppResult<Vec<RecordSummary>> {
        let rows = sqlx::query_as::<_, QueryRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM query_records ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter()
            .map(|row| QueryRecord::try_from(row).map(|record| RecordSummary::from(&record)))
            .collect()
    }

    /// Apply changes to a record, re-fetching its payload unless told not to
    ///
    /// The fetch runs without holding a lock. The row is locked only for the
    /// write, which fails with `Conflict` if someone else updated it meanwhile.
    pub async fn update(&self, record_id: Uuid, input: UpdateRecordInput) -> AppResult<RecordDetail> {
        let row = sqlx::query_as::<_, QueryRecordRow>(&format!(
            "SELECT {RECORD_COLUMNS} FROM query_records WHERE id = $1"
        ))
        .bind(record_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Record".to_string()))?;

        let mut record = QueryRecord::try_from(row)?;
        apply_update(&mut record, &input)?;

        if input.refetch {
            let fetched = self
                .weather
                .fetch_for_query(&record.input_location, record.query)
                .await?;
            apply_fetched(&mut record, fetched);
        }

        let mut tx = self.db.begin().await?;

        let locked_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT updated_at FROM query_records WHERE id = $1 FOR UPDATE",
        )
        .bind(record_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Record".to_string()))?;

        if locked_at != record.updated_at {
            tracing::warn!(%record_id, "Record changed while update was in flight");
            return Err(AppError::Conflict(
                "Record was modified concurrently, retry the update".to_string(),
            ));
        }

        let range = record.query.date_range();
        let row = sqlx::query_as::<_, QueryRecordRow>(&format!(
            r#"
            UPDATE query_records
            SET input_location = $2, resolved_name = $3, latitude = $4, longitude = $5,
                kind = $6, start_date = $7, end_date = $8, result_payload = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        ))
        .bind(record.id)
        .bind(&record.input_location)
        .bind(&record.resolved_name)
        .bind(record.latitude)
        .bind(record.longitude)
        .bind(record.query.kind().as_str())
        .bind(range.map(|r| r.start()))
        .bind(range.map(|r| r.end()))
        .bind(&record.result_payload)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(%record_id, refetched = input.refetch, "Updated query record");

        Ok(QueryRecord::try_from(row)?.into())
    }

    /// Delete a record
    pub async fn delete(&self, record_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM query_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Record".to_string()));
        }

        tracing::info!(%record_id, "Deleted query record");
        Ok(())
    }

    /// Export all records in the given format
    pub async fn export(&self, format: ExportFormat) -> AppResult<String> {
        let records = self.list().await?;
        match format {
            ExportFormat::Csv => export_to_csv(&records),
        }
    }
}

/// Fold requested changes into a record
///
/// Dates left out carry over from the stored range.
fn apply_update(record: &mut QueryRecord, input: &UpdateRecordInput) -> AppResult<()> {
    if let Some(location) = &input.input_location {
        let location = location.trim();
        validate_location_query(location)
            .map_err(|msg| AppError::validation("input_location", msg))?;
        record.input_location = location.to_string();
    }
    if let Some(name) = &input.resolved_name {
        record.resolved_name = Some(name.clone());
    }

    let current_range = record.query.date_range();
    let kind = input.kind.unwrap_or_else(|| record.query.kind());
    let start_date = input.start_date.or(current_range.map(|r| r.start()));
    let end_date = input.end_date.or(current_range.map(|r| r.end()));
    record.query = RecordQuery::from_parts(kind, start_date, end_date)?;

    Ok(())
}

fn apply_fetched(record: &mut QueryRecord, fetched: FetchedWeather) {
    record.resolved_name = Some(fetched.resolved.display_name);
    record.latitude = fetched.resolved.latitude;
    record.longitude = fetched.resolved.longitude;
    record.result_payload = Some(fetched.payload);
}

/// Serialize records as CSV, one row per record
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)
            .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}
