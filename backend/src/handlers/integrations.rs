//! HTTP handlers for third-party integrations

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppResult;
use crate::services::integrations::{map_embed, MapEmbed};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct YoutubeQuery {
    pub q: String,
    pub max_results: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub num: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct MapEmbedQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub q: Option<String>,
}

/// Search YouTube videos
pub async fn youtube_search(
    State(state): State<AppState>,
    Query(query): Query<YoutubeQuery>,
) -> AppResult<Json<Value>> {
    let results = state
        .integrations
        .youtube_search(&query.q, query.max_results)
        .await?;
    Ok(Json(results))
}

/// Search the web with Google Custom Search
pub async fn google_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let results = state.integrations.google_search(&query.q, query.num).await?;
    Ok(Json(results))
}

/// Build a Google Maps embed URL
pub async fn get_map_embed(Query(query): Query<MapEmbedQuery>) -> AppResult<Json<MapEmbed>> {
    let embed = map_embed(query.lat, query.lon, query.q.as_deref())?;
    Ok(Json(embed))
}
