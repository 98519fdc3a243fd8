//! Word data feed endpoints

use axum::{extract::State, Json};
use deck_core::{RatingReport, VersionInfo, WordRecord};

use crate::error::Result;
use crate::AppState;

/// GET /data/vocab.json
pub async fn vocab(State(state): State<AppState>) -> Result<Json<Vec<WordRecord>>> {
    let words = state.feed.words().await?;
    tracing::debug!(words = words.len(), "serving vocab");
    Ok(Json(words))
}

/// GET /data/latest.json
pub async fn latest(State(state): State<AppState>) -> Result<Json<VersionInfo>> {
    Ok(Json(state.feed.latest().await?))
}

/// GET /data/report.json
pub async fn report(State(state): State<AppState>) -> Result<Json<RatingReport>> {
    Ok(Json(state.feed.report().await?))
}
