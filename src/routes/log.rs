use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::AppState;
use crate::models::{DailyLog, LogEntry, LoggedDay, SymptomsByDate};

/// Optional inclusive date range for listing the log.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/log", get(get_log))
        .route("/log/symptoms", get(get_symptoms_grouped))
        .route("/log/:date", get(get_entry).put(save_entry).delete(delete_entry))
        .with_state(state)
}

async fn load_log(state: &AppState) -> Result<DailyLog, StatusCode> {
    state.store.load_log(&state.log_key).await.map_err(|e| {
        tracing::error!("❌ Failed to load log: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn get_log(
    State(state): State<AppState>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<LoggedDay>>, StatusCode> {
    let log = load_log(&state).await?;

    // Newest first.
    let days = log
        .into_iter()
        .rev()
        .filter(|(date, _)| range.from.map_or(true, |from| *date >= from))
        .filter(|(date, _)| range.to.map_or(true, |to| *date <= to))
        .map(|(logged_at, entry)| LoggedDay { logged_at, entry })
        .collect();

    Ok(Json(days))
}

async fn get_symptoms_grouped(State(state): State<AppState>) -> Result<Json<Vec<SymptomsByDate>>, StatusCode> {
    let log = load_log(&state).await?;

    let grouped = log
        .into_iter()
        .rev()
        .filter(|(_, entry)| !entry.symptoms.is_empty())
        .map(|(logged_at, entry)| SymptomsByDate {
            logged_at,
            symptoms: entry.symptoms.into_iter().collect(),
        })
        .collect();

    Ok(Json(grouped))
}

async fn get_entry(State(state): State<AppState>, Path(date): Path<NaiveDate>) -> Result<Json<LogEntry>, StatusCode> {
    let mut log = load_log(&state).await?;
    log.remove(&date).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn save_entry(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(entry): Json<LogEntry>,
) -> Result<StatusCode, StatusCode> {
    if !entry.is_valid() {
        tracing::warn!(%date, "log entry rating out of range");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    state.store.save_log_entry(&state.log_key, date, &entry).await.map_err(|e| {
        tracing::error!("❌ Failed to save log entry: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(%date, "log entry saved");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_entry(State(state): State<AppState>, Path(date): Path<NaiveDate>) -> Result<StatusCode, StatusCode> {
    let removed = state.store.remove_log_entry(&state.log_key, date).await.map_err(|e| {
        tracing::error!("❌ Failed to delete log entry: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
