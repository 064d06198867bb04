use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use super::AppState;
use crate::models::UserProfile;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(save_profile).delete(clear_profile))
        .with_state(state)
}

async fn get_profile(State(state): State<AppState>) -> Result<Json<UserProfile>, StatusCode> {
    Ok(Json(state.profile().await?))
}

async fn save_profile(State(state): State<AppState>, Json(body): Json<UserProfile>) -> Result<StatusCode, StatusCode> {
    state.store.save(&state.storage_key, &body).await.map_err(|e| {
        tracing::error!("❌ Failed to save profile: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(key = %state.storage_key, "profile saved");
    Ok(StatusCode::NO_CONTENT)
}

async fn clear_profile(State(state): State<AppState>) -> Result<StatusCode, StatusCode> {
    let removed = state.store.clear(&state.storage_key).await.map_err(|e| {
        tracing::error!("❌ Failed to clear profile: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(key = %state.storage_key, removed, "profile cleared");
    Ok(StatusCode::NO_CONTENT)
}
