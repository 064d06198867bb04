use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::{AppState, TodayQuery};
use crate::{
    engine::tips::{health_tips, HealthTip, TipContext},
    models::PhaseOverview,
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/insights/phases", get(get_phases))
        .route("/insights/tips", get(get_tips))
        .with_state(state)
}

async fn get_phases(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<PhaseOverview>, StatusCode> {
    let profile = state.profile().await?;
    let today = query.resolve();
    let params = profile.cycle_parameters(today);

    Ok(Json(PhaseOverview {
        cycle_day: state.engine.current_cycle_day(&params, today),
        current: state.engine.current_phase(&params, today),
        phases: state.engine.phases(&params),
    }))
}

async fn get_tips(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<Vec<HealthTip>>, StatusCode> {
    let profile = state.profile().await?;
    let today = query.resolve();
    let params = profile.cycle_parameters(today);

    let context = TipContext {
        phase: state.engine.current_phase(&params, today).name,
        age: params.age,
        stress_level: profile.stress_level,
        activity_level: profile.activity_level,
    };
    Ok(Json(health_tips(&context)))
}
