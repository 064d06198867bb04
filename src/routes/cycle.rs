use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{check_look_back, resolve_today, AppState, TodayQuery, MAX_MONTHS_TO_PREDICT};
use crate::{
    engine::{prediction::days_until, CycleDay, CycleEngine, UserCycleParameters},
    models::{CycleSummary, Forecast, ForecastRequest},
};

#[derive(Debug, Deserialize)]
pub struct DaysQuery {
    pub today: Option<NaiveDate>,
    pub months: Option<u32>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/cycle", get(get_cycle_summary))
        .route("/cycle/days", get(get_cycle_days))
        .route("/forecast", post(forecast))
        .with_state(state)
}

/// Dashboard numbers for one parameter snapshot.
pub fn summarize(engine: &CycleEngine, params: &UserCycleParameters, today: NaiveDate) -> CycleSummary {
    let next_period_date = engine.next_period_date(params, today);
    let fertile_window = engine.fertile_window(params, today);

    CycleSummary {
        today,
        last_period_start: params.last_period_start,
        effective_lengths: engine.validate(params),
        cycle_day: engine.current_cycle_day(params, today),
        phase: engine.current_phase(params, today),
        next_period_date,
        period_expected_in_days: next_period_date.map(|next| days_until(next, today)),
        in_fertile_window: fertile_window.contains(today),
        fertile_window,
    }
}

async fn get_cycle_summary(
    State(state): State<AppState>,
    Query(query): Query<TodayQuery>,
) -> Result<Json<CycleSummary>, StatusCode> {
    let profile = state.profile().await?;
    let today = query.resolve();
    let params = profile.cycle_parameters(today);

    Ok(Json(summarize(&state.engine, &params, today)))
}

async fn get_cycle_days(
    State(state): State<AppState>,
    Query(query): Query<DaysQuery>,
) -> Result<Json<Vec<CycleDay>>, StatusCode> {
    let profile = state.profile().await?;
    let today = resolve_today(query.today);
    let months = query.months.unwrap_or(state.months_to_predict).min(MAX_MONTHS_TO_PREDICT);
    let params = profile.cycle_parameters(today);
    check_look_back(&params, today)?;

    Ok(Json(state.engine.classify(&params, today, months)))
}

async fn forecast(
    State(state): State<AppState>,
    Json(body): Json<ForecastRequest>,
) -> Result<Json<Forecast>, StatusCode> {
    check_look_back(&body.params, body.today)?;
    let months = body
        .months_to_predict
        .unwrap_or(state.months_to_predict)
        .min(MAX_MONTHS_TO_PREDICT);
    let days = state.engine.classify(&body.params, body.today, months);

    Ok(Json(Forecast {
        summary: summarize(&state.engine, &body.params, body.today),
        days,
    }))
}
