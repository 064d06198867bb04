use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;

use super::{check_look_back, resolve_today, AppState, MAX_MONTHS_TO_PREDICT};
use crate::engine::calendar::{month_grid, week_start, week_strip, CalendarDayState, MonthCalendar, WEEK_STRIP_DAYS};

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub start: Option<NaiveDate>,
    pub today: Option<NaiveDate>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/calendar/month", get(get_month))
        .route("/calendar/week", get(get_week))
        .with_state(state)
}

async fn get_month(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthCalendar>, StatusCode> {
    let profile = state.profile().await?;
    let today = resolve_today(query.today);
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Err(StatusCode::NOT_FOUND);
    };
    // Classify far enough ahead to cover the trailing days of the grid.
    let grid_end = first.checked_add_months(Months::new(2)).unwrap_or(NaiveDate::MAX);
    let months_ahead = months_between(today, grid_end)
        .max(state.months_to_predict)
        .min(MAX_MONTHS_TO_PREDICT);

    let params = profile.cycle_parameters(today);
    check_look_back(&params, today)?;
    let days = state.engine.classify(&params, today, months_ahead);

    month_grid(year, month, &days, today)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn get_week(
    State(state): State<AppState>,
    Query(query): Query<WeekQuery>,
) -> Result<Json<Vec<CalendarDayState>>, StatusCode> {
    let profile = state.profile().await?;
    let today = resolve_today(query.today);
    let start = query
        .start
        .or_else(|| week_start(today))
        .ok_or(StatusCode::NOT_FOUND)?;

    let params = profile.cycle_parameters(today);
    check_look_back(&params, today)?;
    let days = state.engine.classify(&params, today, state.months_to_predict);

    Ok(Json(week_strip(start, WEEK_STRIP_DAYS, &days, today)))
}

/// Calendar months from `from` to `to`, plus one so the horizon reaches past `to`.
/// 0 when `to` is in an earlier month.
fn months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32 + 1;
    months.max(0) as u32
}
