pub mod calendar;
pub mod cycle;
pub mod insights;
pub mod log;
pub mod profile;

use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Router};
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    config::EngineSettings,
    engine::{CycleEngine, UserCycleParameters},
    models::UserProfile,
    storage::ProfileStore,
};

/// Upper bound on the look-ahead a request may ask for.
pub const MAX_MONTHS_TO_PREDICT: u32 = 120;

/// How far before `today` a last period may start and still be classified.
pub const MAX_MONTHS_LOOK_BACK: u32 = 120;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub engine: Arc<CycleEngine>,
    pub storage_key: Arc<str>,
    pub log_key: Arc<str>,
    pub months_to_predict: u32,
}

impl AppState {
    pub fn new(store: Arc<dyn ProfileStore>, settings: EngineSettings) -> AppState {
        AppState {
            store,
            engine: Arc::new(CycleEngine::new(settings.policy)),
            storage_key: settings.storage_key.into(),
            log_key: settings.log_key.into(),
            months_to_predict: settings.months_to_predict,
        }
    }

    /// The stored profile, or the default profile when nothing is stored yet.
    pub(crate) async fn profile(&self) -> Result<UserProfile, StatusCode> {
        let stored = self.store.load(&self.storage_key).await.map_err(|e| {
            tracing::error!("❌ Failed to load profile: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
        Ok(stored.unwrap_or_default())
    }
}

/// Optional reference day; the server's UTC date when absent.
#[derive(Debug, Default, Deserialize)]
pub struct TodayQuery {
    pub today: Option<NaiveDate>,
}

impl TodayQuery {
    pub fn resolve(&self) -> NaiveDate {
        resolve_today(self.today)
    }
}

pub(crate) fn resolve_today(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Utc::now().date_naive())
}

/// Day lists are generated from the recorded period start onwards, so a start
/// too far before `today` is refused with 422.
pub(crate) fn check_look_back(params: &UserCycleParameters, today: NaiveDate) -> Result<(), StatusCode> {
    let Some(start) = params.last_period_start else {
        return Ok(());
    };
    let earliest = today
        .checked_sub_months(Months::new(MAX_MONTHS_LOOK_BACK))
        .unwrap_or(NaiveDate::MIN);
    if start < earliest {
        tracing::warn!(%start, %today, "last period start is beyond the look-back limit");
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    Ok(())
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(profile::routes(state.clone()))
        .merge(cycle::routes(state.clone()))
        .merge(calendar::routes(state.clone()))
        .merge(log::routes(state.clone()))
        .merge(insights::routes(state))
        .route("/health", get(|| async { "✅ Backend up" }))
}
