//! Cycle forecasting: a pure prediction engine plus the small HTTP service
//! that serves it next to a local profile store.

pub mod config;
pub mod engine;
pub mod models;
pub mod routes;
pub mod storage;

pub use self::routes::{app, AppState};
