//! Cycle-prediction engine.
//!
//! Everything under this module is pure date arithmetic: callers pass the
//! user's cycle parameters and the reference day explicitly, and every
//! result is recomputed from scratch on each call.

pub mod calendar;
pub mod classifier;
pub mod phase;
pub mod prediction;
pub mod tips;
pub mod validator;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use self::validator::{EffectiveLengths, PolicyError, ValidationPolicy};

/// Months the classifier looks ahead of the reference day when the caller has no preference.
pub const DEFAULT_MONTHS_TO_PREDICT: u32 = 3;

/// Ovulation is placed this many days before the next period start.
pub const LUTEAL_DAYS: i64 = 14;

/// Fertile days counted before the ovulation day. The window runs from
/// `ovulation - FERTILE_DAYS_BEFORE_OVULATION` through the ovulation day.
pub const FERTILE_DAYS_BEFORE_OVULATION: i64 = 5;

/// The subset of the user profile the engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCycleParameters {
    pub last_period_start: Option<NaiveDate>,
    pub cycle_length: u32,
    pub period_length: u32,
    pub age: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    Period,
    Ovulation,
    Fertile,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleDay {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub day_type: DayType,
    pub predicted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseName {
    Menstrual,
    Follicular,
    Ovulatory,
    Luteal,
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Menstrual => write!(f, "menstrual"),
            Self::Follicular => write!(f, "follicular"),
            Self::Ovulatory => write!(f, "ovulatory"),
            Self::Luteal => write!(f, "luteal"),
        }
    }
}

/// A named day range inside one cycle. `start_day` and `end_day` are 1-based
/// and inclusive; a range with `start_day > end_day` is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePhase {
    pub name: PhaseName,
    pub start_day: u32,
    pub end_day: u32,
}

impl CyclePhase {
    pub fn contains(&self, cycle_day: u32) -> bool {
        self.start_day <= cycle_day && cycle_day <= self.end_day
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertileWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FertileWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }
}

/// Runs every engine query under one validation policy.
///
/// Raw parameters are validated on each call, so the queries always agree on
/// the effective cycle and period lengths.
#[derive(Debug, Clone, Default)]
pub struct CycleEngine {
    policy: ValidationPolicy,
}

impl CycleEngine {
    pub fn new(policy: ValidationPolicy) -> CycleEngine {
        CycleEngine { policy }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn validate(&self, params: &UserCycleParameters) -> EffectiveLengths {
        self.policy.validate(params)
    }

    pub fn classify(&self, params: &UserCycleParameters, today: NaiveDate, months_to_predict: u32) -> Vec<CycleDay> {
        let Some(last_period_start) = params.last_period_start else {
            return vec![];
        };
        classifier::classify_days(last_period_start, self.validate(params), today, months_to_predict)
    }

    pub fn current_cycle_day(&self, params: &UserCycleParameters, today: NaiveDate) -> u32 {
        let Some(last_period_start) = params.last_period_start else {
            return 0;
        };
        phase::cycle_day(last_period_start, self.validate(params), today)
    }

    pub fn phases(&self, params: &UserCycleParameters) -> [CyclePhase; 4] {
        phase::phases_for(self.validate(params))
    }

    pub fn current_phase(&self, params: &UserCycleParameters, today: NaiveDate) -> CyclePhase {
        let cycle_day = self.current_cycle_day(params, today);
        phase::resolve_phase(&self.phases(params), cycle_day)
    }

    pub fn next_period_date(&self, params: &UserCycleParameters, today: NaiveDate) -> Option<NaiveDate> {
        let last_period_start = params.last_period_start?;
        prediction::next_period_after(last_period_start, self.validate(params), today)
    }

    pub fn fertile_window(&self, params: &UserCycleParameters, today: NaiveDate) -> FertileWindow {
        prediction::fertile_window_before(self.next_period_date(params, today))
    }
}

/// [`CycleEngine::validate`] under the standard policy.
pub fn validate(params: &UserCycleParameters) -> EffectiveLengths {
    ValidationPolicy::standard().validate(params)
}

/// [`CycleEngine::classify`] under the standard policy.
pub fn classify(params: &UserCycleParameters, today: NaiveDate, months_to_predict: u32) -> Vec<CycleDay> {
    CycleEngine::default().classify(params, today, months_to_predict)
}

/// [`CycleEngine::current_cycle_day`] under the standard policy.
pub fn current_cycle_day(params: &UserCycleParameters, today: NaiveDate) -> u32 {
    CycleEngine::default().current_cycle_day(params, today)
}

/// [`CycleEngine::current_phase`] under the standard policy.
pub fn current_phase(params: &UserCycleParameters, today: NaiveDate) -> CyclePhase {
    CycleEngine::default().current_phase(params, today)
}

/// [`CycleEngine::next_period_date`] under the standard policy.
pub fn next_period_date(params: &UserCycleParameters, today: NaiveDate) -> Option<NaiveDate> {
    CycleEngine::default().next_period_date(params, today)
}

/// [`CycleEngine::fertile_window`] under the standard policy.
pub fn fertile_window(params: &UserCycleParameters, today: NaiveDate) -> FertileWindow {
    CycleEngine::default().fertile_window(params, today)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(last: Option<NaiveDate>) -> UserCycleParameters {
        UserCycleParameters {
            last_period_start: last,
            cycle_length: 28,
            period_length: 5,
            age: 30,
        }
    }

    #[test]
    fn scenario_today_is_period_start() {
        let p = params(Some(date(2024, 1, 1)));
        let today = date(2024, 1, 1);

        assert_eq!(current_cycle_day(&p, today), 1);
        assert_eq!(current_phase(&p, today).name, PhaseName::Menstrual);
        assert_eq!(next_period_date(&p, today), Some(today));
    }

    #[test]
    fn scenario_day_fifteen_is_ovulatory() {
        let p = params(Some(date(2024, 1, 1)));
        let today = date(2024, 1, 15);

        assert_eq!(current_cycle_day(&p, today), 15);
        assert_eq!(current_phase(&p, today).name, PhaseName::Ovulatory);
    }

    #[test]
    fn scenario_exactly_one_cycle_later() {
        let p = params(Some(date(2024, 1, 1)));
        let today = date(2024, 1, 29);

        assert_eq!(next_period_date(&p, today), Some(today));
    }

    #[test]
    fn missing_last_period_gives_sentinels() {
        let p = UserCycleParameters {
            last_period_start: None,
            cycle_length: 0,
            period_length: 99,
            age: 3,
        };
        let today = date(2024, 6, 1);

        assert!(classify(&p, today, DEFAULT_MONTHS_TO_PREDICT).is_empty());
        assert_eq!(current_cycle_day(&p, today), 0);
        assert_eq!(current_phase(&p, today).name, PhaseName::Menstrual);
        assert_eq!(next_period_date(&p, today), None);
        assert_eq!(fertile_window(&p, today), FertileWindow::default());
    }

    #[test]
    fn engine_uses_raw_lengths_only_after_validation() {
        // 60-day cycle is out of band and collapses to 28.
        let p = UserCycleParameters {
            cycle_length: 60,
            ..params(Some(date(2024, 1, 1)))
        };
        let today = date(2024, 1, 29);

        assert_eq!(current_cycle_day(&p, today), 1);
        assert_eq!(next_period_date(&p, today), Some(today));
    }

    #[test]
    fn fertile_window_ends_on_ovulation_day() {
        let p = params(Some(date(2024, 1, 1)));
        let window = fertile_window(&p, date(2024, 1, 3));

        assert_eq!(window.start, Some(date(2024, 1, 10)));
        assert_eq!(window.end, Some(date(2024, 1, 15)));
        assert!(window.contains(date(2024, 1, 12)));
        assert!(!window.contains(date(2024, 1, 16)));
    }

    #[test]
    fn phase_name_display() {
        assert_eq!(PhaseName::Luteal.to_string(), "luteal");
        assert_eq!(PhaseName::Follicular.to_string(), "follicular");
    }
}
