use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::engine::{
    tips::ActivityLevel,
    validator::{age_on, DEFAULT_AGE, DEFAULT_CYCLE_LENGTH, DEFAULT_PERIOD_LENGTH},
    CycleDay, CyclePhase, EffectiveLengths, FertileWindow, UserCycleParameters,
};

/// The stored user record. Fields missing from a stored document take their
/// defaults on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub age: Option<u32>,
    pub last_period_start: Option<NaiveDate>,
    pub cycle_length: u32,
    pub period_length: u32,
    pub stress_level: Option<u8>,
    pub activity_level: Option<ActivityLevel>,
    pub onboarding_completed: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        UserProfile {
            name: String::new(),
            birth_date: None,
            age: None,
            last_period_start: None,
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
            stress_level: Some(3),
            activity_level: None,
            onboarding_completed: false,
        }
    }
}

impl UserProfile {
    /// Age on `today`: from the birth date when known, else the stated age,
    /// else the default age.
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        match (self.birth_date, self.age) {
            (Some(birth_date), _) => age_on(birth_date, today),
            (None, Some(age)) if age > 0 => age,
            _ => DEFAULT_AGE,
        }
    }

    pub fn cycle_parameters(&self, today: NaiveDate) -> UserCycleParameters {
        UserCycleParameters {
            last_period_start: self.last_period_start,
            cycle_length: self.cycle_length,
            period_length: self.period_length,
            age: self.age_on(today),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CycleSummary {
    pub today: NaiveDate,
    pub last_period_start: Option<NaiveDate>,
    pub effective_lengths: EffectiveLengths,
    pub cycle_day: u32,
    pub phase: CyclePhase,
    pub next_period_date: Option<NaiveDate>,
    pub period_expected_in_days: Option<i64>,
    pub fertile_window: FertileWindow,
    pub in_fertile_window: bool,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(flatten)]
    pub params: UserCycleParameters,
    pub today: NaiveDate,
    pub months_to_predict: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct Forecast {
    pub summary: CycleSummary,
    pub days: Vec<CycleDay>,
}

#[derive(Debug, Serialize)]
pub struct PhaseOverview {
    pub cycle_day: u32,
    pub current: CyclePhase,
    pub phases: [CyclePhase; 4],
}

/// Highest flow or pain rating on the five-star scale.
pub const MAX_INTENSITY: u8 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeColor {
    #[default]
    No,
    Red,
    YellowGreen,
    White,
    Brown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeConsistency {
    #[default]
    No,
    Creamy,
    Curdy,
    Slimy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DischargeSmell {
    #[default]
    No,
    Fishy,
    Unpleasant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    Cramps,
    Headache,
    Bloating,
    BackPain,
    BreastTenderness,
    Acne,
    Fatigue,
    Cravings,
    Nausea,
    Spotting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    Calm,
    Anxious,
    Irritable,
    Sad,
    Emotional,
    Energetic,
    Tired,
    Motivated,
    Unmotivated,
}

/// Everything logged for one calendar day. Saving an entry for a date
/// replaces whatever was logged there before.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogEntry {
    pub flow_intensity: u8,
    pub color: DischargeColor,
    pub consistency: DischargeConsistency,
    pub smell: DischargeSmell,
    pub pads_used: u32,
    pub pain_intensity: u8,
    pub symptoms: BTreeSet<Symptom>,
    pub moods: BTreeSet<Mood>,
}

impl LogEntry {
    /// Both ratings stay on the five-star scale.
    pub fn is_valid(&self) -> bool {
        self.flow_intensity <= MAX_INTENSITY && self.pain_intensity <= MAX_INTENSITY
    }
}

/// Log entries keyed by the day they describe.
pub type DailyLog = BTreeMap<NaiveDate, LogEntry>;

#[derive(Debug, Serialize)]
pub struct LoggedDay {
    pub logged_at: NaiveDate,
    #[serde(flatten)]
    pub entry: LogEntry,
}

#[derive(Debug, Serialize)]
pub struct SymptomsByDate {
    pub logged_at: NaiveDate,
    pub symptoms: Vec<Symptom>,
}
