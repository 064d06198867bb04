//! Age-conditioned normalization of user-supplied cycle lengths.
//!
//! Out-of-range values are never rejected: they are replaced by the
//! population defaults so the rest of the engine always sees sane lengths.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{UserCycleParameters, FERTILE_DAYS_BEFORE_OVULATION, LUTEAL_DAYS};

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;
pub const DEFAULT_PERIOD_LENGTH: u32 = 5;

/// Used when neither a birth date nor an explicit age is known.
pub const DEFAULT_AGE: u32 = 25;

/// Hard limits every policy band must stay inside.
const MIN_PERIOD_LENGTH: u32 = 2;
const MAX_CYCLE_LENGTH: u32 = 45;

/// Shortest cycle whose fertile window still starts after the cycle's
/// first day: `cycle_length - 14 >= 7`.
pub const MIN_CYCLE_LENGTH: u32 = LUTEAL_DAYS as u32 + FERTILE_DAYS_BEFORE_OVULATION as u32 + 2;

/// Cycle and period lengths after validation.
///
/// Always satisfies `2 <= period_length < cycle_length <= 45`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveLengths {
    pub cycle_length: u32,
    pub period_length: u32,
}

impl Default for EffectiveLengths {
    fn default() -> Self {
        EffectiveLengths {
            cycle_length: DEFAULT_CYCLE_LENGTH,
            period_length: DEFAULT_PERIOD_LENGTH,
        }
    }
}

/// Inclusive bounds accepted for one age band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub length_min: u32,
    pub length_max: u32,
    pub duration_min: u32,
    pub duration_max: u32,
}

/// Ages in `[min_age, max_age]` (no upper limit when `max_age` is `None`).
/// A band without bounds never trusts user-supplied lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBand {
    pub min_age: u32,
    pub max_age: Option<u32>,
    pub bounds: Option<LengthBounds>,
}

impl AgeBand {
    fn covers(&self, age: u32) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age <= max)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("no age band covers age {0}")]
    UncoveredAge(u32),

    #[error("age band starting at {min_age} has inverted bounds")]
    InvertedBounds { min_age: u32 },

    #[error("age band starting at {min_age} lets period length reach cycle length")]
    PeriodNotShorterThanCycle { min_age: u32 },

    #[error("age band starting at {min_age} allows cycles shorter than 21 days")]
    CycleTooShort { min_age: u32 },

    #[error("age band starting at {min_age} exceeds the limits 2..=45")]
    OutOfLimits { min_age: u32 },

    #[error("age band starting at {min_age} rejects the default lengths 28/5")]
    RejectsDefaults { min_age: u32 },

    #[error("unknown validation policy: {0}")]
    UnknownPolicy(String),
}

/// Table of age bands resolved once per validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    bands: Vec<AgeBand>,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        ValidationPolicy::standard()
    }
}

impl ValidationPolicy {
    /// Under 15 always uses defaults; everyone else gets cycles in
    /// `[21, 45]` and periods in `[2, 8]`.
    pub fn standard() -> ValidationPolicy {
        ValidationPolicy {
            bands: vec![
                AgeBand {
                    min_age: 0,
                    max_age: Some(14),
                    bounds: None,
                },
                AgeBand {
                    min_age: 15,
                    max_age: None,
                    bounds: Some(LengthBounds {
                        length_min: 21,
                        length_max: 45,
                        duration_min: 2,
                        duration_max: 8,
                    }),
                },
            ],
        }
    }

    /// Separate teen band; adults are held to `[24, 38]` and `[4, 8]`.
    pub fn revised() -> ValidationPolicy {
        ValidationPolicy {
            bands: vec![
                AgeBand {
                    min_age: 0,
                    max_age: Some(14),
                    bounds: None,
                },
                AgeBand {
                    min_age: 15,
                    max_age: Some(17),
                    bounds: Some(LengthBounds {
                        length_min: 21,
                        length_max: 45,
                        duration_min: 2,
                        duration_max: 8,
                    }),
                },
                AgeBand {
                    min_age: 18,
                    max_age: None,
                    bounds: Some(LengthBounds {
                        length_min: 24,
                        length_max: 38,
                        duration_min: 4,
                        duration_max: 8,
                    }),
                },
            ],
        }
    }

    pub fn by_name(name: &str) -> Result<ValidationPolicy, PolicyError> {
        match name {
            "standard" => Ok(ValidationPolicy::standard()),
            "revised" => Ok(ValidationPolicy::revised()),
            other => Err(PolicyError::UnknownPolicy(other.to_string())),
        }
    }

    /// Builds a custom table. Every band must keep the effective-length
    /// invariant and accept the defaults, and the first band must start at 0
    /// with no gaps up to an open-ended last band.
    pub fn new(mut bands: Vec<AgeBand>) -> Result<ValidationPolicy, PolicyError> {
        bands.sort_by_key(|b| b.min_age);

        let mut next_age = 0;
        for band in &bands {
            if band.min_age > next_age {
                return Err(PolicyError::UncoveredAge(next_age));
            }
            if band.max_age.is_some_and(|max| max < band.min_age) {
                return Err(PolicyError::InvertedBounds { min_age: band.min_age });
            }
            check_bounds(band)?;
            match band.max_age {
                Some(max) => next_age = max.saturating_add(1),
                None => return Ok(ValidationPolicy { bands }),
            }
        }
        Err(PolicyError::UncoveredAge(next_age))
    }

    pub fn bands(&self) -> &[AgeBand] {
        &self.bands
    }

    pub fn validate(&self, params: &UserCycleParameters) -> EffectiveLengths {
        let bounds = self
            .bands
            .iter()
            .find(|b| b.covers(params.age))
            .and_then(|b| b.bounds);

        let Some(bounds) = bounds else {
            tracing::debug!(age = params.age, "age band does not trust reported lengths, using defaults");
            return EffectiveLengths::default();
        };

        let cycle_length = if (bounds.length_min..=bounds.length_max).contains(&params.cycle_length) {
            params.cycle_length
        } else {
            tracing::debug!(cycle_length = params.cycle_length, "cycle length out of band, using default");
            DEFAULT_CYCLE_LENGTH
        };
        let period_length = if (bounds.duration_min..=bounds.duration_max).contains(&params.period_length) {
            params.period_length
        } else {
            tracing::debug!(period_length = params.period_length, "period length out of band, using default");
            DEFAULT_PERIOD_LENGTH
        };

        EffectiveLengths {
            cycle_length,
            period_length,
        }
    }
}

fn check_bounds(band: &AgeBand) -> Result<(), PolicyError> {
    let Some(b) = band.bounds else {
        return Ok(());
    };
    let min_age = band.min_age;

    if b.length_min > b.length_max || b.duration_min > b.duration_max {
        return Err(PolicyError::InvertedBounds { min_age });
    }
    if b.duration_min < MIN_PERIOD_LENGTH || b.length_max > MAX_CYCLE_LENGTH {
        return Err(PolicyError::OutOfLimits { min_age });
    }
    if b.length_min < MIN_CYCLE_LENGTH {
        return Err(PolicyError::CycleTooShort { min_age });
    }
    // Both lengths fall back independently, so each bound must also stay clear of the other default.
    if b.duration_max >= b.length_min
        || b.duration_max >= DEFAULT_CYCLE_LENGTH
        || DEFAULT_PERIOD_LENGTH >= b.length_min
    {
        return Err(PolicyError::PeriodNotShorterThanCycle { min_age });
    }
    if !(b.length_min..=b.length_max).contains(&DEFAULT_CYCLE_LENGTH)
        || !(b.duration_min..=b.duration_max).contains(&DEFAULT_PERIOD_LENGTH)
    {
        return Err(PolicyError::RejectsDefaults { min_age });
    }
    Ok(())
}

/// Whole years between `birth_date` and `today`; 0 for a birth date in the future.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> u32 {
    today.years_since(birth_date).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(cycle_length: u32, period_length: u32, age: u32) -> UserCycleParameters {
        UserCycleParameters {
            last_period_start: None,
            cycle_length,
            period_length,
            age,
        }
    }

    fn lengths(cycle_length: u32, period_length: u32) -> EffectiveLengths {
        EffectiveLengths {
            cycle_length,
            period_length,
        }
    }

    #[test]
    fn keeps_in_band_values() {
        let policy = ValidationPolicy::standard();
        assert_eq!(policy.validate(&params(30, 6, 25)), lengths(30, 6));
        assert_eq!(policy.validate(&params(21, 2, 15)), lengths(21, 2));
        assert_eq!(policy.validate(&params(45, 8, 60)), lengths(45, 8));
    }

    #[test]
    fn young_users_always_get_defaults() {
        let policy = ValidationPolicy::standard();
        assert_eq!(policy.validate(&params(28, 5, 12)), lengths(28, 5));
        assert_eq!(policy.validate(&params(32, 7, 14)), lengths(28, 5));
    }

    #[test]
    fn replaces_each_offending_value_independently() {
        let policy = ValidationPolicy::standard();
        assert_eq!(policy.validate(&params(50, 6, 30)), lengths(28, 6));
        assert_eq!(policy.validate(&params(30, 9, 30)), lengths(30, 5));
        assert_eq!(policy.validate(&params(0, 0, 30)), lengths(28, 5));
    }

    #[test]
    fn revised_policy_is_stricter_for_adults() {
        let policy = ValidationPolicy::revised();
        assert_eq!(policy.validate(&params(22, 3, 16)), lengths(22, 3));
        assert_eq!(policy.validate(&params(22, 3, 30)), lengths(28, 5));
        assert_eq!(policy.validate(&params(36, 4, 30)), lengths(36, 4));
    }

    #[test]
    fn revalidation_is_a_no_op() {
        for policy in [ValidationPolicy::standard(), ValidationPolicy::revised()] {
            for (cycle, period, age) in [(60, 1, 30), (25, 3, 16), (30, 6, 10), (40, 8, 40)] {
                let once = policy.validate(&params(cycle, period, age));
                let twice = policy.validate(&params(once.cycle_length, once.period_length, age));
                assert_eq!(once, twice);
            }
        }
    }

    #[test]
    fn policy_by_name() {
        assert_eq!(ValidationPolicy::by_name("revised"), Ok(ValidationPolicy::revised()));
        assert_eq!(
            ValidationPolicy::by_name("lenient"),
            Err(PolicyError::UnknownPolicy("lenient".to_string()))
        );
    }

    #[test]
    fn custom_policy_must_cover_all_ages() {
        let gap = vec![AgeBand {
            min_age: 0,
            max_age: Some(20),
            bounds: None,
        }];
        assert_eq!(ValidationPolicy::new(gap), Err(PolicyError::UncoveredAge(21)));

        let late_start = vec![AgeBand {
            min_age: 10,
            max_age: None,
            bounds: None,
        }];
        assert_eq!(ValidationPolicy::new(late_start), Err(PolicyError::UncoveredAge(0)));
    }

    #[test]
    fn custom_policy_must_keep_period_shorter_than_cycle() {
        let overlapping = vec![AgeBand {
            min_age: 0,
            max_age: None,
            bounds: Some(LengthBounds {
                length_min: 22,
                length_max: 40,
                duration_min: 2,
                duration_max: 22,
            }),
        }];
        assert_eq!(
            ValidationPolicy::new(overlapping),
            Err(PolicyError::PeriodNotShorterThanCycle { min_age: 0 })
        );

        let no_defaults = vec![AgeBand {
            min_age: 0,
            max_age: None,
            bounds: Some(LengthBounds {
                length_min: 30,
                length_max: 40,
                duration_min: 2,
                duration_max: 8,
            }),
        }];
        assert_eq!(
            ValidationPolicy::new(no_defaults),
            Err(PolicyError::RejectsDefaults { min_age: 0 })
        );
    }

    #[test]
    fn custom_policy_keeps_the_minimum_cycle_length() {
        let band = |length_min| {
            vec![AgeBand {
                min_age: 0,
                max_age: None,
                bounds: Some(LengthBounds {
                    length_min,
                    length_max: 40,
                    duration_min: 2,
                    duration_max: 8,
                }),
            }]
        };

        assert_eq!(MIN_CYCLE_LENGTH, 21);
        assert_eq!(
            ValidationPolicy::new(band(9)),
            Err(PolicyError::CycleTooShort { min_age: 0 })
        );
        assert_eq!(
            ValidationPolicy::new(band(20)),
            Err(PolicyError::CycleTooShort { min_age: 0 })
        );
        assert!(ValidationPolicy::new(band(21)).is_ok());
    }

    #[test]
    fn custom_policy_accepts_sorted_or_unsorted_bands() {
        let policy = ValidationPolicy::new(ValidationPolicy::revised().bands().iter().rev().copied().collect());
        assert_eq!(policy, Ok(ValidationPolicy::revised()));
    }

    #[test]
    fn age_is_whole_years() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 23);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 24);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()), 0);
    }
}
