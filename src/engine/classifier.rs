use std::collections::BTreeMap;

use chrono::{Duration, Months, NaiveDate};

use super::{CycleDay, DayType, EffectiveLengths, FERTILE_DAYS_BEFORE_OVULATION, LUTEAL_DAYS};

/// Tags every day from `last_period_start` through the horizon
/// `today + months_to_predict` months.
///
/// Within one cycle the tags are laid down in priority order (period,
/// ovulation, fertile, normal); a date keeps the first tag it receives. The
/// only observed day is the recorded period start itself, and only while it
/// is not after `today`.
pub fn classify_days(
    last_period_start: NaiveDate,
    lengths: EffectiveLengths,
    today: NaiveDate,
    months_to_predict: u32,
) -> Vec<CycleDay> {
    let horizon = today
        .checked_add_months(Months::new(months_to_predict))
        .unwrap_or(NaiveDate::MAX);
    let cycle_length = i64::from(lengths.cycle_length);
    let period_length = i64::from(lengths.period_length);
    let observed_start = (last_period_start <= today).then_some(last_period_start);

    let mut tagged = DayMap::default();
    let mut cursor = last_period_start;
    while cursor <= horizon {
        for offset in 0..period_length {
            tagged.tag_if_free(cursor, offset, DayType::Period, |date| Some(date) != observed_start);
        }

        let ovulation_offset = cycle_length - LUTEAL_DAYS;
        tagged.tag_if_free(cursor, ovulation_offset, DayType::Ovulation, |_| true);

        for before in (1..=FERTILE_DAYS_BEFORE_OVULATION).rev() {
            tagged.tag_if_free(cursor, ovulation_offset - before, DayType::Fertile, |_| true);
        }

        for offset in 0..cycle_length {
            tagged.tag_if_free(cursor, offset, DayType::Normal, |_| true);
        }

        match cursor.checked_add_signed(Duration::days(cycle_length)) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    tracing::debug!(
        %last_period_start,
        %horizon,
        days = tagged.len(),
        "classified cycle days"
    );
    tagged.into_days()
}

#[derive(Debug, Default)]
struct DayMap(BTreeMap<NaiveDate, CycleDay>);

impl DayMap {
    fn tag_if_free(&mut self, cursor: NaiveDate, offset: i64, day_type: DayType, predicted: impl Fn(NaiveDate) -> bool) {
        let Some(date) = cursor.checked_add_signed(Duration::days(offset)) else {
            return;
        };
        self.0.entry(date).or_insert_with(|| CycleDay {
            date,
            day_type,
            predicted: predicted(date),
        });
    }

    fn len(&self) -> usize {
        self.0.len()
    }

    fn into_days(self) -> Vec<CycleDay> {
        self.0.into_values().collect()
    }
}
