use chrono::{Duration, NaiveDate};

use super::{EffectiveLengths, FertileWindow, FERTILE_DAYS_BEFORE_OVULATION, LUTEAL_DAYS};

/// Start of the next period on or after `today`.
///
/// When `today` is itself a period start it is returned as is. A recorded
/// start after `today` is the next period.
pub fn next_period_after(last_period_start: NaiveDate, lengths: EffectiveLengths, today: NaiveDate) -> Option<NaiveDate> {
    let days_since = today.signed_duration_since(last_period_start).num_days();
    if days_since < 0 {
        return Some(last_period_start);
    }

    let cycle_length = i64::from(lengths.cycle_length);
    let into_cycle = days_since % cycle_length;
    if into_cycle == 0 {
        return Some(today);
    }
    today.checked_add_signed(Duration::days(cycle_length - into_cycle))
}

/// Five days before ovulation through the ovulation day, with ovulation
/// placed 14 days before `next_period`.
pub fn fertile_window_before(next_period: Option<NaiveDate>) -> FertileWindow {
    let Some(next_period) = next_period else {
        return FertileWindow::default();
    };
    let ovulation = next_period.checked_sub_signed(Duration::days(LUTEAL_DAYS));
    let start = ovulation.and_then(|d| d.checked_sub_signed(Duration::days(FERTILE_DAYS_BEFORE_OVULATION)));

    FertileWindow { start, end: ovulation }
}

/// Days from `today` until `next_period`; 0 when the period starts today.
pub fn days_until(next_period: NaiveDate, today: NaiveDate) -> i64 {
    next_period.signed_duration_since(today).num_days()
}
