use chrono::NaiveDate;

use super::{CyclePhase, EffectiveLengths, PhaseName};

/// 1-based day of the cycle containing `today`, or 0 when the recorded
/// period start lies after `today`.
pub fn cycle_day(last_period_start: NaiveDate, lengths: EffectiveLengths, today: NaiveDate) -> u32 {
    let days_since = today.signed_duration_since(last_period_start).num_days();
    if days_since < 0 {
        return 0;
    }
    let cycle_length = i64::from(lengths.cycle_length);
    // The remainder is below cycle_length, which is a u32.
    (days_since % cycle_length) as u32 + 1
}

/// The four phases in cycle order.
pub fn phases_for(lengths: EffectiveLengths) -> [CyclePhase; 4] {
    let EffectiveLengths {
        cycle_length,
        period_length,
    } = lengths;

    [
        CyclePhase {
            name: PhaseName::Menstrual,
            start_day: 1,
            end_day: period_length,
        },
        CyclePhase {
            name: PhaseName::Follicular,
            start_day: period_length + 1,
            end_day: cycle_length.saturating_sub(15),
        },
        CyclePhase {
            name: PhaseName::Ovulatory,
            start_day: cycle_length.saturating_sub(14),
            end_day: cycle_length.saturating_sub(12),
        },
        CyclePhase {
            name: PhaseName::Luteal,
            start_day: cycle_length.saturating_sub(11),
            end_day: cycle_length,
        },
    ]
}

/// First phase containing `cycle_day`, falling back to the menstrual phase.
///
/// The fallback hides configurations whose ranges leave gaps; callers should
/// not rely on it for correctness.
pub fn resolve_phase(phases: &[CyclePhase; 4], cycle_day: u32) -> CyclePhase {
    if let Some(phase) = phases.iter().find(|p| p.contains(cycle_day)) {
        return *phase;
    }

    if cycle_day == 0 {
        tracing::debug!("cycle day unknown, reporting menstrual phase");
    } else {
        tracing::warn!(cycle_day, ?phases, "no phase covers cycle day, reporting menstrual phase");
    }
    phases[0]
}
