//! Dashboard advice conditioned on phase, age and lifestyle.

use serde::{Deserialize, Serialize};

use super::PhaseName;

/// Stress level (1-10 scale) above which stress tips are shown.
const HIGH_STRESS: u8 = 7;

/// Users younger than this get the teen tips.
const TEEN_AGE_LIMIT: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TipContext {
    pub phase: PhaseName,
    pub age: u32,
    pub stress_level: Option<u8>,
    pub activity_level: Option<ActivityLevel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthTip {
    pub id: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub icon: &'static str,
    pub for_phase: PhaseName,
    pub highlighted: bool,
}

pub fn health_tips(context: &TipContext) -> Vec<HealthTip> {
    let phase = context.phase;
    let tip = |id, title, content, icon, highlighted| HealthTip {
        id,
        title,
        content,
        icon,
        for_phase: phase,
        highlighted,
    };

    let mut tips = match phase {
        PhaseName::Menstrual => vec![
            tip(
                "iron-foods",
                "Nutrition",
                "Focus on iron-rich foods like leafy greens and lean proteins to replenish what you lose during menstruation.",
                "nutrition",
                true,
            ),
            tip(
                "gentle-exercise",
                "Exercise",
                "Light exercise like walking or gentle yoga can help reduce cramps and improve mood.",
                "exercise",
                false,
            ),
        ],
        PhaseName::Follicular => vec![tip(
            "energy-boost",
            "Energy Levels",
            "Your energy is likely higher now, making this a good time for more intense physical activity.",
            "energy",
            true,
        )],
        PhaseName::Ovulatory => vec![tip(
            "hydration",
            "Hydration",
            "Stay well hydrated as water retention may increase during this phase.",
            "water",
            true,
        )],
        PhaseName::Luteal => vec![tip(
            "complex-carbs",
            "Nutrition",
            "Complex carbohydrates can help manage PMS symptoms and mood fluctuations.",
            "nutrition",
            true,
        )],
    };

    if context.age < TEEN_AGE_LIMIT {
        match phase {
            PhaseName::Menstrual => tips.push(tip(
                "teen-cramps",
                "Self-Care",
                "Using a heating pad or taking a warm bath can help relieve cramps. Remember that cramps are common and usually normal.",
                "self-care",
                true,
            )),
            PhaseName::Luteal => tips.push(tip(
                "teen-mood",
                "Emotional Health",
                "Mood swings are common before your period. Deep breathing or talking with someone you trust can help.",
                "mood",
                false,
            )),
            PhaseName::Follicular | PhaseName::Ovulatory => {}
        }
        tips.push(tip(
            "cycle-regularity",
            "Cycle Tracking",
            "It's normal for teens to have irregular cycles for the first few years. Tracking can help you understand your patterns.",
            "calendar",
            false,
        ));
    }

    if context.stress_level.is_some_and(|level| level > HIGH_STRESS) {
        tips.push(tip(
            "stress-management",
            "Stress Relief",
            "High stress can affect your cycle. Consider relaxation techniques like meditation or deep breathing.",
            "relax",
            true,
        ));
    }

    if context.activity_level == Some(ActivityLevel::High) && phase == PhaseName::Menstrual {
        tips.push(tip(
            "active-period",
            "Active Lifestyle",
            "Consider lowering exercise intensity during your period if you experience fatigue or discomfort.",
            "exercise",
            false,
        ));
    }

    tips
}
