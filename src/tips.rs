use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::phase::CyclePhase;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TipCategory {
    Comfort,
    Nutrition,
    Exercise,
    Mindset,
    Productivity,
    Social,
    SelfCare,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Tip {
    pub title: &'static str,
    pub body: &'static str,
    pub category: TipCategory,
}

const fn tip(title: &'static str, body: &'static str, category: TipCategory) -> Tip {
    Tip {
        title,
        body,
        category,
    }
}

use TipCategory::*;

const MENSTRUATION_TIPS: &[Tip] = &[
    tip("Warm Comfort", "A heating pad or warm bath can help ease cramps. Give yourself permission to slow down.", Comfort),
    tip("Iron-Rich Foods", "Reach for spinach, lentils, or dark chocolate to replenish iron levels during your period.", Nutrition),
    tip("Gentle Movement", "Light yoga or a slow walk can actually help with cramp relief. No need to push hard.", Exercise),
    tip("Hydrate Extra", "Your body needs more water during menstruation. Herbal teas count too!", Nutrition),
    tip("Rest is Productive", "Your body is doing important work. Resting now isn't lazy, it's necessary.", Mindset),
    tip("Magnesium Boost", "Magnesium-rich foods like bananas, nuts, and avocados can help reduce cramps.", Nutrition),
];

const FOLLICULAR_TIPS: &[Tip] = &[
    tip("Try Something New", "Rising estrogen boosts creativity and openness. Great time to start a new project or hobby.", Mindset),
    tip("High-Energy Workouts", "Your energy is climbing. Take advantage with HIIT, running, or dancing.", Exercise),
    tip("Plan Ahead", "This is your strategic phase. Use this clarity to plan your week and set goals.", Productivity),
    tip("Social Energy", "You may feel more social now. Schedule catch-ups or collaborative work.", Social),
    tip("Protein Focus", "Support rising energy with lean proteins and complex carbs.", Nutrition),
];

const OVULATION_TIPS: &[Tip] = &[
    tip("Peak Communication", "Verbal skills peak around ovulation. Great day for important conversations or presentations.", Social),
    tip("Strength Training", "Testosterone peaks briefly, so you may hit PRs in the gym. Go for it!", Exercise),
    tip("Skin Glow", "Estrogen peaks make skin look its best. Enjoy the natural glow.", SelfCare),
    tip("Connection Time", "Oxytocin is high. Nurture your important relationships today.", Social),
];

const LUTEAL_TIPS: &[Tip] = &[
    tip("Be Patient With Yourself", "Mood shifts are hormonal, not personal. Acknowledge feelings without judgment.", Mindset),
    tip("Comfort Foods Done Right", "Craving carbs? Try sweet potatoes, whole grains, or oatmeal with fruit.", Nutrition),
    tip("Steady-State Cardio", "Swap intense workouts for steady walks, swimming, or cycling.", Exercise),
    tip("Wind Down Earlier", "Progesterone can make you sleepy. Honor that with an earlier bedtime.", SelfCare),
    tip("Boundary Check", "You may feel more sensitive. It's okay to say no and protect your energy.", Mindset),
    tip("Calcium & B6", "These nutrients may reduce PMS symptoms. Found in dairy, bananas, and chickpeas.", Nutrition),
    tip("Journaling", "Writing out your thoughts can help process the emotional intensity of the luteal phase.", Mindset),
    tip("Warm Drinks", "Herbal teas like chamomile or ginger can soothe PMS bloating and anxiety.", Comfort),
];

pub fn tips_for(phase: CyclePhase) -> &'static [Tip] {
    match phase {
        CyclePhase::Menstruation => MENSTRUATION_TIPS,
        CyclePhase::Follicular => FOLLICULAR_TIPS,
        CyclePhase::Ovulation => OVULATION_TIPS,
        CyclePhase::Luteal => LUTEAL_TIPS,
    }
}

/// Rotates through the phase's tips by day of year.
pub fn tip_of_the_day(phase: CyclePhase, date: NaiveDate) -> Tip {
    let bank = tips_for(phase);
    bank[date.ordinal() as usize % bank.len()]
}
