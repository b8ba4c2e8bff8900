use rand::{Rng, seq::SliceRandom};
use serde::Serialize;

use crate::domain::value_objects::enums::growth_stages::GrowthStage;

/// Height never reported above this many metres.
pub const MAX_HEIGHT_M: f64 = 25.0;
const SEEDLING_HEIGHT_M: f64 = 0.1;
const MIN_DIAMETER_CM: f64 = 2.0;
/// Share of dry biomass that is carbon.
const CARBON_FRACTION: f64 = 0.47;
/// Molecular mass ratio CO2 / C.
const CO2_PER_CARBON: f64 = 3.67;
const DAYS_PER_SAMPLE: i64 = 7;

const SEEDLING_NOTES: &[&str] = &[
    "New shoots emerging from the rhizome",
    "First leaves unfolding",
    "Seedling established, watering schedule on track",
    "Culm sheaths visible on the young shoot",
];
const JUVENILE_NOTES: &[&str] = &[
    "Rapid vertical growth observed",
    "Branches starting to form at the upper nodes",
    "Culm wall thickening",
    "Healthy green foliage, no pests found",
];
const MATURE_NOTES: &[&str] = &[
    "Culm reached near full height",
    "Canopy filling in, strong root system",
    "Lignification in progress",
    "Stable growth, plant in good condition",
];
const FULL_GROWN_NOTES: &[&str] = &[
    "Fully grown culm, ready for long-term carbon storage",
    "Mature clump producing new shoots",
    "Plant maintained, growth has plateaued",
];

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GrowthSnapshot {
    /// Metres.
    pub height: f64,
    /// Centimetres.
    pub diameter: f64,
    /// Kilograms.
    pub co2_absorbed: f64,
    pub stage: GrowthStage,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineEntry {
    pub day: i64,
    pub snapshot: GrowthSnapshot,
    pub note: String,
}

/// Growth state of a plant `days` after planting.
pub fn growth_at(days: i64) -> GrowthSnapshot {
    let d = days as f64;
    let raw_height = match days {
        i64::MIN..=0 => SEEDLING_HEIGHT_M,
        1..=30 => SEEDLING_HEIGHT_M + 0.3 * d,
        31..=90 => 9.1 + 0.15 * (d - 30.0),
        91..=180 => 18.1 + 0.08 * (d - 90.0),
        181..=365 => 25.3 + 0.03 * (d - 180.0),
        _ => 30.85 + 0.01 * (d - 365.0),
    };
    let height = raw_height.min(MAX_HEIGHT_M);
    let diameter = (height * 0.8 + 2.0).max(MIN_DIAMETER_CM);
    let co2_absorbed = height.powf(1.5) * diameter * CARBON_FRACTION * CO2_PER_CARBON;

    GrowthSnapshot {
        height: round2(height),
        diameter: round2(diameter),
        co2_absorbed: round2(co2_absorbed),
        stage: GrowthStage::for_days(days),
    }
}

/// Weekly samples up to and including `days`, plus the current day when it is
/// not itself a week boundary.
pub fn timeline(days: i64) -> Vec<TimelineEntry> {
    timeline_with_rng(days, &mut rand::thread_rng())
}

pub fn timeline_with_rng<R: Rng + ?Sized>(days: i64, rng: &mut R) -> Vec<TimelineEntry> {
    if days <= 0 {
        return Vec::new();
    }

    let mut sample_days: Vec<i64> = (1..=days / DAYS_PER_SAMPLE)
        .map(|week| week * DAYS_PER_SAMPLE)
        .collect();
    if days % DAYS_PER_SAMPLE != 0 {
        sample_days.push(days);
    }

    sample_days
        .into_iter()
        .map(|day| {
            let snapshot = growth_at(day);
            TimelineEntry {
                day,
                note: pick_note(snapshot.stage, rng),
                snapshot,
            }
        })
        .collect()
}

fn pick_note<R: Rng + ?Sized>(stage: GrowthStage, rng: &mut R) -> String {
    let notes = match stage {
        GrowthStage::Seedling => SEEDLING_NOTES,
        GrowthStage::Juvenile => JUVENILE_NOTES,
        GrowthStage::Mature => MATURE_NOTES,
        GrowthStage::FullGrown => FULL_GROWN_NOTES,
    };
    notes
        .choose(rng)
        .map(|note| note.to_string())
        .unwrap_or_default()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
