//! classification of feature attributes into colors.
//!
//! all classifiers are total: every input maps to a color, gray being the fallback.

pub const GRAY: &str = "gray";
pub const LINE_RED: &str = "red";

/// five tiers, reddest first
pub const TIERS: [&str; 5] = ["#e93e3a", "#ed683c", "#f3903f", "#fdc70c", "#fff33b"];

const POPULATION_CUTOFFS: [f64; 5] = [500_000_000., 100_000_000., 50_000_000., 10_000_000., 0.];
const COVERAGE_CUTOFFS: [f64; 5] = [80., 60., 40., 20., 0.];

/// fill and stroke of a rendered shape, as css colors
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Style {
    pub fill: &'static str,
    pub stroke: &'static str,
}

impl Style {
    pub fn filled(color: &'static str) -> Self {
        Self {
            fill: color,
            stroke: color,
        }
    }
}

// first tier whose cutoff is strictly exceeded. NaN exceeds nothing.
fn tier(value: f64, cutoffs: &[f64; 5]) -> &'static str {
    cutoffs
        .iter()
        .position(|&cutoff| value > cutoff)
        .map_or(GRAY, |i| TIERS[i])
}

pub fn population_color(population: f64) -> &'static str {
    tier(population, &POPULATION_CUTOFFS)
}

/// `coverage` is a percentage
pub fn coverage_color(coverage: f64) -> &'static str {
    tier(coverage, &COVERAGE_CUTOFFS)
}

pub fn feature_class_color(class: &str) -> &'static str {
    match class {
        "Island group" => "#1f78b4",
        "Continent" => "#33a02c",
        "Range/mtn" => "#a6611a",
        "Basin" => "#80cdc1",
        _ => GRAY,
    }
}

/// share of `total` that is connected, in whole percent. NaN without a positive total.
pub fn coverage_percent(connected: f64, total: f64) -> f64 {
    if total > 0. {
        (connected / total * 100.).round()
    } else {
        f64::NAN
    }
}

/// 0 = reddest tier, 5 = gray
pub fn redness_rank(color: &str) -> usize {
    TIERS.iter().position(|&c| c == color).unwrap_or(TIERS.len())
}
