// crates/pyramid-core/src/metrics.rs

//! Demographic indicators derived from one year's age structure.

use crate::model::{AgeGroup, YearData};
use serde::{Deserialize, Serialize};

/// Natural sex ratio at birth (boys per 100 girls).
pub const NATURAL_SEX_RATIO_AT_BIRTH: f64 = 105.0;

/// Shape of the pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PyramidType {
    /// Wide base: youth above 30% and elderly below 10%.
    Expansive,
    /// Narrow base: youth below 20% and elderly above 15%.
    Constrictive,
    Stationary,
}

impl PyramidType {
    pub fn classify(youth_pct: f64, elderly_pct: f64) -> Self {
        if youth_pct > 30.0 && elderly_pct < 10.0 {
            PyramidType::Expansive
        } else if youth_pct < 20.0 && elderly_pct > 15.0 {
            PyramidType::Constrictive
        } else {
            PyramidType::Stationary
        }
    }
}

#[inline]
fn ratio(n: u64, d: u64) -> Option<f64> {
    (d != 0).then(|| n as f64 / d as f64)
}

#[inline]
fn percent(n: u64, d: u64) -> Option<f64> {
    ratio(n, d).map(|r| r * 100.0)
}

/// Headline metrics for one year. Every value with a possible zero
/// denominator is an `Option`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicMetrics {
    pub year: u16,
    pub total_population: u64,
    pub male_population: u64,
    pub female_population: u64,
    pub median_age: Option<f64>,
    pub male_percent: Option<f64>,
    pub female_percent: Option<f64>,
    /// Males per 100 females.
    pub sex_ratio: Option<f64>,
    pub youth_population: u64,
    pub working_age_population: u64,
    pub elderly_population: u64,
    pub youth_percentage: Option<f64>,
    pub working_age_percentage: Option<f64>,
    pub elderly_percentage: Option<f64>,
    pub dependency_ratio: Option<f64>,
    pub child_dependency_ratio: Option<f64>,
    pub old_age_dependency_ratio: Option<f64>,
    /// Working-age people per elderly person.
    pub potential_support_ratio: Option<f64>,
    /// Elderly per 100 youth.
    pub aging_index: Option<f64>,
    pub pyramid_type: PyramidType,
}

impl DemographicMetrics {
    pub fn from_year(data: &YearData) -> Self {
        let total = data.total_population;
        let males = data.males();
        let females = data.females();
        let youth = data.youth();
        let elderly = data.elderly();
        let working = total.saturating_sub(youth + elderly);

        let youth_percentage = percent(youth, total);
        let elderly_percentage = percent(elderly, total);

        Self {
            year: data.year,
            total_population: total,
            male_population: males,
            female_population: females,
            median_age: data.median_age,
            male_percent: percent(males, total),
            female_percent: percent(females, total),
            sex_ratio: percent(males, females),
            youth_population: youth,
            working_age_population: working,
            elderly_population: elderly,
            youth_percentage,
            working_age_percentage: percent(working, total),
            elderly_percentage,
            dependency_ratio: percent(youth + elderly, working),
            child_dependency_ratio: percent(youth, working),
            old_age_dependency_ratio: percent(elderly, working),
            potential_support_ratio: ratio(working, elderly),
            aging_index: percent(elderly, youth),
            pyramid_type: PyramidType::classify(
                youth_percentage.unwrap_or(0.0),
                elderly_percentage.unwrap_or(0.0),
            ),
        }
    }
}

/// Males per 100 females in one band.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandSexRatio {
    pub age_range: String,
    pub ratio: Option<f64>,
}

pub fn sex_ratio(group: &AgeGroup) -> Option<f64> {
    percent(group.male, group.female)
}

pub fn sex_ratio_by_age(data: &YearData) -> Vec<BandSexRatio> {
    data.age_groups
        .iter()
        .map(|ag| BandSexRatio {
            age_range: ag.age_range.clone(),
            ratio: sex_ratio(ag),
        })
        .collect()
}

/// Sex ratio of the youngest band, a proxy for the ratio at birth.
pub fn sex_ratio_at_birth(data: &YearData) -> Option<f64> {
    data.age_groups.first().and_then(sex_ratio)
}

/// Estimated girls missing from the youngest band when its sex ratio is
/// above [`NATURAL_SEX_RATIO_AT_BIRTH`]; zero otherwise.
pub fn missing_women(data: &YearData) -> u64 {
    let Some(first) = data.age_groups.first() else {
        return 0;
    };
    match sex_ratio(first) {
        Some(r) if r > NATURAL_SEX_RATIO_AT_BIRTH => {
            ((r - NATURAL_SEX_RATIO_AT_BIRTH) / 100.0 * first.female as f64).round() as u64
        }
        _ => 0,
    }
}
