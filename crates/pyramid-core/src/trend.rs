// crates/pyramid-core/src/trend.rs

//! Change between two years of the same region, and rankings across regions.

use crate::compare::percent_difference;
use crate::error::Result;
use crate::metrics::sex_ratio;
use crate::model::{AgeGroup, YearData};
use crate::traits::PopulationSource;
use serde::{Deserialize, Serialize};

fn overall_sex_ratio(data: &YearData) -> Option<f64> {
    sex_ratio(&AgeGroup::new("all", data.males(), data.females()))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthSummary {
    pub name: String,
    pub slug: String,
    pub from_year: u16,
    pub to_year: u16,
    pub from_population: u64,
    pub to_population: u64,
    pub growth_absolute: i64,
    /// `None` when the starting population is zero.
    pub growth_pct: Option<f64>,
    pub median_age_change: Option<f64>,
    pub sex_ratio_from: Option<f64>,
    pub sex_ratio_to: Option<f64>,
}

impl GrowthSummary {
    /// Fails with `YearMissing` if either year is absent.
    pub fn between(source: &dyn PopulationSource, from: u16, to: u16) -> Result<Self> {
        let a = source.year(from)?;
        let b = source.year(to)?;
        let median_age_change = match (a.median_age, b.median_age) {
            (Some(x), Some(y)) => Some(y - x),
            _ => None,
        };
        Ok(Self {
            name: source.name().to_string(),
            slug: source.slug().to_string(),
            from_year: from,
            to_year: to,
            from_population: a.total_population,
            to_population: b.total_population,
            growth_absolute: b.total_population as i64 - a.total_population as i64,
            growth_pct: percent_difference(b.total_population, a.total_population),
            median_age_change,
            sex_ratio_from: overall_sex_ratio(a),
            sex_ratio_to: overall_sex_ratio(b),
        })
    }
}

/// Growth summaries sorted fastest-growing first.
///
/// Regions missing either year, or with an undefined growth rate, are
/// skipped.
pub fn rank_by_growth<'a, S>(
    sources: impl IntoIterator<Item = &'a S>,
    from: u16,
    to: u16,
) -> Vec<GrowthSummary>
where
    S: PopulationSource + 'a,
{
    let mut out: Vec<GrowthSummary> = sources
        .into_iter()
        .filter_map(|s| GrowthSummary::between(s, from, to).ok())
        .filter(|g| g.growth_pct.is_some())
        .collect();
    out.sort_by(|a, b| {
        b.growth_pct
            .partial_cmp(&a.growth_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianAgeRank {
    pub name: String,
    pub slug: String,
    pub median_age: f64,
}

/// Regions ordered oldest first by median age in `year`.
pub fn rank_by_median_age<'a, S>(
    sources: impl IntoIterator<Item = &'a S>,
    year: u16,
) -> Vec<MedianAgeRank>
where
    S: PopulationSource + 'a,
{
    let mut out: Vec<MedianAgeRank> = sources
        .into_iter()
        .filter_map(|s| {
            let median_age = s.year(year).ok()?.median_age?;
            Some(MedianAgeRank {
                name: s.name().to_string(),
                slug: s.slug().to_string(),
                median_age,
            })
        })
        .collect();
    out.sort_by(|a, b| b.median_age.total_cmp(&a.median_age));
    out
}
