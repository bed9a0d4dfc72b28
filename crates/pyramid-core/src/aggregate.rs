// crates/pyramid-core/src/aggregate.rs

//! World totals summed across country datasets.

use crate::model::{AgeGroup, CountryPopulation, YearData, STANDARD_AGE_RANGES};
use std::collections::HashMap;
use tracing::debug;

/// Sums every country that has `year` into one snapshot over the 21
/// standard bands.
///
/// Median age is the population-weighted mean of the countries' median ages
/// (countries without one are left out of the weighting). Returns `None`
/// when no country has the year.
pub fn aggregate_world<'a>(
    countries: impl IntoIterator<Item = &'a CountryPopulation>,
    year: u16,
) -> Option<YearData> {
    let mut bands: HashMap<&str, (u64, u64, u64)> = STANDARD_AGE_RANGES
        .iter()
        .map(|r| (*r, (0, 0, 0)))
        .collect();

    let mut total = 0u64;
    let mut males = 0u64;
    let mut females = 0u64;
    let mut weighted_age = 0.0;
    let mut weighted_pop = 0u64;
    let mut contributing = 0usize;

    for country in countries {
        let Some(data) = country.years.get(&year) else {
            continue;
        };
        contributing += 1;
        total += data.total_population;
        males += data.males();
        females += data.females();
        if let Some(age) = data.median_age {
            weighted_age += age * data.total_population as f64;
            weighted_pop += data.total_population;
        }
        for ag in &data.age_groups {
            if let Some(band) = bands.get_mut(ag.age_range.as_str()) {
                band.0 += ag.male;
                band.1 += ag.female;
                band.2 += ag.total();
            }
        }
    }

    if contributing == 0 {
        return None;
    }
    debug!(year, contributing, "aggregated world population");

    let pct = |n: u64, d: u64| if d > 0 { n as f64 / d as f64 * 100.0 } else { 0.0 };

    let age_groups = STANDARD_AGE_RANGES
        .iter()
        .map(|range| {
            let (m, f, t) = bands[range];
            AgeGroup {
                total_count: Some(t),
                male_percent: Some(pct(m, t)),
                female_percent: Some(pct(f, t)),
                total_percent: Some(pct(t, total)),
                ..AgeGroup::new(*range, m, f)
            }
        })
        .collect();

    Some(YearData {
        year,
        total_population: total,
        male_population: Some(males),
        female_population: Some(females),
        median_age: (weighted_pop > 0).then(|| weighted_age / weighted_pop as f64),
        age_groups,
    })
}
