// crates/pyramid-core/src/model.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The 21 five-year UN bands, youngest first.
pub const STANDARD_AGE_RANGES: [&str; 21] = [
    "0-4", "5-9", "10-14", "15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49",
    "50-54", "55-59", "60-64", "65-69", "70-74", "75-79", "80-84", "85-89", "90-94", "95-99",
    "100+",
];

/// Bands counted as youth (0-14).
pub const YOUTH_RANGES: [&str; 3] = ["0-4", "5-9", "10-14"];

/// Bands counted as elderly (65+). `85+` covers cleaned state data.
pub const ELDERLY_RANGES: [&str; 9] = [
    "65-69", "70-74", "75-79", "80-84", "85-89", "85+", "90-94", "95-99", "100+",
];

/// One age band with its male and female counts.
///
/// `total` is optional in the source files; use [`AgeGroup::total`] which
/// falls back to `male + female`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeGroup {
    #[serde(alias = "range")]
    pub age_range: String,
    pub male: u64,
    pub female: u64,
    #[serde(default, rename = "total")]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub male_percent: Option<f64>,
    #[serde(default)]
    pub female_percent: Option<f64>,
    #[serde(default)]
    pub total_percent: Option<f64>,
}

impl AgeGroup {
    pub fn new(age_range: impl Into<String>, male: u64, female: u64) -> Self {
        Self {
            age_range: age_range.into(),
            male,
            female,
            total_count: None,
            male_percent: None,
            female_percent: None,
            total_percent: None,
        }
    }

    /// Stored total, or `male + female` when the file omits it.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(self.male + self.female)
    }
}

/// A single year's population snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearData {
    pub year: u16,
    pub total_population: u64,
    #[serde(default)]
    pub male_population: Option<u64>,
    #[serde(default)]
    pub female_population: Option<u64>,
    #[serde(default)]
    pub median_age: Option<f64>,
    #[serde(default)]
    pub age_groups: Vec<AgeGroup>,
}

impl YearData {
    /// Builds a year from age groups alone, deriving every total.
    pub fn from_groups(year: u16, age_groups: Vec<AgeGroup>) -> Self {
        let total_population = age_groups.iter().map(AgeGroup::total).sum();
        Self {
            year,
            total_population,
            male_population: None,
            female_population: None,
            median_age: None,
            age_groups,
        }
    }

    /// Male population, summed from the age groups if not stored.
    pub fn males(&self) -> u64 {
        self.male_population
            .unwrap_or_else(|| self.age_groups.iter().map(|ag| ag.male).sum())
    }

    /// Female population, summed from the age groups if not stored.
    pub fn females(&self) -> u64 {
        self.female_population
            .unwrap_or_else(|| self.age_groups.iter().map(|ag| ag.female).sum())
    }

    pub fn age_group(&self, range: &str) -> Option<&AgeGroup> {
        self.age_groups.iter().find(|ag| ag.age_range == range)
    }

    /// Sum of `total()` over every band whose label is in `ranges`.
    pub fn band_total(&self, ranges: &[&str]) -> u64 {
        self.age_groups
            .iter()
            .filter(|ag| ranges.contains(&ag.age_range.as_str()))
            .map(AgeGroup::total)
            .sum()
    }

    pub fn youth(&self) -> u64 {
        self.band_total(&YOUTH_RANGES)
    }

    pub fn elderly(&self) -> u64 {
        self.band_total(&ELDERLY_RANGES)
    }
}

/// Year-keyed snapshots. JSON keys are strings ("2024"), parsed to `u16`.
pub type Years = BTreeMap<u16, YearData>;

/// A country's full population history, `population/<slug>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryPopulation {
    pub country_code: String,
    pub country_name: String,
    pub slug: String,
    #[serde(default)]
    pub region: String,
    pub years: Years,
}

/// A US state's population history, `states/<slug>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePopulation {
    pub state_code: String,
    pub state_name: String,
    pub slug: String,
    #[serde(default)]
    pub fips: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    pub years: Years,
}

/// Entry of `countries.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInfo {
    /// ISO 3166-1 alpha-3 code.
    pub code: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub subregion: Option<String>,
    #[serde(default, rename = "population2024")]
    pub population_2024: Option<u64>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub iso2: Option<String>,
    #[serde(default)]
    pub iso3: Option<String>,
}

/// Entry of `states.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateInfo {
    pub state_code: String,
    pub state_name: String,
    pub slug: String,
    #[serde(default)]
    pub fips: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Simple aggregate statistics for the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbStats {
    pub countries: usize,
    pub country_datasets: usize,
    pub states: usize,
    pub state_datasets: usize,
    pub fertility_datasets: usize,
}
