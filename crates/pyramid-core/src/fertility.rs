// crates/pyramid-core/src/fertility.rs
use serde::{Deserialize, Serialize};

/// Replacement-level total fertility rate used when a file omits it.
pub const DEFAULT_REPLACEMENT_LEVEL: f64 = 2.1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilityYear {
    pub year: u16,
    pub total_fertility_rate: f64,
    #[serde(alias = "crudebirthRate")]
    pub crude_birth_rate: f64,
    #[serde(default)]
    pub gross_reproduction_rate: Option<f64>,
    #[serde(default)]
    pub net_reproduction_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldComparison {
    pub world_average: f64,
    pub rank: u32,
    pub total_countries: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilitySeries {
    pub current: FertilityYear,
    #[serde(default)]
    pub historical: Vec<FertilityYear>,
    #[serde(default)]
    pub projections: Vec<FertilityYear>,
    #[serde(default = "default_replacement")]
    pub replacement_level: f64,
    #[serde(default)]
    pub below_replacement_since: Option<u16>,
    #[serde(default)]
    pub world_comparison: Option<WorldComparison>,
}

fn default_replacement() -> f64 {
    DEFAULT_REPLACEMENT_LEVEL
}

/// `fertility/<slug>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilityData {
    pub country_code: String,
    pub country_name: String,
    pub slug: String,
    pub fertility_data: FertilitySeries,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FertilityMetrics {
    pub tfr_change: Option<f64>,
    pub tfr_change_pct: Option<f64>,
    pub birth_rate_change: Option<f64>,
    pub birth_rate_change_pct: Option<f64>,
    pub below_replacement: bool,
    /// Replacement level minus current TFR; positive when below.
    pub replacement_gap: f64,
    /// Most recent historical year at or above replacement.
    pub last_year_at_replacement: Option<u16>,
}

fn change(first: f64, last: f64) -> (f64, Option<f64>) {
    let delta = last - first;
    (delta, (first != 0.0).then(|| delta / first * 100.0))
}

impl FertilityMetrics {
    pub fn from_series(series: &FertilitySeries) -> Self {
        let ends = series.historical.first().zip(series.historical.last());

        let (tfr_change, tfr_change_pct) = match ends {
            Some((f, l)) => {
                let (d, p) = change(f.total_fertility_rate, l.total_fertility_rate);
                (Some(d), p)
            }
            None => (None, None),
        };
        let (birth_rate_change, birth_rate_change_pct) = match ends {
            Some((f, l)) => {
                let (d, p) = change(f.crude_birth_rate, l.crude_birth_rate);
                (Some(d), p)
            }
            None => (None, None),
        };

        let level = series.replacement_level;
        Self {
            tfr_change,
            tfr_change_pct,
            birth_rate_change,
            birth_rate_change_pct,
            below_replacement: series.current.total_fertility_rate < level,
            replacement_gap: level - series.current.total_fertility_rate,
            last_year_at_replacement: series
                .historical
                .iter()
                .rev()
                .find(|y| y.total_fertility_rate >= level)
                .map(|y| y.year),
        }
    }
}
