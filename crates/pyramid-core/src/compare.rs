// crates/pyramid-core/src/compare.rs

//! Band-by-band comparison of two population snapshots.

use crate::error::Result;
use crate::model::{AgeGroup, YearData};
use crate::pyramid::ensure_aligned;
use serde::{Deserialize, Serialize};

/// Default threshold (percent) above which a band is reported as significant.
pub const SIGNIFICANT_THRESHOLD_PCT: f64 = 20.0;

/// Bands counted as youth in side-by-side summaries (first three).
const SUMMARY_YOUTH_BANDS: usize = 3;
/// Index of the first elderly band (65-69) in standard data.
const SUMMARY_ELDERLY_FROM: usize = 13;

/// `(a - b) / b * 100`, or `None` when `b` is zero.
///
/// ```rust
/// use pyramid_core::compare::percent_difference;
///
/// assert_eq!(percent_difference(150, 100), Some(50.0));
/// assert_eq!(percent_difference(5, 0), None);
/// ```
pub fn percent_difference(a: u64, b: u64) -> Option<f64> {
    (b != 0).then(|| (a as f64 - b as f64) / b as f64 * 100.0)
}

/// Which of the two compared datasets holds more people.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Larger {
    First,
    Second,
    Equal,
}

impl Larger {
    fn of(a: u64, b: u64) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Larger::First,
            std::cmp::Ordering::Less => Larger::Second,
            std::cmp::Ordering::Equal => Larger::Equal,
        }
    }

    /// Name of the larger side; `None` on a tie.
    pub fn pick<'n>(self, first: &'n str, second: &'n str) -> Option<&'n str> {
        match self {
            Larger::First => Some(first),
            Larger::Second => Some(second),
            Larger::Equal => None,
        }
    }
}

/// One age band where the two datasets differ notably.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandDifference {
    pub age_range: String,
    /// `None` when the second dataset has no males in this band.
    pub male_diff_pct: Option<f64>,
    pub female_diff_pct: Option<f64>,
    /// `None` when the second dataset is empty in this band.
    pub total_diff_pct: Option<f64>,
    pub larger: Larger,
    pub larger_name: Option<String>,
    pub male_abs_diff: u64,
    pub male_larger: Larger,
    pub female_abs_diff: u64,
    pub female_larger: Larger,
    pub first: AgeGroup,
    pub second: AgeGroup,
}

/// Bands whose total differs by more than `threshold_pct` percent.
///
/// A band where the second dataset is empty has no defined percentage; it
/// is reported when the first dataset is not empty there (total percentage
/// left as `None`) and skipped when both are empty.
pub fn significant_differences(
    a: &[AgeGroup],
    b: &[AgeGroup],
    name_a: &str,
    name_b: &str,
    threshold_pct: f64,
) -> Result<Vec<BandDifference>> {
    ensure_aligned(a, b)?;

    let out = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| {
            let total_diff_pct = percent_difference(x.total(), y.total());
            let significant = match total_diff_pct {
                Some(pct) => pct.abs() > threshold_pct,
                None => x.total() > 0,
            };
            if !significant {
                return None;
            }
            let larger = Larger::of(x.total(), y.total());
            Some(BandDifference {
                age_range: x.age_range.clone(),
                male_diff_pct: percent_difference(x.male, y.male),
                female_diff_pct: percent_difference(x.female, y.female),
                total_diff_pct,
                larger,
                larger_name: larger.pick(name_a, name_b).map(str::to_string),
                male_abs_diff: x.male.abs_diff(y.male),
                male_larger: Larger::of(x.male, y.male),
                female_abs_diff: x.female.abs_diff(y.female),
                female_larger: Larger::of(x.female, y.female),
                first: x.clone(),
                second: y.clone(),
            })
        })
        .collect();

    Ok(out)
}

/// Headline numbers for one side of a side-by-side comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideSummary {
    pub total: u64,
    pub youth: u64,
    pub elderly: u64,
    pub youth_pct: Option<f64>,
    pub elderly_pct: Option<f64>,
}

impl SideSummary {
    fn of(data: &YearData) -> Self {
        let youth = data
            .age_groups
            .iter()
            .take(SUMMARY_YOUTH_BANDS)
            .map(AgeGroup::total)
            .sum();
        let elderly = data
            .age_groups
            .iter()
            .skip(SUMMARY_ELDERLY_FROM)
            .map(AgeGroup::total)
            .sum();
        let total = data.total_population;
        let share = |n: u64| (total > 0).then(|| n as f64 / total as f64 * 100.0);
        Self {
            total,
            youth,
            elderly,
            youth_pct: share(youth),
            elderly_pct: share(elderly),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideBySide {
    pub first: SideSummary,
    pub second: SideSummary,
    /// Percent by which the first total exceeds the second.
    pub total_diff_pct: Option<f64>,
}

/// Totals, youth and elderly shares for two snapshots.
pub fn side_by_side_summary(a: &YearData, b: &YearData) -> SideBySide {
    SideBySide {
        first: SideSummary::of(a),
        second: SideSummary::of(b),
        total_diff_pct: percent_difference(a.total_population, b.total_population),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_difference_sign_follows_first_argument() {
        assert_eq!(percent_difference(50, 100), Some(-50.0));
        assert_eq!(percent_difference(0, 0), None);
    }

    #[test]
    fn tie_has_no_larger_name() {
        assert_eq!(Larger::of(3, 3).pick("a", "b"), None);
        assert_eq!(Larger::of(4, 3).pick("a", "b"), Some("a"));
    }
}
