// crates/pyramid-core/src/pyramid.rs

//! # Pyramid Data Adapter
//!
//! Turns per-age-group `{male, female}` records into chart-ready series for
//! a horizontal bar pyramid:
//!
//! - labels are the input age ranges **reversed**, so the oldest band is
//!   drawn on top;
//! - series on the [`Side::Left`] (males) are negated, series on the
//!   [`Side::Right`] (females) are positive, sharing one zero axis;
//! - every series has exactly one value per input age group.
//!
//! The functions here are pure: they borrow the age groups and allocate the
//! output, nothing else.

use crate::error::{PyramidError, Result};
use crate::model::{AgeGroup, YearData};
use serde::{Deserialize, Serialize};

/// Axis padding applied to the largest bar so both sides stay symmetric.
pub const DEFAULT_PADDING: f64 = 1.1;

/// Counts or share of the whole population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Absolute,
    Percent,
}

impl std::str::FromStr for Scale {
    type Err = PyramidError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "absolute" | "count" | "counts" => Ok(Scale::Absolute),
            "percent" | "percentage" | "pct" => Ok(Scale::Percent),
            other => Err(PyramidError::InvalidData(format!("unknown scale '{other}'"))),
        }
    }
}

/// Which side of the zero axis a series is drawn on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Negative values (males).
    Left,
    /// Positive values (females).
    Right,
}

/// One bar series. `values` are in display order (oldest band first).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub side: Side,
    pub values: Vec<f64>,
}

impl Series {
    fn left(label: impl Into<String>, values: impl DoubleEndedIterator<Item = f64>) -> Self {
        Self {
            label: label.into(),
            side: Side::Left,
            values: values.rev().map(mirror).collect(),
        }
    }

    fn right(label: impl Into<String>, values: impl DoubleEndedIterator<Item = f64>) -> Self {
        Self {
            label: label.into(),
            side: Side::Right,
            values: values.rev().collect(),
        }
    }

    fn max_abs(&self) -> f64 {
        self.values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
    }
}

/// Chart-library-ready pyramid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyramidChart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Age ranges, oldest first.
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    /// Symmetric axis bound: the x axis runs from `-max_abs` to `max_abs`.
    pub max_abs: f64,
}

impl PyramidChart {
    pub fn series(&self, label: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.label == label)
    }
}

/// Negate without producing `-0.0`.
#[inline]
fn mirror(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        -v
    }
}

fn reversed_labels(groups: &[AgeGroup]) -> Vec<String> {
    groups.iter().rev().map(|ag| ag.age_range.clone()).collect()
}

fn padded_max(series: &[Series], padding: f64) -> f64 {
    series.iter().fold(0.0_f64, |m, s| m.max(s.max_abs())) * padding
}

/// Largest single male or female count across both inputs, padded.
fn raw_max(a: &[AgeGroup], b: &[AgeGroup], padding: f64) -> f64 {
    a.iter()
        .chain(b)
        .map(|ag| ag.male.max(ag.female))
        .max()
        .unwrap_or(0) as f64
        * padding
}

/// Checks that two age-group lists can be compared band by band.
pub fn ensure_aligned(a: &[AgeGroup], b: &[AgeGroup]) -> Result<()> {
    if a.len() != b.len() {
        return Err(PyramidError::MismatchedAgeGroups(format!(
            "{} age groups vs {}",
            a.len(),
            b.len()
        )));
    }
    if let Some((x, y)) = a
        .iter()
        .zip(b)
        .find(|(x, y)| x.age_range != y.age_range)
    {
        return Err(PyramidError::MismatchedAgeGroups(format!(
            "'{}' lines up with '{}'",
            x.age_range, y.age_range
        )));
    }
    Ok(())
}

/// Builder for the standard two-series pyramid.
///
/// ```rust
/// use pyramid_core::model::AgeGroup;
/// use pyramid_core::pyramid::{PyramidBuilder, Scale};
///
/// let groups = vec![AgeGroup::new("0-4", 10, 12), AgeGroup::new("5-9", 8, 7)];
/// let chart = PyramidBuilder::new(&groups).title("Demo").build();
///
/// assert_eq!(chart.labels, vec!["5-9", "0-4"]);
/// assert_eq!(chart.series[0].values, vec![-8.0, -10.0]);
/// assert_eq!(chart.series[1].values, vec![7.0, 12.0]);
///
/// let pct = PyramidBuilder::new(&groups).scale(Scale::Percent).build();
/// assert!((pct.series[1].values[1] - 32.432).abs() < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct PyramidBuilder<'a> {
    groups: &'a [AgeGroup],
    title: Option<String>,
    scale: Scale,
    padding: f64,
    male_label: String,
    female_label: String,
}

impl<'a> PyramidBuilder<'a> {
    pub fn new(groups: &'a [AgeGroup]) -> Self {
        Self {
            groups,
            title: None,
            scale: Scale::Absolute,
            padding: DEFAULT_PADDING,
            male_label: "Male".to_string(),
            female_label: "Female".to_string(),
        }
    }

    pub fn from_year(year: &'a YearData) -> Self {
        Self::new(&year.age_groups)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// Multiplier applied to the largest bar; values below 1.0 are clamped.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = if padding.is_finite() { padding.max(1.0) } else { DEFAULT_PADDING };
        self
    }

    pub fn labels(mut self, male: impl Into<String>, female: impl Into<String>) -> Self {
        self.male_label = male.into();
        self.female_label = female.into();
        self
    }

    pub fn build(self) -> PyramidChart {
        let divisor = match self.scale {
            Scale::Absolute => 1.0,
            Scale::Percent => {
                let sum: u64 = self.groups.iter().map(|ag| ag.male + ag.female).sum();
                sum as f64 / 100.0
            }
        };
        let value = |n: u64| if divisor > 0.0 { n as f64 / divisor } else { 0.0 };

        let series = vec![
            Series::left(self.male_label, self.groups.iter().map(|ag| value(ag.male))),
            Series::right(self.female_label, self.groups.iter().map(|ag| value(ag.female))),
        ];

        PyramidChart {
            title: self.title,
            labels: reversed_labels(self.groups),
            max_abs: padded_max(&series, self.padding),
            series,
        }
    }
}

/// Pyramid that separates the balanced part of each band from the surplus sex.
///
/// Four series: shared male base `min(m, f)`, male surplus `m - f` when
/// positive, shared female base, female surplus `f - m` when positive.
pub fn surplus_pyramid(groups: &[AgeGroup], title: Option<String>) -> PyramidChart {
    let base = |ag: &AgeGroup| ag.male.min(ag.female) as f64;

    let series = vec![
        Series::left("Male", groups.iter().map(base)),
        Series::left(
            "Male surplus",
            groups.iter().map(|ag| ag.male.saturating_sub(ag.female) as f64),
        ),
        Series::right("Female", groups.iter().map(base)),
        Series::right(
            "Female surplus",
            groups.iter().map(|ag| ag.female.saturating_sub(ag.male) as f64),
        ),
    ];

    // Base and surplus stack, so the widest bar is max(m, f).
    let widest = groups.iter().map(|ag| ag.male.max(ag.female)).max().unwrap_or(0) as f64;

    PyramidChart {
        title,
        labels: reversed_labels(groups),
        max_abs: widest * DEFAULT_PADDING,
        series,
    }
}

/// Difference pyramid between two aligned datasets.
///
/// For every band and sex exactly one of "`a` has more" / "`b` has more"
/// can be non-zero; equal counts give zero on both.
///
/// Series order: `"{a} > {b} (Male)"`, `"{b} > {a} (Male)"`,
/// `"{a} > {b} (Female)"`, `"{b} > {a} (Female)"`.
pub fn difference_pyramid(
    a: &[AgeGroup],
    b: &[AgeGroup],
    name_a: &str,
    name_b: &str,
) -> Result<PyramidChart> {
    ensure_aligned(a, b)?;

    let excess = |x: u64, y: u64| x.saturating_sub(y) as f64;

    let series = vec![
        Series::left(
            format!("{name_a} > {name_b} (Male)"),
            a.iter().zip(b).map(|(x, y)| excess(x.male, y.male)),
        ),
        Series::left(
            format!("{name_b} > {name_a} (Male)"),
            a.iter().zip(b).map(|(x, y)| excess(y.male, x.male)),
        ),
        Series::right(
            format!("{name_a} > {name_b} (Female)"),
            a.iter().zip(b).map(|(x, y)| excess(x.female, y.female)),
        ),
        Series::right(
            format!("{name_b} > {name_a} (Female)"),
            a.iter().zip(b).map(|(x, y)| excess(y.female, x.female)),
        ),
    ];

    Ok(PyramidChart {
        title: Some(format!("{name_a} vs {name_b} Population Difference Pyramid")),
        labels: reversed_labels(a),
        max_abs: raw_max(a, b, DEFAULT_PADDING),
        series,
    })
}

/// Both datasets drawn over each other on one axis.
pub fn overlay_pyramid(
    a: &[AgeGroup],
    b: &[AgeGroup],
    name_a: &str,
    name_b: &str,
) -> Result<PyramidChart> {
    ensure_aligned(a, b)?;

    let series = vec![
        Series::left(format!("{name_a} (Male)"), a.iter().map(|ag| ag.male as f64)),
        Series::left(format!("{name_b} (Male)"), b.iter().map(|ag| ag.male as f64)),
        Series::right(format!("{name_a} (Female)"), a.iter().map(|ag| ag.female as f64)),
        Series::right(format!("{name_b} (Female)"), b.iter().map(|ag| ag.female as f64)),
    ];

    Ok(PyramidChart {
        title: Some(format!("{name_a} vs {name_b}")),
        labels: reversed_labels(a),
        max_abs: raw_max(a, b, DEFAULT_PADDING),
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<AgeGroup> {
        vec![
            AgeGroup::new("0-4", 100, 95),
            AgeGroup::new("5-9", 90, 92),
            AgeGroup::new("10-14", 0, 0),
        ]
    }

    #[test]
    fn zero_counts_do_not_become_negative_zero() {
        let chart = PyramidBuilder::new(&groups()).build();
        let first = chart.series[0].values[0];
        assert_eq!(first, 0.0);
        assert!(first.is_sign_positive());
    }

    #[test]
    fn percent_scale_of_empty_input_is_all_zero() {
        let empty = vec![AgeGroup::new("0-4", 0, 0)];
        let chart = PyramidBuilder::new(&empty).scale(Scale::Percent).build();
        assert_eq!(chart.series[0].values, vec![0.0]);
        assert_eq!(chart.series[1].values, vec![0.0]);
        assert_eq!(chart.max_abs, 0.0);
    }

    #[test]
    fn padding_below_one_is_clamped() {
        let chart = PyramidBuilder::new(&groups()).padding(0.5).build();
        assert_eq!(chart.max_abs, 100.0);
    }

    #[test]
    fn scale_parses_aliases() {
        assert_eq!("PERCENT".parse::<Scale>().unwrap(), Scale::Percent);
        assert_eq!("counts".parse::<Scale>().unwrap(), Scale::Absolute);
        assert!("log".parse::<Scale>().is_err());
    }
}
