mod common;

use pyramid_core::compare::{
    significant_differences, side_by_side_summary, Larger, SIGNIFICANT_THRESHOLD_PCT,
};
use pyramid_core::model::{AgeGroup, YearData};
use pyramid_core::pyramid::{
    difference_pyramid, overlay_pyramid, surplus_pyramid, PyramidBuilder, Scale, Side,
};
use pyramid_core::PyramidError;

fn three_bands() -> Vec<AgeGroup> {
    vec![
        AgeGroup::new("0-4", 120, 100),
        AgeGroup::new("5-9", 80, 90),
        AgeGroup::new("10+", 50, 50),
    ]
}

#[test]
fn every_series_matches_the_label_count() {
    let groups = common::standard_groups(1_000);
    let other = common::standard_groups(700);

    let charts = [
        PyramidBuilder::new(&groups).build(),
        surplus_pyramid(&groups, None),
        difference_pyramid(&groups, &other, "A", "B").unwrap(),
        overlay_pyramid(&groups, &other, "A", "B").unwrap(),
    ];
    for chart in &charts {
        assert_eq!(chart.labels.len(), groups.len());
        for s in &chart.series {
            assert_eq!(s.values.len(), chart.labels.len(), "{}", s.label);
        }
    }
}

#[test]
fn labels_are_reversed_and_sides_have_fixed_signs() {
    let chart = PyramidBuilder::new(&three_bands()).build();

    assert_eq!(chart.labels, vec!["10+", "5-9", "0-4"]);
    let male = chart.series("Male").unwrap();
    let female = chart.series("Female").unwrap();
    assert_eq!(male.side, Side::Left);
    assert_eq!(male.values, vec![-50.0, -80.0, -120.0]);
    assert_eq!(female.values, vec![50.0, 90.0, 100.0]);
    assert!((chart.max_abs - 132.0).abs() < 1e-9);
}

#[test]
fn percent_scale_sums_to_one_hundred() {
    let chart = PyramidBuilder::new(&three_bands())
        .scale(Scale::Percent)
        .labels("Men", "Women")
        .build();
    let sum: f64 = chart
        .series
        .iter()
        .flat_map(|s| s.values.iter())
        .map(|v| v.abs())
        .sum();
    assert!((sum - 100.0).abs() < 1e-9);
    assert!(chart.series("Men").is_some());
}

#[test]
fn surplus_splits_each_band_into_base_and_excess() {
    let chart = surplus_pyramid(&three_bands(), Some("Demo".into()));
    let names: Vec<&str> = chart.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(names, ["Male", "Male surplus", "Female", "Female surplus"]);

    // Display order: 10+, 5-9, 0-4
    assert_eq!(chart.series("Male").unwrap().values, vec![-50.0, -80.0, -100.0]);
    assert_eq!(chart.series("Male surplus").unwrap().values, vec![0.0, 0.0, -20.0]);
    assert_eq!(chart.series("Female").unwrap().values, vec![50.0, 80.0, 100.0]);
    assert_eq!(chart.series("Female surplus").unwrap().values, vec![0.0, 10.0, 0.0]);
    assert!((chart.max_abs - 132.0).abs() < 1e-9);
    assert_eq!(chart.title.as_deref(), Some("Demo"));
}

#[test]
fn difference_is_one_sided_per_band() {
    let a = three_bands();
    let b = vec![
        AgeGroup::new("0-4", 100, 100),
        AgeGroup::new("5-9", 90, 70),
        AgeGroup::new("10+", 50, 50),
    ];
    let chart = difference_pyramid(&a, &b, "A", "B").unwrap();

    let a_male = &chart.series("A > B (Male)").unwrap().values;
    let b_male = &chart.series("B > A (Male)").unwrap().values;
    let a_female = &chart.series("A > B (Female)").unwrap().values;
    let b_female = &chart.series("B > A (Female)").unwrap().values;

    assert_eq!(a_male, &vec![0.0, 0.0, -20.0]);
    assert_eq!(b_male, &vec![0.0, -10.0, 0.0]);
    assert_eq!(a_female, &vec![0.0, 20.0, 0.0]);
    assert_eq!(b_female, &vec![0.0, 0.0, 0.0]);

    for i in 0..chart.labels.len() {
        assert!(a_male[i] == 0.0 || b_male[i] == 0.0);
        assert!(a_female[i] == 0.0 || b_female[i] == 0.0);
    }
    assert_eq!(
        chart.title.as_deref(),
        Some("A vs B Population Difference Pyramid")
    );
    // Axis follows the raw inputs, not the differences.
    assert!((chart.max_abs - 132.0).abs() < 1e-9);
}

#[test]
fn misaligned_inputs_are_rejected() {
    let a = three_bands();
    let short = &a[..2];
    assert!(matches!(
        difference_pyramid(&a, short, "A", "B"),
        Err(PyramidError::MismatchedAgeGroups(_))
    ));

    let mut relabeled = a.clone();
    relabeled[1].age_range = "5-10".into();
    assert!(matches!(
        overlay_pyramid(&a, &relabeled, "A", "B"),
        Err(PyramidError::MismatchedAgeGroups(_))
    ));
}

#[test]
fn significant_bands_exceed_the_threshold() {
    let a = vec![
        AgeGroup::new("0-4", 130, 130),
        AgeGroup::new("5-9", 110, 110),
        AgeGroup::new("10+", 10, 0),
        AgeGroup::new("15+", 0, 0),
    ];
    let b = vec![
        AgeGroup::new("0-4", 100, 100),
        AgeGroup::new("5-9", 100, 100),
        AgeGroup::new("10+", 0, 0),
        AgeGroup::new("15+", 0, 0),
    ];

    let diffs = significant_differences(&a, &b, "A", "B", SIGNIFICANT_THRESHOLD_PCT).unwrap();
    let ranges: Vec<&str> = diffs.iter().map(|d| d.age_range.as_str()).collect();
    assert_eq!(ranges, ["0-4", "10+"]);

    assert!((diffs[0].total_diff_pct.unwrap() - 30.0).abs() < 1e-9);
    assert_eq!(diffs[0].larger, Larger::First);
    assert_eq!(diffs[0].larger_name.as_deref(), Some("A"));
    assert_eq!(diffs[0].male_abs_diff, 30);

    // Zero denominator: reported without a percentage.
    assert_eq!(diffs[1].total_diff_pct, None);
}

#[test]
fn side_by_side_uses_first_three_and_trailing_bands() {
    let a = YearData::from_groups(2024, common::standard_groups(100));
    let b = YearData::from_groups(2024, common::standard_groups(50));
    let summary = side_by_side_summary(&a, &b);

    let youth: u64 = a.age_groups[..3].iter().map(AgeGroup::total).sum();
    let elderly: u64 = a.age_groups[13..].iter().map(AgeGroup::total).sum();
    assert_eq!(summary.first.youth, youth);
    assert_eq!(summary.first.elderly, elderly);
    assert!(summary.total_diff_pct.unwrap() > 0.0);

    let empty = YearData::from_groups(2024, Vec::new());
    let s = side_by_side_summary(&empty, &empty);
    assert_eq!(s.first.youth_pct, None);
    assert_eq!(s.total_diff_pct, None);
}
