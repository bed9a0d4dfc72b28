// crates/pyramid-core/src/cleaner.rs

//! Repair for a defect in the state source files: the 90-94 and 95-99 bands
//! are empty and 100+ repeats the 85-89 band. Such years are folded into a
//! single open-ended `85+` band.

use crate::model::{StatePopulation, YearData};
use tracing::debug;

const COLLAPSED: [&str; 3] = ["90-94", "95-99", "100+"];

fn has_elderly_defect(data: &YearData) -> bool {
    let (Some(b85), Some(b90), Some(b95), Some(b100)) = (
        data.age_group("85-89"),
        data.age_group("90-94"),
        data.age_group("95-99"),
        data.age_group("100+"),
    ) else {
        return false;
    };
    b90.total() == 0 && b95.total() == 0 && b100.total() == b85.total()
}

/// Cleaned copy of one year; unchanged if the defect is absent.
pub fn clean_year(data: &YearData) -> YearData {
    if !has_elderly_defect(data) {
        return data.clone();
    }
    debug!(year = data.year, "collapsing duplicated elderly bands into 85+");

    let age_groups = data
        .age_groups
        .iter()
        .filter(|ag| !COLLAPSED.contains(&ag.age_range.as_str()))
        .map(|ag| {
            let mut ag = ag.clone();
            if ag.age_range == "85-89" {
                ag.age_range = "85+".to_string();
            }
            ag
        })
        .collect();

    YearData {
        age_groups,
        ..data.clone()
    }
}

/// Cleans every year of a state dataset.
pub fn clean_state(state: &StatePopulation) -> StatePopulation {
    StatePopulation {
        years: state
            .years
            .iter()
            .map(|(year, data)| (*year, clean_year(data)))
            .collect(),
        ..state.clone()
    }
}
