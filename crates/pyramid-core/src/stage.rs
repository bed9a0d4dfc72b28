// crates/pyramid-core/src/stage.rs

//! Demographic transition stage estimated from the age structure alone.
//!
//! Birth and death rates are not in the datasets, so they are approximated
//! from the youth (0-14) and elderly (65+) shares.

use crate::model::YearData;
use serde::{Deserialize, Serialize};

const BIRTH_RATE_PER_YOUTH_PCT: f64 = 3.33;
const DEATH_RATE_PER_ELDERLY_PCT: f64 = 0.8;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DemographicStage {
    pub stage: u8,
    pub name: String,
    pub description: String,
    pub link: String,
}

impl DemographicStage {
    fn new(stage: u8) -> Self {
        let (name, description) = match stage {
            1 => (
                "Stage 1: Pre-Transition",
                "High birth and death rates create slow population growth. Large families are common due to high infant mortality and agricultural economy.",
            ),
            2 => (
                "Stage 2: Early Transition",
                "Death rates fall due to improved healthcare while birth rates remain high, causing rapid population growth and a very young age structure.",
            ),
            3 => (
                "Stage 3: Late Transition",
                "Birth rates decline due to urbanization, education, and economic development. Population growth slows as families become smaller.",
            ),
            5 => (
                "Stage 5: Post-Transition Decline",
                "Birth rates fall below replacement level, creating population decline and rapid aging. Countries face economic challenges from shrinking workforces.",
            ),
            _ => (
                "Stage 4: Post-Transition",
                "Low birth and death rates create stable population with balanced age structure. Most developed countries reach this equilibrium stage.",
            ),
        };
        let stage = if (1..=5).contains(&stage) { stage } else { 4 };
        Self {
            stage,
            name: name.to_string(),
            description: description.to_string(),
            link: format!("/blog/stage-{stage}-demographic-transition"),
        }
    }

    /// One-paragraph explanation naming the region.
    pub fn explain(&self, region_name: &str) -> String {
        format!(
            "{region_name} is in {}. {} You can read more about {} here.",
            self.name,
            self.description,
            self.name.to_lowercase()
        )
    }
}

/// Stage from youth and elderly shares (percent of total population).
pub fn classify_shares(youth_pct: f64, elderly_pct: f64) -> DemographicStage {
    let birth = youth_pct * BIRTH_RATE_PER_YOUTH_PCT;
    let death = elderly_pct * DEATH_RATE_PER_ELDERLY_PCT;

    let stage = if birth > 40.0 && death > 25.0 && youth_pct > 40.0 {
        1
    } else if birth > 30.0 && death < 20.0 && youth_pct > 35.0 {
        2
    } else if (15.0..=30.0).contains(&birth)
        && death < 15.0
        && (25.0..=35.0).contains(&youth_pct)
    {
        3
    } else if birth < 10.0 && elderly_pct > 20.0 {
        5
    } else {
        4
    };
    DemographicStage::new(stage)
}

/// Stage of one year's snapshot. An empty population is stage 4.
pub fn classify(data: &YearData) -> DemographicStage {
    let total = data.total_population;
    if total == 0 {
        return DemographicStage::new(4);
    }
    let share = |n: u64| n as f64 / total as f64 * 100.0;
    classify_shares(share(data.youth()), share(data.elderly()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_follows_stage_number() {
        assert_eq!(
            classify_shares(2.0, 30.0).link,
            "/blog/stage-5-demographic-transition"
        );
    }

    #[test]
    fn each_rule_in_order() {
        assert_eq!(classify_shares(45.0, 35.0).stage, 1);
        assert_eq!(classify_shares(40.0, 5.0).stage, 2);
        assert_eq!(classify_shares(20.0, 10.0).stage, 4);
        assert_eq!(classify_shares(2.0, 25.0).stage, 5);
        // Stage 1 needs a very old population as well as a young one.
        assert_eq!(classify_shares(45.0, 10.0).stage, 2);
    }

    #[test]
    fn stage_three_bounds_fall_through_to_four() {
        // A youth share of 25-35% implies an estimated birth rate above 80,
        // outside the 15-30 window, so the stage 3 rule never fires.
        for youth in [25.0, 30.0, 35.0] {
            assert_eq!(classify_shares(youth, 5.0).stage, 4, "youth {youth}");
        }
        assert_eq!(classify_shares(35.0, 5.0).name, "Stage 4: Post-Transition");
    }

    #[test]
    fn explanation_mentions_region() {
        let text = classify_shares(20.0, 10.0).explain("Chile");
        assert!(text.starts_with("Chile is in Stage 4: Post-Transition."));
        assert!(text.ends_with("stage 4: post-transition here."));
    }
}
