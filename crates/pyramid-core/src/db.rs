// crates/pyramid-core/src/db.rs
use crate::fertility::FertilityData;
use crate::model::{CountryInfo, CountryPopulation, StateInfo, StatePopulation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The in-memory population database.
///
/// Indexes keep their file order; full datasets are keyed by slug. An index
/// entry whose dataset failed to load stays in the index but has no entry in
/// the dataset maps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PopDb {
    pub countries: Vec<CountryInfo>,
    pub states: Vec<StateInfo>,
    pub country_data: BTreeMap<String, CountryPopulation>,
    pub state_data: BTreeMap<String, StatePopulation>,
    pub fertility: BTreeMap<String, FertilityData>,
}

impl PopDb {
    /// Builds a database from datasets already in memory, deriving index
    /// entries for them.
    pub fn from_datasets(
        countries: impl IntoIterator<Item = CountryPopulation>,
        states: impl IntoIterator<Item = StatePopulation>,
    ) -> Self {
        let mut db = PopDb::default();
        for c in countries {
            db.countries.push(CountryInfo {
                code: c.country_code.clone(),
                name: c.country_name.clone(),
                slug: c.slug.clone(),
                region: c.region.clone(),
                subregion: None,
                population_2024: c.years.get(&2024).map(|y| y.total_population),
                flag: None,
                iso2: None,
                iso3: Some(c.country_code.clone()),
            });
            db.country_data.insert(c.slug.clone(), c);
        }
        for s in states {
            db.states.push(StateInfo {
                state_code: s.state_code.clone(),
                state_name: s.state_name.clone(),
                slug: s.slug.clone(),
                fips: s.fips.clone(),
                region: s.region.clone(),
            });
            db.state_data.insert(s.slug.clone(), s);
        }
        db
    }

    /// Fertility dataset for a country slug, if one was shipped.
    pub fn fertility(&self, slug: &str) -> Option<&FertilityData> {
        self.fertility.get(slug)
    }
}
