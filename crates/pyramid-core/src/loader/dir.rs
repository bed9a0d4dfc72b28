// crates/pyramid-core/src/loader/dir.rs
use super::common_io::{read_json, resolve_dataset};
use crate::db::PopDb;
use crate::error::{PyramidError, Result};
use crate::fertility::FertilityData;
use crate::model::{CountryInfo, CountryPopulation, StateInfo, StatePopulation};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const COUNTRIES_INDEX: &str = "countries";
pub const STATES_INDEX: &str = "states";
pub const POPULATION_DIR: &str = "population";
pub const STATES_DIR: &str = "states";
pub const FERTILITY_DIR: &str = "fertility";

fn load_index<T: DeserializeOwned>(dir: &Path, stem: &str) -> Result<Option<Vec<T>>> {
    match resolve_dataset(dir, stem) {
        Some(path) => read_json(&path).map(Some),
        None => Ok(None),
    }
}

/// Loads `<dir>/<slug>.json[.gz]` for every slug. Files that are missing or
/// fail to parse are logged and skipped.
fn load_datasets<'a, T: DeserializeOwned>(
    dir: &Path,
    slugs: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, T> {
    let mut out = BTreeMap::new();
    for slug in slugs {
        let Some(path) = resolve_dataset(dir, slug) else {
            debug!(slug, dir = %dir.display(), "no dataset file");
            continue;
        };
        match read_json::<T>(&path) {
            Ok(data) => {
                out.insert(slug.to_string(), data);
            }
            Err(e) => warn!(slug, path = %path.display(), error = %e, "failed to load dataset"),
        }
    }
    out
}

impl PopDb {
    /// Reads a data directory:
    ///
    /// ```text
    /// countries.json        states.json
    /// population/<slug>.json
    /// states/<slug>.json
    /// fertility/<slug>.json (optional)
    /// ```
    ///
    /// Any file may be gzip compressed (`.json.gz`). At least one of the two
    /// index files must exist.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let countries: Option<Vec<CountryInfo>> = load_index(dir, COUNTRIES_INDEX)?;
        let states: Option<Vec<StateInfo>> = load_index(dir, STATES_INDEX)?;

        if countries.is_none() && states.is_none() {
            return Err(PyramidError::NotFound(format!(
                "no {COUNTRIES_INDEX}.json or {STATES_INDEX}.json in {}",
                dir.display()
            )));
        }
        let countries = countries.unwrap_or_default();
        let states = states.unwrap_or_default();

        let country_data: BTreeMap<String, CountryPopulation> = load_datasets(
            &dir.join(POPULATION_DIR),
            countries.iter().map(|c| c.slug.as_str()),
        );
        let state_data: BTreeMap<String, StatePopulation> = load_datasets(
            &dir.join(STATES_DIR),
            states.iter().map(|s| s.slug.as_str()),
        );
        let fertility: BTreeMap<String, FertilityData> = load_datasets(
            &dir.join(FERTILITY_DIR),
            countries.iter().map(|c| c.slug.as_str()),
        );

        info!(
            dir = %dir.display(),
            countries = countries.len(),
            country_datasets = country_data.len(),
            states = states.len(),
            state_datasets = state_data.len(),
            fertility_datasets = fertility.len(),
            "loaded data directory"
        );

        Ok(PopDb {
            countries,
            states,
            country_data,
            state_data,
            fertility,
        })
    }
}
