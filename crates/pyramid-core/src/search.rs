// crates/pyramid-core/src/search.rs

use crate::db::PopDb;
use crate::error::{PyramidError, Result};
use crate::model::{CountryInfo, CountryPopulation, DbStats, StateInfo, StatePopulation};
use crate::traits::{NameMatch, PopSearch, Source};

impl PopSearch for PopDb {
    fn stats(&self) -> DbStats {
        DbStats {
            countries: self.countries.len(),
            country_datasets: self.country_data.len(),
            states: self.states.len(),
            state_datasets: self.state_data.len(),
            fertility_datasets: self.fertility.len(),
        }
    }

    fn countries(&self) -> &[CountryInfo] {
        &self.countries
    }

    fn states(&self) -> &[StateInfo] {
        &self.states
    }

    fn find_country(&self, query: &str) -> Option<&CountryInfo> {
        let q = query.trim();
        if q.is_empty() {
            return None;
        }

        // Linear scans are fine for ~240 countries.
        self.countries
            .iter()
            .find(|c| c.slug == q)
            .or_else(|| {
                self.countries.iter().find(|c| {
                    c.code.eq_ignore_ascii_case(q) || eq_code(&c.iso2, q) || eq_code(&c.iso3, q)
                })
            })
            .or_else(|| self.countries.iter().find(|c| c.is_named(q)))
    }

    fn find_state(&self, query: &str) -> Option<&StateInfo> {
        let q = query.trim();
        if q.is_empty() {
            return None;
        }
        self.states
            .iter()
            .find(|s| s.slug == q)
            .or_else(|| self.states.iter().find(|s| s.state_code.eq_ignore_ascii_case(q)))
            .or_else(|| self.states.iter().find(|s| s.is_named(q)))
    }

    fn find_countries_by_substring(&self, substr: &str) -> Vec<&CountryInfo> {
        let q = substr.trim();
        if q.is_empty() {
            return Vec::new();
        }
        self.countries.iter().filter(|c| c.name_contains(q)).collect()
    }

    fn find_states_by_substring(&self, substr: &str) -> Vec<&StateInfo> {
        let q = substr.trim();
        if q.is_empty() {
            return Vec::new();
        }
        self.states.iter().filter(|s| s.name_contains(q)).collect()
    }

    fn source(&self, query: &str) -> Result<Source<'_>> {
        let q = query.trim();
        match q.split_once(':') {
            Some(("country", rest)) => return self.country_data(rest).map(Source::Country),
            Some(("state", rest)) => return self.state_data(rest).map(Source::State),
            _ => {}
        }

        if let Some(c) = self.country_data.get(q) {
            return Ok(Source::Country(c));
        }
        if let Some(s) = self.state_data.get(q) {
            return Ok(Source::State(s));
        }

        // Two-letter codes collide between ISO2 and postal codes ("GA", "IN").
        let by_code = self
            .countries
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(q) || eq_code(&c.iso3, q))
            .map(|c| c.slug.as_str())
            .map(|slug| self.country_by_slug(slug).map(Source::Country))
            .or_else(|| {
                self.states
                    .iter()
                    .find(|s| s.state_code.eq_ignore_ascii_case(q))
                    .map(|s| self.state_by_slug(&s.slug).map(Source::State))
            })
            .or_else(|| {
                self.countries
                    .iter()
                    .find(|c| eq_code(&c.iso2, q))
                    .map(|c| self.country_by_slug(&c.slug).map(Source::Country))
            });
        if let Some(found) = by_code {
            return found;
        }

        if let Some(c) = self.countries.iter().find(|c| c.is_named(q)) {
            return self.country_by_slug(&c.slug).map(Source::Country);
        }
        if let Some(s) = self.states.iter().find(|s| s.is_named(q)) {
            return self.state_by_slug(&s.slug).map(Source::State);
        }
        Err(PyramidError::NotFound(format!("country or state '{query}'")))
    }

    fn country_data(&self, query: &str) -> Result<&CountryPopulation> {
        let info = self
            .find_country(query)
            .ok_or_else(|| PyramidError::NotFound(format!("country '{query}'")))?;
        self.country_by_slug(&info.slug)
    }

    fn state_data(&self, query: &str) -> Result<&StatePopulation> {
        let info = self
            .find_state(query)
            .ok_or_else(|| PyramidError::NotFound(format!("state '{query}'")))?;
        self.state_by_slug(&info.slug)
    }
}

fn eq_code(code: &Option<String>, q: &str) -> bool {
    code.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(q))
}

impl PopDb {
    fn country_by_slug(&self, slug: &str) -> Result<&CountryPopulation> {
        self.country_data
            .get(slug)
            .ok_or_else(|| PyramidError::NotFound(format!("population data for '{slug}'")))
    }

    fn state_by_slug(&self, slug: &str) -> Result<&StatePopulation> {
        self.state_data
            .get(slug)
            .ok_or_else(|| PyramidError::NotFound(format!("population data for '{slug}'")))
    }
}
