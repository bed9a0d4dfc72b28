// crates/pyramid-core/src/traits.rs
use crate::error::{PyramidError, Result};
use crate::model::{
    CountryInfo, CountryPopulation, DbStats, StateInfo, StatePopulation, YearData, Years,
};
use crate::text::fold_key;

/// Name-based matching helpers for types that expose a canonical display name.
///
/// Implementors provide a `&str` view of their canonical name via
/// [`NameMatch::name_str`], and get accent- and case-insensitive helpers.
///
/// # Examples
/// ```rust
/// use pyramid_core::traits::NameMatch;
///
/// struct Place(&'static str);
/// impl NameMatch for Place {
///     fn name_str(&self) -> &str { self.0 }
/// }
///
/// assert!(Place("Türkiye").is_named("turkiye"));
/// assert!(Place("Côte d'Ivoire").name_contains("cote"));
/// ```
pub trait NameMatch {
    /// Returns the canonical display name used for matching.
    fn name_str(&self) -> &str;

    #[inline]
    fn is_named(&self, q: &str) -> bool {
        fold_key(self.name_str()) == fold_key(q)
    }

    #[inline]
    fn name_contains(&self, q: &str) -> bool {
        fold_key(self.name_str()).contains(&fold_key(q))
    }
}

/// Anything with a year-keyed population history: a country or a state.
///
/// The chart and trend code is written against this trait so it does not
/// care which kind of region it is shaping.
pub trait PopulationSource {
    fn name(&self) -> &str;
    fn slug(&self) -> &str;
    /// Country ISO3 code or state postal code.
    fn code(&self) -> &str;
    fn region(&self) -> Option<&str>;
    fn years(&self) -> &Years;

    /// The snapshot for `year`, or [`PyramidError::YearMissing`].
    fn year(&self, year: u16) -> Result<&YearData> {
        self.years().get(&year).ok_or_else(|| PyramidError::YearMissing {
            name: self.name().to_string(),
            year,
        })
    }

    /// Years with data, ascending.
    fn available_years(&self) -> Vec<u16> {
        self.years().keys().copied().collect()
    }

    fn latest_year(&self) -> Option<u16> {
        self.years().keys().next_back().copied()
    }
}

impl PopulationSource for CountryPopulation {
    fn name(&self) -> &str {
        &self.country_name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn code(&self) -> &str {
        &self.country_code
    }

    fn region(&self) -> Option<&str> {
        Some(self.region.as_str()).filter(|r| !r.is_empty())
    }

    fn years(&self) -> &Years {
        &self.years
    }
}

impl PopulationSource for StatePopulation {
    fn name(&self) -> &str {
        &self.state_name
    }

    fn slug(&self) -> &str {
        &self.slug
    }

    fn code(&self) -> &str {
        &self.state_code
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn years(&self) -> &Years {
        &self.years
    }
}

impl NameMatch for CountryInfo {
    fn name_str(&self) -> &str {
        &self.name
    }
}

impl NameMatch for StateInfo {
    fn name_str(&self) -> &str {
        &self.state_name
    }
}

/// A resolved dataset, either a country or a state.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    Country(&'a CountryPopulation),
    State(&'a StatePopulation),
}

impl<'a> Source<'a> {
    pub fn as_dyn(&self) -> &'a dyn PopulationSource {
        match *self {
            Source::Country(c) => c,
            Source::State(s) => s,
        }
    }
}

/// The lookup operations available on the database.
pub trait PopSearch {
    fn stats(&self) -> DbStats;

    /// Country index in file order.
    fn countries(&self) -> &[CountryInfo];

    /// State index in file order.
    fn states(&self) -> &[StateInfo];

    /// Resolve a country by slug, ISO2, ISO3 or (folded) name.
    fn find_country(&self, query: &str) -> Option<&CountryInfo>;

    /// Resolve a state by slug, postal code or (folded) name.
    fn find_state(&self, query: &str) -> Option<&StateInfo>;

    fn find_countries_by_substring(&self, substr: &str) -> Vec<&CountryInfo>;
    fn find_states_by_substring(&self, substr: &str) -> Vec<&StateInfo>;

    /// Full dataset for a country, resolved with [`PopSearch::find_country`].
    fn country_data(&self, query: &str) -> Result<&CountryPopulation>;

    /// Full dataset for a state, resolved with [`PopSearch::find_state`].
    fn state_data(&self, query: &str) -> Result<&StatePopulation>;

    /// Resolve a country or a state.
    ///
    /// `country:<query>` and `state:<query>` restrict the lookup to one
    /// index. Otherwise exact slugs are tried across both indexes first, then
    /// codes (country ISO3, state postal code, country ISO2), then names.
    /// A slug shared by a country and a state resolves to the country.
    fn source(&self, query: &str) -> Result<Source<'_>>;
}
