#![allow(clippy::useless_conversion)]

use pyramid_core::compare::{
    side_by_side_summary, significant_differences, SIGNIFICANT_THRESHOLD_PCT,
};
use pyramid_core::fertility::FertilityMetrics;
use pyramid_core::metrics::DemographicMetrics;
use pyramid_core::pyramid::{difference_pyramid, surplus_pyramid};
use pyramid_core::stage;
use pyramid_core::trend::{rank_by_growth, rank_by_median_age, GrowthSummary};
use pyramid_core::{PopDb, PopSearch, PyramidBuilder, Scale};
use pyo3::exceptions::{PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyModule;
use serde::Serialize;
use serde_json::json;

// Orphan rules forbid `From<PyramidError> for PyErr` here, so call sites use
// `.into_py()?`. Lookup failures surface as `KeyError`, bad input as
// `ValueError`.
trait IntoPyResult<T> {
    fn into_py(self) -> PyResult<T>;
}

impl<T> IntoPyResult<T> for pyramid_core::Result<T> {
    fn into_py(self) -> PyResult<T> {
        self.map_err(|e| {
            if e.is_not_found() {
                PyKeyError::new_err(e.to_string())
            } else if matches!(e, pyramid_core::PyramidError::MismatchedAgeGroups(_)) {
                PyValueError::new_err(e.to_string())
            } else {
                PyRuntimeError::new_err(e.to_string())
            }
        })
    }
}

fn to_py<'py, T: Serialize + ?Sized>(
    py: Python<'py>,
    value: &T,
) -> PyResult<Bound<'py, pyo3::PyAny>> {
    // Round-trip through json.loads to get native dict/list objects
    let s = serde_json::to_string(value)
        .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("serde error: {e}")))?;
    let json_mod = PyModule::import_bound(py, "json")?;
    let loads = json_mod.getattr("loads")?;
    loads.call1((s,))
}

#[pyclass(name = "PopDb")]
pub struct PyPopDb {
    inner: PopDb,
}

#[pymethods]
impl PyPopDb {
    /// Load a data directory or a `popdb.bin` snapshot.
    #[staticmethod]
    pub fn load(path: &str) -> PyResult<Self> {
        let db = PopDb::load_from_path(path).into_py()?;
        Ok(Self { inner: db })
    }

    #[staticmethod]
    pub fn load_default() -> PyResult<Self> {
        let db = PopDb::load().into_py()?.clone();
        Ok(Self { inner: db })
    }

    /// `(countries, country_datasets, states, state_datasets, fertility_datasets)`
    pub fn stats(&self) -> (usize, usize, usize, usize, usize) {
        let s = self.inner.stats();
        (
            s.countries,
            s.country_datasets,
            s.states,
            s.state_datasets,
            s.fertility_datasets,
        )
    }

    pub fn countries<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, pyo3::PyAny>> {
        to_py(py, self.inner.countries())
    }

    pub fn states<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, pyo3::PyAny>> {
        to_py(py, self.inner.states())
    }

    /// Country index entry by slug, ISO code or name (or None)
    pub fn find_country<'py>(
        &self,
        py: Python<'py>,
        query: &str,
    ) -> PyResult<Option<Bound<'py, pyo3::PyAny>>> {
        self.inner
            .find_country(query)
            .map(|c| to_py(py, c))
            .transpose()
    }

    /// Years with data for a country or state, ascending
    pub fn years(&self, slug: &str) -> PyResult<Vec<u16>> {
        let source = self.inner.source(slug).into_py()?;
        Ok(source.as_dyn().available_years())
    }

    /// One year's snapshot as a dict
    pub fn year<'py>(
        &self,
        py: Python<'py>,
        slug: &str,
        year: u16,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let source = self.inner.source(slug).into_py()?.as_dyn();
        to_py(py, source.year(year).into_py()?)
    }

    #[pyo3(signature = (slug, year, percent = false))]
    pub fn pyramid<'py>(
        &self,
        py: Python<'py>,
        slug: &str,
        year: u16,
        percent: bool,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let source = self.inner.source(slug).into_py()?.as_dyn();
        let data = source.year(year).into_py()?;
        let scale = if percent { Scale::Percent } else { Scale::Absolute };
        let chart = PyramidBuilder::from_year(data)
            .title(format!("{} Population Pyramid {year}", source.name()))
            .scale(scale)
            .build();
        to_py(py, &chart)
    }

    pub fn surplus_pyramid<'py>(
        &self,
        py: Python<'py>,
        slug: &str,
        year: u16,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let source = self.inner.source(slug).into_py()?.as_dyn();
        let data = source.year(year).into_py()?;
        let title = format!("{} Male/Female Surplus {year}", source.name());
        to_py(py, &surplus_pyramid(&data.age_groups, Some(title)))
    }

    /// Difference pyramid, significant bands and a side-by-side summary
    #[pyo3(signature = (a, b, year, threshold = SIGNIFICANT_THRESHOLD_PCT))]
    pub fn compare<'py>(
        &self,
        py: Python<'py>,
        a: &str,
        b: &str,
        year: u16,
        threshold: f64,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let first = self.inner.source(a).into_py()?.as_dyn();
        let second = self.inner.source(b).into_py()?.as_dyn();
        let (ya, yb) = (first.year(year).into_py()?, second.year(year).into_py()?);

        let chart =
            difference_pyramid(&ya.age_groups, &yb.age_groups, first.name(), second.name())
                .into_py()?;
        let diffs = significant_differences(
            &ya.age_groups,
            &yb.age_groups,
            first.name(),
            second.name(),
            threshold,
        )
        .into_py()?;

        to_py(
            py,
            &json!({
                "pyramid": chart,
                "significantDifferences": diffs,
                "summary": side_by_side_summary(ya, yb),
            }),
        )
    }

    /// Demographic metrics, transition stage and (for countries) fertility
    pub fn metrics<'py>(
        &self,
        py: Python<'py>,
        slug: &str,
        year: u16,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let source = self.inner.source(slug).into_py()?.as_dyn();
        let data = source.year(year).into_py()?;
        let fertility = self
            .inner
            .fertility(source.slug())
            .map(|f| FertilityMetrics::from_series(&f.fertility_data));

        to_py(
            py,
            &json!({
                "metrics": DemographicMetrics::from_year(data),
                "stage": stage::classify(data),
                "fertility": fertility,
            }),
        )
    }

    pub fn growth<'py>(
        &self,
        py: Python<'py>,
        slug: &str,
        from_year: u16,
        to_year: u16,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let source = self.inner.source(slug).into_py()?.as_dyn();
        to_py(py, &GrowthSummary::between(source, from_year, to_year).into_py()?)
    }

    /// Countries ranked by growth, fastest first
    #[pyo3(signature = (from_year, to_year, states = false))]
    pub fn rank_by_growth<'py>(
        &self,
        py: Python<'py>,
        from_year: u16,
        to_year: u16,
        states: bool,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let ranked = if states {
            rank_by_growth(self.inner.state_data.values(), from_year, to_year)
        } else {
            rank_by_growth(self.inner.country_data.values(), from_year, to_year)
        };
        to_py(py, &ranked)
    }

    /// Regions ordered oldest first by median age
    #[pyo3(signature = (year, states = false))]
    pub fn rank_by_median_age<'py>(
        &self,
        py: Python<'py>,
        year: u16,
        states: bool,
    ) -> PyResult<Bound<'py, pyo3::PyAny>> {
        let ranked = if states {
            rank_by_median_age(self.inner.state_data.values(), year)
        } else {
            rank_by_median_age(self.inner.country_data.values(), year)
        };
        to_py(py, &ranked)
    }
}

#[pymodule]
fn pyramid_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyPopDb>()?;
    Ok(())
}
