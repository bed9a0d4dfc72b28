//! pyramid-wasm: WebAssembly bindings for pyramid-core
//!
//! Exposes the chart adapters and demographic calculations to JavaScript.
//! Every function takes plain JSON-shaped objects (the same shape as the
//! `population/<slug>.json` files) and returns plain objects, so a chart
//! component can feed the result straight into its bar series.
//!
//! Quick start (browser)
//! ---------------------
//! ```javascript
//! import init, { build_pyramid, difference_pyramid } from 'pyramid-wasm';
//!
//! await init();
//! const data = await (await fetch('/data/population/japan.json')).json();
//! const year = data.years['2024'];
//!
//! const chart = build_pyramid(year.ageGroups, true, 'Japan 2024');
//! // chart.labels: oldest band first
//! // chart.series[0].values: males, negative
//! // chart.series[1].values: females, positive
//! // chart.maxAbs: symmetric axis bound
//! ```
//!
//! Functions that combine two datasets throw when the age groups do not
//! line up.
use pyramid_core::cleaner;
use pyramid_core::compare::{self, SIGNIFICANT_THRESHOLD_PCT};
use pyramid_core::format;
use pyramid_core::metrics::DemographicMetrics;
use pyramid_core::pyramid::{self, PyramidBuilder, Scale};
use pyramid_core::stage;
use pyramid_core::{AgeGroup, YearData};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"pyramid-wasm ready".into());
}

fn js_error(msg: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&msg.to_string()).into()
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(js_error)
}

/// Plain objects instead of `Map`s, `null` instead of `undefined`.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(js_error)
}

/* --------------------------------------------------------------------------
   Pyramid adapters
-------------------------------------------------------------------------- */

/// `groups`: `[{ ageRange, male, female }]`, youngest first.
#[wasm_bindgen]
pub fn build_pyramid(
    groups: JsValue,
    percent: bool,
    title: Option<String>,
) -> Result<JsValue, JsValue> {
    let groups: Vec<AgeGroup> = from_js(groups)?;
    let scale = if percent { Scale::Percent } else { Scale::Absolute };
    let mut builder = PyramidBuilder::new(&groups).scale(scale);
    if let Some(t) = title {
        builder = builder.title(t);
    }
    to_js(&builder.build())
}

#[wasm_bindgen]
pub fn surplus_pyramid(groups: JsValue, title: Option<String>) -> Result<JsValue, JsValue> {
    let groups: Vec<AgeGroup> = from_js(groups)?;
    to_js(&pyramid::surplus_pyramid(&groups, title))
}

#[wasm_bindgen]
pub fn difference_pyramid(
    a: JsValue,
    b: JsValue,
    name_a: &str,
    name_b: &str,
) -> Result<JsValue, JsValue> {
    let a: Vec<AgeGroup> = from_js(a)?;
    let b: Vec<AgeGroup> = from_js(b)?;
    let chart = pyramid::difference_pyramid(&a, &b, name_a, name_b).map_err(js_error)?;
    to_js(&chart)
}

#[wasm_bindgen]
pub fn overlay_pyramid(
    a: JsValue,
    b: JsValue,
    name_a: &str,
    name_b: &str,
) -> Result<JsValue, JsValue> {
    let a: Vec<AgeGroup> = from_js(a)?;
    let b: Vec<AgeGroup> = from_js(b)?;
    let chart = pyramid::overlay_pyramid(&a, &b, name_a, name_b).map_err(js_error)?;
    to_js(&chart)
}

/* --------------------------------------------------------------------------
   Comparison
-------------------------------------------------------------------------- */

/// Bands whose totals differ by more than `threshold` percent (default 20).
#[wasm_bindgen]
pub fn significant_differences(
    a: JsValue,
    b: JsValue,
    name_a: &str,
    name_b: &str,
    threshold: Option<f64>,
) -> Result<JsValue, JsValue> {
    let a: Vec<AgeGroup> = from_js(a)?;
    let b: Vec<AgeGroup> = from_js(b)?;
    let diffs = compare::significant_differences(
        &a,
        &b,
        name_a,
        name_b,
        threshold.unwrap_or(SIGNIFICANT_THRESHOLD_PCT),
    )
    .map_err(js_error)?;
    to_js(&diffs)
}

/// `a`, `b`: year objects `{ year, totalPopulation, ageGroups }`.
#[wasm_bindgen]
pub fn side_by_side_summary(a: JsValue, b: JsValue) -> Result<JsValue, JsValue> {
    let a: YearData = from_js(a)?;
    let b: YearData = from_js(b)?;
    to_js(&compare::side_by_side_summary(&a, &b))
}

/* --------------------------------------------------------------------------
   Year analysis
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn demographic_metrics(year: JsValue) -> Result<JsValue, JsValue> {
    let year: YearData = from_js(year)?;
    to_js(&DemographicMetrics::from_year(&year))
}

#[wasm_bindgen]
pub fn classify_stage(year: JsValue) -> Result<JsValue, JsValue> {
    let year: YearData = from_js(year)?;
    to_js(&stage::classify(&year))
}

/// Folds the duplicated 90+ tail of state data into `85+`.
#[wasm_bindgen]
pub fn clean_year(year: JsValue) -> Result<JsValue, JsValue> {
    let year: YearData = from_js(year)?;
    to_js(&cleaner::clean_year(&year))
}

/* --------------------------------------------------------------------------
   Formatting
-------------------------------------------------------------------------- */

#[wasm_bindgen]
pub fn format_compact(n: f64, decimals: usize) -> String {
    format::format_compact(n, decimals)
}

#[wasm_bindgen]
pub fn format_growth(rate: f64) -> String {
    format::format_growth(rate)
}
