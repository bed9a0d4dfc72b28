use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use pyramid_cli::server::router;
use pyramid_core::model::{AgeGroup, STANDARD_AGE_RANGES};
use pyramid_core::{CountryPopulation, PopDb, StatePopulation, YearData, Years};
use serde_json::Value;
use tower::ServiceExt;

fn year(year: u16, scale: u64) -> YearData {
    let groups = STANDARD_AGE_RANGES
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let n = (21 - i as u64) * scale;
            AgeGroup::new(*r, n, n + 1)
        })
        .collect();
    YearData::from_groups(year, groups)
}

fn years(list: &[(u16, u64)]) -> Years {
    list.iter().map(|&(y, s)| (y, year(y, s))).collect()
}

/// State year with empty 90-94/95-99 bands and 100+ repeating 85-89.
fn defective_year(y: u16) -> YearData {
    let groups = STANDARD_AGE_RANGES
        .iter()
        .map(|r| match *r {
            "85-89" | "100+" => AgeGroup::new(*r, 7, 9),
            "90-94" | "95-99" => AgeGroup::new(*r, 0, 0),
            _ => AgeGroup::new(*r, 50, 50),
        })
        .collect();
    YearData::from_groups(y, groups)
}

fn app() -> Router {
    let japan = CountryPopulation {
        country_code: "JPN".into(),
        country_name: "Japan".into(),
        slug: "japan".into(),
        region: "Asia".into(),
        years: years(&[(2000, 1_000), (2024, 900)]),
    };
    let nigeria = CountryPopulation {
        country_code: "NGA".into(),
        country_name: "Nigeria".into(),
        slug: "nigeria".into(),
        region: "Africa".into(),
        years: years(&[(2024, 2_000)]),
    };
    let mut short = year(2024, 10);
    short.age_groups.truncate(5);
    let tiny = CountryPopulation {
        country_code: "TNY".into(),
        country_name: "Tiny".into(),
        slug: "tiny".into(),
        region: "Oceania".into(),
        years: [(2024, short)].into_iter().collect(),
    };
    let california = StatePopulation {
        state_code: "CA".into(),
        state_name: "California".into(),
        slug: "california".into(),
        fips: Some("06".into()),
        region: Some("West".into()),
        years: [(2023, defective_year(2023))].into_iter().collect(),
    };
    router(PopDb::from_datasets([japan, nigeria, tiny], [california]))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_counts() {
    let (status, body) = get(app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["countries"], 3);
    assert_eq!(body["states"], 1);
}

#[tokio::test]
async fn indexes_list_entries() {
    let (_, countries) = get(app(), "/api/countries").await;
    assert_eq!(countries.as_array().unwrap().len(), 3);
    assert_eq!(countries[0]["slug"], "japan");

    let (_, states) = get(app(), "/api/states-data").await;
    assert_eq!(states[0]["stateCode"], "CA");
}

#[tokio::test]
async fn country_dataset_and_unknown_slug() {
    let (status, body) = get(app(), "/api/country/japan").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["countryName"], "Japan");
    assert!(body["years"]["2024"]["ageGroups"].is_array());

    let (status, body) = get(app(), "/api/country/atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("atlantis"));
}

#[tokio::test]
async fn states_data_is_cleaned_but_years_route_is_raw() {
    let (status, cleaned) = get(app(), "/api/states-data/california").await;
    assert_eq!(status, StatusCode::OK);
    let groups = cleaned["years"]["2023"]["ageGroups"].as_array().unwrap();
    assert_eq!(groups.len(), 18);
    assert_eq!(groups.last().unwrap()["ageRange"], "85+");

    let (status, raw) = get(app(), "/api/states/CA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(raw["2023"]["ageGroups"].as_array().unwrap().len(), 21);

    let (status, body) = get(app(), "/api/states/ZZ").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "State not found");
}

#[tokio::test]
async fn pyramid_endpoint_mirrors_series() {
    let (status, chart) = get(app(), "/api/pyramid/japan/2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["labels"][0], "100+");
    assert_eq!(chart["title"], "Japan Population Pyramid 2024");

    let male = chart["series"][0]["values"].as_array().unwrap();
    let female = chart["series"][1]["values"].as_array().unwrap();
    assert_eq!(male.len(), 21);
    assert!(male.iter().all(|v| v.as_f64().unwrap() <= 0.0));
    assert!(female.iter().all(|v| v.as_f64().unwrap() >= 0.0));
    assert_eq!(chart["series"][0]["side"], "left");
}

#[tokio::test]
async fn pyramid_percent_scale_and_bad_scale() {
    let (status, chart) = get(app(), "/api/pyramid/california/2023?scale=percent").await;
    assert_eq!(status, StatusCode::OK);
    let sum: f64 = chart["series"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|s| s["values"].as_array().unwrap().iter())
        .map(|v| v.as_f64().unwrap().abs())
        .sum();
    assert!((sum - 100.0).abs() < 1e-6);

    let (status, body) = get(app(), "/api/pyramid/japan/2024?scale=log").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn missing_year_is_404() {
    let (status, body) = get(app(), "/api/pyramid/nigeria/1990").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no data for Nigeria in 1990");
}

#[tokio::test]
async fn compare_returns_difference_pyramid() {
    let (status, body) = get(app(), "/api/compare/japan/nigeria/2024").await;
    assert_eq!(status, StatusCode::OK);

    let series = body["pyramid"]["series"].as_array().unwrap();
    assert_eq!(series.len(), 4);
    assert_eq!(series[0]["label"], "Japan > Nigeria (Male)");
    // Nigeria is larger in every band, so Japan's excess is all zero.
    assert!(series[0]["values"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v.as_f64().unwrap() == 0.0));

    let diffs = body["significantDifferences"].as_array().unwrap();
    assert_eq!(diffs.len(), 21);
    assert_eq!(diffs[0]["largerName"], "Nigeria");
    assert!(body["summary"]["totalDiffPct"].as_f64().unwrap() < 0.0);
}

#[tokio::test]
async fn compare_with_misaligned_bands_is_422() {
    let (status, body) = get(app(), "/api/compare/japan/tiny/2024").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("age groups"));
}

#[tokio::test]
async fn metrics_include_stage() {
    let (status, body) = get(app(), "/api/metrics/japan/2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Japan");
    assert!(body["metrics"]["totalPopulation"].as_u64().unwrap() > 0);
    let stage = body["stage"]["stage"].as_u64().unwrap();
    assert!((1..=5).contains(&stage));
    assert!(body["stage"]["link"]
        .as_str()
        .unwrap()
        .starts_with("/blog/stage-"));
    assert!(body["fertility"].is_null());
}

#[tokio::test]
async fn world_aggregates_countries_with_the_year() {
    let (status, body) = get(app(), "/api/world/2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ageGroups"].as_array().unwrap().len(), 21);

    let (status, _) = get(app(), "/api/world/1900").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Country and state sharing the slug `georgia`, plus Gabon whose ISO2 code
/// is Georgia's postal code.
fn colliding_app() -> Router {
    let country = |code: &str, name: &str, slug: &str| CountryPopulation {
        country_code: code.into(),
        country_name: name.into(),
        slug: slug.into(),
        region: String::new(),
        years: years(&[(2024, 100)]),
    };
    let georgia_state = StatePopulation {
        state_code: "GA".into(),
        state_name: "Georgia".into(),
        slug: "georgia".into(),
        fips: Some("13".into()),
        region: Some("South".into()),
        years: years(&[(2023, 300)]),
    };
    let mut db = PopDb::from_datasets(
        [country("GEO", "Georgia", "georgia"), country("GAB", "Gabon", "gabon")],
        [georgia_state],
    );
    db.countries[1].iso2 = Some("GA".into());
    router(db)
}

#[tokio::test]
async fn state_prefix_reaches_a_state_shadowed_by_a_country() {
    let (status, _) = get(colliding_app(), "/api/pyramid/georgia/2023").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, chart) = get(colliding_app(), "/api/pyramid/state:georgia/2023").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["title"], "Georgia Population Pyramid 2023");

    let (status, body) = get(colliding_app(), "/api/metrics/country:georgia/2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Georgia");
}

#[tokio::test]
async fn two_letter_codes_prefer_states() {
    let (status, _) = get(colliding_app(), "/api/pyramid/GA/2023").await;
    assert_eq!(status, StatusCode::OK);

    let (status, chart) = get(colliding_app(), "/api/pyramid/country:GA/2024").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["title"], "Gabon Population Pyramid 2024");
}

#[tokio::test]
async fn malformed_years_get_json_errors() {
    for uri in [
        "/api/pyramid/japan/abc",
        "/api/metrics/japan/-1",
        "/api/compare/japan/nigeria/20x4",
        "/api/world/70000",
    ] {
        let (status, body) = get(app(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(
            body["error"].as_str().unwrap().starts_with("invalid year"),
            "{uri}: {body}"
        );
    }
}
