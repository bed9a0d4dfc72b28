#![allow(dead_code)]

use pyramid_core::model::{AgeGroup, YearData, STANDARD_AGE_RANGES};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// 21 standard bands with a declining, slightly female-heavy shape.
pub fn standard_groups(scale: u64) -> Vec<AgeGroup> {
    STANDARD_AGE_RANGES
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let base = (21 - i as u64) * scale;
            AgeGroup::new(*r, base, base + scale / 10)
        })
        .collect()
}

pub fn year_json(year: u16, scale: u64, median_age: f64) -> Value {
    let groups = standard_groups(scale);
    let data = YearData::from_groups(year, groups);
    json!({
        "year": year,
        "totalPopulation": data.total_population,
        "malePopulation": data.males(),
        "femalePopulation": data.females(),
        "medianAge": median_age,
        "ageGroups": data.age_groups.iter().map(|ag| json!({
            "ageRange": ag.age_range,
            "male": ag.male,
            "female": ag.female,
            "total": ag.total(),
        })).collect::<Vec<_>>(),
    })
}

fn write(path: &Path, value: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// A small data directory: Japan and Nigeria with population files, a
/// listed country without one, two states, and one fertility file.
pub fn write_fixture_dir(dir: &Path) {
    write(
        &dir.join("countries.json"),
        &json!([
            {"code": "JPN", "name": "Japan", "slug": "japan", "region": "Asia",
             "iso2": "JP", "iso3": "JPN", "population2024": 123_000_000u64},
            {"code": "NGA", "name": "Nigeria", "slug": "nigeria", "region": "Africa",
             "iso2": "NG", "iso3": "NGA"},
            {"code": "CIV", "name": "Côte d'Ivoire", "slug": "cote-divoire", "region": "Africa"}
        ]),
    );
    write(
        &dir.join("states.json"),
        &json!([
            {"stateCode": "CA", "stateName": "California", "slug": "california",
             "fips": "06", "region": "West"},
            {"stateCode": "TX", "stateName": "Texas", "slug": "texas", "fips": "48"}
        ]),
    );

    write(
        &dir.join("population/japan.json"),
        &json!({
            "countryCode": "JPN", "countryName": "Japan", "slug": "japan", "region": "Asia",
            "years": {
                "2000": year_json(2000, 1_000, 41.4),
                "2024": year_json(2024, 900, 49.4)
            }
        }),
    );
    write(
        &dir.join("population/nigeria.json"),
        &json!({
            "countryCode": "NGA", "countryName": "Nigeria", "slug": "nigeria", "region": "Africa",
            "years": {
                "2000": year_json(2000, 500, 17.5),
                "2024": year_json(2024, 1_100, 18.1)
            }
        }),
    );

    write(
        &dir.join("states/california.json"),
        &json!({
            "stateCode": "CA", "stateName": "California", "slug": "california",
            "years": { "2024": year_json(2024, 300, 38.0) }
        }),
    );
    // Broken on purpose: missing required fields.
    write(&dir.join("states/texas.json"), &json!({"stateName": "Texas"}));

    write(
        &dir.join("fertility/japan.json"),
        &json!({
            "countryCode": "JPN", "countryName": "Japan", "slug": "japan",
            "fertilityData": {
                "current": {"year": 2024, "totalFertilityRate": 1.2, "crudeBirthRate": 6.3},
                "historical": [
                    {"year": 1970, "totalFertilityRate": 2.13, "crudebirthRate": 18.8},
                    {"year": 2024, "totalFertilityRate": 1.2, "crudeBirthRate": 6.3}
                ]
            }
        }),
    );
}
