//! Shared test fixtures for the housing-trends integration tests.
//!
//! Writes a small sales CSV and tract GeoJSON into a temp directory and
//! loads them through the regular builder, so tests exercise the same
//! DuckDB load path as production.
//!
//! Sample layout:
//!
//! | id | sqft | sale year | built | $/SF | price      | tract | sub-geo       | year-month |
//! |----|------|-----------|-------|------|------------|-------|---------------|------------|
//! | 1  | 900  | 2021      | 1985  | 100  | $90,000    | A     | Cumming       | 2021-01    |
//! | 2  | 1500 | 2021      | 1995  | 200  | $300,000   | A     | Cumming       | 2021-03    |
//! | 3  | 2000 | 2022      | 2005  | 300  | $600,000   | A     | Cumming       | 2022-12    |
//! | 4  | 2500 | 2022      | 2010  | 400  | $1,000,000 | A     | Cumming       | 2022-12    |
//! | 5  | 3000 | 2021      | 2000  | 150  | $450,000   | B     | North Forsyth | 2021-01    |
//! | 6  | 5500 | 2023      | 2018  | 250  | $1,375,000 | B     | North Forsyth | 2023-02    |
//! | 7  | 1000 | 2019      | 1978  | 120  | $120,000   | C     | South Forsyth | 2019-06    |
//! | 8  | 4000 | 2020      | 2015  | 180  | $720,000   | D     | West Forsyth  | 2020-08    |
//!
//! Geometry exists for tracts A, B, C and E; D has sales but no polygon,
//! E has a polygon but no sales. Rows are written out of chronological order.
#![allow(dead_code)]

use housing_trends::HousingDashboard;
use std::fs;
use std::path::{Path, PathBuf};

pub const TRACT_A: &str = "13117130101";
pub const TRACT_B: &str = "13117130102";
pub const TRACT_C: &str = "13117130203";
pub const TRACT_D: &str = "13117130300";
pub const TRACT_E: &str = "13117130400";

pub const SALES_HEADER: &str =
    "Square Ft,year_sale,year_blt,price_sf,Sale Price,GEOID,Sub_geo,unique_ID,year,month,year-month";

/// Sample rows, deliberately not in date order.
pub fn sample_rows() -> Vec<String> {
    vec![
        format!("\"2,000\",2022,2005,300,\"$600,000\",{TRACT_A},Cumming,S3,2022,12,2022-12"),
        format!("\"2,500\",2022,2010,400,\"$1,000,000\",{TRACT_A},Cumming,S4,2022,12,2022-12"),
        format!("900,2021,1985,100,\"$90,000\",{TRACT_A},Cumming,S1,2021,1,2021-01"),
        format!("\"3,000\",2021,2000,150,\"$450,000\",{TRACT_B},North Forsyth,S5,2021,1,2021-01"),
        format!("\"1,500\",2021,1995,200,\"$300,000\",{TRACT_A},Cumming,S2,2021,3,2021-03"),
        format!("\"5,500\",2023,2018,250,\"$1,375,000\",{TRACT_B},North Forsyth,S6,2023,2,2023-02"),
        format!("\"1,000\",2019,1978,120,\"$120,000\",{TRACT_C},South Forsyth,S7,2019,6,2019-06"),
        format!("\"4,000\",2020,2015,180,\"$720,000\",{TRACT_D},West Forsyth,S8,2020,8,2020-08"),
    ]
}

fn square(offset: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Polygon",
        "coordinates": [[
            [-84.1 + offset, 34.2],
            [-84.0 + offset, 34.2],
            [-84.0 + offset, 34.3],
            [-84.1 + offset, 34.2]
        ]]
    })
}

pub fn sample_geojson() -> serde_json::Value {
    let features: Vec<serde_json::Value> = [TRACT_A, TRACT_B, TRACT_C, TRACT_E]
        .iter()
        .enumerate()
        .map(|(i, geoid)| {
            serde_json::json!({
                "type": "Feature",
                "properties": {"GEOID": geoid, "NAMELSAD": format!("Census Tract {}", i + 1)},
                "geometry": square(i as f64 * 0.1)
            })
        })
        .collect();
    serde_json::json!({"type": "FeatureCollection", "features": features})
}

/// Write a sales CSV with the given data rows under `dir`.
pub fn write_sales_csv(dir: &Path, header: &str, rows: &[String]) -> PathBuf {
    let path = dir.join("sales.csv");
    let mut contents = String::from(header);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(&path, contents).unwrap();
    path
}

pub fn write_geojson(dir: &Path, data: &serde_json::Value) -> PathBuf {
    let path = dir.join("tracts.geojson");
    fs::write(&path, serde_json::to_string(data).unwrap()).unwrap();
    path
}

/// Write the sample files and return `(TempDir, sales_path, geometry_path)`.
pub fn write_sample_files() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let sales = write_sales_csv(tmp.path(), SALES_HEADER, &sample_rows());
    let geo = write_geojson(tmp.path(), &sample_geojson());
    (tmp, sales, geo)
}

/// Build a dashboard over the sample files.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_sample_dashboard() -> (HousingDashboard, tempfile::TempDir) {
    let (tmp, sales, geo) = write_sample_files();
    let dashboard = HousingDashboard::builder()
        .sales_source(sales.to_str().unwrap())
        .geometry_source(geo.to_str().unwrap())
        .cache_dir(tmp.path().join("cache"))
        .offline(true)
        .build()
        .unwrap();
    (dashboard, tmp)
}
