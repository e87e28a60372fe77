use std::path::PathBuf;

use crate::models::{Rgb, SubGeography};
use crate::pipeline::SizeBound;

/// Default sales table file name, resolved relative to the working directory.
pub const DEFAULT_SALES_SOURCE: &str = "Geocoded_Final_Joined4.csv";
/// Default tract geometry file name (single canonical source for 2D and 3D).
pub const DEFAULT_GEOMETRY_SOURCE: &str = "Geography/Forsyth_CTs.geojson";

/// Name of the DuckDB view the sales CSV is registered under.
pub const SALES_VIEW: &str = "sales";

/// Feature property holding the tract identifier in the geometry file.
pub const GEOID_PROPERTY: &str = "GEOID";

// -- Sales CSV columns ------------------------------------------------------

pub const COL_SQUARE_FEET: &str = "Square Ft";
pub const COL_SALE_YEAR: &str = "year_sale";
pub const COL_YEAR_BUILT: &str = "year_blt";
pub const COL_PRICE_PER_SQFT: &str = "price_sf";
pub const COL_SALE_PRICE: &str = "Sale Price";
pub const COL_GEOID: &str = "GEOID";
pub const COL_SUB_GEO: &str = "Sub_geo";
pub const COL_SALE_ID: &str = "unique_ID";
pub const COL_YEAR: &str = "year";
pub const COL_MONTH: &str = "month";
pub const COL_YEAR_MONTH: &str = "year-month";

/// Every column the record store reads, in load order.
pub fn sales_columns() -> [&'static str; 11] {
    [
        COL_SQUARE_FEET,
        COL_SALE_YEAR,
        COL_YEAR_BUILT,
        COL_PRICE_PER_SQFT,
        COL_SALE_PRICE,
        COL_GEOID,
        COL_SUB_GEO,
        COL_SALE_ID,
        COL_YEAR,
        COL_MONTH,
        COL_YEAR_MONTH,
    ]
}

// -- Control options --------------------------------------------------------

/// Transaction years offered by the year-range selector.
pub const YEAR_OPTIONS: [i32; 6] = [2018, 2019, 2020, 2021, 2022, 2023];
/// Default year selection.
pub const DEFAULT_YEARS: (i32, i32) = (2021, 2023);

/// Finite stops of the home-size selector; the selector adds
/// `<1000` and `>5000` sentinels on either end.
pub const SIZE_STOPS: [f64; 3] = [1000.0, 2500.0, 5000.0];

/// Sub-geographies offered by the multi-select.
pub const SUB_GEOGRAPHIES: [SubGeography; 4] = [
    SubGeography::Cumming,
    SubGeography::NorthForsyth,
    SubGeography::WestForsyth,
    SubGeography::SouthForsyth,
];

/// Home-size selector entries in display order, sentinels included.
pub fn size_options() -> Vec<SizeBound> {
    std::iter::once(SizeBound::NoLowerBound)
        .chain(SIZE_STOPS.iter().map(|&v| SizeBound::Finite(v)))
        .chain(std::iter::once(SizeBound::NoUpperBound))
        .collect()
}

// -- Map styling ------------------------------------------------------------

/// Choropleth palette, lightest to darkest.
pub const PALETTE: [Rgb; 4] = [
    Rgb(0x97, 0xa3, 0xab),
    Rgb(0x66, 0x78, 0x83),
    Rgb(0x37, 0x50, 0x5d),
    Rgb(0x02, 0x2b, 0x3a),
];

/// Extrusion height per sale in the 3D map.
pub const ELEVATION_PER_SALE: f64 = 50.0;

/// Platform cache directory used for downloaded sources.
pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("housing-trends")
    } else {
        PathBuf::from(".housing-trends-cache")
    }
}
