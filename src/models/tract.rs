use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Rgb — Choropleth fill color
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// GeoTract — Census tract polygon keyed by GEOID
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoTract {
    pub geoid: String,
    /// GeoJSON geometry object (`Polygon` / `MultiPolygon`).
    pub geometry: serde_json::Value,
    /// Remaining feature properties, passed through untouched.
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

// ---------------------------------------------------------------------------
// AggregatedTractStat — Per-tract medians over the filtered sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedTractStat {
    pub geoid: String,
    pub median_price_per_sqft: f64,
    pub median_sale_price: f64,
    pub median_year_built: f64,
    pub sale_count: u64,
}

// ---------------------------------------------------------------------------
// JoinedTractView — Tract stats merged with geometry, ready for mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedTractView {
    pub geoid: String,
    pub geometry: serde_json::Value,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub median_price_per_sqft: f64,
    pub median_sale_price: f64,
    pub median_year_built: f64,
    pub sale_count: u64,
    /// e.g. `$187.25`
    pub price_label: String,
    /// e.g. `1,204`
    pub count_label: String,
    pub color_bin: usize,
    pub color: Rgb,
    /// Extrusion height used by the 3D view.
    pub elevation: f64,
}
