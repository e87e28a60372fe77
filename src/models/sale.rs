use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config;
use crate::error::{HousingError, Result};

// ---------------------------------------------------------------------------
// SubGeography — Named grouping of census tracts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubGeography {
    #[serde(rename = "Cumming")]
    Cumming,
    #[serde(rename = "North Forsyth")]
    NorthForsyth,
    #[serde(rename = "West Forsyth")]
    WestForsyth,
    #[serde(rename = "South Forsyth")]
    SouthForsyth,
}

impl SubGeography {
    /// Label as it appears in the `Sub_geo` column and the multi-select.
    pub fn label(self) -> &'static str {
        match self {
            SubGeography::Cumming => "Cumming",
            SubGeography::NorthForsyth => "North Forsyth",
            SubGeography::WestForsyth => "West Forsyth",
            SubGeography::SouthForsyth => "South Forsyth",
        }
    }
}

impl fmt::Display for SubGeography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SubGeography {
    type Err = HousingError;

    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim();
        config::SUB_GEOGRAPHIES
            .iter()
            .copied()
            .find(|g| g.label() == label)
            .ok_or_else(|| HousingError::InvalidArgument(format!("Unknown sub-geography: {}", label)))
    }
}

// ---------------------------------------------------------------------------
// SaleRecord — One historical residential transaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub square_feet: f64,
    pub sale_year: i32,
    pub year_built: i32,
    pub price_per_sqft: f64,
    pub sale_price: f64,
    pub geoid: String,
    pub sub_geography: SubGeography,
    pub sale_id: String,
    pub year: i32,
    pub month: u32,
    pub year_month: String,
}
