use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// MonthlyTrendPoint — One year-month bucket of the countywide trend line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    pub year_month: String,
    pub median_price_per_sqft: f64,
    pub sale_count: u64,
    pub year: i32,
    pub month: u32,
}

// ---------------------------------------------------------------------------
// Kpis — Scalar summaries over the year-filtered sales
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_sales: u64,
    pub median_price_per_sqft: Option<f64>,
    pub median_sale_price: Option<f64>,
    pub median_year_built: Option<f64>,
    pub median_square_feet: Option<f64>,
}

// ---------------------------------------------------------------------------
// KpiLabels — Display strings for the KPI tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiLabels {
    pub total_sales: String,
    pub median_price_per_sqft: String,
    pub median_sale_price: String,
    pub median_year_built: String,
    pub median_square_feet: String,
}
