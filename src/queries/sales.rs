//! Summary queries against the DuckDB `sales` view.
//!
//! These run in SQL against the raw VARCHAR columns and are meant for
//! populating controls and sanity checks, not for the map/trend pipeline.

use serde::Deserialize;

use crate::config::{self, SALES_VIEW};
use crate::connection::Connection;
use crate::error::{HousingError, Result};
use crate::models::SubGeography;
use crate::pipeline::YearRange;
use crate::sql_builder::{ident, SqlBuilder};

#[derive(Debug, Deserialize)]
struct LabelCount {
    label: String,
    sales: i64,
}

// ---------------------------------------------------------------------------
// SaleQuery
// ---------------------------------------------------------------------------

/// Query interface for the registered `sales` view.
pub struct SaleQuery<'a> {
    conn: &'a Connection,
}

impl<'a> SaleQuery<'a> {
    /// Create a new `SaleQuery` bound to the given connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn ensure_view(&self) -> Result<()> {
        if self.conn.has_view(SALES_VIEW) {
            Ok(())
        } else {
            Err(HousingError::NotFound(format!(
                "View '{}' is not registered",
                SALES_VIEW
            )))
        }
    }

    fn sale_year_expr() -> String {
        format!("TRY_CAST({} AS INTEGER)", ident(config::COL_SALE_YEAR))
    }

    /// Distinct sale years present in the table, ascending.
    pub fn available_years(&self) -> Result<Vec<i32>> {
        self.ensure_view()?;

        let year_expr = Self::sale_year_expr();
        let year_col = format!("{} AS sale_year", year_expr);
        let not_null = format!("{} IS NOT NULL", year_expr);
        let (sql, params) = SqlBuilder::new(&ident(SALES_VIEW))
            .select(&[year_col.as_str()])
            .where_clause(&not_null, &[])
            .group_by(&["sale_year"])
            .order_by(&["sale_year ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("sale_year").and_then(|v| v.as_i64()))
            .filter_map(|y| i32::try_from(y).ok())
            .collect())
    }

    /// Number of sales per sub-geography label, ordered by label.
    pub fn count_by_sub_geography(&self) -> Result<Vec<(String, i64)>> {
        self.ensure_view()?;

        let label_col = format!("{} AS label", ident(config::COL_SUB_GEO));
        let (sql, params) = SqlBuilder::new(&ident(SALES_VIEW))
            .select(&[label_col.as_str(), "COUNT(*) AS sales"])
            .group_by(&["label"])
            .order_by(&["label ASC"])
            .build();

        let rows: Vec<LabelCount> = self.conn.execute_into(&sql, &params)?;
        Ok(rows.into_iter().map(|r| (r.label, r.sales)).collect())
    }

    /// Count rows whose sale year falls in `years`, optionally restricted
    /// to a set of sub-geographies (an empty slice matches nothing).
    pub fn count_in_years(
        &self,
        years: &YearRange,
        sub_geographies: Option<&[SubGeography]>,
    ) -> Result<i64> {
        self.ensure_view()?;

        let year_expr = Self::sale_year_expr();
        let start = years.start.to_string();
        let end = years.end.to_string();

        let mut qb = SqlBuilder::new(&ident(SALES_VIEW));
        qb.select(&["COUNT(*) AS cnt"]);
        qb.where_gte(&year_expr, &start);
        qb.where_lte(&year_expr, &end);

        if let Some(subs) = sub_geographies {
            let labels: Vec<&str> = subs.iter().map(|s| s.label()).collect();
            qb.where_in(&ident(config::COL_SUB_GEO), &labels);
        }

        let (sql, params) = qb.build();
        let cnt = self
            .conn
            .execute_scalar(&sql, &params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        Ok(cnt)
    }

    /// Lowest and highest sale price, or `None` for an empty table.
    ///
    /// Prices are cleaned in SQL the same way the record store cleans them;
    /// values that still fail to cast are skipped.
    pub fn sale_price_bounds(&self) -> Result<Option<(f64, f64)>> {
        self.ensure_view()?;

        let price = format!(
            "TRY_CAST(REPLACE(LTRIM(TRIM({}), '$'), ',', '') AS DOUBLE)",
            ident(config::COL_SALE_PRICE)
        );
        let lo = format!("MIN({}) AS lo", price);
        let hi = format!("MAX({}) AS hi", price);
        let (sql, params) = SqlBuilder::new(&ident(SALES_VIEW))
            .select(&[lo.as_str(), hi.as_str()])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows.first().and_then(|r| {
            let lo = r.get("lo").and_then(|v| v.as_f64())?;
            let hi = r.get("hi").and_then(|v| v.as_f64())?;
            Some((lo, hi))
        }))
    }

    /// Distinct tract identifiers, ascending.
    pub fn tract_ids(&self) -> Result<Vec<String>> {
        self.ensure_view()?;

        let geoid = ident(config::COL_GEOID);
        let geoid_col = format!("TRIM({}) AS tract_id", geoid);
        let (sql, params) = SqlBuilder::new(&ident(SALES_VIEW))
            .select(&[geoid_col.as_str()])
            .group_by(&["tract_id"])
            .order_by(&["tract_id ASC"])
            .build();

        let rows = self.conn.execute(&sql, &params)?;
        Ok(rows
            .iter()
            .filter_map(|r| r.get("tract_id").and_then(|v| v.as_str()).map(str::to_string))
            .collect())
    }
}
