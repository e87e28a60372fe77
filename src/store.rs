//! Read-only record store for the flat sales table.
//!
//! Loaded once at startup through DuckDB and never mutated afterwards;
//! every request filters borrowed views of [`RecordStore::records`].

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::config::{self, SALES_VIEW};
use crate::connection::Connection;
use crate::error::{HousingError, Result};
use crate::models::{SaleRecord, SubGeography};
use crate::sql_builder::{ident, SqlBuilder};

/// Parse a currency-formatted number such as `"$1,234"` or `"1,234.50"`.
///
/// Strips surrounding whitespace, one leading `$` and every `,`. Returns
/// `None` when what remains is not a finite number.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let unsigned = trimmed.strip_prefix('$').unwrap_or(trimmed);
    let cleaned = unsigned.replace(',', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Immutable table of sales, in file order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<SaleRecord>,
}

impl RecordStore {
    /// Register `csv_path` as the `sales` view and parse every row.
    ///
    /// Any malformed value aborts the whole load with a
    /// [`HousingError::Load`] naming the first offending row (1-based,
    /// header excluded) and column. A missing column is reported as row 0.
    pub fn load(conn: &Connection, csv_path: &Path) -> Result<Self> {
        conn.register_csv_view(SALES_VIEW, csv_path)?;

        let present = conn.columns(SALES_VIEW)?;
        for col in config::sales_columns() {
            if !present.iter().any(|c| c == col) {
                return Err(HousingError::Load {
                    row: 0,
                    column: col.to_string(),
                    value: String::new(),
                    reason: "required column is missing".to_string(),
                });
            }
        }

        let quoted: Vec<String> = config::sales_columns().iter().map(|c| ident(c)).collect();
        let quoted_refs: Vec<&str> = quoted.iter().map(String::as_str).collect();
        let (sql, params) = SqlBuilder::new(&ident(SALES_VIEW))
            .select(&quoted_refs)
            .build();

        let rows = conn.execute(&sql, &params)?;
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            records.push(parse_row(i + 1, row)?);
        }

        info!(records = records.len(), path = %csv_path.display(), "loaded sales table");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[SaleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Row parsing
// ---------------------------------------------------------------------------

struct RowReader<'r> {
    row_number: usize,
    row: &'r HashMap<String, Value>,
}

impl<'r> RowReader<'r> {
    fn raw(&self, column: &str) -> &'r str {
        self.row
            .get(column)
            .and_then(|v| v.as_str())
            .unwrap_or("")
    }

    fn fail(&self, column: &str, reason: &str) -> HousingError {
        HousingError::Load {
            row: self.row_number,
            column: column.to_string(),
            value: self.raw(column).to_string(),
            reason: reason.to_string(),
        }
    }

    fn number(&self, column: &str) -> Result<f64> {
        parse_currency(self.raw(column)).ok_or_else(|| self.fail(column, "not a number"))
    }

    fn integer(&self, column: &str) -> Result<i64> {
        let value = self.number(column)?;
        if value.fract() != 0.0 {
            return Err(self.fail(column, "not a whole number"));
        }
        Ok(value as i64)
    }

    fn year(&self, column: &str) -> Result<i32> {
        let value = self.integer(column)?;
        i32::try_from(value).map_err(|_| self.fail(column, "year out of range"))
    }

    fn text(&self, column: &str) -> Result<String> {
        let value = self.raw(column).trim();
        if value.is_empty() {
            return Err(self.fail(column, "empty value"));
        }
        Ok(value.to_string())
    }
}

fn parse_row(row_number: usize, row: &HashMap<String, Value>) -> Result<SaleRecord> {
    let r = RowReader { row_number, row };

    let month = r.integer(config::COL_MONTH)?;
    if !(1..=12).contains(&month) {
        return Err(r.fail(config::COL_MONTH, "month must be between 1 and 12"));
    }

    let sub_geography: SubGeography = r
        .raw(config::COL_SUB_GEO)
        .parse()
        .map_err(|_| r.fail(config::COL_SUB_GEO, "unknown sub-geography"))?;

    Ok(SaleRecord {
        square_feet: r.number(config::COL_SQUARE_FEET)?,
        sale_year: r.year(config::COL_SALE_YEAR)?,
        year_built: r.year(config::COL_YEAR_BUILT)?,
        price_per_sqft: r.number(config::COL_PRICE_PER_SQFT)?,
        sale_price: r.number(config::COL_SALE_PRICE)?,
        geoid: r.text(config::COL_GEOID)?,
        sub_geography,
        sale_id: r.text(config::COL_SALE_ID)?,
        year: r.year(config::COL_YEAR)?,
        month: month as u32,
        year_month: r.text(config::COL_YEAR_MONTH)?,
    })
}
