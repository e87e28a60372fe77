//! SaleQuery and raw SQL access against the registered `sales` view.

mod common;

use common::{TRACT_A, TRACT_D};
use housing_trends::pipeline::YearRange;
use housing_trends::queries::SaleQuery;
use housing_trends::{Connection, HousingError, SubGeography};

// ---------------------------------------------------------------------------
// SaleQuery
// ---------------------------------------------------------------------------

#[test]
fn available_years_are_distinct_and_sorted() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let years = dashboard.sales().available_years().unwrap();
    assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023]);
}

#[test]
fn count_by_sub_geography_orders_by_label() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let counts = dashboard.sales().count_by_sub_geography().unwrap();
    assert_eq!(
        counts,
        vec![
            ("Cumming".to_string(), 4),
            ("North Forsyth".to_string(), 2),
            ("South Forsyth".to_string(), 1),
            ("West Forsyth".to_string(), 1),
        ]
    );
}

#[test]
fn count_in_years_over_whole_county() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let count = dashboard
        .sales()
        .count_in_years(&YearRange::new(2021, 2023), None)
        .unwrap();
    assert_eq!(count, 6);
}

#[test]
fn count_in_years_restricted_to_sub_geographies() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let sales = dashboard.sales();

    let cumming = sales
        .count_in_years(&YearRange::new(2021, 2023), Some(&[SubGeography::Cumming][..]))
        .unwrap();
    assert_eq!(cumming, 4);

    let west = sales
        .count_in_years(&YearRange::single(2020), Some(&[SubGeography::WestForsyth][..]))
        .unwrap();
    assert_eq!(west, 1);

    let none = sales
        .count_in_years(&YearRange::new(2019, 2023), Some(&[][..]))
        .unwrap();
    assert_eq!(none, 0);
}

#[test]
fn sale_price_bounds_parse_currency() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let bounds = dashboard.sales().sale_price_bounds().unwrap();
    assert_eq!(bounds, Some((90_000.0, 1_375_000.0)));
}

#[test]
fn tract_ids_include_tracts_without_geometry() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let ids = dashboard.sales().tract_ids().unwrap();
    assert_eq!(ids.len(), 4);
    assert_eq!(ids[0], TRACT_A);
    assert!(ids.iter().any(|id| id == TRACT_D));
}

#[test]
fn sale_query_requires_registered_view() {
    let conn = Connection::new().unwrap();
    let err = SaleQuery::new(&conn).available_years().unwrap_err();
    assert!(matches!(err, HousingError::NotFound(_)));
}

// ---------------------------------------------------------------------------
// Raw SQL
// ---------------------------------------------------------------------------

#[test]
fn raw_sql_sees_every_row() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let rows = dashboard
        .sql("SELECT COUNT(*) AS cnt FROM sales", &[])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["cnt"].as_i64(), Some(8));
}

#[test]
fn raw_sql_columns_are_varchar() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let rows = dashboard
        .sql(
            "SELECT \"Sale Price\" AS price FROM sales WHERE unique_ID = ?",
            &["S4".to_string()],
        )
        .unwrap();
    assert_eq!(rows[0]["price"], "$1,000,000");
}

#[test]
fn connection_lists_sales_columns() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let columns = dashboard.connection().columns("sales").unwrap();
    assert_eq!(columns.len(), 11);
    assert_eq!(columns[0], "Square Ft");
    assert_eq!(columns[10], "year-month");
}

#[test]
fn execute_scalar_returns_none_for_empty_result() {
    let (dashboard, _tmp) = common::setup_sample_dashboard();
    let result = dashboard
        .connection()
        .execute_scalar(
            "SELECT unique_ID FROM sales WHERE unique_ID = ?",
            &["missing".to_string()],
        )
        .unwrap();
    assert!(result.is_none());
}
