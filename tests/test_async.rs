//! AsyncHousingDashboard tests. Run with `--features async`.
#![cfg(feature = "async")]

mod common;

use housing_trends::pipeline::{FilterCriteria, SizeBound, SizeRange};
use housing_trends::view::MapOptions;
use housing_trends::AsyncHousingDashboard;

async fn build_sample() -> (AsyncHousingDashboard, tempfile::TempDir) {
    let (tmp, sales, geo) = common::write_sample_files();
    let dashboard = AsyncHousingDashboard::builder()
        .sales_source(sales.to_str().unwrap())
        .geometry_source(geo.to_str().unwrap())
        .cache_dir(tmp.path().join("cache"))
        .offline(true)
        .build()
        .await
        .unwrap();
    (dashboard, tmp)
}

#[tokio::test(flavor = "current_thread")]
async fn async_render_matches_sync_pipeline() {
    let (dashboard, _tmp) = build_sample().await;
    let view = dashboard
        .render(FilterCriteria::default(), MapOptions::default())
        .await
        .unwrap();
    assert_eq!(view.kpis.total_sales, 6);
    assert_eq!(view.tracts.len(), 2);
    assert_eq!(view.trend.len(), 6);
}

#[tokio::test(flavor = "current_thread")]
async fn async_render_surfaces_validation_error() {
    let (dashboard, _tmp) = build_sample().await;
    let mut criteria = FilterCriteria::default();
    criteria.size = SizeRange::new(SizeBound::Finite(1000.0), SizeBound::Finite(1000.0));
    let err = dashboard
        .render(criteria, MapOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test(flavor = "current_thread")]
async fn async_run_exposes_sync_queries() {
    let (dashboard, _tmp) = build_sample().await;
    let years = dashboard
        .run(|d| d.sales().available_years())
        .await
        .unwrap();
    assert_eq!(years, vec![2019, 2020, 2021, 2022, 2023]);
    assert_eq!(dashboard.views().await.unwrap(), vec!["sales"]);
}
