//! Property tests for the pure pipeline stages.

use housing_trends::config::PALETTE;
use housing_trends::pipeline::{
    aggregate_by_month, apply, join::assign_bins, FilterCriteria, GeographyScope, SizeBound,
    SizeRange, YearRange,
};
use housing_trends::{SaleRecord, SubGeography};
use proptest::prelude::*;

const SUBS: [SubGeography; 4] = [
    SubGeography::Cumming,
    SubGeography::NorthForsyth,
    SubGeography::WestForsyth,
    SubGeography::SouthForsyth,
];

fn arb_record() -> impl Strategy<Value = SaleRecord> {
    (
        500u32..8000,
        2015i32..2025,
        1u32..=12,
        50u32..600,
        0usize..4,
        0u32..20,
    )
        .prop_map(|(sqft, year, month, psf, sub, tract)| SaleRecord {
            square_feet: f64::from(sqft),
            sale_year: year,
            year_built: 1990,
            price_per_sqft: f64::from(psf),
            sale_price: f64::from(psf) * f64::from(sqft),
            geoid: format!("13117{:06}", tract),
            sub_geography: SUBS[sub],
            sale_id: format!("{year}-{month}-{sqft}-{psf}"),
            year,
            month,
            year_month: format!("{year}-{month:02}"),
        })
}

fn unbounded_all_years() -> FilterCriteria {
    FilterCriteria::new(
        SizeRange::unbounded(),
        YearRange::new(2000, 2100),
        GeographyScope::EntireRegion,
    )
}

proptest! {
    #[test]
    fn upper_bound_holds_for_every_survivor(
        records in prop::collection::vec(arb_record(), 0..60),
        upper in 500u32..8000,
    ) {
        let criteria = FilterCriteria::new(
            SizeRange::new(SizeBound::NoLowerBound, SizeBound::Finite(f64::from(upper))),
            YearRange::new(2000, 2100),
            GeographyScope::EntireRegion,
        );
        let filtered = apply(&records, &criteria).unwrap();
        prop_assert!(filtered.all_years.iter().all(|r| r.square_feet <= f64::from(upper)));
        let expected = records.iter().filter(|r| r.square_feet <= f64::from(upper)).count();
        prop_assert_eq!(filtered.all_years.len(), expected);
    }

    #[test]
    fn both_sentinels_keep_every_record(records in prop::collection::vec(arb_record(), 0..60)) {
        let filtered = apply(&records, &unbounded_all_years()).unwrap();
        prop_assert_eq!(filtered.all_years.len(), records.len());
        prop_assert_eq!(filtered.in_period.len(), records.len());
    }

    #[test]
    fn equal_finite_bounds_always_fail(size in 0u32..10_000) {
        let criteria = FilterCriteria::new(
            SizeRange::new(SizeBound::Finite(f64::from(size)), SizeBound::Finite(f64::from(size))),
            YearRange::default(),
            GeographyScope::EntireRegion,
        );
        let err = apply(&[], &criteria).unwrap_err();
        prop_assert!(err.is_validation());
    }

    #[test]
    fn in_period_is_subset_of_all_years(
        records in prop::collection::vec(arb_record(), 0..60),
        start in 2015i32..2025,
        span in 0i32..5,
    ) {
        let criteria = FilterCriteria::new(
            SizeRange::unbounded(),
            YearRange::new(start, start + span),
            GeographyScope::EntireRegion,
        );
        let filtered = apply(&records, &criteria).unwrap();
        prop_assert!(filtered.in_period.len() <= filtered.all_years.len());
        prop_assert!(filtered
            .in_period
            .iter()
            .all(|r| start <= r.sale_year && r.sale_year <= start + span));
    }

    #[test]
    fn trend_is_sorted_and_keys_are_unique(records in prop::collection::vec(arb_record(), 0..80)) {
        let trend = aggregate_by_month(records.iter());
        for pair in trend.windows(2) {
            prop_assert!((pair[0].year, pair[0].month) < (pair[1].year, pair[1].month));
        }
        let total: u64 = trend.iter().map(|p| p.sale_count).sum();
        prop_assert!(total as usize <= records.len());
    }

    #[test]
    fn bins_are_monotonic_and_within_palette(
        values in prop::collection::vec(1.0f64..1000.0, 1..40),
    ) {
        let bins = assign_bins(&values, PALETTE.len());
        prop_assert_eq!(bins.len(), values.len());
        prop_assert!(bins.iter().all(|&b| b < PALETTE.len()));
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] <= values[j] {
                    prop_assert!(bins[i] <= bins[j]);
                }
            }
        }
    }
}
