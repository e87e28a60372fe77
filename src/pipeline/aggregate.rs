//! Group-by aggregation of filtered sales: per tract, per month, and KPIs.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{AggregatedTractStat, Kpis, MonthlyTrendPoint, SaleRecord};

/// Interpolated median: the mean of the two middle values for even counts.
///
/// Sorts `values` in place. Returns `None` for an empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Most frequent value; ties go to the smallest.
pub fn mode<T: Ord + Copy>(values: impl IntoIterator<Item = T>) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    // BTreeMap iterates ascending, and max_by_key keeps the last maximum,
    // so walk it in reverse to let the smallest value win ties.
    counts
        .into_iter()
        .rev()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| value)
}

fn median_of(records: &[&SaleRecord], field: impl Fn(&SaleRecord) -> f64) -> Option<f64> {
    let mut values: Vec<f64> = records.iter().map(|&r| field(r)).collect();
    median(&mut values)
}

fn unique_sales(records: &[&SaleRecord]) -> u64 {
    records
        .iter()
        .map(|r| r.sale_id.as_str())
        .collect::<HashSet<_>>()
        .len() as u64
}

fn group_by<'a, I, K, F>(records: I, key: F) -> HashMap<K, Vec<&'a SaleRecord>>
where
    I: IntoIterator<Item = &'a SaleRecord>,
    K: std::hash::Hash + Eq,
    F: Fn(&'a SaleRecord) -> K,
{
    let mut groups: HashMap<K, Vec<&'a SaleRecord>> = HashMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(record);
    }
    groups
}

/// Per-tract medians and sale counts.
///
/// Only tracts with at least one record appear.
pub fn aggregate_by_tract<'a, I>(records: I) -> HashMap<String, AggregatedTractStat>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    group_by(records, |r| r.geoid.as_str())
        .into_iter()
        .filter_map(|(geoid, group)| {
            Some((
                geoid.to_string(),
                AggregatedTractStat {
                    geoid: geoid.to_string(),
                    median_price_per_sqft: median_of(&group, |r| r.price_per_sqft)?,
                    median_sale_price: median_of(&group, |r| r.sale_price)?,
                    median_year_built: median_of(&group, |r| f64::from(r.year_built))?,
                    sale_count: unique_sales(&group),
                },
            ))
        })
        .collect()
}

/// Countywide median price/SF per year-month, ordered by (year, month).
pub fn aggregate_by_month<'a, I>(records: I) -> Vec<MonthlyTrendPoint>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut points: Vec<MonthlyTrendPoint> = group_by(records, |r| r.year_month.as_str())
        .into_iter()
        .filter_map(|(key, group)| {
            Some(MonthlyTrendPoint {
                year_month: key.to_string(),
                median_price_per_sqft: median_of(&group, |r| r.price_per_sqft)?,
                sale_count: unique_sales(&group),
                year: mode(group.iter().map(|r| r.year))?,
                month: mode(group.iter().map(|r| r.month))?,
            })
        })
        .collect();

    points.sort_by(|a, b| {
        (a.year, a.month)
            .cmp(&(b.year, b.month))
            .then_with(|| a.year_month.cmp(&b.year_month))
    });
    points
}

/// Summary scalars over the year-filtered sales.
///
/// `total_sales` counts distinct sale ids within each tract, summed over
/// tracts, which is the total of the per-tract counts shown on the map.
pub fn kpis<'a, I>(records: I) -> Kpis
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let records: Vec<&SaleRecord> = records.into_iter().collect();

    let total_sales = records
        .iter()
        .map(|r| (r.geoid.as_str(), r.sale_id.as_str()))
        .collect::<HashSet<_>>()
        .len() as u64;

    Kpis {
        total_sales,
        median_price_per_sqft: median_of(&records, |r| r.price_per_sqft),
        median_sale_price: median_of(&records, |r| r.sale_price),
        median_year_built: median_of(&records, |r| f64::from(r.year_built)),
        median_square_feet: median_of(&records, |r| r.square_feet),
    }
}
