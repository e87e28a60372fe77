//! Geo join of tract statistics onto tract polygons, plus choropleth binning.

use std::collections::HashMap;

use crate::config::{ELEVATION_PER_SALE, PALETTE};
use crate::models::{AggregatedTractStat, GeoTract, JoinedTractView};
use crate::pipeline::format;

/// Equal-width edges across `[min, max]`, with duplicate edges removed.
///
/// A constant range is first widened by 0.1% of its value on each side
/// (0.001 absolute at zero), so the value sits on the middle edge instead
/// of collapsing every bin.
pub fn bin_edges(min: f64, max: f64, n: usize) -> Vec<f64> {
    if min == max {
        let adj = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
        // Offsets are symmetric around the value so the middle edge is exact.
        return (0..=n)
            .map(|i| min + adj * (2.0 * i as f64 - n as f64) / n as f64)
            .collect();
    }
    let mut edges: Vec<f64> = (0..=n)
        .map(|i| {
            if i == n {
                max
            } else {
                min + (max - min) * i as f64 / n as f64
            }
        })
        .collect();
    edges.dedup();
    edges
}

/// Assign each value a bin index using right-closed intervals with the
/// lowest edge included.
///
/// Degenerate bins are dropped, so indices never exceed the number of
/// distinct bins minus one. If every value is equal they all land in bin 1
/// (for 4 bins), just below the value's own edge.
pub fn assign_bins(values: &[f64], n: usize) -> Vec<usize> {
    let (min, max) = match min_max(values) {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };
    let edges = bin_edges(min, max, n.max(1));
    let last_bin = edges.len().saturating_sub(2);

    values
        .iter()
        .map(|&v| {
            edges
                .windows(2)
                .position(|w| v <= w[1])
                .unwrap_or(last_bin)
        })
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Inner join of per-tract stats onto geometry by GEOID.
///
/// Output follows geometry order. Tracts without stats and stats without
/// geometry are both left out.
pub fn join(
    stats: &HashMap<String, AggregatedTractStat>,
    tracts: &[GeoTract],
) -> Vec<JoinedTractView> {
    let matched: Vec<(&GeoTract, &AggregatedTractStat)> = tracts
        .iter()
        .filter_map(|t| stats.get(&t.geoid).map(|s| (t, s)))
        .collect();

    let prices: Vec<f64> = matched.iter().map(|(_, s)| s.median_price_per_sqft).collect();
    let bins = assign_bins(&prices, PALETTE.len());

    matched
        .into_iter()
        .zip(bins)
        .map(|((tract, stat), bin)| JoinedTractView {
            geoid: tract.geoid.clone(),
            geometry: tract.geometry.clone(),
            properties: tract.properties.clone(),
            median_price_per_sqft: stat.median_price_per_sqft,
            median_sale_price: stat.median_sale_price,
            median_year_built: stat.median_year_built,
            sale_count: stat.sale_count,
            price_label: format::price_label(stat.median_price_per_sqft),
            count_label: format::thousands(stat.sale_count),
            color_bin: bin,
            color: PALETTE[bin.min(PALETTE.len() - 1)],
            elevation: stat.sale_count as f64 * ELEVATION_PER_SALE,
        })
        .collect()
}
