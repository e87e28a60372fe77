//! Housing trends engine for Rust.
//!
//! Loads a county residential sales table and census tract geometry once,
//! then answers every dashboard interaction by filtering the sales,
//! aggregating them per tract and per month, and joining the tract
//! statistics onto polygons with a choropleth color per tract.
//!
//! The sales CSV is read through an in-memory DuckDB view; tract geometry
//! comes from a GeoJSON `FeatureCollection`. Either source may be a local
//! path or an `http(s)` URL, cached locally after the first download.
//!
//! # Quick start
//!
//! ```no_run
//! use housing_trends::pipeline::{FilterCriteria, GeographyScope, SizeBound, SizeRange, YearRange};
//! use housing_trends::view::MapOptions;
//! use housing_trends::{HousingDashboard, SubGeography};
//!
//! let dashboard = HousingDashboard::builder()
//!     .sales_source("Geocoded_Final_Joined4.csv")
//!     .geometry_source("Geography/Forsyth_CTs.geojson")
//!     .build()
//!     .unwrap();
//!
//! let criteria = FilterCriteria::new(
//!     SizeRange::new(SizeBound::Finite(1000.0), SizeBound::NoUpperBound),
//!     YearRange::new(2021, 2023),
//!     GeographyScope::sub_geographies([SubGeography::Cumming]),
//! );
//! let view = dashboard.render(&criteria, MapOptions::default()).unwrap();
//! println!("{} tracts, {} sales", view.tracts.len(), view.kpi_labels.total_sales);
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod error;
pub mod geometry;
pub mod models;
pub mod pipeline;
pub mod queries;
pub mod sql_builder;
pub mod store;
pub mod view;

#[cfg(feature = "async")]
pub use async_client::AsyncHousingDashboard;
pub use cache::CacheManager;
pub use connection::Connection;
pub use error::{HousingError, Result};
pub use models::{
    AggregatedTractStat, GeoTract, JoinedTractView, Kpis, MonthlyTrendPoint, SaleRecord,
    SubGeography,
};
pub use sql_builder::SqlBuilder;
pub use store::RecordStore;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::debug;

use pipeline::{FilterCriteria, FilteredSet};
use view::{DashboardView, MapOptions, MapSettings};

// ---------------------------------------------------------------------------
// HousingDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`HousingDashboard`].
///
/// Use [`HousingDashboard::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](HousingDashboardBuilder::build) to load the data.
pub struct HousingDashboardBuilder {
    sales_source: String,
    geometry_source: String,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
}

impl Default for HousingDashboardBuilder {
    fn default() -> Self {
        Self {
            sales_source: config::DEFAULT_SALES_SOURCE.to_string(),
            geometry_source: config::DEFAULT_GEOMETRY_SOURCE.to_string(),
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(120),
        }
    }
}

impl HousingDashboardBuilder {
    /// Sales CSV location: a file path or an `http(s)` URL.
    pub fn sales_source(mut self, source: impl Into<String>) -> Self {
        self.sales_source = source.into();
        self
    }

    /// Tract GeoJSON location: a file path or an `http(s)` URL.
    ///
    /// The same geometry backs both the 2D and the 3D map.
    pub fn geometry_source(mut self, source: impl Into<String>) -> Self {
        self.geometry_source = source.into();
        self
    }

    /// Set a custom cache directory for downloaded sources.
    ///
    /// If not set, the platform cache directory is used
    /// (e.g. `~/.cache/housing-trends` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Never download; remote sources must already be cached. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP timeout for remote sources. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve both sources and load them.
    ///
    /// Malformed sales rows or geometry features fail here, once, with a
    /// [`HousingError::Load`]; after a successful build the data is never
    /// re-read.
    pub fn build(self) -> Result<HousingDashboard> {
        let mut cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        let sales_path = cache.ensure_local(&self.sales_source)?;
        let conn = Connection::new()?;
        let store = RecordStore::load(&conn, &sales_path)?;
        let tracts = geometry::load_tracts(&mut cache, &self.geometry_source)?;
        Ok(HousingDashboard {
            conn,
            cache,
            store,
            tracts,
        })
    }
}

// ---------------------------------------------------------------------------
// HousingDashboard
// ---------------------------------------------------------------------------

/// Loaded sales and geometry plus the per-interaction pipeline.
///
/// The record store and tracts are read-only after [`build()`](HousingDashboardBuilder::build);
/// every method below takes the filter selection as an argument and
/// allocates its results fresh.
pub struct HousingDashboard {
    conn: Connection,
    cache: CacheManager,
    store: RecordStore,
    tracts: Vec<GeoTract>,
}

impl HousingDashboard {
    /// Create a new builder for configuring the dashboard.
    pub fn builder() -> HousingDashboardBuilder {
        HousingDashboardBuilder::default()
    }

    // -- Loaded data -------------------------------------------------------

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn tracts(&self) -> &[GeoTract] {
        &self.tracts
    }

    // -- Pipeline ----------------------------------------------------------

    /// Run the filter engine over the loaded sales.
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<FilteredSet<'_>> {
        pipeline::apply(self.store.records(), criteria)
    }

    /// Per-tract statistics over the year-filtered sales.
    pub fn tract_stats(&self, criteria: &FilterCriteria) -> Result<HashMap<String, AggregatedTractStat>> {
        let filtered = self.filter(criteria)?;
        Ok(pipeline::aggregate_by_tract(filtered.in_period.iter().copied()))
    }

    /// Choropleth rows: tract statistics joined onto geometry.
    pub fn map_tracts(&self, criteria: &FilterCriteria) -> Result<Vec<JoinedTractView>> {
        let stats = self.tract_stats(criteria)?;
        Ok(pipeline::join(&stats, &self.tracts))
    }

    /// Monthly median price/SF across every year (size and geography
    /// filters still apply).
    pub fn trend(&self, criteria: &FilterCriteria) -> Result<Vec<MonthlyTrendPoint>> {
        let filtered = self.filter(criteria)?;
        Ok(pipeline::aggregate_by_month(filtered.all_years.iter().copied()))
    }

    /// KPI scalars over the year-filtered sales.
    pub fn kpis(&self, criteria: &FilterCriteria) -> Result<Kpis> {
        let filtered = self.filter(criteria)?;
        Ok(pipeline::kpis(filtered.in_period.iter().copied()))
    }

    /// Everything one interaction needs, from a single filter pass.
    ///
    /// An invalid selection returns [`HousingError::Validation`] without
    /// aggregating anything.
    pub fn render(&self, criteria: &FilterCriteria, options: MapOptions) -> Result<DashboardView> {
        let started = Instant::now();
        let filtered = self.filter(criteria)?;

        let stats = pipeline::aggregate_by_tract(filtered.in_period.iter().copied());
        let tracts = pipeline::join(&stats, &self.tracts);
        let trend = pipeline::aggregate_by_month(filtered.all_years.iter().copied());
        let kpis = pipeline::kpis(filtered.in_period.iter().copied());

        debug!(
            all_years = filtered.all_years.len(),
            in_period = filtered.in_period.len(),
            tracts = tracts.len(),
            months = trend.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recomputed dashboard"
        );

        Ok(DashboardView {
            title: criteria.years.title_label(),
            tracts,
            trend,
            kpi_labels: kpis.labels(),
            kpis,
            map: MapSettings::from(options),
        })
    }

    // -- SQL access --------------------------------------------------------

    /// Summary queries over the raw `sales` view.
    pub fn sales(&self) -> queries::SaleQuery<'_> {
        queries::SaleQuery::new(&self.conn)
    }

    /// Execute a raw SQL query against the DuckDB database.
    ///
    /// The sales table is available as the `sales` view, every column
    /// typed VARCHAR.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return the list of registered DuckDB view names.
    pub fn views(&self) -> Vec<String> {
        self.conn.views()
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Remove every downloaded source from the cache directory.
    ///
    /// Already-loaded data is unaffected; the next build downloads again.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }

    /// Consume the dashboard and release the DuckDB connection and HTTP client.
    pub fn close(mut self) {
        self.cache.close();
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for HousingDashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HousingDashboard(records={}, tracts={}, views=[{}], cache_dir={}, offline={})",
            self.store.len(),
            self.tracts.len(),
            self.conn.views().join(", "),
            self.cache.cache_dir.display(),
            self.cache.offline
        )
    }
}
