//! Async wrapper around [`HousingDashboard`] for use in async runtimes (Tokio, etc.).
//!
//! Loading and recomputation run on Tokio's blocking pool via
//! [`tokio::task::spawn_blocking`], one at a time behind a mutex, so an
//! async web front end can call into the pipeline without stalling its
//! event loop.
//!
//! # Example
//!
//! ```no_run
//! use housing_trends::pipeline::FilterCriteria;
//! use housing_trends::view::MapOptions;
//! use housing_trends::AsyncHousingDashboard;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let dashboard = AsyncHousingDashboard::builder()
//!         .sales_source("sales.csv")
//!         .geometry_source("tracts.geojson")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let view = dashboard
//!         .render(FilterCriteria::default(), MapOptions::default())
//!         .await
//!         .unwrap();
//!     println!("{}", view.title);
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{HousingError, Result};
use crate::pipeline::FilterCriteria;
use crate::view::{DashboardView, MapOptions};
use crate::HousingDashboard;

// ---------------------------------------------------------------------------
// AsyncHousingDashboardBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncHousingDashboard`].
#[derive(Default)]
pub struct AsyncHousingDashboardBuilder {
    sales_source: Option<String>,
    geometry_source: Option<String>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
}

impl AsyncHousingDashboardBuilder {
    /// Sales CSV location: a file path or an `http(s)` URL.
    pub fn sales_source(mut self, source: impl Into<String>) -> Self {
        self.sales_source = Some(source.into());
        self
    }

    /// Tract GeoJSON location: a file path or an `http(s)` URL.
    pub fn geometry_source(mut self, source: impl Into<String>) -> Self {
        self.geometry_source = Some(source.into());
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for remote sources.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load the dashboard on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncHousingDashboard> {
        tokio::task::spawn_blocking(move || {
            let mut builder = HousingDashboard::builder().offline(self.offline);
            if let Some(source) = self.sales_source {
                builder = builder.sales_source(source);
            }
            if let Some(source) = self.geometry_source {
                builder = builder.geometry_source(source);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            let dashboard = builder.build()?;
            Ok(AsyncHousingDashboard {
                inner: Arc::new(Mutex::new(dashboard)),
            })
        })
        .await
        .map_err(|e| HousingError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncHousingDashboard
// ---------------------------------------------------------------------------

/// Async wrapper around [`HousingDashboard`].
///
/// The dashboard sits behind a [`Mutex`] because its DuckDB connection
/// tracks views in a `RefCell`; recomputations are therefore serialized.
#[derive(Clone)]
pub struct AsyncHousingDashboard {
    inner: Arc<Mutex<HousingDashboard>>,
}

impl AsyncHousingDashboard {
    /// Create a new builder for configuring the async dashboard.
    pub fn builder() -> AsyncHousingDashboardBuilder {
        AsyncHousingDashboardBuilder::default()
    }

    /// Run a sync dashboard operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&HousingDashboard) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let dashboard = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = dashboard
                .lock()
                .map_err(|_| HousingError::InvalidArgument("Dashboard lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| HousingError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// Recompute the full dashboard for one interaction.
    pub async fn render(&self, criteria: FilterCriteria, options: MapOptions) -> Result<DashboardView> {
        self.run(move |d| d.render(&criteria, options)).await
    }

    /// Return the list of registered DuckDB view names.
    pub async fn views(&self) -> Result<Vec<String>> {
        self.run(|d| Ok(d.views())).await
    }
}
