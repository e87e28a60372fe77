//! Map presentation settings and the assembled dashboard output.
//!
//! Rendering belongs to whatever map and chart libraries consume these
//! values; this module only describes what to draw.

use serde::{Deserialize, Serialize};

use crate::models::{JoinedTractView, KpiLabels, Kpis, MonthlyTrendPoint};

// ---------------------------------------------------------------------------
// MapView / BaseMap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapView {
    #[default]
    #[serde(rename = "2D")]
    TwoD,
    #[serde(rename = "3D")]
    ThreeD,
}

/// Camera placement for the map component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub height: u32,
}

impl MapView {
    pub fn initial_view_state(self) -> ViewState {
        match self {
            MapView::TwoD => ViewState {
                latitude: 34.206_355_602_125_46,
                longitude: -84.096_400_535_013_01,
                zoom: 8.8,
                min_zoom: 8.0,
                max_zoom: 15.0,
                pitch: 0.0,
                bearing: 0.0,
                height: 500,
            },
            MapView::ThreeD => ViewState {
                latitude: 34.307_054_643_497_315,
                longitude: -84.105_359_195_313_71,
                zoom: 9.2,
                min_zoom: 8.0,
                max_zoom: 15.0,
                pitch: 45.0,
                bearing: 0.0,
                height: 565,
            },
        }
    }

    /// Whether polygons are extruded by [`JoinedTractView::elevation`].
    pub fn extruded(self) -> bool {
        matches!(self, MapView::ThreeD)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BaseMap {
    #[default]
    Streets,
    Satellite,
    Gray,
}

impl BaseMap {
    /// Tile style identifier understood by the map provider.
    pub fn style_id(self) -> &'static str {
        match self {
            BaseMap::Streets => "road",
            BaseMap::Satellite => "satellite",
            BaseMap::Gray => "light",
        }
    }
}

/// Map controls that don't affect the data pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MapOptions {
    pub view: MapView,
    pub base_map: BaseMap,
}

/// Resolved map settings for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub view: MapView,
    pub view_state: ViewState,
    pub extruded: bool,
    pub style_id: String,
}

impl From<MapOptions> for MapSettings {
    fn from(options: MapOptions) -> Self {
        Self {
            view: options.view,
            view_state: options.view.initial_view_state(),
            extruded: options.view.extruded(),
            style_id: options.base_map.style_id().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardView — Everything one interaction produces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// e.g. `2021 - 2023` or `2022 only`
    pub title: String,
    pub tracts: Vec<JoinedTractView>,
    pub trend: Vec<MonthlyTrendPoint>,
    pub kpis: Kpis,
    pub kpi_labels: KpiLabels,
    pub map: MapSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_map_style_ids() {
        assert_eq!(BaseMap::Streets.style_id(), "road");
        assert_eq!(BaseMap::Satellite.style_id(), "satellite");
        assert_eq!(BaseMap::Gray.style_id(), "light");
    }

    #[test]
    fn three_d_is_pitched_and_extruded() {
        let settings = MapSettings::from(MapOptions {
            view: MapView::ThreeD,
            base_map: BaseMap::Gray,
        });
        assert!(settings.extruded);
        assert_eq!(settings.view_state.pitch, 45.0);
        assert_eq!(settings.style_id, "light");
    }

    #[test]
    fn map_view_serializes_as_label() {
        assert_eq!(serde_json::to_string(&MapView::TwoD).unwrap(), "\"2D\"");
    }
}
