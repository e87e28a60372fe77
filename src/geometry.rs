//! Census tract geometry loaded from a GeoJSON `FeatureCollection`.

use serde_json::{Map, Value};
use tracing::info;

use crate::cache::CacheManager;
use crate::config::GEOID_PROPERTY;
use crate::error::{HousingError, Result};
use crate::models::GeoTract;

/// Load every tract from a GeoJSON source (local path or URL, optionally `.gz`).
pub fn load_tracts(cache: &mut CacheManager, source: &str) -> Result<Vec<GeoTract>> {
    let data = cache.load_json(source)?;
    let tracts = tracts_from_geojson(&data)?;
    info!(tracts = tracts.len(), source, "loaded tract geometry");
    Ok(tracts)
}

/// Convert a parsed `FeatureCollection` into tracts, preserving feature order.
///
/// Each feature must carry a `GEOID` property (string or integer) and a
/// geometry object. GEOIDs are normalized to their string form so they
/// match the sales table regardless of how the geometry file typed them.
pub fn tracts_from_geojson(data: &Value) -> Result<Vec<GeoTract>> {
    let features = match data.get("features") {
        Some(Value::Array(arr)) => arr,
        _ => {
            return Err(HousingError::InvalidArgument(
                "Geometry source is not a GeoJSON FeatureCollection".to_string(),
            ))
        }
    };

    let mut tracts = Vec::with_capacity(features.len());
    for (i, feature) in features.iter().enumerate() {
        let mut properties: Map<String, Value> = feature
            .get("properties")
            .and_then(|p| p.as_object())
            .cloned()
            .unwrap_or_default();

        let raw_geoid = properties.remove(GEOID_PROPERTY);
        let geoid = match &raw_geoid {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => integral_geoid(n),
            _ => None,
        };
        let geoid = match geoid {
            Some(geoid) => geoid,
            None => {
                return Err(HousingError::Load {
                    row: i + 1,
                    column: GEOID_PROPERTY.to_string(),
                    value: raw_geoid.map(|v| v.to_string()).unwrap_or_default(),
                    reason: "feature has no usable GEOID".to_string(),
                })
            }
        };

        let geometry = match feature.get("geometry") {
            Some(g @ Value::Object(_)) => g.clone(),
            _ => {
                return Err(HousingError::Load {
                    row: i + 1,
                    column: "geometry".to_string(),
                    value: geoid,
                    reason: "feature has no geometry".to_string(),
                })
            }
        };

        tracts.push(GeoTract {
            geoid,
            geometry,
            properties,
        });
    }

    Ok(tracts)
}

/// Whole-number GEOIDs in string form; `13117130101.0` becomes `13117130101`.
fn integral_geoid(n: &serde_json::Number) -> Option<String> {
    if n.is_i64() || n.is_u64() {
        return Some(n.to_string());
    }
    n.as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| format!("{:.0}", f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square() -> Value {
        json!({"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]})
    }

    #[test]
    fn numeric_geoid_becomes_string() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"GEOID": 13117130101u64, "NAME": "1301.01"}, "geometry": square()}
            ]
        });
        let tracts = tracts_from_geojson(&data).unwrap();
        assert_eq!(tracts[0].geoid, "13117130101");
        assert_eq!(tracts[0].properties["NAME"], "1301.01");
        assert!(!tracts[0].properties.contains_key("GEOID"));
    }

    #[test]
    fn integral_float_geoid_drops_fraction() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"GEOID": 13117130101.0}, "geometry": square()}
            ]
        });
        let tracts = tracts_from_geojson(&data).unwrap();
        assert_eq!(tracts[0].geoid, "13117130101");
    }

    #[test]
    fn fractional_geoid_is_load_error() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"GEOID": 1311.5}, "geometry": square()}
            ]
        });
        let err = tracts_from_geojson(&data).unwrap_err();
        assert!(matches!(err, HousingError::Load { row: 1, .. }));
    }

    #[test]
    fn missing_geoid_is_load_error() {
        let data = json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "properties": {}, "geometry": square()}]
        });
        let err = tracts_from_geojson(&data).unwrap_err();
        assert!(matches!(err, HousingError::Load { row: 1, .. }));
    }

    #[test]
    fn non_collection_is_rejected() {
        let err = tracts_from_geojson(&json!({"type": "Feature"})).unwrap_err();
        assert!(matches!(err, HousingError::InvalidArgument(_)));
    }
}
