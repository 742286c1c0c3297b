//! GeoJSON decoding into [`Feature`]s

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use geo_types::Coord;
use geojson::{FeatureCollection, GeoJson, Geometry, Value};

use crate::domain::{Feature, Ring};

/// Read and decode the features of a GeoJSON file
pub fn load_features(path: &Path) -> Result<Vec<Feature>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    parse_features(&text).with_context(|| format!("Invalid GeoJSON in {}", path.display()))
}

/// Decode GeoJSON text. A bare Feature or Geometry counts as a
/// one-feature collection. An empty collection is an error.
pub fn parse_features(text: &str) -> Result<Vec<Feature>> {
    let geojson: GeoJson = text.parse().context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(f) => FeatureCollection {
            bbox: None,
            features: vec![f],
            foreign_members: None,
        },
        GeoJson::Geometry(g) => FeatureCollection {
            bbox: None,
            features: vec![geojson::Feature {
                geometry: Some(g),
                ..Default::default()
            }],
            foreign_members: None,
        },
    };

    if collection.features.is_empty() {
        bail!("No feature found");
    }

    collection
        .features
        .iter()
        .enumerate()
        .map(|(index, feature)| {
            convert_feature(feature).with_context(|| format!("Failed to decode feature #{}", index))
        })
        .collect()
}

fn convert_feature(feature: &geojson::Feature) -> Result<Feature> {
    let name = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")).or_else(|| p.get("ADMIN")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let geometry = feature.geometry.as_ref().context("Feature has no geometry")?;
    let mut rings = Vec::new();
    collect_rings(geometry, &mut rings)?;
    Ok(Feature::new(name, rings))
}

fn collect_rings(geometry: &Geometry, rings: &mut Vec<Ring>) -> Result<()> {
    match &geometry.value {
        Value::Point(position) => rings.push(vec![coord(position)?]),
        Value::MultiPoint(positions) => {
            for position in positions {
                rings.push(vec![coord(position)?]);
            }
        }
        Value::LineString(line) => rings.push(ring(line)?),
        Value::MultiLineString(lines) | Value::Polygon(lines) => {
            for line in lines {
                rings.push(ring(line)?);
            }
        }
        Value::MultiPolygon(polygons) => {
            for line in polygons.iter().flatten() {
                rings.push(ring(line)?);
            }
        }
        Value::GeometryCollection(geometries) => {
            for member in geometries {
                collect_rings(member, rings)?;
            }
        }
    }
    Ok(())
}

fn ring(positions: &[Vec<f64>]) -> Result<Ring> {
    positions.iter().map(|p| coord(p)).collect()
}

fn coord(position: &[f64]) -> Result<Coord<f64>> {
    match position {
        [x, y, ..] => Ok(Coord { x: *x, y: *y }),
        _ => bail!("Position {:?} has fewer than two coordinates", position),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Squareland" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
                        [[2, 2], [4, 2], [4, 4], [2, 2]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Twin Isles" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[20, 0], [21, 0], [21, 1], [20, 0]]],
                        [[[30, 0], [31, 0], [31, 1], [30, 0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Point", "coordinates": [5, 5, 100] },
                        { "type": "LineString", "coordinates": [[0, 0], [1, 1]] }
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let features = parse_features(COLLECTION).unwrap();
        assert_eq!(features.len(), 3);

        assert_eq!(features[0].name.as_deref(), Some("Squareland"));
        assert_eq!(features[0].ring_count(), 2);
        let outer: Vec<&[Coord<f64>]> = features[0].rings().collect();
        assert_eq!(outer[0].len(), 5);
        assert_eq!(outer[0][1], Coord { x: 10.0, y: 0.0 });

        assert_eq!(features[1].name.as_deref(), Some("Twin Isles"));
        assert_eq!(features[1].ring_count(), 2);

        assert_eq!(features[2].name, None);
        let rings: Vec<&[Coord<f64>]> = features[2].rings().collect();
        assert_eq!(rings.len(), 2);
        assert_eq!(rings[0], &[Coord { x: 5.0, y: 5.0 }][..]);
    }

    #[test]
    fn test_bare_geometry_is_one_feature() {
        let features =
            parse_features(r#"{"type": "LineString", "coordinates": [[0, 0], [1, 1]]}"#).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].ring_count(), 1);
    }

    #[test]
    fn test_empty_collection_is_an_error() {
        let err = parse_features(r#"{"type": "FeatureCollection", "features": []}"#).unwrap_err();
        assert!(err.to_string().contains("No feature found"));
    }

    #[test]
    fn test_feature_without_geometry_is_an_error() {
        let text = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": null}
        ]}"#;
        let err = parse_features(text).unwrap_err();
        assert!(format!("{:#}", err).contains("feature #0"));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(parse_features("{ not json").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_features(&dir.path().join("missing.geojson")).is_err());
    }
}
