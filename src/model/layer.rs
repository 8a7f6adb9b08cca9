use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ValidationError;
use super::building::Building;
use super::sensor::Sensor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Buildings,
    Sensors,
    Energy,
    Water,
}

/// A named GeoJSON overlay for a city map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    pub city_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(rename = "geoJSON")]
    pub geo_json: Value,
}

/// Request body for creating a layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLayer {
    pub city_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(rename = "geoJSON", default)]
    pub geo_json: Value,
}

impl NewLayer {
    /// # Errors
    ///
    /// Rejects an empty city id or name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.city_id.trim().is_empty() {
            return Err(ValidationError::new("cityId", "must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "must not be empty"));
        }
        Ok(())
    }

    pub fn into_layer(self, id: String) -> Layer {
        Layer {
            id,
            city_id: self.city_id,
            name: self.name,
            kind: self.kind,
            geo_json: self.geo_json,
        }
    }
}

/// FeatureCollection with one feature per building, properties flattened.
pub fn buildings_feature_collection(buildings: &[Building]) -> Value {
    let features: Vec<Value> = buildings
        .iter()
        .map(|b| {
            let mut properties = json!({
                "id": b.id,
                "name": b.name,
                "type": b.category.as_str(),
                "area": b.area,
                "floors": b.floors,
            });
            if let (Some(dst), Ok(Value::Object(src))) =
                (properties.as_object_mut(), serde_json::to_value(&b.properties))
            {
                dst.extend(src);
            }
            json!({
                "type": "Feature",
                "geometry": b.geometry.clone().unwrap_or(Value::Null),
                "properties": properties,
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// FeatureCollection of sensor points carrying their latest reading.
pub fn sensors_feature_collection(sensors: &[Sensor]) -> Value {
    let features: Vec<Value> = sensors
        .iter()
        .map(|s| {
            json!({
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [s.lon, s.lat] },
                "properties": {
                    "id": s.id,
                    "type": s.kind,
                    "buildingId": s.building_id,
                    "latestReading": s.latest_reading(),
                },
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::building::{BuildingCategory, BuildingProperties};

    #[test]
    fn building_features_flatten_properties() {
        let mut props = BuildingProperties::with_usage(0.4);
        props.has_solar_panels = true;
        let building = Building {
            id: "b1".to_string(),
            city_id: "c1".to_string(),
            name: "Hall".to_string(),
            category: BuildingCategory::Mixed,
            area: 1200.0,
            floors: 3,
            geometry: None,
            properties: props,
        };
        let fc = buildings_feature_collection(&[building]);
        assert_eq!(fc["type"], "FeatureCollection");
        let feature = &fc["features"][0];
        assert_eq!(feature["properties"]["type"], "mixed");
        assert_eq!(feature["properties"]["usageIntensity"], 0.4);
        assert_eq!(feature["properties"]["hasSolarPanels"], true);
    }

    #[test]
    fn new_layer_rejects_blank_name() {
        let layer: NewLayer = serde_json::from_value(json!({
            "cityId": "c1",
            "name": "",
            "type": "water",
        }))
        .expect("layer should parse");
        assert_eq!(layer.validate().unwrap_err().field, "name");
    }
}
