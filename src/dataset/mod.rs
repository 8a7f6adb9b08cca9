//! Seed data for the record store: built-in presets and TOML dataset files.

pub mod bengaluru;

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;
use crate::model::layer::{buildings_feature_collection, sensors_feature_collection};
use crate::model::{Building, City, Layer, LayerKind, Sensor};

/// A complete set of records used to seed a store.
///
/// In TOML form every section is an array of tables using the same
/// camelCase field names as the HTTP API. Reading timestamps must be quoted
/// RFC 3339 strings. When a file declares no layers, a buildings layer and a
/// sensors layer are derived for every city.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dataset {
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub buildings: Vec<Building>,
    #[serde(default)]
    pub sensors: Vec<Sensor>,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("cannot read dataset \"{path}\": {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid dataset TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown dataset preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
}

impl Dataset {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["bengaluru", "empty"];

    /// Loads a built-in dataset by name.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::UnknownPreset`] for an unknown name.
    pub fn from_preset(name: &str) -> Result<Self, DatasetError> {
        match name {
            "bengaluru" => Ok(bengaluru::dataset()),
            "empty" => Ok(Self::default()),
            _ => Err(DatasetError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// # Errors
    ///
    /// Returns a [`DatasetError`] if the file cannot be read or parsed.
    pub fn from_toml_file(path: &Path) -> Result<Self, DatasetError> {
        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// # Errors
    ///
    /// Returns [`DatasetError::Parse`] for invalid TOML or unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, DatasetError> {
        let mut dataset: Self = toml::from_str(s)?;
        if dataset.layers.is_empty() {
            dataset.derive_layers();
        }
        Ok(dataset)
    }

    /// Adds a buildings layer and a sensors layer for every city.
    fn derive_layers(&mut self) {
        for city in &self.cities {
            let buildings: Vec<Building> = self
                .buildings
                .iter()
                .filter(|b| b.city_id == city.id)
                .cloned()
                .collect();
            let sensors: Vec<Sensor> = self
                .sensors
                .iter()
                .filter(|s| s.city_id == city.id)
                .cloned()
                .collect();
            self.layers.push(buildings_layer(
                &format!("layer-buildings-{}", city.id),
                &city.id,
                &buildings,
            ));
            self.layers.push(sensors_layer(
                &format!("layer-sensors-{}", city.id),
                &city.id,
                &sensors,
            ));
        }
    }

    /// Validates all records and returns a list of errors.
    ///
    /// Returns an empty vector if the dataset is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        for (i, city) in self.cities.iter().enumerate() {
            if !(0.0..=2.0).contains(&city.climate_factor) {
                errors.push(ConfigError::new(
                    format!("cities[{i}].climateFactor"),
                    "must be in [0, 2]",
                ));
            }
        }

        for (i, b) in self.buildings.iter().enumerate() {
            if !(b.area.is_finite() && b.area > 0.0) {
                errors.push(ConfigError::new(format!("buildings[{i}].area"), "must be > 0"));
            }
            if b.floors == 0 {
                errors.push(ConfigError::new(format!("buildings[{i}].floors"), "must be >= 1"));
            }
            if !(0.0..=1.0).contains(&b.properties.usage_intensity) {
                errors.push(ConfigError::new(
                    format!("buildings[{i}].properties.usageIntensity"),
                    "must be in [0.0, 1.0]",
                ));
            }
            if !self.has_city(&b.city_id) {
                errors.push(ConfigError::new(
                    format!("buildings[{i}].cityId"),
                    format!("unknown city \"{}\"", b.city_id),
                ));
            }
        }

        for (i, s) in self.sensors.iter().enumerate() {
            if !self.has_city(&s.city_id) {
                errors.push(ConfigError::new(
                    format!("sensors[{i}].cityId"),
                    format!("unknown city \"{}\"", s.city_id),
                ));
            }
            if let Some(bid) = &s.building_id {
                if !self.buildings.iter().any(|b| &b.id == bid) {
                    errors.push(ConfigError::new(
                        format!("sensors[{i}].buildingId"),
                        format!("unknown building \"{bid}\""),
                    ));
                }
            }
        }

        errors
    }

    fn has_city(&self, id: &str) -> bool {
        self.cities.iter().any(|c| c.id == id)
    }
}

pub(crate) fn buildings_layer(id: &str, city_id: &str, buildings: &[Building]) -> Layer {
    Layer {
        id: id.to_string(),
        city_id: city_id.to_string(),
        name: "Buildings".to_string(),
        kind: LayerKind::Buildings,
        geo_json: buildings_feature_collection(buildings),
    }
}

pub(crate) fn sensors_layer(id: &str, city_id: &str, sensors: &[Sensor]) -> Layer {
    Layer {
        id: id.to_string(),
        city_id: city_id.to_string(),
        name: "Sensors".to_string(),
        kind: LayerKind::Sensors,
        geo_json: sensors_feature_collection(sensors),
    }
}
