//! Typed city, building, sensor and layer records.

pub mod building;
pub mod city;
pub mod layer;
pub mod sensor;

pub use building::{Building, BuildingCategory, BuildingProperties, EnergyRating};
pub use city::{City, NewCity};
pub use layer::{Layer, LayerKind, NewLayer};
pub use sensor::{NewReading, Reading, Sensor, SensorKind};

/// A request field that failed boundary validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid `{field}`: {message}")]
pub struct ValidationError {
    /// JSON field name as sent by the client.
    pub field: &'static str,
    pub message: &'static str,
}

impl ValidationError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}
