//! Record storage behind an injectable [`Repository`] trait.

mod memory;

use serde::{Deserialize, Serialize};

use crate::model::{Building, City, Layer, NewCity, NewLayer, Reading, Sensor};
use crate::proposal::Proposal;
use crate::sim::SimulationResult;

pub use memory::MemoryStore;

/// A persisted record: a storage-assigned id plus the record's own fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<T> {
    pub id: String,
    #[serde(flatten)]
    pub record: T,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} `{id}` not found")]
    NotFound { kind: &'static str, id: String },
    /// The backing store cannot serve requests (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage collaborator for cities, buildings, sensors, layers and the
/// simulation / proposal result logs.
///
/// Lookups return `Ok(None)` for unknown ids; listing methods return records
/// in insertion order.
pub trait Repository: Send + Sync {
    fn cities(&self) -> Result<Vec<City>, StoreError>;
    fn city(&self, id: &str) -> Result<Option<City>, StoreError>;
    fn create_city(&self, city: NewCity) -> Result<City, StoreError>;

    fn layers(&self, city_id: &str) -> Result<Vec<Layer>, StoreError>;
    fn create_layer(&self, layer: NewLayer) -> Result<Layer, StoreError>;

    fn buildings(&self, city_id: &str) -> Result<Vec<Building>, StoreError>;
    fn building(&self, id: &str) -> Result<Option<Building>, StoreError>;

    fn sensors(&self, city_id: &str) -> Result<Vec<Sensor>, StoreError>;
    fn sensor(&self, id: &str) -> Result<Option<Sensor>, StoreError>;
    /// Appends a reading and returns the updated sensor.
    ///
    /// Fails with [`StoreError::NotFound`] for an unknown sensor.
    fn add_sensor_reading(&self, sensor_id: &str, reading: Reading) -> Result<Sensor, StoreError>;

    fn save_simulation(
        &self,
        simulation: SimulationResult,
    ) -> Result<Stored<SimulationResult>, StoreError>;
    fn simulations(&self, city_id: &str) -> Result<Vec<Stored<SimulationResult>>, StoreError>;
    /// Most recently saved simulation for a city.
    fn latest_simulation(
        &self,
        city_id: &str,
    ) -> Result<Option<Stored<SimulationResult>>, StoreError> {
        Ok(self.simulations(city_id)?.pop())
    }

    fn save_proposal(&self, proposal: Proposal) -> Result<Stored<Proposal>, StoreError>;
    fn proposals(&self, city_id: &str) -> Result<Vec<Stored<Proposal>>, StoreError>;
    fn proposals_for_building(
        &self,
        building_id: &str,
    ) -> Result<Vec<Stored<Proposal>>, StoreError>;
}

/// Fresh random record id.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
