use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::dataset::Dataset;
use crate::model::{Building, City, Layer, NewCity, NewLayer, Reading, Sensor};
use crate::proposal::Proposal;
use crate::sim::SimulationResult;

use super::{Repository, StoreError, Stored, new_id};

#[derive(Debug, Default)]
struct Tables {
    cities: Vec<City>,
    layers: Vec<Layer>,
    buildings: Vec<Building>,
    sensors: Vec<Sensor>,
    simulations: Vec<Stored<SimulationResult>>,
    proposals: Vec<Stored<Proposal>>,
}

impl Tables {
    fn seeded(dataset: &Dataset) -> Self {
        Self {
            cities: dataset.cities.clone(),
            layers: dataset.layers.clone(),
            buildings: dataset.buildings.clone(),
            sensors: dataset.sensors.clone(),
            simulations: Vec::new(),
            proposals: Vec::new(),
        }
    }
}

/// In-process [`Repository`] backed by vectors in insertion order.
///
/// The seed dataset is kept so the store can be restored with
/// [`MemoryStore::reset`].
#[derive(Debug)]
pub struct MemoryStore {
    seed: Dataset,
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates a store holding a copy of `seed`.
    pub fn new(seed: Dataset) -> Self {
        let tables = RwLock::new(Tables::seeded(&seed));
        Self { seed, tables }
    }

    /// Store with no records and an empty seed.
    pub fn empty() -> Self {
        Self::new(Dataset::default())
    }

    /// Removes every record, including saved simulations and proposals.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn clear(&self) -> Result<(), StoreError> {
        *self.write()? = Tables::default();
        Ok(())
    }

    /// Restores the seed records and drops all saved results.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the lock is poisoned.
    pub fn reset(&self) -> Result<(), StoreError> {
        *self.write()? = Tables::seeded(&self.seed);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl Repository for MemoryStore {
    fn cities(&self) -> Result<Vec<City>, StoreError> {
        Ok(self.read()?.cities.clone())
    }

    fn city(&self, id: &str) -> Result<Option<City>, StoreError> {
        Ok(self.read()?.cities.iter().find(|c| c.id == id).cloned())
    }

    fn create_city(&self, city: NewCity) -> Result<City, StoreError> {
        let city = city.into_city(new_id());
        self.write()?.cities.push(city.clone());
        Ok(city)
    }

    fn layers(&self, city_id: &str) -> Result<Vec<Layer>, StoreError> {
        Ok(self
            .read()?
            .layers
            .iter()
            .filter(|l| l.city_id == city_id)
            .cloned()
            .collect())
    }

    fn create_layer(&self, layer: NewLayer) -> Result<Layer, StoreError> {
        let layer = layer.into_layer(new_id());
        self.write()?.layers.push(layer.clone());
        Ok(layer)
    }

    fn buildings(&self, city_id: &str) -> Result<Vec<Building>, StoreError> {
        Ok(self
            .read()?
            .buildings
            .iter()
            .filter(|b| b.city_id == city_id)
            .cloned()
            .collect())
    }

    fn building(&self, id: &str) -> Result<Option<Building>, StoreError> {
        Ok(self.read()?.buildings.iter().find(|b| b.id == id).cloned())
    }

    fn sensors(&self, city_id: &str) -> Result<Vec<Sensor>, StoreError> {
        Ok(self
            .read()?
            .sensors
            .iter()
            .filter(|s| s.city_id == city_id)
            .cloned()
            .collect())
    }

    fn sensor(&self, id: &str) -> Result<Option<Sensor>, StoreError> {
        Ok(self.read()?.sensors.iter().find(|s| s.id == id).cloned())
    }

    fn add_sensor_reading(&self, sensor_id: &str, reading: Reading) -> Result<Sensor, StoreError> {
        let mut tables = self.write()?;
        let sensor = tables
            .sensors
            .iter_mut()
            .find(|s| s.id == sensor_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "sensor",
                id: sensor_id.to_string(),
            })?;
        sensor.readings.push(reading);
        Ok(sensor.clone())
    }

    fn save_simulation(
        &self,
        simulation: SimulationResult,
    ) -> Result<Stored<SimulationResult>, StoreError> {
        let stored = Stored {
            id: new_id(),
            record: simulation,
        };
        self.write()?.simulations.push(stored.clone());
        tracing::debug!(id = %stored.id, city = %stored.record.city_id, "simulation saved");
        Ok(stored)
    }

    fn simulations(&self, city_id: &str) -> Result<Vec<Stored<SimulationResult>>, StoreError> {
        Ok(self
            .read()?
            .simulations
            .iter()
            .filter(|s| s.record.city_id == city_id)
            .cloned()
            .collect())
    }

    fn latest_simulation(
        &self,
        city_id: &str,
    ) -> Result<Option<Stored<SimulationResult>>, StoreError> {
        Ok(self
            .read()?
            .simulations
            .iter()
            .rev()
            .find(|s| s.record.city_id == city_id)
            .cloned())
    }

    fn save_proposal(&self, proposal: Proposal) -> Result<Stored<Proposal>, StoreError> {
        let stored = Stored {
            id: new_id(),
            record: proposal,
        };
        self.write()?.proposals.push(stored.clone());
        tracing::debug!(id = %stored.id, building = %stored.record.building_id, "proposal saved");
        Ok(stored)
    }

    fn proposals(&self, city_id: &str) -> Result<Vec<Stored<Proposal>>, StoreError> {
        Ok(self
            .read()?
            .proposals
            .iter()
            .filter(|p| p.record.city_id == city_id)
            .cloned()
            .collect())
    }

    fn proposals_for_building(
        &self,
        building_id: &str,
    ) -> Result<Vec<Stored<Proposal>>, StoreError> {
        Ok(self
            .read()?
            .proposals
            .iter()
            .filter(|p| p.record.building_id == building_id)
            .cloned()
            .collect())
    }
}
