//! Simulation output records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived demand figures for one building, rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingEstimate {
    pub building_id: String,
    /// Rating-adjusted energy demand (kWh-equivalent).
    pub energy_demand: f64,
    /// Water demand (L-equivalent).
    pub water_demand: f64,
    /// Material flow (kg-equivalent).
    pub material_flow: f64,
    /// Composite stress score in `[0, 1]`.
    pub stress_level: f64,
}

/// One city-wide simulation run at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub city_id: String,
    pub timestamp: DateTime<Utc>,
    pub building_results: Vec<BuildingEstimate>,
    pub total_energy: f64,
    pub total_water: f64,
    pub total_materials: f64,
    pub average_stress: f64,
}

impl SimulationResult {
    /// Aggregate fields only, as handed to the assistant.
    pub fn metrics(&self) -> CityMetrics {
        CityMetrics {
            total_energy: self.total_energy,
            total_water: self.total_water,
            total_materials: self.total_materials,
            average_stress: self.average_stress,
        }
    }

    /// The building under the most strain, if any.
    pub fn most_stressed(&self) -> Option<&BuildingEstimate> {
        self.building_results
            .iter()
            .max_by(|a, b| a.stress_level.total_cmp(&b.stress_level))
    }
}

/// Aggregate snapshot of a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityMetrics {
    pub total_energy: f64,
    pub total_water: f64,
    pub total_materials: f64,
    pub average_stress: f64,
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation {} @ {} ---", self.city_id, self.timestamp.to_rfc3339())?;
        for b in &self.building_results {
            writeln!(
                f,
                "{:<14} energy={:>10.2}  water={:>10.2}  materials={:>9.2}  stress={:.2}",
                b.building_id, b.energy_demand, b.water_demand, b.material_flow, b.stress_level
            )?;
        }
        writeln!(f, "Total energy:     {:.2}", self.total_energy)?;
        writeln!(f, "Total water:      {:.2}", self.total_water)?;
        writeln!(f, "Total materials:  {:.2}", self.total_materials)?;
        if let Some(b) = self.most_stressed() {
            writeln!(f, "Most stressed:    {} ({:.2})", b.building_id, b.stress_level)?;
        }
        write!(f, "Average stress:   {:.2}", self.average_stress)
    }
}
