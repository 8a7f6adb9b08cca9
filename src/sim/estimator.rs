//! Closed-form resource-demand estimator.

use chrono::{DateTime, Utc};

use crate::model::{Building, City};

use super::round_to;
use super::totals::Totals;
use super::types::{BuildingEstimate, SimulationResult};

/// Energy demand per m² at full usage, before climate scaling.
const ENERGY_PER_M2: f64 = 0.15;
/// Water demand per m² at full usage, before climate scaling.
const WATER_PER_M2: f64 = 0.08;
/// Material flow per m² per floor.
const MATERIAL_PER_M2_FLOOR: f64 = 0.02;

/// Energy intensity (per m²) at which energy stress saturates.
const ENERGY_STRESS_CAP: f64 = 0.2;
/// Water intensity (per m²) at which water stress saturates.
const WATER_STRESS_CAP: f64 = 0.1;

const ENERGY_STRESS_WEIGHT: f64 = 0.4;
const WATER_STRESS_WEIGHT: f64 = 0.3;
const INTENSITY_STRESS_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EstimateError {
    /// The city has no buildings, so there is no mean stress to report.
    #[error("city `{0}` has no buildings to simulate")]
    NoBuildings(String),
}

/// Runs the estimator for a city, stamped with the current time.
///
/// # Errors
///
/// Returns [`EstimateError::NoBuildings`] when `buildings` is empty.
pub fn estimate(city: &City, buildings: &[Building]) -> Result<SimulationResult, EstimateError> {
    estimate_at(city, buildings, Utc::now())
}

/// Runs the estimator for a city with an explicit timestamp.
///
/// Per-building figures are rounded to 2 decimals; totals are sums of the
/// rounded figures and the average stress is the mean of the rounded
/// scores, each rounded again.
///
/// # Errors
///
/// Returns [`EstimateError::NoBuildings`] when `buildings` is empty.
pub fn estimate_at(
    city: &City,
    buildings: &[Building],
    timestamp: DateTime<Utc>,
) -> Result<SimulationResult, EstimateError> {
    if buildings.is_empty() {
        return Err(EstimateError::NoBuildings(city.id.clone()));
    }

    let building_results: Vec<BuildingEstimate> = buildings
        .iter()
        .map(|b| estimate_building(city.climate_factor, b))
        .collect();
    let totals = Totals::from_estimates(&building_results);

    Ok(SimulationResult {
        city_id: city.id.clone(),
        timestamp,
        building_results,
        total_energy: round_to(totals.energy, 2),
        total_water: round_to(totals.water, 2),
        total_materials: round_to(totals.materials, 2),
        average_stress: round_to(totals.mean_stress(), 2),
    })
}

/// Estimates one building's demand under the given climate factor.
pub fn estimate_building(climate_factor: f64, building: &Building) -> BuildingEstimate {
    let area = building.area;
    let usage = building.properties.usage_intensity;

    let energy_demand = area * usage * ENERGY_PER_M2 * climate_factor;
    let water_demand = area * usage * WATER_PER_M2 * climate_factor;
    let material_flow = area * f64::from(building.floors) * MATERIAL_PER_M2_FLOOR;

    let adjusted_energy = energy_demand * building.properties.rating().energy_multiplier();
    let stress = stress_score(adjusted_energy, water_demand, area, usage);

    BuildingEstimate {
        building_id: building.id.clone(),
        energy_demand: round_to(adjusted_energy, 2),
        water_demand: round_to(water_demand, 2),
        material_flow: round_to(material_flow, 2),
        stress_level: round_to(stress, 2),
    }
}

/// Weighted blend of energy intensity, water intensity and usage.
///
/// Energy and water terms saturate at 1, so the score stays in `[0, 1]`
/// for usage in `[0, 1]` and non-negative demand.
pub fn stress_score(energy: f64, water: f64, area: f64, usage_intensity: f64) -> f64 {
    let energy_stress = (energy / area / ENERGY_STRESS_CAP).min(1.0);
    let water_stress = (water / area / WATER_STRESS_CAP).min(1.0);

    ENERGY_STRESS_WEIGHT * energy_stress
        + WATER_STRESS_WEIGHT * water_stress
        + INTENSITY_STRESS_WEIGHT * usage_intensity
}
