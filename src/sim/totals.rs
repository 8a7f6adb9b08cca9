//! City-wide aggregation of per-building estimates.

use super::types::BuildingEstimate;

/// Running sums over a set of building estimates.
///
/// Sums are taken over the already-rounded per-building figures so that the
/// reported totals match what a client would get by adding up the rows.
#[derive(Debug, Clone, Default)]
pub struct Totals {
    pub energy: f64,
    pub water: f64,
    pub materials: f64,
    pub stress_sum: f64,
    pub count: usize,
}

impl Totals {
    pub fn from_estimates(estimates: &[BuildingEstimate]) -> Self {
        estimates.iter().fold(Self::default(), |mut acc, e| {
            acc.energy += e.energy_demand;
            acc.water += e.water_demand;
            acc.materials += e.material_flow;
            acc.stress_sum += e.stress_level;
            acc.count += 1;
            acc
        })
    }

    /// Mean stress score; NaN when no estimates were added.
    pub fn mean_stress(&self) -> f64 {
        self.stress_sum / self.count as f64
    }
}
