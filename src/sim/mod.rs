/// Per-building demand estimation and city-wide simulation runs.
pub mod estimator;
/// Aggregation of building estimates into city totals.
pub mod totals;
pub mod types;

pub use estimator::{EstimateError, estimate, estimate_at, estimate_building};
pub use types::{BuildingEstimate, CityMetrics, SimulationResult};

/// Rounds `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}
