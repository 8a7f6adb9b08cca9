//! City resource-demand simulation, retrofit proposals and forecasting.

#[cfg(feature = "api")]
pub mod api;
pub mod assistant;
pub mod config;
pub mod dataset;
pub mod forecast;
pub mod io;
/// City, building, sensor and layer records.
pub mod model;
pub mod proposal;
/// Demand estimator and simulation result types.
pub mod sim;
pub mod store;
#[cfg(feature = "tui")]
pub mod tui;
