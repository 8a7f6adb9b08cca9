//! Dashboard application state.

use crate::dataset::Dataset;
use crate::forecast::{DEFAULT_ALPHA, ExponentialSmoothing};
use crate::model::{Building, City, Sensor};
use crate::proposal::{Proposal, generate_proposal};
use crate::sim::{BuildingEstimate, SimulationResult, estimate};

/// Number of periods projected on the sensor chart.
pub const FORECAST_PERIODS: usize = 6;

/// Smoothing factor adjustment per key press.
const ALPHA_STEP: f64 = 0.1;
const MIN_ALPHA: f64 = 0.1;

/// TUI application state for one city.
pub struct App {
    pub city: City,
    pub buildings: Vec<Building>,
    pub sensors: Vec<Sensor>,
    /// Latest estimator run; `None` when the city has no buildings.
    pub simulation: Option<SimulationResult>,
    /// Proposal for the selected building.
    pub proposal: Option<Proposal>,
    /// Index into `buildings`.
    pub selected: usize,
    /// Index into `sensors`.
    pub sensor_idx: usize,
    /// Smoothing factor for the sensor forecast.
    pub alpha: f64,
    /// Whether the user has requested quit.
    pub quit: bool,
}

impl App {
    /// Creates the app for `city_id`, or the dataset's first city.
    ///
    /// Returns `None` when the dataset has no matching city.
    pub fn new(dataset: &Dataset, city_id: Option<&str>) -> Option<Self> {
        let city = match city_id {
            Some(id) => dataset.cities.iter().find(|c| c.id == id),
            None => dataset.cities.first(),
        }?
        .clone();
        let buildings: Vec<Building> = dataset
            .buildings
            .iter()
            .filter(|b| b.city_id == city.id)
            .cloned()
            .collect();
        let sensors: Vec<Sensor> = dataset
            .sensors
            .iter()
            .filter(|s| s.city_id == city.id)
            .cloned()
            .collect();

        let mut app = Self {
            city,
            buildings,
            sensors,
            simulation: None,
            proposal: None,
            selected: 0,
            sensor_idx: 0,
            alpha: DEFAULT_ALPHA,
            quit: false,
        };
        app.resimulate();
        Some(app)
    }

    /// Re-runs the estimator and the proposal for the selected building.
    pub fn resimulate(&mut self) {
        self.simulation = estimate(&self.city, &self.buildings).ok();
        self.refresh_proposal();
    }

    fn refresh_proposal(&mut self) {
        self.proposal = self
            .selected_building()
            .map(|b| generate_proposal(b, &self.city.id));
    }

    pub fn select_next(&mut self) {
        if !self.buildings.is_empty() {
            self.selected = (self.selected + 1) % self.buildings.len();
            self.refresh_proposal();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.buildings.is_empty() {
            self.selected = (self.selected + self.buildings.len() - 1) % self.buildings.len();
            self.refresh_proposal();
        }
    }

    pub fn next_sensor(&mut self) {
        if !self.sensors.is_empty() {
            self.sensor_idx = (self.sensor_idx + 1) % self.sensors.len();
        }
    }

    pub fn alpha_up(&mut self) {
        self.alpha = ((self.alpha + ALPHA_STEP) * 10.0).round() / 10.0;
        self.alpha = self.alpha.min(1.0);
    }

    pub fn alpha_down(&mut self) {
        self.alpha = ((self.alpha - ALPHA_STEP) * 10.0).round() / 10.0;
        self.alpha = self.alpha.max(MIN_ALPHA);
    }

    pub fn selected_building(&self) -> Option<&Building> {
        self.buildings.get(self.selected)
    }

    /// Estimate for the building at `idx`.
    pub fn estimate_for(&self, idx: usize) -> Option<&BuildingEstimate> {
        let id = &self.buildings.get(idx)?.id;
        self.simulation
            .as_ref()?
            .building_results
            .iter()
            .find(|e| &e.building_id == id)
    }

    pub fn current_sensor(&self) -> Option<&Sensor> {
        self.sensors.get(self.sensor_idx)
    }

    /// Flat forecast for the current sensor at the current smoothing factor.
    pub fn sensor_forecast(&self) -> Vec<f64> {
        let Some(sensor) = self.current_sensor() else {
            return Vec::new();
        };
        ExponentialSmoothing::new(self.alpha)
            .map(|m| m.forecast(&sensor.values(), FORECAST_PERIODS))
            .unwrap_or_default()
    }
}
