//! Retrofit interventions and how each is sized from building geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Building;
use crate::sim::round_to;

/// Value of one kWh of avoided energy use.
pub const ENERGY_PRICE_PER_KWH: f64 = 0.15;
/// Value of one litre of avoided water use.
pub const WATER_PRICE_PER_LITRE: f64 = 0.003;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Buildings taller than this are not offered rooftop solar.
pub const MAX_SOLAR_FLOORS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    GreenRoof,
    RainwaterHarvesting,
    PassiveCooling,
    SolarPanels,
}

impl InterventionKind {
    /// Evaluation order used by the proposal generator.
    pub const ALL: [InterventionKind; 4] = [
        InterventionKind::GreenRoof,
        InterventionKind::RainwaterHarvesting,
        InterventionKind::PassiveCooling,
        InterventionKind::SolarPanels,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::GreenRoof => "Green Roof Installation",
            Self::RainwaterHarvesting => "Rainwater Harvesting System",
            Self::PassiveCooling => "Passive Cooling Facade",
            Self::SolarPanels => "Rooftop Solar Installation",
        }
    }

    pub fn implementation_time(self) -> &'static str {
        match self {
            Self::GreenRoof => "3-4 months",
            Self::RainwaterHarvesting => "2-3 months",
            Self::PassiveCooling => "6-8 months",
            Self::SolarPanels => "2-3 months",
        }
    }

    /// Whether `building` qualifies for this intervention.
    ///
    /// An intervention is never offered when the building already has it.
    pub fn applies_to(self, building: &Building) -> bool {
        let p = &building.properties;
        match self {
            Self::GreenRoof => !p.has_green_roof,
            Self::RainwaterHarvesting => !p.has_rainwater_harvesting,
            Self::PassiveCooling => !p.has_passive_cooling && !building.is_residential(),
            Self::SolarPanels => !p.has_solar_panels && building.floors <= MAX_SOLAR_FLOORS,
        }
    }

    /// Sizes the intervention for `building`.
    ///
    /// Does not check [`applies_to`](Self::applies_to).
    pub fn size_for(self, building: &Building) -> Intervention {
        let area = building.area;
        let floors = f64::from(building.floors);

        match self {
            Self::GreenRoof => {
                let roof_area = area / floors;
                let energy_reduction = roof_area * 0.12;
                let cost = roof_area * 85.0;
                let annual_savings = energy_reduction * ENERGY_PRICE_PER_KWH * DAYS_PER_YEAR;
                Intervention::new(
                    self,
                    format!(
                        "Install vegetation layer on {}m² rooftop. Reduces heat absorption, \
                         provides insulation, and manages stormwater runoff.",
                        roof_area.round()
                    ),
                    cost,
                    annual_savings,
                )
                .with_energy_reduction(energy_reduction)
                .with_temperature_drop(2.5)
            }
            Self::RainwaterHarvesting => {
                let capacity_litres = area * 0.8;
                let water_savings = capacity_litres * 0.6;
                let cost = capacity_litres * 45.0;
                let annual_savings = water_savings * WATER_PRICE_PER_LITRE * DAYS_PER_YEAR;
                Intervention::new(
                    self,
                    format!(
                        "Install {}L rainwater collection and storage system. Captures \
                         rooftop runoff for non-potable uses.",
                        capacity_litres.round()
                    ),
                    cost,
                    annual_savings,
                )
                .with_water_savings(water_savings)
            }
            Self::PassiveCooling => {
                // Four facades of side sqrt(area), 3 m per floor.
                let facade_area = floors * area.sqrt() * 4.0 * 3.0;
                let energy_reduction = facade_area * 0.08;
                let cost = facade_area * 120.0;
                let annual_savings = energy_reduction * ENERGY_PRICE_PER_KWH * DAYS_PER_YEAR;
                Intervention::new(
                    self,
                    format!(
                        "Retrofit {}m² facade with thermal mass materials, shading devices, \
                         and ventilation optimization.",
                        facade_area.round()
                    ),
                    cost,
                    annual_savings,
                )
                .with_energy_reduction(energy_reduction)
                .with_temperature_drop(3.2)
            }
            Self::SolarPanels => {
                let roof_area = area / floors;
                let capacity_kw = roof_area * 0.15;
                let energy_reduction = capacity_kw * 1500.0;
                let cost = capacity_kw * 1200.0;
                let annual_savings = energy_reduction * ENERGY_PRICE_PER_KWH;
                Intervention::new(
                    self,
                    format!(
                        "Install {}kW solar photovoltaic system on rooftop. Generates clean \
                         energy and reduces grid dependency.",
                        capacity_kw.round()
                    ),
                    cost,
                    annual_savings,
                )
                .with_energy_reduction(energy_reduction)
            }
        }
    }
}

impl fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One sized retrofit recommendation.
///
/// Energy and water figures are rounded to 2 decimals, temperature drop to
/// 1 decimal, cost and ROI to whole numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intervention {
    #[serde(rename = "type")]
    pub kind: InterventionKind,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_reduction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_savings: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_drop: Option<f64>,
    pub cost_estimate: f64,
    /// Annual savings as a percentage of cost.
    pub roi: f64,
    pub implementation_time: String,
}

impl Intervention {
    /// ROI is taken from the unrounded cost and savings.
    fn new(kind: InterventionKind, description: String, cost: f64, annual_savings: f64) -> Self {
        Self {
            kind,
            name: kind.title().to_string(),
            description,
            energy_reduction: None,
            water_savings: None,
            temperature_drop: None,
            cost_estimate: cost.round(),
            roi: (annual_savings / cost * 100.0).round(),
            implementation_time: kind.implementation_time().to_string(),
        }
    }

    fn with_energy_reduction(mut self, kwh: f64) -> Self {
        self.energy_reduction = Some(round_to(kwh, 2));
        self
    }

    fn with_water_savings(mut self, litres: f64) -> Self {
        self.water_savings = Some(round_to(litres, 2));
        self
    }

    fn with_temperature_drop(mut self, celsius: f64) -> Self {
        self.temperature_drop = Some(round_to(celsius, 1));
        self
    }

    /// Yearly value of the recorded energy and water figures.
    ///
    /// Both figures are treated as daily amounts, including the solar
    /// reduction, which is already an annual yield.
    pub fn valued_savings(&self) -> f64 {
        let energy = self.energy_reduction.unwrap_or(0.0) * ENERGY_PRICE_PER_KWH * DAYS_PER_YEAR;
        let water = self.water_savings.unwrap_or(0.0) * WATER_PRICE_PER_LITRE * DAYS_PER_YEAR;
        energy + water
    }
}
