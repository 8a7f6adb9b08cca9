//! Built-in sample city: five buildings and five sensors in central Bengaluru.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use crate::model::{
    Building, BuildingCategory, BuildingProperties, City, EnergyRating, Reading, Sensor,
    SensorKind,
};

use super::Dataset;

pub const CITY_ID: &str = "bengaluru-1";

pub fn dataset() -> Dataset {
    let buildings = buildings();
    let sensors = sensors();
    let layers = vec![
        super::buildings_layer("layer-buildings-1", CITY_ID, &buildings),
        super::sensors_layer("layer-sensors-1", CITY_ID, &sensors),
    ];
    Dataset {
        cities: vec![city()],
        layers,
        buildings,
        sensors,
    }
}

fn city() -> City {
    City {
        id: CITY_ID.to_string(),
        name: "Bengaluru".to_string(),
        country: "India".to_string(),
        center_lat: 12.9716,
        center_lon: 77.5946,
        climate_factor: 1.2,
    }
}

/// Axis-aligned footprint polygon from its west/east longitudes and
/// north/south latitudes.
fn footprint(west: f64, east: f64, north: f64, south: f64) -> serde_json::Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [west, north],
            [east, north],
            [east, south],
            [west, south],
            [west, north],
        ]],
    })
}

#[expect(clippy::too_many_arguments)]
fn building(
    n: u32,
    name: &str,
    category: BuildingCategory,
    area: f64,
    floors: u32,
    usage: f64,
    rating: EnergyRating,
    year_built: u16,
    geometry: serde_json::Value,
) -> Building {
    let mut properties = BuildingProperties::with_usage(usage);
    properties.energy_rating = Some(rating);
    properties.year_built = Some(year_built);
    Building {
        id: format!("building-{n}"),
        city_id: CITY_ID.to_string(),
        name: name.to_string(),
        category,
        area,
        floors,
        geometry: Some(geometry),
        properties,
    }
}

fn buildings() -> Vec<Building> {
    let mut green_tower = building(
        4,
        "Green Tower Delta",
        BuildingCategory::Mixed,
        4500.0,
        15,
        0.7,
        EnergyRating::APlus,
        2022,
        footprint(77.5948, 77.5953, 12.9712, 12.9708),
    );
    green_tower.properties.has_solar_panels = true;
    green_tower.properties.has_rainwater_harvesting = true;

    vec![
        building(
            1,
            "Tech Park Alpha",
            BuildingCategory::Commercial,
            5000.0,
            8,
            0.8,
            EnergyRating::B,
            2015,
            footprint(77.5940, 77.5945, 12.9720, 12.9715),
        ),
        building(
            2,
            "Residential Complex Beta",
            BuildingCategory::Residential,
            3500.0,
            12,
            0.6,
            EnergyRating::C,
            2018,
            footprint(77.5950, 77.5955, 12.9725, 12.9720),
        ),
        building(
            3,
            "Shopping Mall Gamma",
            BuildingCategory::Commercial,
            8000.0,
            4,
            0.9,
            EnergyRating::A,
            2020,
            footprint(77.5935, 77.5942, 12.9710, 12.9705),
        ),
        green_tower,
        building(
            5,
            "Office Hub Epsilon",
            BuildingCategory::Commercial,
            6000.0,
            10,
            0.85,
            EnergyRating::B,
            2017,
            footprint(77.5960, 77.5966, 12.9718, 12.9713),
        ),
    ]
}

/// Hourly readings from 08:00 UTC on 2025-01-15.
fn hourly(values: [f64; 5], unit: &str) -> Vec<Reading> {
    let start: DateTime<Utc> = Utc
        .with_ymd_and_hms(2025, 1, 15, 8, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    values
        .into_iter()
        .zip(0_i64..)
        .map(|(value, hour)| Reading {
            timestamp: start + chrono::Duration::hours(hour),
            value,
            unit: unit.to_string(),
        })
        .collect()
}

fn sensor(n: u32, kind: SensorKind, lat: f64, lon: f64, readings: Vec<Reading>) -> Sensor {
    Sensor {
        id: format!("sensor-{n}"),
        city_id: CITY_ID.to_string(),
        building_id: Some(format!("building-{n}")),
        kind,
        lat,
        lon,
        readings,
    }
}

fn sensors() -> Vec<Sensor> {
    vec![
        sensor(
            1,
            SensorKind::Energy,
            12.9717,
            77.5942,
            hourly([450.0, 480.0, 520.0, 550.0, 580.0], "kWh"),
        ),
        sensor(
            2,
            SensorKind::Water,
            12.9722,
            77.5952,
            hourly([1200.0, 1350.0, 1400.0, 1500.0, 1600.0], "liters"),
        ),
        sensor(
            3,
            SensorKind::Energy,
            12.9707,
            77.5938,
            hourly([720.0, 780.0, 850.0, 900.0, 920.0], "kWh"),
        ),
        sensor(
            4,
            SensorKind::Temperature,
            12.9710,
            77.5950,
            hourly([24.5, 25.2, 26.8, 28.1, 29.3], "°C"),
        ),
        sensor(
            5,
            SensorKind::Energy,
            12.9715,
            77.5963,
            hourly([540.0, 590.0, 630.0, 670.0, 700.0], "kWh"),
        ),
    ]
}
