//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use regenerax::dataset::Dataset;
use regenerax::model::{Building, BuildingCategory, BuildingProperties, City, EnergyRating};
use regenerax::store::MemoryStore;

/// City with the given climate factor.
pub fn city(climate_factor: f64) -> City {
    City {
        id: "test-city".to_string(),
        name: "Testville".to_string(),
        country: "Nowhere".to_string(),
        center_lat: 10.0,
        center_lon: 20.0,
        climate_factor,
    }
}

/// Bare commercial building with no rating and no retrofits.
pub fn building(id: &str, area: f64, floors: u32, usage: f64) -> Building {
    Building {
        id: id.to_string(),
        city_id: "test-city".to_string(),
        name: format!("Building {id}"),
        category: BuildingCategory::Commercial,
        area,
        floors,
        geometry: None,
        properties: BuildingProperties::with_usage(usage),
    }
}

/// Same as [`building`] with an energy rating.
pub fn rated_building(id: &str, rating: EnergyRating) -> Building {
    let mut b = building(id, 1000.0, 2, 1.0);
    b.properties.energy_rating = Some(rating);
    b
}

/// Tech Park Alpha: 5000 m², 8 floors, usage 0.8, rating B.
pub fn tech_park() -> Building {
    let mut b = building("tech-park", 5000.0, 8, 0.8);
    b.properties.energy_rating = Some(EnergyRating::B);
    b
}

/// Building with every retrofit already installed.
pub fn fully_retrofitted() -> Building {
    let mut b = tech_park();
    b.properties.has_green_roof = true;
    b.properties.has_rainwater_harvesting = true;
    b.properties.has_passive_cooling = true;
    b.properties.has_solar_panels = true;
    b
}

/// The built-in Bengaluru dataset.
pub fn bengaluru() -> Dataset {
    Dataset::from_preset("bengaluru").expect("bengaluru preset should load")
}

/// Store seeded with the Bengaluru dataset.
pub fn bengaluru_store() -> MemoryStore {
    MemoryStore::new(bengaluru())
}
