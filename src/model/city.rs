use serde::{Deserialize, Serialize};

use super::ValidationError;

/// A city and the climate factor applied to all of its demand figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name: String,
    pub country: String,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Climate severity multiplier (0.0 to 2.0).
    pub climate_factor: f64,
}

/// Request body for creating a city. The id is assigned by the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCity {
    pub name: String,
    pub country: String,
    pub center_lat: f64,
    pub center_lon: f64,
    #[serde(default = "default_climate_factor")]
    pub climate_factor: f64,
}

fn default_climate_factor() -> f64 {
    1.0
}

impl NewCity {
    /// Checks field ranges.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::new("name", "must not be empty"));
        }
        if self.country.trim().is_empty() {
            return Err(ValidationError::new("country", "must not be empty"));
        }
        if !(-90.0..=90.0).contains(&self.center_lat) {
            return Err(ValidationError::new("centerLat", "must be in [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&self.center_lon) {
            return Err(ValidationError::new("centerLon", "must be in [-180, 180]"));
        }
        if !(0.0..=2.0).contains(&self.climate_factor) {
            return Err(ValidationError::new("climateFactor", "must be in [0, 2]"));
        }
        Ok(())
    }

    pub fn into_city(self, id: String) -> City {
        City {
            id,
            name: self.name,
            country: self.country,
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            climate_factor: self.climate_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_city() -> NewCity {
        NewCity {
            name: "Pune".to_string(),
            country: "India".to_string(),
            center_lat: 18.52,
            center_lon: 73.85,
            climate_factor: 1.1,
        }
    }

    #[test]
    fn valid_city_passes() {
        assert!(new_city().validate().is_ok());
    }

    #[test]
    fn climate_factor_defaults_to_one() {
        let city: NewCity = serde_json::from_str(
            r#"{"name":"Oslo","country":"Norway","centerLat":59.9,"centerLon":10.7}"#,
        )
        .expect("body should parse");
        assert_eq!(city.climate_factor, 1.0);
    }

    #[test]
    fn out_of_range_fields_are_reported() {
        let mut city = new_city();
        city.center_lat = 91.0;
        assert_eq!(city.validate().unwrap_err().field, "centerLat");

        let mut city = new_city();
        city.climate_factor = 2.5;
        assert_eq!(city.validate().unwrap_err().field, "climateFactor");

        let mut city = new_city();
        city.name = "  ".to_string();
        assert_eq!(city.validate().unwrap_err().field, "name");
    }
}
