use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// What a sensor measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Energy,
    Water,
    Temperature,
    AirQuality,
}

/// One timestamped measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
}

/// A fixed sensor, optionally attached to a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: String,
    pub city_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: SensorKind,
    pub lat: f64,
    pub lon: f64,
    /// Readings in arrival order.
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl Sensor {
    pub fn latest_reading(&self) -> Option<&Reading> {
        self.readings.last()
    }

    /// Reading values in arrival order, the input for forecasting.
    pub fn values(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.value).collect()
    }
}

/// Request body for appending a reading. The server stamps the time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub value: f64,
    pub unit: String,
}

impl NewReading {
    /// # Errors
    ///
    /// Rejects non-finite values and empty units.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.value.is_finite() {
            return Err(ValidationError::new("value", "must be a finite number"));
        }
        if self.unit.trim().is_empty() {
            return Err(ValidationError::new("unit", "must not be empty"));
        }
        Ok(())
    }

    pub fn stamp(self, timestamp: DateTime<Utc>) -> Reading {
        Reading {
            timestamp,
            value: self.value,
            unit: self.unit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_uses_snake_case_labels() {
        let kind: SensorKind = serde_json::from_str("\"air_quality\"").expect("kind should parse");
        assert_eq!(kind, SensorKind::AirQuality);
    }

    #[test]
    fn reading_requires_unit() {
        let reading = NewReading {
            value: 3.0,
            unit: String::new(),
        };
        assert_eq!(reading.validate().unwrap_err().field, "unit");
    }
}
