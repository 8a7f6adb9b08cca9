//! Building records and their typed property bag.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Energy performance rating of a building.
///
/// Scales the estimated energy demand: better ratings consume less.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EnergyRating {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    /// Reference rating, also assumed when none is recorded.
    #[default]
    C,
    D,
    E,
}

impl EnergyRating {
    /// All ratings, best first.
    pub const ALL: [EnergyRating; 6] = [
        EnergyRating::APlus,
        EnergyRating::A,
        EnergyRating::B,
        EnergyRating::C,
        EnergyRating::D,
        EnergyRating::E,
    ];

    /// Multiplier applied to the climate-adjusted energy demand.
    pub fn energy_multiplier(self) -> f64 {
        match self {
            Self::APlus => 0.70,
            Self::A => 0.80,
            Self::B => 0.90,
            Self::C => 1.00,
            Self::D => 1.15,
            Self::E => 1.30,
        }
    }

    /// Rating label as written on certificates (`"A+"`, `"B"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
        }
    }
}

impl fmt::Display for EnergyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnergyRating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| format!("unknown energy rating \"{s}\""))
    }
}

/// Usage category of a building.
///
/// Anything other than the three known categories is kept verbatim in
/// [`BuildingCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildingCategory {
    Commercial,
    Residential,
    Mixed,
    Other(String),
}

impl BuildingCategory {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
            Self::Mixed => "mixed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for BuildingCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "commercial" => Self::Commercial,
            "residential" => Self::Residential,
            "mixed" => Self::Mixed,
            _ => Self::Other(s),
        }
    }
}

impl From<BuildingCategory> for String {
    fn from(c: BuildingCategory) -> Self {
        match c {
            BuildingCategory::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BuildingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed property bag attached to every building.
///
/// Missing flags read as `false`; a missing or unrecognised `energyRating`
/// deserialises to `None` and is treated as [`EnergyRating::C`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingProperties {
    /// Fraction of capacity in use (0.0 to 1.0).
    pub usage_intensity: f64,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub energy_rating: Option<EnergyRating>,
    #[serde(default)]
    pub has_green_roof: bool,
    #[serde(default)]
    pub has_rainwater_harvesting: bool,
    #[serde(default)]
    pub has_solar_panels: bool,
    #[serde(default)]
    pub has_passive_cooling: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u16>,
}

impl BuildingProperties {
    /// Properties with the given usage intensity and every optional field unset.
    pub fn with_usage(usage_intensity: f64) -> Self {
        Self {
            usage_intensity,
            energy_rating: None,
            has_green_roof: false,
            has_rainwater_harvesting: false,
            has_solar_panels: false,
            has_passive_cooling: false,
            year_built: None,
        }
    }

    /// Recorded rating, or the reference rating when none is recorded.
    pub fn rating(&self) -> EnergyRating {
        self.energy_rating.unwrap_or_default()
    }
}

fn lenient_rating<'de, D>(deserializer: D) -> Result<Option<EnergyRating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.parse() {
        Ok(rating) => Some(rating),
        Err(err) => {
            tracing::debug!("{err}, treating as C");
            None
        }
    }))
}

/// A building belonging to a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    pub id: String,
    pub city_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub category: BuildingCategory,
    /// Gross floor area (m², > 0).
    pub area: f64,
    /// Number of floors (>= 1).
    pub floors: u32,
    /// GeoJSON geometry object; opaque to the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
    pub properties: BuildingProperties,
}

impl Building {
    pub fn is_residential(&self) -> bool {
        self.category == BuildingCategory::Residential
    }
}
