use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shown wherever a distance could not be computed.
pub const FAILURE_PLACEHOLDER: &str = "Error fetching coordinates";

/// A point on the earth's surface, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Returns `None` for non-finite values or values outside
    /// latitude [-90, 90] / longitude [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceName(String);

impl PlaceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The fixed set of places a user may pick from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCatalog {
    places: Vec<PlaceName>,
}

impl PlaceCatalog {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            places: names.into_iter().map(PlaceName::new).collect(),
        }
    }

    pub fn places(&self) -> &[PlaceName] {
        &self.places
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Case-insensitive lookup returning the canonical catalog entry.
    pub fn find(&self, name: &str) -> Option<&PlaceName> {
        let name = name.trim();
        self.places
            .iter()
            .find(|place| place.as_str().eq_ignore_ascii_case(name))
    }
}

impl Default for PlaceCatalog {
    fn default() -> Self {
        Self::new(["Berlin", "Paris", "Tokyo", "New York"])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kilometers,
    Miles,
}

impl Unit {
    pub const KILOMETERS_RADIUS: f64 = 6371.0;
    pub const MILES_RADIUS: f64 = 3958.8;

    /// Mean earth radius expressed in this unit.
    pub fn earth_radius(self) -> f64 {
        match self {
            Unit::Kilometers => Self::KILOMETERS_RADIUS,
            Unit::Miles => Self::MILES_RADIUS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Kilometers => "km",
            Unit::Miles => "miles",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "km" | "kilometers" | "kilometres" => Ok(Unit::Kilometers),
            "mi" | "mile" | "miles" => Ok(Unit::Miles),
            other => Err(format!("unknown unit '{}', expected km or miles", other)),
        }
    }
}

/// Result of one calculation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum DistanceOutcome {
    Measured(f64),
    Failed,
}

impl DistanceOutcome {
    pub fn value(&self) -> Option<f64> {
        match self {
            DistanceOutcome::Measured(value) => Some(*value),
            DistanceOutcome::Failed => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DistanceOutcome::Failed)
    }

    /// Two-decimal rendering with the unit label, or the failure placeholder.
    pub fn display_with(&self, unit: Unit) -> String {
        match self {
            DistanceOutcome::Measured(value) => format!("{:.2} {}", value, unit.label()),
            DistanceOutcome::Failed => FAILURE_PLACEHOLDER.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub from: PlaceName,
    pub to: PlaceName,
    pub unit: Unit,
    pub distance: DistanceOutcome,
}

impl CalculationRecord {
    pub fn new(from: PlaceName, to: PlaceName, unit: Unit, distance: DistanceOutcome) -> Self {
        Self {
            from,
            to,
            unit,
            distance,
        }
    }

    pub fn distance_text(&self) -> String {
        self.distance.display_with(self.unit)
    }
}

/// The caller's current form state. The core never stores it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub from: PlaceName,
    pub to: PlaceName,
    pub unit: Unit,
}

impl Selection {
    /// First two catalog entries, in kilometers. A one-entry catalog selects
    /// the same place twice.
    pub fn initial(catalog: &PlaceCatalog) -> Option<Self> {
        let places = catalog.places();
        let from = places.first()?.clone();
        let to = places.get(1).cloned().unwrap_or_else(|| from.clone());
        Some(Self {
            from,
            to,
            unit: Unit::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(52.52, 13.405).is_some());
        assert!(Coordinate::new(90.0, -180.0).is_some());
        assert!(Coordinate::new(90.1, 0.0).is_none());
        assert!(Coordinate::new(0.0, 180.5).is_none());
        assert!(Coordinate::new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn test_catalog_find_is_case_insensitive() {
        let catalog = PlaceCatalog::default();
        assert_eq!(catalog.find("new york"), Some(&PlaceName::new("New York")));
        assert_eq!(catalog.find("  PARIS "), Some(&PlaceName::new("Paris")));
        assert_eq!(catalog.find("Madrid"), None);
    }

    #[test]
    fn test_unit_parsing_and_labels() {
        assert_eq!("km".parse::<Unit>().unwrap(), Unit::Kilometers);
        assert_eq!("Miles".parse::<Unit>().unwrap(), Unit::Miles);
        assert_eq!("mi".parse::<Unit>().unwrap(), Unit::Miles);
        assert!("furlongs".parse::<Unit>().is_err());
        assert_eq!(Unit::Kilometers.label(), "km");
        assert_eq!(Unit::Miles.to_string(), "miles");
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(
            DistanceOutcome::Measured(878.4321).display_with(Unit::Kilometers),
            "878.43 km"
        );
        assert_eq!(DistanceOutcome::Measured(0.0).display_with(Unit::Miles), "0.00 miles");
        assert_eq!(
            DistanceOutcome::Failed.display_with(Unit::Kilometers),
            FAILURE_PLACEHOLDER
        );
    }

    #[test]
    fn test_initial_selection_uses_first_two_places() {
        let selection = Selection::initial(&PlaceCatalog::default()).unwrap();
        assert_eq!(selection.from.as_str(), "Berlin");
        assert_eq!(selection.to.as_str(), "Paris");
        assert_eq!(selection.unit, Unit::Kilometers);

        let single = Selection::initial(&PlaceCatalog::new(["Tokyo"])).unwrap();
        assert_eq!(single.from, single.to);

        assert!(Selection::initial(&PlaceCatalog::new(Vec::<String>::new())).is_none());
    }
}
