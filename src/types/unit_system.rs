//! Defines the temperature unit system used for requests and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The unit system temperatures are requested and shown in.
///
/// Open-Meteo converts server-side, so the unit is part of every request and
/// part of every cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    /// Degrees Fahrenheit.
    #[default]
    Imperial,
    /// Degrees Celsius.
    Metric,
}

impl UnitSystem {
    /// The value Open-Meteo expects for its `temperature_unit` parameter.
    pub(crate) fn api_value(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "fahrenheit",
            UnitSystem::Metric => "celsius",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnitSystem::Imperial => "°F",
            UnitSystem::Metric => "°C",
        }
    }
}

/// Allows formatting a `UnitSystem` variant using its API value.
///
/// # Examples
///
/// ```
/// use heatpump_counter::UnitSystem;
///
/// assert_eq!(UnitSystem::Imperial.to_string(), "fahrenheit");
/// assert_eq!(format!("{}", UnitSystem::Metric), "celsius");
/// ```
impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_value())
    }
}

/// Parses `metric`/`celsius`/`c` and `imperial`/`fahrenheit`/`f`, ignoring case.
impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" | "fahrenheit" | "f" => Ok(UnitSystem::Imperial),
            "metric" | "celsius" | "c" => Ok(UnitSystem::Metric),
            other => Err(format!("unknown unit system '{other}'")),
        }
    }
}
