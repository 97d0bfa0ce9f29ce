use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use heatpump_counter::LatLon;
///
/// let urbana = LatLon(40.1106, -88.2073);
/// assert_eq!(urbana.0, 40.1106); // Latitude
/// assert_eq!(urbana.1, -88.2073); // Longitude
/// assert!(urbana.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// True when both parts are finite and inside [-90, 90] / [-180, 180].
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }
}

impl fmt::Display for LatLon {
    /// Formats as `"40.1106°N, -88.2073°E"`, rounding both parts to 4 decimals.
    /// Whole degrees keep one decimal: `"40.0°N, -88.0°E"`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°N, {}°E",
            degrees(round_to(self.0, 4)),
            degrees(round_to(self.1, 4))
        )
    }
}

fn degrees(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Rounds to `decimals` places, ties to even.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
