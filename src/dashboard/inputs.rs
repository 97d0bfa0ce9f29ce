//! User-editable dashboard inputs and their bounds.

use crate::error::DashboardError;
use crate::types::unit_system::UnitSystem;
use chrono::NaiveDate;
use std::ops::RangeInclusive;

pub const DEFAULT_CITY: &str = "Urbana, Illinois";

/// Earliest and latest dates the date picker accepts.
pub fn date_picker_bounds() -> RangeInclusive<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or(NaiveDate::MIN);
    let last = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MAX);
    first..=last
}

/// A single-valued slider. The value always lies within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slider {
    value: i32,
    min: i32,
    max: i32,
}

impl Slider {
    pub fn new(value: i32, min: i32, max: i32) -> Self {
        let (min, max) = (min.min(max), min.max(max));
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// Moves the slider, clamping to its bounds.
    pub fn set(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }
}

/// A two-handled slider. Always `min <= low <= high <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSlider {
    low: i32,
    high: i32,
    min: i32,
    max: i32,
}

impl RangeSlider {
    pub fn new(low: i32, high: i32, min: i32, max: i32) -> Self {
        let mut slider = Self {
            low: min.min(max),
            high: min.max(max),
            min: min.min(max),
            max: min.max(max),
        };
        slider.set(low, high);
        slider
    }

    /// Moves both handles. Crossed handles are swapped, then both are clamped.
    pub fn set(&mut self, a: i32, b: i32) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.low = low.clamp(self.min, self.max);
        self.high = high.clamp(self.min, self.max);
    }

    pub fn value(&self) -> (i32, i32) {
        (self.low, self.high)
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }
}

/// The plot-threshold and table-range sliders a unit system starts from.
pub fn slider_defaults(units: UnitSystem) -> (Slider, RangeSlider) {
    match units {
        UnitSystem::Imperial => (Slider::new(5, -15, 50), RangeSlider::new(0, 15, -25, 60)),
        UnitSystem::Metric => (
            Slider::new(-15, -25, 10),
            RangeSlider::new(-20, -10, -30, 15),
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Overlays {
    pub weekly: bool,
    pub monthly: bool,
}

/// An inclusive date range inside the picker bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        let bounds = date_picker_bounds();
        if start > end {
            return Err(DashboardError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }
        if !bounds.contains(&start) || !bounds.contains(&end) {
            return Err(DashboardError::InvalidInput(format!(
                "dates must lie between {} and {}",
                bounds.start(),
                bounds.end()
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl Default for DateRange {
    fn default() -> Self {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default();
        let end = *date_picker_bounds().end();
        Self { start, end }
    }
}

/// Everything the user can change on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardInputs {
    city: String,
    dates: DateRange,
    units: UnitSystem,
    plot_threshold: Slider,
    overlays: Overlays,
    table_range: RangeSlider,
}

impl DashboardInputs {
    pub fn new(city: impl Into<String>) -> Self {
        let units = UnitSystem::default();
        let (plot_threshold, table_range) = slider_defaults(units);
        Self {
            city: city.into(),
            dates: DateRange::default(),
            units,
            plot_threshold,
            overlays: Overlays::default(),
            table_range,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn dates(&self) -> DateRange {
        self.dates
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn plot_threshold(&self) -> Slider {
        self.plot_threshold
    }

    pub fn overlays(&self) -> Overlays {
        self.overlays
    }

    pub fn table_range(&self) -> RangeSlider {
        self.table_range
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_dates(&mut self, start: NaiveDate, end: NaiveDate) -> Result<(), DashboardError> {
        self.dates = DateRange::new(start, end)?;
        Ok(())
    }

    /// Switches units. A real change puts both sliders back to that unit's
    /// defaults and bounds; returns whether that happened.
    pub fn set_units(&mut self, units: UnitSystem) -> bool {
        if units == self.units {
            return false;
        }
        self.units = units;
        (self.plot_threshold, self.table_range) = slider_defaults(units);
        true
    }

    pub fn set_plot_threshold(&mut self, value: i32) {
        self.plot_threshold.set(value);
    }

    pub fn set_overlays(&mut self, overlays: Overlays) {
        self.overlays = overlays;
    }

    pub fn set_table_range(&mut self, low: i32, high: i32) {
        self.table_range.set(low, high);
    }
}

impl Default for DashboardInputs {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let inputs = DashboardInputs::default();
        assert_eq!(inputs.city(), "Urbana, Illinois");
        assert_eq!(inputs.units(), UnitSystem::Imperial);
        assert_eq!(inputs.dates().start(), date(2022, 1, 1));
        assert_eq!(inputs.dates().end(), date(2024, 1, 1));
        assert_eq!(inputs.plot_threshold().value(), 5);
        assert_eq!(inputs.table_range().value(), (0, 15));
        assert_eq!(inputs.overlays(), Overlays::default());
    }

    #[test]
    fn test_slider_defaults_per_unit() {
        let (plot, table) = slider_defaults(UnitSystem::Imperial);
        assert_eq!((plot.value(), plot.bounds()), (5, (-15, 50)));
        assert_eq!((table.value(), table.bounds()), ((0, 15), (-25, 60)));

        let (plot, table) = slider_defaults(UnitSystem::Metric);
        assert_eq!((plot.value(), plot.bounds()), (-15, (-25, 10)));
        assert_eq!((table.value(), table.bounds()), ((-20, -10), (-30, 15)));
    }

    #[test]
    fn test_unit_switch_resets_sliders() {
        let mut inputs = DashboardInputs::default();
        inputs.set_plot_threshold(40);
        inputs.set_table_range(-5, 55);

        assert!(inputs.set_units(UnitSystem::Metric));
        assert_eq!(inputs.plot_threshold().value(), -15);
        assert_eq!(inputs.table_range().value(), (-20, -10));
        assert_eq!(inputs.table_range().bounds(), (-30, 15));

        assert!(inputs.set_units(UnitSystem::Imperial));
        assert_eq!(inputs.plot_threshold().value(), 5);
        assert_eq!(inputs.table_range().value(), (0, 15));
    }

    #[test]
    fn test_same_unit_keeps_sliders() {
        let mut inputs = DashboardInputs::default();
        inputs.set_plot_threshold(12);
        assert!(!inputs.set_units(UnitSystem::Imperial));
        assert_eq!(inputs.plot_threshold().value(), 12);
    }

    #[test]
    fn test_sliders_clamp_and_order() {
        let mut inputs = DashboardInputs::default();
        inputs.set_plot_threshold(500);
        assert_eq!(inputs.plot_threshold().value(), 50);
        inputs.set_plot_threshold(-500);
        assert_eq!(inputs.plot_threshold().value(), -15);

        inputs.set_table_range(20, 3);
        assert_eq!(inputs.table_range().value(), (3, 20));
        inputs.set_table_range(-100, 100);
        assert_eq!(inputs.table_range().value(), (-25, 60));
    }

    #[test]
    fn test_date_range_validation() {
        assert!(DateRange::new(date(2020, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(DateRange::new(date(2022, 1, 1), date(2022, 1, 1)).is_ok());
        assert!(matches!(
            DateRange::new(date(2022, 2, 1), date(2022, 1, 1)),
            Err(DashboardError::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::new(date(2019, 12, 31), date(2022, 1, 1)),
            Err(DashboardError::InvalidInput(_))
        ));
        assert!(matches!(
            DateRange::new(date(2022, 1, 1), date(2024, 1, 2)),
            Err(DashboardError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejected_dates_leave_inputs_unchanged() {
        let mut inputs = DashboardInputs::default();
        let before = inputs.dates();
        assert!(inputs.set_dates(date(2023, 1, 1), date(2022, 1, 1)).is_err());
        assert_eq!(inputs.dates(), before);
    }
}
