use serde::Serialize;

use super::model::OccupancyRecord;

// ---------------------------------------------------------------------------
// Year range selection
// ---------------------------------------------------------------------------

/// Lower bound offered by the range controls.
pub const FIRST_YEAR: i32 = 2011;
/// Upper bound offered by the range controls (exclusive; 2020 means 1.1.2020).
pub const LAST_YEAR: i32 = 2020;

/// Half-open year interval `[low, high)` over `Belegungsjahr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub low: i32,
    pub high: i32,
}

impl Default for YearRange {
    fn default() -> Self {
        Self {
            low: FIRST_YEAR,
            high: LAST_YEAR,
        }
    }
}

impl YearRange {
    pub fn new(low: i32, high: i32) -> Self {
        Self { low, high }
    }

    /// Range as the UI controls allow it: both ends inside
    /// [`FIRST_YEAR`, `LAST_YEAR`] and `low <= high`.
    pub fn clamped(low: i32, high: i32) -> Self {
        let low = low.clamp(FIRST_YEAR, LAST_YEAR);
        Self::new(low, high.clamp(low, LAST_YEAR))
    }

    /// `low <= year < high`
    pub fn contains(&self, year: i32) -> bool {
        self.low <= year && year < self.high
    }
}

/// Return the rows whose year lies in `range`.
///
/// An inverted or out-of-data range is not an error; it simply selects
/// fewer (possibly zero) rows.
pub fn filter_by_years(records: &[OccupancyRecord], range: YearRange) -> Vec<&OccupancyRecord> {
    records.iter().filter(|r| range.contains(r.year)).collect()
}
