use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::data::model::OccupancyRecord;
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Aggregation – what is computed per (neighborhood, room bucket) group
// ---------------------------------------------------------------------------

/// A numeric column of [`OccupancyRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Density,
    Turnover,
    Overcrowded,
    Children,
}

impl Measure {
    pub fn value(self, record: &OccupancyRecord) -> f64 {
        match self {
            Measure::Density => record.density,
            Measure::Turnover => f64::from(record.turnover),
            Measure::Overcrowded => f64::from(record.overcrowded),
            Measure::Children => f64::from(record.children),
        }
    }
}

/// Reduction of one group of rows to a single cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Number of distinct `ID`s.
    DistinctUnits,
    Mean(Measure),
    Sum(Measure),
}

impl Aggregation {
    /// Aggregate a group.  An empty group has no value (a null cell).
    pub fn apply(self, rows: &[&OccupancyRecord]) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let value = match self {
            Aggregation::DistinctUnits => {
                let ids: BTreeSet<&str> = rows.iter().map(|r| r.id.as_str()).collect();
                ids.len() as f64
            }
            Aggregation::Mean(measure) => {
                rows.iter().map(|r| measure.value(r)).sum::<f64>() / rows.len() as f64
            }
            Aggregation::Sum(measure) => rows.iter().map(|r| measure.value(r)).sum(),
        };
        Some(value)
    }
}

// ---------------------------------------------------------------------------
// ValueFormat – how a cell value is displayed
// ---------------------------------------------------------------------------

/// Display rule for a numeric cell.  Serialized as a small descriptor so a
/// grid front-end can apply the same rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormat {
    Integer,
    /// Fraction shown as percentage, e.g. `0.125 → "12.5%"`.
    Percent { decimals: usize },
    /// Significant digits with trailing zeros trimmed, e.g. `0.333 → "0.33"`.
    Significant { digits: usize },
    Fixed { decimals: usize },
}

impl ValueFormat {
    /// Format a cell; a null cell is the empty string.
    pub fn format(self, value: Option<f64>) -> String {
        let Some(v) = value else {
            return String::new();
        };
        match self {
            ValueFormat::Integer => format!("{v:.0}"),
            ValueFormat::Percent { decimals } => format!("{:.decimals$}%", v * 100.0),
            ValueFormat::Significant { digits } => significant(v, digits),
            ValueFormat::Fixed { decimals } => format!("{v:.decimals$}"),
        }
    }
}

fn significant(v: f64, digits: usize) -> String {
    if v == 0.0 || !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = v.abs().log10().floor() as i32;
    let decimals = digits.max(1) as i32 - 1 - magnitude;
    if decimals >= 0 {
        let decimals = decimals as usize;
        let text = format!("{v:.decimals$}");
        if text.contains('.') {
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            text
        }
    } else {
        let scale = 10f64.powi(-decimals);
        format!("{:.0}", (v / scale).round() * scale)
    }
}

// ---------------------------------------------------------------------------
// Metric – the five table selections
// ---------------------------------------------------------------------------

/// Metric shown in the pivot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    #[default]
    Dwellings,
    Turnover,
    Overcrowding,
    ChildrenPerDwelling,
    ChildrenTotal,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Dwellings,
        Metric::Turnover,
        Metric::Overcrowding,
        Metric::ChildrenPerDwelling,
        Metric::ChildrenTotal,
    ];

    /// The selector value used by the UI and the command line.
    pub fn selector(self) -> &'static str {
        match self {
            Metric::Dwellings => "Anzahl Wohnungen",
            Metric::Turnover => "Wohnungswechsel",
            Metric::Overcrowding => "Überbelegung",
            Metric::ChildrenPerDwelling => "Kinder",
            Metric::ChildrenTotal => "Anzahl Kinder",
        }
    }

    /// Descriptive radio-button label.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Dwellings => "Anzahl Wohnungen (welche in die Analyse einfliessen)",
            Metric::Turnover => "Wohnungswechsel (in %)",
            Metric::Overcrowding => "Überbelegung (Anz. Personen > Anz. Zimmer + 2)",
            Metric::ChildrenPerDwelling => "Kinder (Durchschnitt pro Wohnung)",
            Metric::ChildrenTotal => "Anzahl Kinder (absolut)",
        }
    }

    pub fn aggregation(self) -> Aggregation {
        match self {
            Metric::Dwellings => Aggregation::DistinctUnits,
            Metric::Turnover => Aggregation::Mean(Measure::Turnover),
            Metric::Overcrowding => Aggregation::Sum(Measure::Overcrowded),
            Metric::ChildrenPerDwelling => Aggregation::Mean(Measure::Children),
            Metric::ChildrenTotal => Aggregation::Sum(Measure::Children),
        }
    }

    pub fn format(self) -> ValueFormat {
        match self {
            Metric::Turnover => ValueFormat::Percent { decimals: 1 },
            Metric::ChildrenPerDwelling => ValueFormat::Significant { digits: 2 },
            Metric::Dwellings | Metric::Overcrowding | Metric::ChildrenTotal => {
                ValueFormat::Integer
            }
        }
    }

    /// Resolve a selector, falling back to the default metric when it is
    /// not one of the five known values.
    pub fn from_selector_or_default(selector: &str) -> Metric {
        selector.parse().unwrap_or_else(|e: DashboardError| {
            log::warn!("{e}; showing \"{}\" instead", Metric::default());
            Metric::default()
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for Metric {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.selector() == s.trim())
            .ok_or_else(|| DashboardError::UnknownMetric(s.to_string()))
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.selector())
    }
}
