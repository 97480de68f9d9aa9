use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::{YearRange, FIRST_YEAR, LAST_YEAR};
use crate::query::metric::Metric;
use crate::query::view::Selection;

/// Occupancy of newly built dwellings in St. Gallen, 2011–2019.
#[derive(Parser, Debug)]
#[command(name = "wohnbelegung", version, about)]
pub struct Args {
    /// Dataset file (.csv, .json or .parquet)
    #[arg(long, env = "WOHNBELEGUNG_DATA", default_value = "assets/df.csv")]
    pub data: PathBuf,

    /// First year of the initial range (inclusive)
    #[arg(long, default_value_t = FIRST_YEAR)]
    pub from: i32,

    /// End of the initial range (exclusive)
    #[arg(long, default_value_t = LAST_YEAR)]
    pub to: i32,

    /// Initial table metric, e.g. "Wohnungswechsel"
    #[arg(long, default_value_t = Metric::default().selector().to_string())]
    pub metric: String,

    /// Write the view for the selection as JSON and exit without a window
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

impl Args {
    /// Initial selection; bounds are clamped like the range controls and an
    /// unknown metric falls back to the default.
    pub fn selection(&self) -> Selection {
        Selection {
            years: YearRange::clamped(self.from, self.to),
            metric: Metric::from_selector_or_default(&self.metric),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["wohnbelegung", "--data", "df.csv"]);
        assert_eq!(args.data, PathBuf::from("df.csv"));
        assert_eq!(args.export, None);
        assert_eq!(args.selection(), Selection::default());
    }

    #[test]
    fn test_selection_from_flags() {
        let args = Args::parse_from([
            "wohnbelegung",
            "--data",
            "df.csv",
            "--from",
            "2014",
            "--to",
            "2017",
            "--metric",
            "Überbelegung",
            "--export",
            "out.json",
        ]);
        let sel = args.selection();
        assert_eq!(sel.years, YearRange::new(2014, 2017));
        assert_eq!(sel.metric, Metric::Overcrowding);
        assert_eq!(args.export, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_unknown_metric_falls_back() {
        let args = Args::parse_from(["wohnbelegung", "--data", "df.csv", "--metric", "Miete", "--from", "1990"]);
        let sel = args.selection();
        assert_eq!(sel.metric, Metric::Dwellings);
        assert_eq!(sel.years.low, FIRST_YEAR);
    }
}
