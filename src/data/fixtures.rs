//! Small hand-built datasets shared by the unit tests.

use super::model::{OccupancyDataset, OccupancyRecord};

pub fn record(id: &str, year: i32, hood: &str, rooms: &str, density: f64) -> OccupancyRecord {
    OccupancyRecord {
        id: id.to_string(),
        year,
        neighborhood: hood.to_string(),
        rooms: rooms.parse().expect("fixture room bucket"),
        density,
        turnover: 0,
        overcrowded: 0,
        children: 0,
    }
}

/// The two-row dataset: unit 1 in 2012 and unit 2 in 2015, both "A" / "2".
pub fn two_units() -> OccupancyDataset {
    OccupancyDataset::from_records(vec![
        record("1", 2012, "A", "2", 0.8),
        record("2", 2015, "A", "2", 1.0),
    ])
}

/// A few neighborhoods, buckets and years, including a unit observed twice.
pub fn city() -> OccupancyDataset {
    let mut rows = vec![
        record("10", 2011, "Centrum", "1", 0.9),
        record("11", 2011, "Centrum", "3", 0.6),
        record("12", 2013, "Ost", "3", 1.2),
        record("13", 2014, "West", "6+", 0.4),
        record("14", 2016, "Ost", "2", 0.7),
        record("14", 2017, "Ost", "2", 0.9),
        record("15", 2019, "Centrum", "1", 1.1),
    ];
    rows[0].children = 1;
    rows[1].turnover = 1;
    rows[2].children = 2;
    rows[2].overcrowded = 1;
    rows[4].children = 3;
    rows[4].turnover = 1;
    rows[5].children = 3;
    rows[6].children = 0;
    OccupancyDataset::from_records(rows)
}
