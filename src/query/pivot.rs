use std::collections::{BTreeMap, BTreeSet};

use crate::data::model::{OccupancyRecord, RoomBucket};

use super::metric::Aggregation;

/// Rows of the filtered subset grouped by (neighborhood, room bucket).
///
/// Only pairs with at least one row appear; `BTreeMap` keeps neighborhoods
/// ascending and buckets in ordinal order.
pub type Groups<'a> = BTreeMap<(&'a str, RoomBucket), Vec<&'a OccupancyRecord>>;

pub fn group_by_cell<'a>(subset: &[&'a OccupancyRecord]) -> Groups<'a> {
    let mut groups: Groups<'a> = BTreeMap::new();
    for &record in subset {
        groups
            .entry((record.neighborhood.as_str(), record.rooms))
            .or_default()
            .push(record);
    }
    groups
}

// ---------------------------------------------------------------------------
// PivotTable
// ---------------------------------------------------------------------------

/// One row of the pivot: a room bucket and one cell per neighborhood column.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotRow {
    pub rooms: RoomBucket,
    /// Aligned with [`PivotTable::neighborhoods`]; `None` is a missing cell.
    pub cells: Vec<Option<f64>>,
}

/// Room buckets × neighborhoods grid of one aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    /// Neighborhoods present in the filtered subset, ascending.
    pub neighborhoods: Vec<String>,
    /// Always one row per [`RoomBucket`], in ordinal order.
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Group, aggregate and pivot the filtered subset.
    pub fn build(subset: &[&OccupancyRecord], aggregation: Aggregation) -> Self {
        let groups = group_by_cell(subset);

        let neighborhoods: Vec<String> = groups
            .keys()
            .map(|(hood, _)| *hood)
            .collect::<BTreeSet<&str>>()
            .into_iter()
            .map(str::to_string)
            .collect();

        let rows = RoomBucket::ALL
            .into_iter()
            .map(|rooms| PivotRow {
                rooms,
                cells: neighborhoods
                    .iter()
                    .map(|hood| {
                        groups
                            .get(&(hood.as_str(), rooms))
                            .and_then(|rows| aggregation.apply(rows))
                    })
                    .collect(),
            })
            .collect();

        PivotTable {
            neighborhoods,
            rows,
        }
    }

    /// Cell value for a (room bucket, neighborhood) pair.
    #[cfg(test)]
    pub fn get(&self, rooms: RoomBucket, neighborhood: &str) -> Option<f64> {
        let col = self.neighborhoods.iter().position(|h| h == neighborhood)?;
        self.rows[rooms.index()].cells[col]
    }

    /// All non-null cell values.
    #[cfg(test)]
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().flat_map(|row| row.cells.iter().flatten().copied())
    }
}
