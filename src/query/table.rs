use std::collections::BTreeMap;

use serde::Serialize;

use super::metric::{Metric, ValueFormat};
use super::pivot::PivotTable;

/// Field name (and header) of the room-bucket column.
pub const ROOMS_FIELD: &str = "Anzahl Zimmer";
pub const ROOMS_COLUMN_WIDTH: f32 = 84.0;
pub const VALUE_COLUMN_WIDTH: f32 = 92.0;

/// Column definition for a data grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDef {
    /// Key of this column in every [`RowRecord`].
    pub field: String,
    pub max_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_format: Option<ValueFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
    Null,
}

/// One grid row: field name → cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RowRecord(pub BTreeMap<String, Cell>);

impl RowRecord {
    pub fn get(&self, field: &str) -> &Cell {
        self.0.get(field).unwrap_or(&Cell::Null)
    }
}

impl ColumnDef {
    /// Text shown for `cell` in this column.
    pub fn display(&self, cell: &Cell) -> String {
        match cell {
            Cell::Text(text) => text.clone(),
            Cell::Number(n) => self
                .value_format
                .unwrap_or(ValueFormat::Integer)
                .format(Some(*n)),
            Cell::Null => String::new(),
        }
    }
}

/// Ordered columns plus one row per room bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub metric: Metric,
    pub columns: Vec<ColumnDef>,
    pub rows: Vec<RowRecord>,
}

impl TableSpec {
    pub fn from_pivot(pivot: &PivotTable, metric: Metric) -> Self {
        let format = metric.format();

        let mut columns = Vec::with_capacity(pivot.neighborhoods.len() + 1);
        columns.push(ColumnDef {
            field: ROOMS_FIELD.to_string(),
            max_width: ROOMS_COLUMN_WIDTH,
            value_format: None,
        });
        columns.extend(pivot.neighborhoods.iter().map(|hood| ColumnDef {
            field: hood.clone(),
            max_width: VALUE_COLUMN_WIDTH,
            value_format: Some(format),
        }));

        let rows = pivot
            .rows
            .iter()
            .map(|row| {
                let mut record = BTreeMap::new();
                record.insert(ROOMS_FIELD.to_string(), Cell::Text(row.rooms.label().to_string()));
                for (hood, value) in pivot.neighborhoods.iter().zip(&row.cells) {
                    let cell = value.map_or(Cell::Null, Cell::Number);
                    record.insert(hood.clone(), cell);
                }
                RowRecord(record)
            })
            .collect();

        TableSpec {
            metric,
            columns,
            rows,
        }
    }

    /// Display text of a row in the given column.
    pub fn cell_text(&self, row: &RowRecord, column: &ColumnDef) -> String {
        column.display(row.get(&column.field))
    }
}
