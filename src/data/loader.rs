use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{OccupancyDataset, OccupancyRecord, RoomBucket};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the occupancy dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the published column names (recommended)
/// * `.json`    – `[{ "ID": ..., "Belegungsjahr": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// Integer columns (`Belegungsjahr`, `Wechsel`, `Ueberbelegung`,
/// `Anz_Kinder`) accept whole-number floats such as `1.0` in every format;
/// fractional values are rejected.
///
/// Every row is validated; the first malformed row aborts the load.
pub fn load_file(path: &Path) -> Result<OccupancyDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(OccupancyDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with (at least) the columns
/// `ID, Belegungsjahr, Quartiersgruppe Name, WGM, Dichte, Wechsel,
/// Ueberbelegung, Anz_Kinder`.  Other columns are ignored.
fn load_csv(path: &Path) -> Result<Vec<OccupancyRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<OccupancyRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        record
            .validate()
            .with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<OccupancyRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<OccupancyRecord> = serde_json::from_str(&text).context("parsing JSON")?;

    for (i, rec) in records.iter().enumerate() {
        rec.validate().with_context(|| format!("Row {i}"))?;
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per record field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): strings may be Utf8 or LargeUtf8,
/// integers Int32 or Int64, floats Float32 or Float64.
fn load_parquet(path: &Path) -> Result<Vec<OccupancyRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            let record = record_at(&batch, row)
                .with_context(|| format!("Row {}", offset + row))?;
            records.push(record);
        }
    }
    Ok(records)
}

fn record_at(batch: &RecordBatch, row: usize) -> Result<OccupancyRecord> {
    let rooms = text_at(column(batch, "WGM")?, row)?;
    let record = OccupancyRecord {
        id: text_at(column(batch, "ID")?, row)?,
        year: i32::try_from(int_at(column(batch, "Belegungsjahr")?, row)?)
            .context("Belegungsjahr out of range")?,
        neighborhood: text_at(column(batch, "Quartiersgruppe Name")?, row)?,
        rooms: rooms.parse::<RoomBucket>()?,
        density: float_at(column(batch, "Dichte")?, row)?,
        turnover: u8::try_from(int_at(column(batch, "Wechsel")?, row)?)
            .context("Wechsel is not a 0/1 flag")?,
        overcrowded: u8::try_from(int_at(column(batch, "Ueberbelegung")?, row)?)
            .context("Ueberbelegung is not a 0/1 flag")?,
        children: u32::try_from(int_at(column(batch, "Anz_Kinder")?, row)?)
            .context("Anz_Kinder is negative")?,
    };
    record.validate()?;
    Ok(record)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Text value; integer columns are stringified (numeric ids, numeric WGM).
fn text_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in text column");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 | DataType::Int64 => Ok(int_at(col, row)?.to_string()),
        other => bail!("Expected a string column, got {other:?}"),
    }
}

fn int_at(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => Ok(i64::from(col.as_primitive::<Int32Type>().value(row))),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row)),
        // Same rule as the serde loaders: whole-number floats only.
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            if !v.is_finite() || v.fract() != 0.0 {
                bail!("{v} is not a whole number");
            }
            Ok(v as i64)
        }
        other => bail!("Expected an integer column, got {other:?}"),
    }
}

fn float_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in float column");
    }
    match col.data_type() {
        DataType::Float32 => Ok(f64::from(col.as_primitive::<Float32Type>().value(row))),
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(row)),
        DataType::Int32 | DataType::Int64 => Ok(int_at(col, row)? as f64),
        other => bail!("Expected a float column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "ID,Belegungsjahr,Quartiersgruppe Name,WGM,Dichte,Wechsel,Ueberbelegung,Anz_Kinder,Anz_Erw";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv() {
        let file = write_temp(
            ".csv",
            &format!(
                "{HEADER}\n\
                 101,2012,Centrum,2,0.8,1,0,1,1\n\
                 102,2015,\"St. Fiden, Neudorf\",6+,1.25,0,1,3,2\n"
            ),
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].id, "101");
        assert_eq!(ds.records[0].rooms, RoomBucket::Two);
        assert_eq!(ds.records[1].neighborhood, "St. Fiden, Neudorf");
        assert_eq!(ds.records[1].rooms, RoomBucket::SixPlus);
        assert_eq!(ds.records[1].children, 3);
        assert_eq!(ds.year_span, Some((2012, 2015)));
    }

    #[test]
    fn test_load_csv_rejects_unknown_bucket() {
        let file = write_temp(".csv", &format!("{HEADER}\n1,2012,A,7,0.8,0,0,0,1\n"));
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"), "{err:#}");
    }

    #[test]
    fn test_load_csv_rejects_missing_column() {
        let file = write_temp(".csv", "ID,Belegungsjahr\n1,2012\n");
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn test_load_csv_accepts_whole_number_floats() {
        let file = write_temp(".csv", &format!("{HEADER}\n5,2012.0,Ost,2,0.9,1.0,0.0,2.0,1\n"));
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].year, 2012);
        assert_eq!(ds.records[0].turnover, 1);
        assert_eq!(ds.records[0].overcrowded, 0);
        assert_eq!(ds.records[0].children, 2);
    }

    #[test]
    fn test_load_csv_rejects_fractional_flag() {
        let file = write_temp(".csv", &format!("{HEADER}\n5,2012,Ost,2,0.9,0.5,0,0,1\n"));
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not a whole number"), "{err:#}");
    }

    #[test]
    fn test_load_json_accepts_whole_number_floats() {
        let file = write_temp(
            ".json",
            r#"[{"ID": 1, "Belegungsjahr": 2013.0, "Quartiersgruppe Name": "Ost", "WGM": "3",
                 "Dichte": 0.5, "Wechsel": 1.0, "Ueberbelegung": 0, "Anz_Kinder": 3.0}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.records[0].year, 2013);
        assert_eq!(ds.records[0].turnover, 1);
        assert_eq!(ds.records[0].children, 3);
    }

    #[test]
    fn test_load_json() {
        let file = write_temp(
            ".json",
            r#"[{"ID": 1, "Belegungsjahr": 2013, "Quartiersgruppe Name": "Ost", "WGM": "3",
                 "Dichte": 0.5, "Wechsel": 0, "Ueberbelegung": 0, "Anz_Kinder": 0}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].rooms, RoomBucket::Three);
    }

    #[test]
    fn test_load_json_rejects_negative_density() {
        let file = write_temp(
            ".json",
            r#"[{"ID": "x", "Belegungsjahr": 2013, "Quartiersgruppe Name": "Ost", "WGM": "3",
                 "Dichte": -1.0, "Wechsel": 0, "Ueberbelegung": 0, "Anz_Kinder": 0}]"#,
        );
        assert!(load_file(file.path()).is_err());
    }

    #[test]
    fn test_load_parquet() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("ID", DataType::Int64, false),
            Field::new("Belegungsjahr", DataType::Int32, false),
            Field::new("Quartiersgruppe Name", DataType::Utf8, false),
            Field::new("WGM", DataType::Utf8, false),
            Field::new("Dichte", DataType::Float64, false),
            Field::new("Wechsel", DataType::Float64, false),
            Field::new("Ueberbelegung", DataType::Int64, false),
            Field::new("Anz_Kinder", DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![7, 8])),
                Arc::new(Int32Array::from(vec![2011, 2018])),
                Arc::new(StringArray::from(vec!["West", "Ost"])),
                Arc::new(StringArray::from(vec!["1", "6+"])),
                Arc::new(Float64Array::from(vec![1.0, 0.6])),
                Arc::new(Float64Array::from(vec![0.0, 1.0])),
                Arc::new(Int64Array::from(vec![0, 0])),
                Arc::new(Int64Array::from(vec![0, 2])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].id, "7");
        assert_eq!(ds.records[1].rooms, RoomBucket::SixPlus);
        assert_eq!(ds.records[1].turnover, 1);
        assert_eq!(ds.records[1].children, 2);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
