use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt32Type, UInt64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DashboardError, DashboardResult};
use super::model::*;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a drug dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the drug columns (the primary source)
/// * `.json`    – `[{ "drug_name": ..., "rating": ..., ... }, ...]`
/// * `.parquet` – one column per field, as written by Pandas or Polars
///
/// Any failure is reported as [`DashboardError::DataLoad`]. Malformed
/// individual cells are not failures: they load as missing values.
pub fn load_file(path: &Path) -> DashboardResult<DrugDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let loaded = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(anyhow::anyhow!("Unsupported file extension: .{other}")),
    };

    loaded.map_err(|e| DashboardError::data_load(path, &e))
}

// ---------------------------------------------------------------------------
// Raw cells and record assembly
// ---------------------------------------------------------------------------

/// A source cell before it is interpreted against the drug schema.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

/// Fail unless every required column is present.
fn check_required_columns(present: &BTreeSet<&str>) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !present.contains(col))
        .collect();
    if !missing.is_empty() {
        bail!("missing required column(s): {}", missing.join(", "));
    }
    for col in OPTIONAL_COLUMNS {
        if !present.contains(col) {
            log::debug!("optional column '{col}' absent, every record gets N/A");
        }
    }
    Ok(())
}

/// Where a row sits in its source, 1-based, for warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowLocation {
    /// Physical line of a CSV file, header included.
    Line(u64),
    /// Position among the records of a JSON array or Parquet file.
    Record(usize),
}

impl RowLocation {
    fn csv(row: &csv::StringRecord, index: usize) -> Self {
        // Header is line 1, so the first data row is line 2.
        RowLocation::Line(row.position().map_or(index as u64 + 2, |p| p.line()))
    }
}

impl fmt::Display for RowLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLocation::Line(n) => write!(f, "line {n}"),
            RowLocation::Record(n) => write!(f, "record {n}"),
        }
    }
}

/// Build a typed record from a row, given a cell lookup by column name.
fn build_record(row: RowLocation, mut cell: impl FnMut(&str) -> RawCell) -> DrugRecord {
    DrugRecord {
        drug_name: to_text(cell(COL_DRUG_NAME)),
        generic_name: to_text(cell(COL_GENERIC_NAME)),
        medical_condition: to_text(cell(COL_MEDICAL_CONDITION)),
        side_effects: to_text(cell(COL_SIDE_EFFECTS)),
        rating: to_rating(cell(COL_RATING), row),
        no_of_reviews: to_review_count(cell(COL_NO_OF_REVIEWS), row),
        csa: to_text(cell(COL_CSA)),
        drug_link: to_text(cell(COL_DRUG_LINK)),
        medical_condition_url: to_text(cell(COL_MEDICAL_CONDITION_URL)),
    }
}

fn to_text(cell: RawCell) -> Option<String> {
    match cell {
        RawCell::Text(s) if s.is_empty() => None,
        RawCell::Text(s) => Some(s),
        RawCell::Integer(i) => Some(i.to_string()),
        RawCell::Float(f) if f.is_nan() => None,
        RawCell::Float(f) => Some(f.to_string()),
        RawCell::Null => None,
    }
}

fn to_rating(cell: RawCell, row: RowLocation) -> Option<f64> {
    let value = match cell {
        RawCell::Null => return None,
        RawCell::Integer(i) => i as f64,
        RawCell::Float(f) => f,
        RawCell::Text(s) => match s.trim().parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("{row}: rating '{s}' is not a number, treating as missing");
                return None;
            }
        },
    };
    value.is_finite().then_some(value)
}

fn to_review_count(cell: RawCell, row: RowLocation) -> Option<u64> {
    let parsed = match cell {
        RawCell::Null => return None,
        RawCell::Integer(i) => u64::try_from(i).ok(),
        // Pandas writes integer columns as floats once they hold a NaN.
        RawCell::Float(f) if f.is_nan() => return None,
        RawCell::Float(f) => (f >= 0.0 && f.fract() == 0.0).then_some(f as u64),
        RawCell::Text(ref s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            })
        }
    };
    if parsed.is_none() {
        log::warn!("{row}: no_of_reviews {cell:?} is not a non-negative integer, treating as missing");
    }
    parsed
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one drug per line.
/// Empty cells and cells missing from short rows load as missing values.
fn load_csv(path: &Path) -> Result<DrugDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let present: BTreeSet<&str> = headers.iter().map(String::as_str).collect();
    check_required_columns(&present)?;

    let index: BTreeMap<&str, usize> = ALL_COLUMNS
        .iter()
        .filter_map(|col| headers.iter().position(|h| h == col).map(|i| (*col, i)))
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV record {}", row_no + 1))?;
        records.push(build_record(RowLocation::csv(&row, row_no), |col| {
            match index.get(col).and_then(|&i| row.get(i)) {
                Some(value) if !value.is_empty() => RawCell::Text(value.to_string()),
                _ => RawCell::Null,
            }
        }));
    }

    log::debug!("parsed {} CSV rows from {}", records.len(), path.display());
    Ok(DrugDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "drug_name": "doxycycline", "medical_condition": "Acne", "rating": 6.8, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<DrugDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let objects = rows
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    if !objects.is_empty() {
        let present: BTreeSet<&str> = objects
            .iter()
            .flat_map(|obj| obj.keys().map(String::as_str))
            .collect();
        check_required_columns(&present)?;
    }

    let records = objects
        .iter()
        .enumerate()
        .map(|(i, obj)| {
            build_record(RowLocation::Record(i + 1), |col| {
                obj.get(col).map_or(RawCell::Null, json_to_cell)
            })
        })
        .collect();

    Ok(DrugDataset::from_records(records))
}

fn json_to_cell(val: &JsonValue) -> RawCell {
    match val {
        JsonValue::String(s) => RawCell::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                RawCell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                RawCell::Float(f)
            } else {
                RawCell::Text(n.to_string())
            }
        }
        JsonValue::Null => RawCell::Null,
        other => RawCell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per drug field.
///
/// Text columns may be Utf8 or LargeUtf8, numeric columns any integer or
/// float width. Other column types are rendered to text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<DrugDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let present: BTreeSet<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    check_required_columns(&present)?;

    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: BTreeMap<&str, &Arc<dyn Array>> = ALL_COLUMNS
            .iter()
            .filter_map(|col| {
                schema
                    .index_of(col)
                    .ok()
                    .map(|i| (*col, batch.column(i)))
            })
            .collect();

        for row in 0..batch.num_rows() {
            let location = RowLocation::Record(records.len() + 1);
            records.push(build_record(location, |col| {
                columns
                    .get(col)
                    .map_or(RawCell::Null, |array| extract_cell(array, row))
            }));
        }
    }

    Ok(DrugDataset::from_records(records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> RawCell {
    if col.is_null(row) {
        return RawCell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => RawCell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => RawCell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => RawCell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => RawCell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt32 => RawCell::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => i64::try_from(col.as_primitive::<UInt64Type>().value(row))
            .map_or(RawCell::Null, RawCell::Integer),
        DataType::Float32 => RawCell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => RawCell::Float(col.as_primitive::<Float64Type>().value(row)),
        other => match array_value_to_string(col.as_ref(), row) {
            Ok(s) => RawCell::Text(s),
            Err(e) => {
                log::warn!("batch row {}: cannot render {other:?} cell ({e}), treating as missing", row + 1);
                RawCell::Null
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "drug_name,generic_name,medical_condition,side_effects,rating,no_of_reviews,csa,drug_link,medical_condition_url";

    fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_with_missing_cells() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             doxycycline,doxycycline,Acne,\"hives; difficult breathing\",6.8,760,N,https://www.drugs.com/doxycycline.html,https://www.drugs.com/condition/acne.html\n\
             spironolactone,spironolactone,Acne,,7.2,449.0,,,\n"
        );
        let path = write_file(&dir, "drugs.csv", &csv);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.drug_name.as_deref(), Some("doxycycline"));
        assert_eq!(first.side_effects.as_deref(), Some("hives; difficult breathing"));
        assert_eq!(first.rating, Some(6.8));
        assert_eq!(first.no_of_reviews, Some(760));
        assert_eq!(first.csa.as_deref(), Some("N"));

        let second = &ds.records[1];
        assert_eq!(second.side_effects, None);
        assert_eq!(second.no_of_reviews, Some(449));
        assert_eq!(second.csa, None);
        assert_eq!(second.drug_link, None);
    }

    #[test]
    fn malformed_numeric_cells_become_missing() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!("{HEADER}\nA,a,Pain,x,great,-3,,,\n");
        let path = write_file(&dir, "drugs.csv", &csv);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].rating, None);
        assert_eq!(ds.records[0].no_of_reviews, None);
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let dir = tempfile::tempdir().unwrap();
        let csv = "drug_name,generic_name,medical_condition,side_effects,rating,no_of_reviews\n\
                   A,a,Pain,x,5,1\n";
        let path = write_file(&dir, "drugs.csv", csv);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].csa, None);
        assert_eq!(ds.records[0].medical_condition_url, None);
    }

    #[test]
    fn missing_required_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "drugs.csv", "drug_name,rating\nA,5\n");

        let err = load_file(&path).unwrap_err();
        match err {
            DashboardError::DataLoad { reason, .. } => {
                assert!(reason.contains("medical_condition"), "{reason}");
                assert!(reason.contains("no_of_reviews"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, DashboardError::DataLoad { .. }));
    }

    #[test]
    fn unsupported_extension_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "drugs.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let json = r#"[
            {"drug_name": "Aspirin", "generic_name": "aspirin", "medical_condition": "Pain",
             "side_effects": "Nausea;Headache", "rating": 5, "no_of_reviews": 5, "csa": null},
            {"drug_name": "Aspirin", "generic_name": "aspirin", "medical_condition": "Pain",
             "side_effects": "Headache", "rating": 9.5, "no_of_reviews": 10.0}
        ]"#;
        let path = write_file(&dir, "drugs.json", json);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].rating, Some(5.0));
        assert_eq!(ds.records[0].csa, None);
        assert_eq!(ds.records[1].no_of_reviews, Some(10));
    }

    #[test]
    fn json_without_required_keys_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "drugs.json", r#"[{"drug_name": "A"}]"#);
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn short_csv_rows_pad_with_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let csv = format!(
            "{HEADER}\n\
             A,a,Pain,x,5,1\n\
             B,b,Acne,y,7,2,N,https://www.drugs.com/b.html,https://www.drugs.com/condition/acne.html\n"
        );
        let path = write_file(&dir, "drugs.csv", &csv);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        let short = &ds.records[0];
        assert_eq!(short.drug_name.as_deref(), Some("A"));
        assert_eq!(short.no_of_reviews, Some(1));
        assert_eq!(short.csa, None);
        assert_eq!(short.drug_link, None);
        assert_eq!(short.medical_condition_url, None);
        assert_eq!(ds.records[1].csa.as_deref(), Some("N"));
    }

    #[test]
    fn csv_rows_are_located_by_file_line() {
        let data = format!("{HEADER}\nA,a,Pain,x,5,1\nB,b,Acne,y,7,2\n");
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(data.as_bytes());
        let locations: Vec<String> = reader
            .records()
            .enumerate()
            .map(|(i, row)| RowLocation::csv(&row.unwrap(), i).to_string())
            .collect();
        assert_eq!(locations, ["line 2", "line 3"]);
        assert_eq!(RowLocation::Record(1).to_string(), "record 1");
    }

    fn write_parquet(path: &std::path::Path, with_required: bool) {
        use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let text = |values: &[Option<&str>]| -> ArrayRef { Arc::new(StringArray::from(values.to_vec())) };
        let mut fields = vec![
            Field::new("drug_name", DataType::Utf8, true),
            Field::new("generic_name", DataType::Utf8, true),
            Field::new("medical_condition", DataType::Utf8, true),
            Field::new("side_effects", DataType::Utf8, true),
            Field::new("rating", DataType::Float64, true),
        ];
        let mut columns = vec![
            text(&[Some("Aspirin"), Some("Ibuprofen")]),
            text(&[Some("aspirin"), Some("ibuprofen")]),
            text(&[Some("Pain"), None]),
            text(&[Some("Nausea;Headache"), Some("Headache")]),
            Arc::new(Float64Array::from(vec![Some(7.5), None])) as ArrayRef,
        ];
        if with_required {
            fields.push(Field::new("no_of_reviews", DataType::Int64, true));
            columns.push(Arc::new(Int64Array::from(vec![Some(12), Some(3)])));
        }

        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn loads_parquet_with_nulls_and_absent_optional_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drugs.parquet");
        write_parquet(&path, true);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);

        let first = &ds.records[0];
        assert_eq!(first.drug_name.as_deref(), Some("Aspirin"));
        assert_eq!(first.side_effects.as_deref(), Some("Nausea;Headache"));
        assert_eq!(first.rating, Some(7.5));
        assert_eq!(first.no_of_reviews, Some(12));
        assert_eq!(first.csa, None);
        assert_eq!(first.drug_link, None);

        let second = &ds.records[1];
        assert_eq!(second.medical_condition, None);
        assert_eq!(second.rating, None);
        assert_eq!(second.no_of_reviews, Some(3));
    }

    #[test]
    fn parquet_without_required_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drugs.parquet");
        write_parquet(&path, false);

        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("no_of_reviews"), "{err}");
    }
}
