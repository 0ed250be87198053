use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int16Array, Int32Array, Int64Array,
    StringArray, UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, RankingDataset, RankingRecord};

/// Required source columns, checked before any row is parsed.
pub const REQUIRED_COLUMNS: [&str; 4] = ["institution", "country", "world_rank", "year"];

// ---------------------------------------------------------------------------
// Schema validation errors
// ---------------------------------------------------------------------------

/// Data-validation failures raised at load time. The loader never attempts
/// partial recovery; the first bad row aborts the load.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: '{column}' is empty")]
    EmptyField { row: usize, column: &'static str },
    #[error("row {row}: '{column}' value '{value}' cannot be coerced to an integer")]
    NotAnInteger {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("row {row}: world_rank must be ≥ 1, got {value}")]
    RankOutOfRange { row: usize, value: i64 },
    #[error("file contains no data rows")]
    Empty,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a ranking table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – Parquet file with flat columns (recommended)
/// * `.json`    – `[{ "institution": ..., "country": ..., ...extra }, ...]`
/// * `.csv`     – header row naming the columns
pub fn load_file(path: &Path) -> Result<RankingDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn finish(records: Vec<RankingRecord>) -> Result<RankingDataset> {
    RankingDataset::from_records(records).ok_or_else(|| SchemaError::Empty.into())
}

// ---------------------------------------------------------------------------
// Integer coercion
// ---------------------------------------------------------------------------

/// Sources routinely carry `year` (and sometimes `world_rank`) as a float or
/// a string; accept those as long as they denote a whole number.
fn coerce_int(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() => Some(f as i64),
        _ => None,
    }
}

fn require_int(s: &str, row: usize, column: &'static str) -> Result<i64, SchemaError> {
    coerce_int(s).ok_or_else(|| SchemaError::NotAnInteger {
        row,
        column,
        value: s.to_string(),
    })
}

fn require_rank(value: i64, row: usize) -> Result<u32, SchemaError> {
    if value < 1 {
        return Err(SchemaError::RankOutOfRange { row, value });
    }
    Ok(value as u32)
}

fn require_nonempty(s: &str, row: usize, column: &'static str) -> Result<String, SchemaError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SchemaError::EmptyField { row, column });
    }
    Ok(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "institution": "Harvard University",
///     "country": "United States",
///     "world_rank": 1,
///     "year": 2020,
///     "score": 98.6
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<RankingDataset> {
    /// One row as it arrives on disk; `world_rank` and `year` stay untyped
    /// until coercion, and unknown columns collect into `extra`.
    #[derive(Deserialize)]
    struct RawRecord {
        institution: String,
        country: String,
        world_rank: JsonValue,
        year: JsonValue,
        #[serde(flatten)]
        extra: BTreeMap<String, JsonValue>,
    }

    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let rows: Vec<RawRecord> = serde_json::from_str(&text)
        .context("parsing JSON (expected an array of ranking objects)")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, raw) in rows.into_iter().enumerate() {
        let institution = require_nonempty(&raw.institution, i, "institution")?;
        let country = require_nonempty(&raw.country, i, "country")?;
        let world_rank = require_rank(json_int(&raw.world_rank, i, "world_rank")?, i)?;
        let year = json_int(&raw.year, i, "year")? as i32;

        let extra = raw
            .extra
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();

        records.push(RankingRecord {
            institution,
            country,
            world_rank,
            year,
            extra,
        });
    }

    finish(records)
}

fn json_int(val: &JsonValue, row: usize, column: &'static str) -> Result<i64, SchemaError> {
    match val {
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(f as i64),
                _ => Err(SchemaError::NotAnInteger {
                    row,
                    column,
                    value: n.to_string(),
                }),
            }
        }
        JsonValue::String(s) => require_int(s, row, column),
        other => Err(SchemaError::NotAnInteger {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; `institution`, `country`,
/// `world_rank` and `year` are required, all other columns pass through.
fn load_csv(path: &Path) -> Result<RankingDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut required_idx = [0usize; 4];
    for (slot, col) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == col)
            .ok_or(SchemaError::MissingColumn(col))?;
    }
    let [inst_idx, country_idx, rank_idx, year_idx] = required_idx;

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let institution = require_nonempty(row.get(inst_idx).unwrap_or(""), row_no, "institution")?;
        let country = require_nonempty(row.get(country_idx).unwrap_or(""), row_no, "country")?;
        let world_rank = require_rank(
            require_int(row.get(rank_idx).unwrap_or(""), row_no, "world_rank")?,
            row_no,
        )?;
        let year = require_int(row.get(year_idx).unwrap_or(""), row_no, "year")? as i32;

        let mut extra = BTreeMap::new();
        for (col_idx, value) in row.iter().enumerate() {
            if required_idx.contains(&col_idx) {
                continue;
            }
            let col_name = &headers[col_idx];
            extra.insert(col_name.clone(), guess_cell_type(value));
        }

        records.push(RankingRecord {
            institution,
            country,
            world_rank,
            year,
            extra,
        });
    }

    finish(records)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing a flat ranking table.
///
/// Expected schema:
/// - `institution`, `country`: Utf8
/// - `world_rank`, `year`: any integer type, or a float holding whole numbers
/// - Any other columns pass through as extras (strings, ints, floats, bools)
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<RankingDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_base = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let n_rows = batch.num_rows();

        let mut required_idx = [0usize; 4];
        for (slot, col) in required_idx.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = schema
                .index_of(col)
                .map_err(|_| SchemaError::MissingColumn(col))?;
        }
        let [inst_idx, country_idx, rank_idx, year_idx] = required_idx;

        // Pass-through column indices (everything except the required four)
        let extra_cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| !required_idx.contains(i))
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..n_rows {
            let row_no = row_base + row;

            let institution = require_nonempty(
                extract_str(batch.column(inst_idx), row)
                    .with_context(|| format!("Row {row_no}: failed to read 'institution'"))?,
                row_no,
                "institution",
            )?;
            let country = require_nonempty(
                extract_str(batch.column(country_idx), row)
                    .with_context(|| format!("Row {row_no}: failed to read 'country'"))?,
                row_no,
                "country",
            )?;
            let world_rank = require_rank(
                extract_int(batch.column(rank_idx), row, row_no, "world_rank")?,
                row_no,
            )?;
            let year = extract_int(batch.column(year_idx), row, row_no, "year")? as i32;

            let mut extra = BTreeMap::new();
            for (col_idx, col_name) in &extra_cols {
                let value = extract_cell_value(batch.column(*col_idx), row);
                extra.insert(col_name.clone(), value);
            }

            records.push(RankingRecord {
                institution,
                country,
                world_rank,
                year,
                extra,
            });
        }

        row_base += n_rows;
    }

    finish(records)
}

// -- Parquet / Arrow helpers --

/// Extract a string from a Utf8 or LargeUtf8 column at the given row.
fn extract_str(col: &Arc<dyn Array>, row: usize) -> Result<&str> {
    if col.is_null(row) {
        return Ok("");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row))
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row)),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

/// Extract an integer from any integer column, or a float column holding a
/// whole number, or a numeric string column.
fn extract_int(
    col: &Arc<dyn Array>,
    row: usize,
    row_no: usize,
    column: &'static str,
) -> Result<i64> {
    if col.is_null(row) {
        return Err(SchemaError::EmptyField {
            row: row_no,
            column,
        }
        .into());
    }

    let not_an_integer = |value: String| SchemaError::NotAnInteger {
        row: row_no,
        column,
        value,
    };

    match col.data_type() {
        DataType::Int16 => {
            let arr = col.as_any().downcast_ref::<Int16Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::UInt16 => {
            let arr = col.as_any().downcast_ref::<UInt16Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        DataType::UInt32 => {
            let arr = col.as_any().downcast_ref::<UInt32Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        DataType::UInt64 => {
            let arr = col.as_any().downcast_ref::<UInt64Array>().unwrap();
            Ok(arr.value(row) as i64)
        }
        DataType::Float32 => {
            let v = col.as_any().downcast_ref::<Float32Array>().unwrap().value(row) as f64;
            if v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(not_an_integer(v.to_string()).into())
            }
        }
        DataType::Float64 => {
            let v = col.as_any().downcast_ref::<Float64Array>().unwrap().value(row);
            if v.fract() == 0.0 && v.is_finite() {
                Ok(v as i64)
            } else {
                Err(not_an_integer(v.to_string()).into())
            }
        }
        DataType::Utf8 | DataType::LargeUtf8 => {
            let s = extract_str(col, row)?;
            require_int(s, row_no, column).map_err(Into::into)
        }
        other => Err(not_an_integer(format!("{other:?}")).into()),
    }
}

/// Extract a single pass-through value from an Arrow column at a given row.
fn extract_cell_value(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(s) = col.as_any().downcast_ref::<StringArray>() {
                CellValue::String(s.value(row).to_string())
            } else {
                // LargeStringArray
                let s = col.as_string::<i64>();
                CellValue::String(s.value(row).to_string())
            }
        }
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            CellValue::Bool(arr.value(row))
        }
        _ => CellValue::String(format!("{:?}", col.data_type())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn csv_roundtrip_with_extras_and_float_year() {
        let (_dir, path) = write_temp(
            "rankings.csv",
            "institution,country,world_rank,year,score\n\
             Harvard University,United States,1,2020.0,98.6\n\
             University of Oxford,United Kingdom,2,2020,97.1\n",
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].year, 2020);
        assert_eq!(ds.records[0].world_rank, 1);
        assert_eq!(ds.year_range, (2020, 2020));
        assert_eq!(ds.extra_columns, vec!["score".to_string()]);
        assert_eq!(
            ds.records[1].extra.get("score"),
            Some(&CellValue::Float(97.1))
        );
    }

    #[test]
    fn csv_missing_required_column_fails() {
        let (_dir, path) = write_temp(
            "rankings.csv",
            "institution,country,year\nHarvard,United States,2020\n",
        );
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("world_rank"), "{err:#}");
    }

    #[test]
    fn csv_bad_year_fails() {
        let (_dir, path) = write_temp(
            "rankings.csv",
            "institution,country,world_rank,year\nHarvard,United States,1,soon\n",
        );
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("coerced"), "{err:#}");
    }

    #[test]
    fn csv_rank_below_one_fails() {
        let (_dir, path) = write_temp(
            "rankings.csv",
            "institution,country,world_rank,year\nHarvard,United States,0,2020\n",
        );
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn csv_empty_file_fails() {
        let (_dir, path) = write_temp("rankings.csv", "institution,country,world_rank,year\n");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("no data rows"), "{err:#}");
    }

    #[test]
    fn json_with_string_year_and_null_extra() {
        let (_dir, path) = write_temp(
            "rankings.json",
            r#"[
              {"institution": "ETH Zürich", "country": "Switzerland",
               "world_rank": 6, "year": "2019", "motto": null},
              {"institution": "EPFL", "country": "Switzerland",
               "world_rank": 14, "year": 2019, "motto": "..."}
            ]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].year, 2019);
        assert_eq!(ds.records[0].extra.get("motto"), Some(&CellValue::Null));
    }

    #[test]
    fn json_fractional_year_fails() {
        let (_dir, path) = write_temp(
            "rankings.json",
            r#"[{"institution": "X", "country": "Y", "world_rank": 1, "year": 2020.5}]"#,
        );
        assert!(load_file(&path).is_err());
    }

    #[test]
    fn unsupported_extension_fails() {
        let (_dir, path) = write_temp("rankings.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported"), "{err:#}");
    }
}
