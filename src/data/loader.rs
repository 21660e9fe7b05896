use std::fmt;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{CellValue, Dataset, RawTable};
use super::schema::{SchemaError, validate};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file format (expected CSV, XLSX, Parquet or JSON)")]
    UnsupportedFormat,

    #[error("failed to decode {format} data: {message}")]
    Decode { format: Format, message: String },

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("reading file: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, decode and validate a score table from a file.
///
/// The format is sniffed from the file content; the extension only decides
/// between the two text formats (CSV / JSON).
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let bytes = std::fs::read(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    load_bytes(&bytes, ext.as_deref())
}

/// Decode and validate an in-memory upload.
pub fn load_bytes(bytes: &[u8], extension_hint: Option<&str>) -> Result<Dataset, LoadError> {
    let format = Format::sniff(bytes, extension_hint).ok_or(LoadError::UnsupportedFormat)?;
    let decoder = decoder_for(format);
    let table = decoder.decode(bytes).map_err(|e| LoadError::Decode {
        format,
        message: format!("{e:#}"),
    })?;
    log::debug!(
        "decoded {} rows with columns {:?} as {}",
        table.rows.len(),
        table.columns,
        decoder.format()
    );
    Ok(validate(table)?)
}

// ---------------------------------------------------------------------------
// Format detection
// ---------------------------------------------------------------------------

/// Supported input formats. The extensions are what the file dialog offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xlsx,
    Parquet,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Csv => "CSV",
            Format::Xlsx => "XLSX",
            Format::Parquet => "Parquet",
            Format::Json => "JSON",
        };
        f.write_str(name)
    }
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const PARQUET_MAGIC: &[u8] = b"PAR1";

impl Format {
    pub const ALL: [Format; 4] = [Format::Csv, Format::Xlsx, Format::Parquet, Format::Json];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Csv => &["csv"],
            Format::Xlsx => &["xlsx"],
            Format::Parquet => &["parquet", "pq"],
            Format::Json => &["json"],
        }
    }

    /// Decide the format from the first bytes of the content.
    ///
    /// * `PK\x03\x04` (zip container) → XLSX
    /// * `PAR1` → Parquet
    /// * UTF-8 text starting with `[` (or declared `.json`) → JSON
    /// * any other UTF-8 text → CSV
    pub fn sniff(bytes: &[u8], extension_hint: Option<&str>) -> Option<Self> {
        if bytes.starts_with(ZIP_MAGIC) {
            return Some(Format::Xlsx);
        }
        if bytes.starts_with(PARQUET_MAGIC) {
            return Some(Format::Parquet);
        }
        let text = std::str::from_utf8(bytes).ok()?;
        let first = text.trim_start_matches('\u{feff}').trim_start().chars().next();
        if first == Some('[') || extension_hint == Some("json") {
            Some(Format::Json)
        } else {
            Some(Format::Csv)
        }
    }
}

// ---------------------------------------------------------------------------
// Decoders
// ---------------------------------------------------------------------------

/// Turns the raw bytes of one format into a [`RawTable`].
pub trait TableDecoder {
    fn format(&self) -> Format;
    fn decode(&self, bytes: &[u8]) -> Result<RawTable>;
}

pub fn decoder_for(format: Format) -> Box<dyn TableDecoder> {
    match format {
        Format::Csv => Box::new(CsvDecoder),
        Format::Xlsx => Box::new(XlsxDecoder),
        Format::Parquet => Box::new(ParquetDecoder),
        Format::Json => Box::new(JsonDecoder),
    }
}

// -- CSV --

/// Header row with column names, one record per line. Cells are kept as
/// text (empty cells become `Null`); numeric coercion happens in validation.
/// Short rows are padded with `Null`, rows longer than the header are an error.
pub struct CsvDecoder;

impl TableDecoder for CsvDecoder {
    fn format(&self) -> Format {
        Format::Csv
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);
        let columns: Vec<String> = reader
            .headers()
            .context("reading CSV headers")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut table = RawTable::new(columns);
        for (row_no, result) in reader.records().enumerate() {
            let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
            if record.len() > table.columns.len() {
                bail!(
                    "CSV row {}: expected {} fields, found {}",
                    row_no + 1,
                    table.columns.len(),
                    record.len()
                );
            }
            table.push_row(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Null
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect(),
            );
        }
        Ok(table)
    }
}

// -- XLSX --

/// First worksheet of the workbook; its first row is the header.
pub struct XlsxDecoder;

impl TableDecoder for XlsxDecoder {
    fn format(&self) -> Format {
        Format::Xlsx
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut workbook: Xlsx<_> =
            open_workbook_from_rs(Cursor::new(bytes.to_vec())).context("opening XLSX workbook")?;
        let range = workbook
            .worksheet_range_at(0)
            .context("workbook has no worksheets")?
            .context("reading first worksheet")?;

        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(RawTable::default());
        };
        let columns = header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::String(s) => s.clone(),
                Data::Empty => format!("Unnamed: {i}"),
                other => other.to_string(),
            })
            .collect();

        let mut table = RawTable::new(columns);
        for row in rows {
            if row.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            table.push_row(row.iter().map(xlsx_cell).collect());
        }
        Ok(table)
    }
}

fn xlsx_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(_) | Data::DateTimeIso(_) => CellValue::Date(cell.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

// -- Parquet --

/// Flat Parquet file with scalar columns, as written by
/// `df.to_parquet()` (Pandas) or `df.write_parquet()` (Polars).
pub struct ParquetDecoder;

impl TableDecoder for ParquetDecoder {
    fn format(&self) -> Format {
        Format::Parquet
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes::Bytes::copy_from_slice(bytes))
            .context("reading parquet metadata")?;
        let columns = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        let reader = builder.build().context("building parquet reader")?;

        let mut table = RawTable::new(columns);
        for batch_result in reader {
            let batch = batch_result.context("reading parquet record batch")?;
            for row in 0..batch.num_rows() {
                table.push_row(
                    batch
                        .columns()
                        .iter()
                        .map(|col| arrow_cell(col, row))
                        .collect(),
                );
            }
        }
        Ok(table)
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => {
            CellValue::Date(array_value_to_string(col, row).unwrap_or_default())
        }
        // Remaining integer widths, decimals, ... : their text form still
        // parses as a number during validation.
        _ => match array_value_to_string(col, row) {
            Ok(s) => CellValue::Text(s),
            Err(_) => CellValue::Null,
        },
    }
}

// -- JSON --

/// Records-oriented JSON (the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "name": "Kate", "score": 92 },
///   { "name": "Peter", "score": 58, "class": "B" }
/// ]
/// ```
///
/// Columns appear in first-seen order, keys in document order.
pub struct JsonDecoder;

impl TableDecoder for JsonDecoder {
    fn format(&self) -> Format {
        Format::Json
    }

    fn decode(&self, bytes: &[u8]) -> Result<RawTable> {
        let root: JsonValue = serde_json::from_slice(bytes).context("parsing JSON")?;
        let records = root.as_array().context("Expected top-level JSON array")?;

        let objects = records
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                rec.as_object()
                    .with_context(|| format!("Row {} is not a JSON object", i + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut columns: Vec<String> = Vec::new();
        for obj in &objects {
            for key in obj.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }

        let mut table = RawTable::new(columns);
        for obj in objects {
            let row = table
                .columns
                .iter()
                .map(|col| obj.get(col).map_or(CellValue::Null, json_to_cell))
                .collect();
            table.push_row(row);
        }
        Ok(table)
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}
