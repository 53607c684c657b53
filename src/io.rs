//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Workbench.
//! The Workbench project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Batch file codecs for the three warehouse formats.
//!
//! - CSV: header row, cells typed on read (empty → null, integers, floats,
//!   `true`/`false`, otherwise string). Append mode adds rows to an existing
//!   file without repeating the header.
//! - JSONL: one object per row, keys in column order.
//! - Parquet: schema inferred from the values and embedded in the file.
//!
//! CSV and Parquet are behind the `csv` and `parquet` features; calling them
//! in a build without the feature fails with `MissingDependency`.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{Result, WbError};
use crate::table::{WbRecord, WbTable};
use crate::warehouse::dataset::WbFormat;

/// How a CSV batch treats an existing target file.
///
/// JSONL and Parquet always write a fresh file regardless of mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WbWriteMode {
    /// Append rows; the header is written only when the file is new.
    #[default]
    Append,
    /// Truncate and write with a header.
    Overwrite,
}

/// Format-dispatching façade over the batch codecs.
pub struct WbIO;

impl WbIO {
    /// Loads one batch file.
    pub fn load(path: impl AsRef<Path>, format: WbFormat) -> Result<WbTable> {
        format.ensure_available()?;
        match format {
            WbFormat::Csv => Self::_load_csv(path.as_ref()),
            WbFormat::Jsonl => Self::load_jsonl(path),
            WbFormat::Parquet => Self::_load_parquet(path.as_ref()),
        }
    }

    /// Loads a file, inferring the format from its extension.
    pub fn load_auto(path: impl AsRef<Path>) -> Result<WbTable> {
        let format = WbFormat::from_path(&path).ok_or_else(|| {
            WbError::UnsupportedFormat(path.as_ref().display().to_string())
        })?;
        Self::load(path, format)
    }

    /// Writes one batch file.
    pub fn write(
        path: impl AsRef<Path>,
        format: WbFormat,
        table: &WbTable,
        mode: WbWriteMode,
    ) -> Result<()> {
        format.ensure_available()?;
        match format {
            WbFormat::Csv => Self::_write_csv(path.as_ref(), table, mode),
            WbFormat::Jsonl => Self::write_jsonl(path, table),
            WbFormat::Parquet => Self::_write_parquet(path.as_ref(), table),
        }
    }

    /// Writes a file, inferring the format from its extension. CSV output
    /// overwrites.
    pub fn write_auto(path: impl AsRef<Path>, table: &WbTable) -> Result<()> {
        let format = WbFormat::from_path(&path).ok_or_else(|| {
            WbError::UnsupportedFormat(path.as_ref().display().to_string())
        })?;
        Self::write(path, format, table, WbWriteMode::Overwrite)
    }

    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<WbTable> {
        let file = File::open(path)?;
        Self::load_jsonl_reader(BufReader::new(file))
    }

    /// Reads JSONL from any buffered reader. Blank lines are skipped and
    /// every other line must be a JSON object.
    pub fn load_jsonl_reader<R: BufRead>(reader: R) -> Result<WbTable> {
        let records = reader
            .lines()
            .enumerate()
            .filter_map(|(idx, line)| match line {
                Ok(content) if content.trim().is_empty() => None,
                Ok(content) => Some(_parse_record(&content, idx + 1)),
                Err(err) => Some(Err(err.into())),
            })
            .collect::<Result<Vec<WbRecord>>>()?;
        Ok(WbTable::from_records(records))
    }

    pub fn write_jsonl(path: impl AsRef<Path>, table: &WbTable) -> Result<()> {
        let file = File::create(path)?;
        Self::write_jsonl_writer(BufWriter::new(file), table)
    }

    /// Writes one JSON object per row to any output supporting [`Write`].
    pub fn write_jsonl_writer<W: Write>(mut writer: W, table: &WbTable) -> Result<()> {
        for record in table.to_records() {
            serde_json::to_writer(&mut writer, &record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    #[cfg(feature = "csv")]
    fn _load_csv(path: &Path) -> Result<WbTable> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;
        Self::load_csv_reader(reader)
    }

    #[cfg(not(feature = "csv"))]
    fn _load_csv(_path: &Path) -> Result<WbTable> {
        Err(WbError::missing_dependency("csv", "csv"))
    }

    /// Decodes CSV rows with per-cell type inference. Short rows are padded
    /// with nulls; long rows are rejected.
    #[cfg(feature = "csv")]
    pub fn load_csv_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<WbTable> {
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = WbTable::new(columns);

        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            let width = table.columns().len();
            if record.len() > width {
                return Err(WbError::schema(format!(
                    "csv row {}: {} fields but header has {}",
                    idx + 1,
                    record.len(),
                    width
                )));
            }
            let mut row: Vec<Value> = record.iter().map(_infer_cell).collect();
            row.resize(width, Value::Null);
            table.push_row(row)?;
        }

        Ok(table)
    }

    #[cfg(feature = "csv")]
    fn _write_csv(path: &Path, table: &WbTable, mode: WbWriteMode) -> Result<()> {
        let appending = mode == WbWriteMode::Append && path.exists();
        let file = if appending {
            std::fs::OpenOptions::new().append(true).open(path)?
        } else {
            File::create(path)?
        };

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        if !appending && !table.columns().is_empty() {
            writer.write_record(table.columns())?;
        }
        for row in table.rows() {
            writer.write_record(row.iter().map(_render_cell))?;
        }

        writer.flush()?;
        Ok(())
    }

    #[cfg(not(feature = "csv"))]
    fn _write_csv(_path: &Path, _table: &WbTable, _mode: WbWriteMode) -> Result<()> {
        Err(WbError::missing_dependency("csv", "csv"))
    }

    #[cfg(feature = "parquet")]
    fn _load_parquet(path: &Path) -> Result<WbTable> {
        use arrow::array::RecordBatch;
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let schema = builder.schema().clone();
        let reader = builder.build()?;
        let batches = reader.collect::<std::result::Result<Vec<RecordBatch>, _>>()?;
        WbTable::from_record_batches(&schema, &batches)
    }

    #[cfg(not(feature = "parquet"))]
    fn _load_parquet(_path: &Path) -> Result<WbTable> {
        Err(WbError::missing_dependency("parquet", "parquet"))
    }

    #[cfg(feature = "parquet")]
    fn _write_parquet(path: &Path, table: &WbTable) -> Result<()> {
        use parquet::arrow::ArrowWriter;

        if table.columns().is_empty() {
            return Err(WbError::schema("parquet batch needs at least one column"));
        }

        let batch = table.to_record_batch()?;
        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    #[cfg(not(feature = "parquet"))]
    fn _write_parquet(_path: &Path, _table: &WbTable) -> Result<()> {
        Err(WbError::missing_dependency("parquet", "parquet"))
    }
}

fn _parse_record(line: &str, line_number: usize) -> Result<WbRecord> {
    match serde_json::from_str::<Value>(line)? {
        Value::Object(record) => Ok(record),
        other => Err(WbError::schema(format!(
            "line {line_number}: expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(feature = "csv")]
fn _infer_cell(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(float) {
            return Value::Number(number);
        }
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(feature = "csv")]
fn _render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
