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

//! # Workbench Table Module
//!
//! `WbTable` is the tabular payload moved in and out of the warehouse: an
//! ordered list of column names and rows of JSON scalars. Batches written to
//! any format and results returned by SQL share this one shape.
//!
//! ## Design Principles
//!
//! - **Mixed scalars**: cells are `serde_json::Value` (null, bool, number,
//!   string), so a column may carry values of different types the way a
//!   loosely typed CSV does
//! - **Ordered columns**: column order is preserved end to end; JSON objects
//!   produced by [`WbTable::to_records`] keep that order
//! - **Arrow bridge**: [`WbTable::to_record_batch`] and
//!   [`WbTable::from_record_batches`] connect to the columnar codec and the
//!   SQL engine
//!
//! ## Usage Example
//!
//! ```rust
//! use workbench::table::WbTable;
//! use serde_json::json;
//!
//! let table = WbTable::from_rows(
//!     vec!["event".into(), "value".into()],
//!     vec![vec![json!("alpha"), json!(1)], vec![json!("beta"), json!(2)]],
//! )?;
//! assert_eq!(table.len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use arrow::array::{ArrayRef, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::json::reader::infer_json_schema_from_iterator;
use arrow::json::{ArrayWriter, ReaderBuilder};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, WbError};

/// One row rendered as a JSON object in column order.
pub type WbRecord = Map<String, Value>;

/// Rows fed to the Arrow JSON decoder per flush.
const DECODE_CHUNK_ROWS: usize = 1024;

/// Tabular batch of named columns and rows of mixed scalar values.
///
/// Every row has exactly one value per column. Missing values are `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WbTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl WbTable {
    /// Creates an empty table with the given columns.
    pub fn new(columns: Vec<String>) -> Self {
        WbTable {
            columns,
            rows: Vec::new(),
        }
    }

    /// Creates a table from columns and rows, checking every row width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut table = WbTable::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Builds a table from JSON objects.
    ///
    /// Columns are the union of keys in first-seen order; keys absent from
    /// a record become `null`.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = WbRecord>,
    {
        let records: Vec<WbRecord> = records.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();

        WbTable { columns, rows }
    }

    /// Appends one row.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(WbError::schema(format!(
                "row has {} values but table has {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the values of one column, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Keeps at most the first `n` rows.
    pub fn head(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Concatenates tables row-wise in the given order.
    ///
    /// The result's columns are the union of all input columns in first-seen
    /// order; cells missing from a given input are `null`.
    pub fn concat<I>(tables: I) -> Self
    where
        I: IntoIterator<Item = WbTable>,
    {
        let tables: Vec<WbTable> = tables.into_iter().collect();
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::with_capacity(tables.iter().map(WbTable::len).sum());
        for table in tables {
            if table.columns == columns {
                rows.extend(table.rows);
                continue;
            }
            let positions: Vec<Option<usize>> = columns
                .iter()
                .map(|c| table.columns.iter().position(|t| t == c))
                .collect();
            for row in table.rows {
                rows.push(
                    positions
                        .iter()
                        .map(|p| p.map(|i| row[i].clone()).unwrap_or(Value::Null))
                        .collect(),
                );
            }
        }

        WbTable { columns, rows }
    }

    /// Renders every row as a JSON object in column order.
    pub fn to_records(&self) -> Vec<WbRecord> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect::<WbRecord>()
            })
            .collect()
    }

    /// Infers an Arrow schema from the values, keeping table column order.
    ///
    /// Integers become Int64, mixed integer/float columns Float64. Columns
    /// with no non-null value are typed Utf8.
    pub fn arrow_schema(&self) -> Result<SchemaRef> {
        let records = self.to_records();
        let inferred = infer_json_schema_from_iterator(
            records.iter().map(|r| Ok::<Value, arrow::error::ArrowError>(Value::Object(r.clone()))),
        )?;

        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|name| match inferred.field_with_name(name) {
                Ok(field) if field.data_type() != &DataType::Null => {
                    Field::new(name, field.data_type().clone(), true)
                }
                _ => Field::new(name, DataType::Utf8, true),
            })
            .collect();

        Ok(Arc::new(Schema::new(fields)))
    }

    /// Converts the table into a single Arrow record batch.
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let schema = self.arrow_schema()?;
        if self.rows.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let records = self.to_records();
        let mut decoder = ReaderBuilder::new(schema.clone())
            .with_batch_size(DECODE_CHUNK_ROWS)
            .with_coerce_primitive(true)
            .build_decoder()?;

        let mut batches = Vec::new();
        for chunk in records.chunks(DECODE_CHUNK_ROWS) {
            decoder.serialize(chunk)?;
            if let Some(batch) = decoder.flush()? {
                batches.push(batch);
            }
        }

        Ok(arrow::compute::concat_batches(&schema, &batches)?)
    }

    /// Builds a table from Arrow record batches sharing `schema`.
    ///
    /// Cells are taken by column position, so results with repeated column
    /// names (e.g. `select *` over a join) keep every column's own values.
    pub fn from_record_batches(schema: &Schema, batches: &[RecordBatch]) -> Result<Self> {
        let columns: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        let mut table = WbTable::new(columns);

        for batch in batches {
            if batch.num_rows() == 0 {
                continue;
            }
            if batch.num_columns() != table.columns.len() {
                return Err(WbError::schema(format!(
                    "record batch has {} columns, schema has {}",
                    batch.num_columns(),
                    table.columns.len()
                )));
            }

            let decoded = batch
                .columns()
                .iter()
                .map(|array| column_values(array, batch.num_rows()))
                .collect::<Result<Vec<_>>>()?;
            for row in 0..batch.num_rows() {
                table
                    .rows
                    .push(decoded.iter().map(|cells| cells[row].clone()).collect());
            }
        }

        Ok(table)
    }
}

/// Renders one Arrow column as JSON cells, one per row.
fn column_values(array: &ArrayRef, num_rows: usize) -> Result<Vec<Value>> {
    let field = Field::new("v", array.data_type().clone(), true);
    let single = RecordBatch::try_new(Arc::new(Schema::new(vec![field])), vec![array.clone()])?;

    let mut writer = ArrayWriter::new(Vec::new());
    writer.write(&single)?;
    writer.finish()?;
    let records: Vec<WbRecord> = serde_json::from_slice(&writer.into_inner())?;

    let mut cells: Vec<Value> = records
        .into_iter()
        .map(|mut record| record.remove("v").unwrap_or(Value::Null))
        .collect();
    cells.resize(num_rows, Value::Null);
    Ok(cells)
}

impl fmt::Display for WbTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = Table::new();
        rendered.load_preset(UTF8_FULL_CONDENSED);
        rendered.set_header(self.columns.iter());
        for row in &self.rows {
            rendered.add_row(row.iter().map(display_cell));
        }
        write!(f, "{rendered}")?;
        write!(f, "\n[{} rows x {} columns]", self.rows.len(), self.columns.len())
    }
}

fn display_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
