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

use std::io::{BufReader, Cursor};

use serde_json::{json, Value};
use tempfile::tempdir;
use workbench::errors::WbError;
use workbench::io::WbIO;
use workbench::table::WbTable;

fn records(values: Vec<Value>) -> WbTable {
    WbTable::from_records(values.into_iter().filter_map(|v| v.as_object().cloned()))
}

#[test]
fn from_records_unions_keys_and_fills_nulls() {
    let table = records(vec![
        json!({"id": 1, "name": "a"}),
        json!({"id": 2, "score": 0.5}),
    ]);
    assert_eq!(table.columns(), ["id", "name", "score"]);
    assert_eq!(table.rows()[1], vec![json!(2), Value::Null, json!(0.5)]);
}

#[test]
fn from_rows_rejects_ragged_rows() {
    let err = WbTable::from_rows(
        vec!["a".into(), "b".into()],
        vec![vec![json!(1), json!(2)], vec![json!(3)]],
    )
    .expect_err("ragged");
    assert!(matches!(err, WbError::Schema { .. }));
}

#[test]
fn head_and_to_records_preserve_order() {
    let table = records(vec![
        json!({"z": 1, "a": "first"}),
        json!({"z": 2, "a": "second"}),
        json!({"z": 3, "a": "third"}),
    ])
    .head(2);

    let out = table.to_records();
    assert_eq!(out.len(), 2);
    let keys: Vec<&String> = out[0].keys().collect();
    assert_eq!(keys, ["z", "a"]);
    assert_eq!(out[1]["a"], json!("second"));
}

#[test]
fn display_renders_header_and_shape() {
    let table = records(vec![json!({"event": "alpha", "value": 1})]);
    let text = table.to_string();
    assert!(text.contains("event"));
    assert!(text.contains("alpha"));
    assert!(text.ends_with("[1 rows x 2 columns]"));
}

#[test]
fn jsonl_reader_skips_blank_lines_and_rejects_scalars() {
    let data = "{\"a\": 1}\n\n{\"b\": \"x\"}\n";
    let table = WbIO::load_jsonl_reader(BufReader::new(Cursor::new(data))).expect("load");
    assert_eq!(table.columns(), ["a", "b"]);
    assert_eq!(table.len(), 2);

    let err = WbIO::load_jsonl_reader(BufReader::new(Cursor::new("{\"a\": 1}\n42\n")))
        .expect_err("scalar line");
    assert!(matches!(err, WbError::Schema { .. }));
}

#[test]
fn load_auto_dispatches_on_extension() {
    let dir = tempdir().expect("tmp");
    let table = records(vec![json!({"k": "v", "n": 7})]);

    let jsonl = dir.path().join("t.jsonl");
    WbIO::write_auto(&jsonl, &table).expect("write");
    assert_eq!(WbIO::load_auto(&jsonl).expect("load"), table);

    let unknown = dir.path().join("t.xlsx");
    assert!(matches!(
        WbIO::load_auto(&unknown),
        Err(WbError::UnsupportedFormat(_))
    ));
}

#[test]
fn arrow_bridge_keeps_column_order() {
    let table = records(vec![
        json!({"b": 1, "a": "x", "c": null}),
        json!({"b": 2, "a": "y", "c": null}),
    ]);
    let batch = table.to_record_batch().expect("to arrow");
    let names: Vec<&String> = batch.schema_ref().fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["b", "a", "c"]);

    let back = WbTable::from_record_batches(batch.schema_ref(), &[batch.clone()]).expect("back");
    assert_eq!(back, table);
}
