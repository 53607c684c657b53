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

use std::fs;

use serde_json::Value;
use tempfile::tempdir;
use workbench::errors::WbError;
use workbench::warehouse::{WbFormat, WbManifest, WbReadOptions, WbWarehouse};

fn manifest_json(wh: &WbWarehouse) -> Value {
    let text = fs::read_to_string(wh.manifest_path()).expect("read manifest");
    serde_json::from_str(&text).expect("parse manifest")
}

#[test]
fn open_scaffolds_empty_warehouse() {
    let dir = tempdir().expect("tmp");
    let base = dir.path().join("wh");
    let wh = WbWarehouse::open(&base).expect("open");

    assert!(base.join("datasets").is_dir());
    assert_eq!(manifest_json(&wh), serde_json::json!({"datasets": {}}));
    assert!(wh.list_datasets().expect("list").is_empty());
}

#[test]
fn register_persists_entry_and_directory() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");

    let ds = wh
        .register_dataset("events", WbFormat::Parquet, vec!["date".into()], false)
        .expect("register");
    assert_eq!(ds.name, "events");
    assert_eq!(ds.format, WbFormat::Parquet);
    assert_eq!(ds.partitioning, vec!["date".to_string()]);
    assert!(dir.path().join("datasets/events").is_dir());

    let manifest = manifest_json(&wh);
    assert_eq!(manifest["datasets"]["events"]["format"], "parquet");
    assert_eq!(manifest["datasets"]["events"]["partitioning"], serde_json::json!(["date"]));
}

#[test]
fn register_without_overwrite_keeps_first_entry() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");

    wh.register_dataset("events", WbFormat::Csv, vec![], false)
        .expect("first");
    let before = fs::read(wh.manifest_path()).expect("manifest bytes");
    let again = wh
        .register_dataset("events", WbFormat::Parquet, vec!["date".into()], false)
        .expect("second");

    assert_eq!(again.format, WbFormat::Csv);
    assert!(again.partitioning.is_empty());
    assert_eq!(fs::read(wh.manifest_path()).expect("manifest bytes"), before);
}

#[test]
fn register_with_overwrite_replaces_entry() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");

    wh.register_dataset("events", WbFormat::Csv, vec![], false)
        .expect("first");
    let replaced = wh
        .register_dataset("events", WbFormat::Jsonl, vec!["day".into()], true)
        .expect("overwrite");
    assert_eq!(replaced.format, WbFormat::Jsonl);

    let listed = wh.list_datasets().expect("list");
    assert_eq!(listed["events"].format, WbFormat::Jsonl);
    assert_eq!(listed["events"].partitioning, vec!["day".to_string()]);
}

#[test]
fn handles_share_state_through_the_manifest() {
    let dir = tempdir().expect("tmp");
    let first = WbWarehouse::open(dir.path()).expect("open first");
    let second = WbWarehouse::open(dir.path()).expect("open second");

    first
        .register_dataset("logs", WbFormat::Jsonl, vec![], false)
        .expect("register");
    assert!(second.dataset("logs").expect("lookup").is_some());
}

#[test]
fn corrupt_manifest_reads_empty_and_is_repaired_by_next_write() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    fs::write(wh.manifest_path(), "{ not json").expect("corrupt");

    assert!(wh.list_datasets().expect("list").is_empty());

    wh.register_dataset("events", WbFormat::Csv, vec![], false)
        .expect("register");
    let text = fs::read_to_string(wh.manifest_path()).expect("read");
    let manifest: WbManifest = serde_json::from_str(&text).expect("valid again");
    assert_eq!(manifest.datasets.len(), 1);
}

#[test]
fn missing_manifest_fields_take_defaults() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    fs::write(
        wh.manifest_path(),
        r#"{"datasets": {"a": {}, "b": {"format": "jsonl", "partitioning": null}}}"#,
    )
    .expect("write manifest");

    let listed = wh.list_datasets().expect("list");
    assert_eq!(listed["a"].format, WbFormat::Csv);
    assert!(listed["a"].partitioning.is_empty());
    assert_eq!(listed["b"].format, WbFormat::Jsonl);
    assert!(listed["b"].partitioning.is_empty());
}

#[test]
fn unknown_format_in_manifest_is_skipped_by_listing_but_rejected_on_use() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    fs::write(
        wh.manifest_path(),
        r#"{"datasets": {"legacy": {"format": "avro"}, "good": {"format": "jsonl"}}}"#,
    )
    .expect("write manifest");

    let listed = wh.list_datasets().expect("list");
    assert_eq!(listed.keys().collect::<Vec<_>>(), ["good"]);

    match wh.dataset("legacy") {
        Err(WbError::UnsupportedFormat(format)) => assert_eq!(format, "avro"),
        other => panic!("expected UnsupportedFormat, got {other:?}"),
    }
    assert!(matches!(
        wh.read_df("legacy", WbReadOptions::new()),
        Err(WbError::UnsupportedFormat(_))
    ));
}

#[test]
fn invalid_dataset_names_are_rejected() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");

    for name in ["", "../up", "a/b", "with space"] {
        let err = wh
            .register_dataset(name, WbFormat::Csv, vec![], false)
            .expect_err(name);
        assert!(matches!(err, WbError::Validation { .. }), "{name}: {err:?}");
    }
}

#[test]
fn unknown_format_name_fails_to_parse() {
    let err = "xlsx".parse::<WbFormat>().expect_err("xlsx");
    assert!(matches!(err, WbError::UnsupportedFormat(_)));
}
