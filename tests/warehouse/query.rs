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

use serde_json::json;
use tempfile::tempdir;
use workbench::errors::WbError;
use workbench::table::WbTable;
use workbench::warehouse::{
    WbExtraViews, WbFormat, WbPartition, WbWarehouse, WbWriteOptions,
};

fn events(rows: &[(&str, i64)]) -> WbTable {
    WbTable::from_rows(
        vec!["event".into(), "value".into()],
        rows.iter()
            .map(|(event, value)| vec![json!(event), json!(value)])
            .collect(),
    )
    .expect("table")
}

fn write_day(wh: &WbWarehouse, name: &str, date: &str, rows: &[(&str, i64)]) {
    wh.write_df(
        name,
        &events(rows),
        WbWriteOptions::new().partition(WbPartition::new().with("date", date)),
    )
    .expect("write");
}

fn no_views() -> WbExtraViews {
    WbExtraViews::new()
}

#[test]
fn count_matches_rows_written_across_partitions() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("logs", WbFormat::Jsonl, vec!["date".into()], false)
        .expect("register");
    write_day(&wh, "logs", "2025-01-01", &[("a", 1), ("b", 2)]);
    write_day(&wh, "logs", "2025-01-02", &[("c", 3)]);
    write_day(&wh, "logs", "2025-01-02", &[("d", 4), ("e", 5), ("f", 6)]);

    let result = wh
        .sql("select count(*) as n from ds_logs", &no_views())
        .expect("sql");
    assert_eq!(result.columns(), ["n"]);
    assert_eq!(result.rows()[0][0], json!(6));
}

#[test]
fn views_see_writes_made_after_a_previous_query() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("logs", WbFormat::Jsonl, vec![], false)
        .expect("register");
    wh.write_df("logs", &events(&[("a", 1)]), WbWriteOptions::new())
        .expect("write");

    let query = "select count(*) as n from ds_logs";
    assert_eq!(wh.sql(query, &no_views()).expect("sql").rows()[0][0], json!(1));

    wh.write_df("logs", &events(&[("b", 2)]), WbWriteOptions::new())
        .expect("write");
    assert_eq!(wh.sql(query, &no_views()).expect("sql").rows()[0][0], json!(2));
}

#[test]
fn dataset_without_files_is_an_empty_view() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("empty", WbFormat::Parquet, vec![], false)
        .expect("register");

    let result = wh
        .sql("select count(*) as n from ds_empty", &no_views())
        .expect("sql");
    assert_eq!(result.rows()[0][0], json!(0));
}

#[test]
fn deleted_dataset_directory_counts_zero() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("logs", WbFormat::Jsonl, vec!["date".into()], false)
        .expect("register");
    write_day(&wh, "logs", "2025-01-01", &[("a", 1), ("b", 2)]);

    fs::remove_dir_all(dir.path().join("datasets/logs")).expect("remove");

    let result = wh
        .sql("select count(*) as n from ds_logs", &no_views())
        .expect("sql");
    assert_eq!(result.rows()[0][0], json!(0));
}

#[test]
fn join_keeps_repeated_column_names_apart() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    for (name, value) in [("a", 1), ("b", 99)] {
        wh.write_df(
            name,
            &events(&[("x", value)]),
            WbWriteOptions::new().format(WbFormat::Jsonl),
        )
        .expect("write");
    }

    let result = wh
        .sql(
            "select * from ds_a a join ds_b b on a.event = b.event",
            &no_views(),
        )
        .expect("join");
    assert_eq!(result.columns(), ["event", "value", "event", "value"]);
    assert_eq!(
        result.rows(),
        &[vec![json!("x"), json!(1), json!("x"), json!(99)]]
    );
}

#[test]
fn dataset_with_unknown_format_does_not_hide_the_others() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.write_df(
        "good",
        &events(&[("a", 1)]),
        WbWriteOptions::new().format(WbFormat::Jsonl),
    )
    .expect("write");

    let mut manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(wh.manifest_path()).expect("read"))
            .expect("parse");
    manifest["datasets"]["legacy"] = json!({"format": "avro"});
    fs::write(wh.manifest_path(), manifest.to_string()).expect("write manifest");

    let result = wh
        .sql("select count(*) as n from ds_good", &no_views())
        .expect("sql");
    assert_eq!(result.rows()[0][0], json!(1));

    let err = wh
        .sql("select * from ds_legacy", &no_views())
        .expect_err("legacy view is not registered");
    assert!(matches!(err, WbError::Query(_)), "{err:?}");
}

#[test]
fn unknown_table_is_a_query_error() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");

    let err = wh
        .sql("select * from ds_missing", &no_views())
        .expect_err("unknown table");
    assert!(matches!(err, WbError::Query(_)), "{err:?}");
}

#[test]
fn extra_views_are_declared_by_extension() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path().join("wh")).expect("open");

    let extra = dir.path().join("lookup.jsonl");
    fs::write(
        &extra,
        "{\"event\": \"a\", \"label\": \"Alpha\"}\n{\"event\": \"b\", \"label\": \"Beta\"}\n",
    )
    .expect("write extra");
    let ignored = dir.path().join("notes.txt");
    fs::write(&ignored, "not a table").expect("write ignored");

    let mut views = WbExtraViews::new();
    views.insert("lookup".into(), extra.display().to_string());
    views.insert("notes".into(), ignored.display().to_string());

    let result = wh
        .sql("select label from lookup order by label", &views)
        .expect("sql");
    assert_eq!(result.rows(), &[vec![json!("Alpha")], vec![json!("Beta")]]);

    let err = wh
        .sql("select * from notes", &views)
        .expect_err("skipped view");
    assert!(matches!(err, WbError::Query(_)));
}

#[cfg(feature = "parquet")]
#[test]
fn parquet_events_aggregate_by_event() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("events", WbFormat::Parquet, vec!["date".into()], false)
        .expect("register");
    write_day(&wh, "events", "2025-06-01", &[("alpha", 1), ("beta", 2), ("alpha", 3)]);
    write_day(&wh, "events", "2025-06-02", &[("gamma", 4), ("alpha", 5)]);

    let total = wh
        .sql("select count(*) as n from ds_events", &no_views())
        .expect("count");
    assert_eq!(total.rows()[0][0], json!(5));

    let grouped = wh
        .sql(
            "select event, count(*) as n, sum(value) as total \
             from ds_events group by event order by event",
            &no_views(),
        )
        .expect("group by");
    assert_eq!(grouped.columns(), ["event", "n", "total"]);
    assert_eq!(
        grouped.rows(),
        &[
            vec![json!("alpha"), json!(3), json!(9)],
            vec![json!("beta"), json!(1), json!(2)],
            vec![json!("gamma"), json!(1), json!(4)],
        ]
    );

    // partition keys are not columns of the view
    assert!(wh
        .sql("select date from ds_events", &no_views())
        .is_err());
}

#[cfg(feature = "csv")]
#[test]
fn csv_datasets_are_queryable() {
    let dir = tempdir().expect("tmp");
    let wh = WbWarehouse::open(dir.path()).expect("open");
    wh.register_dataset("sales", WbFormat::Csv, vec!["date".into()], false)
        .expect("register");
    write_day(&wh, "sales", "2025-03-01", &[("a", 10), ("b", 20)]);
    write_day(&wh, "sales", "2025-03-02", &[("c", 30)]);

    let result = wh
        .sql("select sum(value) as total from ds_sales", &no_views())
        .expect("sql");
    assert_eq!(result.rows()[0][0], json!(60));
}
