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

use std::collections::HashMap;
use std::path::PathBuf;

use tempfile::tempdir;
use workbench::config::{WbConfig, ENV_LOG_LEVEL, ENV_WAREHOUSE};
use workbench::errors::WbError;
use workbench::warehouse::WbFormat;
use workbench::workspace::{init_workspace, WORKSPACE_DIRS};

#[test]
fn defaults_apply_without_a_file() {
    let config = WbConfig::from_yaml("").expect("empty yaml");
    assert_eq!(config, WbConfig::default());
    assert_eq!(config.warehouse_dir, PathBuf::from("warehouse"));
    assert_eq!(config.default_format, WbFormat::Csv);
}

#[test]
fn yaml_overrides_defaults_per_key() {
    let config = WbConfig::from_yaml("warehouse_dir: /data/wh\ndefault_format: PARQUET\n")
        .expect("yaml");
    assert_eq!(config.warehouse_dir, PathBuf::from("/data/wh"));
    assert_eq!(config.projects_dir, PathBuf::from("projects"));
    assert_eq!(config.default_format, WbFormat::Parquet);
    assert_eq!(config.log_level, "info");
}

#[test]
fn yaml_with_unknown_format_fails() {
    let err = WbConfig::from_yaml("default_format: xlsx\n").expect_err("bad format");
    assert!(matches!(err, WbError::UnsupportedFormat(_)));
}

#[test]
fn environment_beats_file() {
    let env: HashMap<&str, &str> = [(ENV_WAREHOUSE, "/env/wh"), (ENV_LOG_LEVEL, "debug")]
        .into_iter()
        .collect();
    let config = WbConfig::from_yaml("warehouse_dir: /file/wh\nlog_level: warn\n")
        .expect("yaml")
        .apply_env_from(|key| env.get(key).map(|v| v.to_string()))
        .expect("env");
    assert_eq!(config.warehouse_dir, PathBuf::from("/env/wh"));
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.projects_dir, PathBuf::from("projects"));
}

#[test]
fn load_reads_file_when_present() {
    let dir = tempdir().expect("tmp");
    let path = dir.path().join("workbench.yaml");
    std::fs::write(&path, "projects_dir: /file/projects\n").expect("write");

    let config = WbConfig::load(Some(path.as_path())).expect("load");
    if std::env::var(workbench::config::ENV_PROJECTS).is_err() {
        assert_eq!(config.projects_dir, PathBuf::from("/file/projects"));
    }

    let missing = WbConfig::load(Some(dir.path().join("absent.yaml").as_path())).expect("load");
    assert_eq!(missing.default_format, WbFormat::Csv);
}

#[test]
fn builder_setters_chain() {
    let config = WbConfig::new()
        .warehouse_dir("/a")
        .projects_dir("/b")
        .default_format(WbFormat::Jsonl)
        .log_level("trace");
    assert_eq!(config.warehouse_dir, PathBuf::from("/a"));
    assert_eq!(config.projects_dir, PathBuf::from("/b"));
    assert_eq!(config.default_format, WbFormat::Jsonl);
    assert_eq!(config.log_level, "trace");
}

#[test]
fn init_workspace_creates_standard_folders() {
    let dir = tempdir().expect("tmp");
    let created = init_workspace(dir.path()).expect("init");
    assert_eq!(created.len(), WORKSPACE_DIRS.len());
    for sub in WORKSPACE_DIRS {
        assert!(dir.path().join(sub).is_dir(), "{sub}");
    }
}
