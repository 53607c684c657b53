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

//! # Warehouse Module
//!
//! Filesystem-backed dataset store with a JSON manifest and Hive-style
//! partition directories.
//!
//! ## Layout
//!
//! ```text
//! warehouse/
//!   manifest.json                 {"datasets": {name: {format, partitioning}}}
//!   datasets/
//!     <name>/
//!       [<k1>=<v1>/[<k2>=<v2>/...]]
//!         batch_<YYYYMMDD_HHMMSSffffff>_<seq>.<ext>
//! ```
//!
//! ## Module Components
//!
//! - **dataset**: `WbFormat` and `WbDataset`
//! - **manifest**: manifest document and store
//! - **partition**: ordered `key=value` partitions
//! - **batch**: `write_df` / `read_df`
//! - **query**: `sql` over per-dataset views
//!
//! ## Usage
//!
//! ```rust
//! use workbench::warehouse::{WbWarehouse, WbFormat, WbPartition, WbWriteOptions, WbReadOptions};
//!
//! let wh = WbWarehouse::open("warehouse")?;
//! wh.register_dataset("events", WbFormat::Parquet, vec!["date".into()], false)?;
//! wh.write_df("events", &table, WbWriteOptions::new()
//!     .partition(WbPartition::new().with("date", "2025-06-01")))?;
//! let rows = wh.read_df("events", WbReadOptions::new().limit(10))?;
//! let counts = wh.sql("select count(*) as n from ds_events", &Default::default())?;
//! ```
//!
//! A `WbWarehouse` holds no cached state: every operation re-reads the
//! manifest, so several handles on one directory observe each other's
//! writes. There is no locking; a single writer is assumed.

pub mod batch;
pub mod dataset;
pub mod manifest;
pub mod partition;
pub mod query;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub use batch::{WbReadOptions, WbWriteOptions};
pub use dataset::{validate_dataset_name, WbDataset, WbFormat};
pub use manifest::{WbManifest, WbManifestEntry, WbManifestStore};
pub use partition::WbPartition;
pub use query::WbExtraViews;

pub use crate::io::WbWriteMode;

use crate::errors::Result;
use crate::store::ensure_dir;

pub const MANIFEST_FILE: &str = "manifest.json";
pub const DATASETS_DIR: &str = "datasets";

/// Handle on one warehouse directory.
#[derive(Debug, Clone)]
pub struct WbWarehouse {
    base_path: PathBuf,
    datasets_path: PathBuf,
    manifest: WbManifestStore,
    default_format: WbFormat,
}

impl WbWarehouse {
    /// Opens (and scaffolds, if needed) the warehouse rooted at `base_path`.
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = ensure_dir(base_path.into())?;
        let datasets_path = ensure_dir(base_path.join(DATASETS_DIR))?;
        let manifest = WbManifestStore::open(base_path.join(MANIFEST_FILE))?;
        Ok(WbWarehouse {
            base_path,
            datasets_path,
            manifest,
            default_format: WbFormat::default(),
        })
    }

    /// Format applied when a write implicitly registers a dataset.
    pub fn with_default_format(mut self, format: WbFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn datasets_path(&self) -> &Path {
        &self.datasets_path
    }

    pub fn manifest_path(&self) -> &Path {
        self.manifest.path()
    }

    pub fn default_format(&self) -> WbFormat {
        self.default_format
    }

    /// All registered datasets keyed by name.
    ///
    /// An entry whose stored format is not a known format is left out with a
    /// warning; [`dataset`](Self::dataset) still reports it as
    /// `UnsupportedFormat` when it is read or written.
    pub fn list_datasets(&self) -> Result<BTreeMap<String, WbDataset>> {
        let manifest = self.manifest.read()?;
        let mut datasets = BTreeMap::new();
        for (name, entry) in &manifest.datasets {
            match entry.to_dataset(name) {
                Ok(dataset) => {
                    datasets.insert(name.clone(), dataset);
                }
                Err(err) => log::warn!("skipping dataset {name}: {err}"),
            }
        }
        Ok(datasets)
    }

    /// Looks up one dataset; an unknown stored format is `UnsupportedFormat`.
    pub fn dataset(&self, name: &str) -> Result<Option<WbDataset>> {
        let manifest = self.manifest.read()?;
        manifest
            .datasets
            .get(name)
            .map(|entry| entry.to_dataset(name))
            .transpose()
    }

    /// Registers `name` if absent.
    ///
    /// When the dataset already exists and `overwrite` is false the stored
    /// registration is returned untouched and the requested format and
    /// partitioning are ignored. Otherwise the entry is replaced, persisted,
    /// and the dataset directory is created.
    pub fn register_dataset(
        &self,
        name: &str,
        format: WbFormat,
        partitioning: Vec<String>,
        overwrite: bool,
    ) -> Result<WbDataset> {
        validate_dataset_name(name)?;
        let mut manifest = self.manifest.read()?;

        if let Some(existing) = manifest.datasets.get(name) {
            if !overwrite {
                log::debug!("dataset {name} already registered; keeping existing entry");
                return existing.to_dataset(name);
            }
        }

        let dataset = WbDataset::new(name, format).with_partitioning(partitioning);
        manifest
            .datasets
            .insert(name.to_string(), WbManifestEntry::from_dataset(&dataset));
        self.manifest.write(&manifest)?;
        ensure_dir(self.datasets_path.join(name))?;

        log::info!(
            "registered dataset {name} format={} partitions={}",
            dataset.format,
            display_partitioning(&dataset.partitioning)
        );
        Ok(dataset)
    }

    /// Resolves `datasets/<name>[/k=v...]` and creates it.
    pub fn dataset_dir(&self, name: &str, partition: Option<&WbPartition>) -> Result<PathBuf> {
        let dir = self.partition_path(name, partition)?;
        ensure_dir(&dir)
    }

    /// Resolves the same path as [`dataset_dir`](Self::dataset_dir) without
    /// touching the filesystem.
    pub fn partition_path(&self, name: &str, partition: Option<&WbPartition>) -> Result<PathBuf> {
        validate_dataset_name(name)?;
        let base = self.datasets_path.join(name);
        match partition {
            Some(partition) => {
                partition.validate()?;
                Ok(partition.resolve(&base))
            }
            None => Ok(base),
        }
    }
}

/// Renders a partitioning list as `a,b`, or `-` when empty.
pub fn display_partitioning(partitioning: &[String]) -> String {
    if partitioning.is_empty() {
        "-".to_string()
    } else {
        partitioning.join(",")
    }
}
