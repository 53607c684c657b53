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

//! Batch writer and reader.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WbError};
use crate::io::{WbIO, WbWriteMode};
use crate::table::WbTable;
use crate::warehouse::dataset::WbFormat;
use crate::warehouse::partition::WbPartition;
use crate::warehouse::WbWarehouse;

const TIMESTAMP_FMT: &str = "%Y%m%d_%H%M%S%6f";

static BATCH_SEQ: AtomicU64 = AtomicU64::new(0);

/// Options for [`WbWarehouse::write_df`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WbWriteOptions {
    /// Overrides the dataset's registered format for this write.
    pub format: Option<WbFormat>,
    /// Ordered partition segments under the dataset directory.
    pub partition: Option<WbPartition>,
    /// Target file name inside the partition directory; generated if absent.
    pub filename: Option<String>,
    pub mode: WbWriteMode,
}

impl WbWriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: WbFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn partition(mut self, partition: WbPartition) -> Self {
        self.partition = Some(partition);
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn mode(mut self, mode: WbWriteMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Options for [`WbWarehouse::read_df`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WbReadOptions {
    /// Overrides the dataset's registered format for this read.
    pub format: Option<WbFormat>,
    /// Leading partition segments to restrict the scan to.
    pub partition: Option<WbPartition>,
    /// Maximum rows of the concatenated result.
    pub limit: Option<usize>,
}

impl WbReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: WbFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn partition(mut self, partition: WbPartition) -> Self {
        self.partition = Some(partition);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl WbWarehouse {
    /// Writes `table` as one batch file of dataset `name`.
    ///
    /// An unregistered dataset is registered first with the requested or
    /// default format. Returns the absolute path of the file written.
    ///
    /// A table without columns has no parquet schema and is rejected before
    /// anything is registered.
    pub fn write_df(&self, name: &str, table: &WbTable, options: WbWriteOptions) -> Result<PathBuf> {
        let existing = self.dataset(name)?;
        let format = options
            .format
            .or(existing.as_ref().map(|dataset| dataset.format))
            .unwrap_or(self.default_format());
        if format == WbFormat::Parquet && table.columns().is_empty() {
            return Err(WbError::schema(format!(
                "cannot write a table without columns to parquet dataset {name}"
            )));
        }
        if existing.is_none() {
            self.register_dataset(name, format, Vec::new(), false)?;
        }
        format.ensure_available()?;

        let dir = self.dataset_dir(name, options.partition.as_ref())?;
        let path = match &options.filename {
            Some(filename) => {
                if Path::new(filename).file_name() != Some(OsStr::new(filename)) {
                    return Err(WbError::validation(format!(
                        "batch filename '{filename}' must be a bare file name"
                    )));
                }
                dir.join(filename)
            }
            None => next_batch_path(&dir, format),
        };

        WbIO::write(&path, format, table, options.mode)?;
        let path = std::path::absolute(&path)?;
        log::info!(
            "wrote {} rows to dataset {name} ({format}): {}",
            table.len(),
            path.display()
        );
        Ok(path)
    }

    /// Reads and concatenates every batch file of dataset `name`.
    ///
    /// Files are matched by the format's extension anywhere below the
    /// (possibly partial) partition directory and read in lexicographic path
    /// order. No matching files yields an empty table.
    pub fn read_df(&self, name: &str, options: WbReadOptions) -> Result<WbTable> {
        let dataset = self
            .dataset(name)?
            .ok_or_else(|| WbError::DatasetNotRegistered {
                name: name.to_string(),
            })?;
        let format = options.format.unwrap_or(dataset.format);

        let dir = self.partition_path(name, options.partition.as_ref())?;
        let files = batch_files(&dir, format)?;
        log::debug!("reading {} {format} files under {}", files.len(), dir.display());
        if files.is_empty() {
            return Ok(WbTable::default());
        }
        format.ensure_available()?;

        let tables = files
            .iter()
            .map(|file| WbIO::load(file, format))
            .collect::<Result<Vec<_>>>()?;
        let table = WbTable::concat(tables);

        Ok(match options.limit {
            Some(limit) => table.head(limit),
            None => table,
        })
    }
}

/// Files with `format`'s extension anywhere below `dir`, sorted by path.
/// A missing directory has no files.
pub fn batch_files(dir: &Path, format: WbFormat) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let base = dir
        .to_str()
        .ok_or_else(|| WbError::validation(format!("non UTF-8 path: {}", dir.display())))?;
    let pattern = format!(
        "{}/**/*{}",
        glob::Pattern::escape(base.trim_end_matches('/')),
        format.extension()
    );

    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Generates `batch_<timestamp>_<seq><ext>` inside `dir`.
///
/// The sequence number is process-wide and monotonic, and a name already
/// present on disk is skipped, so two writes in the same clock tick never
/// share a file.
pub fn next_batch_path(dir: &Path, format: WbFormat) -> PathBuf {
    loop {
        let seq = BATCH_SEQ.fetch_add(1, Ordering::Relaxed) % 1_000_000;
        let name = format!(
            "batch_{}_{:06}{}",
            Utc::now().format(TIMESTAMP_FMT),
            seq,
            format.extension()
        );
        let path = dir.join(name);
        if !path.exists() {
            return path;
        }
    }
}
