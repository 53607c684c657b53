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

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WbError};

/// On-disk format of every batch belonging to a dataset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WbFormat {
    /// Delimited text with a header row.
    #[default]
    Csv,
    /// One JSON object per line.
    Jsonl,
    /// Self-describing columnar file.
    Parquet,
}

impl WbFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            WbFormat::Csv => "csv",
            WbFormat::Jsonl => "jsonl",
            WbFormat::Parquet => "parquet",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            WbFormat::Csv => ".csv",
            WbFormat::Jsonl => ".jsonl",
            WbFormat::Parquet => ".parquet",
        }
    }

    /// Cargo feature that compiles this format's batch codec.
    pub fn feature(&self) -> Option<&'static str> {
        match self {
            WbFormat::Csv => Some("csv"),
            WbFormat::Jsonl => None,
            WbFormat::Parquet => Some("parquet"),
        }
    }

    /// Whether this build can write and read batches of this format.
    pub fn is_available(&self) -> bool {
        match self {
            WbFormat::Csv => cfg!(feature = "csv"),
            WbFormat::Jsonl => true,
            WbFormat::Parquet => cfg!(feature = "parquet"),
        }
    }

    /// Fails with `MissingDependency` when the codec is compiled out.
    pub fn ensure_available(&self) -> Result<()> {
        match self.feature() {
            Some(feature) if !self.is_available() => {
                Err(WbError::missing_dependency(self.as_str(), feature))
            }
            _ => Ok(()),
        }
    }

    /// Infers the format from a path or glob by its trailing extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<WbFormat> {
        let ext = path
            .as_ref()
            .extension()?
            .to_string_lossy()
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(WbFormat::Csv),
            "jsonl" => Some(WbFormat::Jsonl),
            "parquet" => Some(WbFormat::Parquet),
            _ => None,
        }
    }
}

impl fmt::Display for WbFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WbFormat {
    type Err = WbError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(WbFormat::Csv),
            "jsonl" => Ok(WbFormat::Jsonl),
            "parquet" => Ok(WbFormat::Parquet),
            other => Err(WbError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// A registered dataset as reconstructed from the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbDataset {
    pub name: String,
    pub format: WbFormat,
    /// Partition key names, in order. Informational only; writes are not
    /// checked against it.
    pub partitioning: Vec<String>,
}

impl WbDataset {
    pub fn new(name: impl Into<String>, format: WbFormat) -> Self {
        WbDataset {
            name: name.into(),
            format,
            partitioning: Vec::new(),
        }
    }

    pub fn with_partitioning(mut self, partitioning: Vec<String>) -> Self {
        self.partitioning = partitioning;
        self
    }

    /// The SQL view name declared for this dataset.
    pub fn view_name(&self) -> String {
        format!("ds_{}", self.name)
    }
}

/// Dataset names become directory names and SQL identifiers, so they are
/// limited to ASCII letters, digits, `_` and `-`.
pub fn validate_dataset_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(WbError::validation("dataset name cannot be empty"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(WbError::validation(format!(
            "dataset name '{name}' may only contain letters, digits, '_' and '-'"
        )));
    }
    Ok(())
}
