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

//! # Workbench Error Module
//!
//! This module defines the error types used throughout the workbench for
//! consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **DatasetNotRegistered**: a read addressed a dataset absent from the manifest
//! - **UnsupportedFormat**: a format name outside csv / jsonl / parquet
//! - **MissingDependency**: the format's codec was compiled out (cargo feature)
//! - **ManifestCorrupt**: an unreadable manifest; recovered locally, never
//!   returned from public warehouse or project operations
//! - **ProjectNotFound**: selecting a project that does not exist
//! - **Io / Serde / Csv / Arrow / Parquet / Query**: wrapped library failures
//! - **Schema / Validation / Internal**: malformed data, bad inputs, invariants
//!
//! ## Usage
//!
//! ```rust
//! use workbench::errors::{Result, WbError};
//!
//! fn example(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(WbError::validation("dataset name cannot be empty"));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout the workbench.
pub type Result<T> = std::result::Result<T, WbError>;

/// Canonical error enumeration for the workbench.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum WbError {
    /// The dataset is not present in the warehouse manifest.
    #[error("dataset '{name}' not registered")]
    DatasetNotRegistered { name: String },

    /// A format name that is not one of csv, jsonl or parquet.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The codec for a format is not compiled into this build.
    #[error("{format} requested but the '{feature}' feature is not enabled; rebuild with `--features {feature}`")]
    MissingDependency { format: String, feature: String },

    /// A manifest file exists but cannot be parsed.
    #[error("manifest at '{path}' is corrupt: {message}")]
    ManifestCorrupt { path: String, message: String },

    /// The project is not present in the projects manifest.
    #[error("project '{name}' does not exist")]
    ProjectNotFound { name: String },

    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors raised by the CSV codec.
    #[error("csv error: {0}")]
    Csv(String),

    /// Errors raised while building or decoding Arrow data.
    #[error("arrow error: {0}")]
    Arrow(String),

    /// Errors raised by the Parquet codec.
    #[error("parquet error: {0}")]
    Parquet(String),

    /// Failures reported by the SQL engine (planning or execution).
    #[error("query error: {0}")]
    Query(String),

    /// Errors caused by malformed rows or incompatible data layout.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for WbError {
    fn from(err: io::Error) -> Self {
        WbError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WbError {
    fn from(err: serde_json::Error) -> Self {
        WbError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for WbError {
    fn from(err: serde_yaml::Error) -> Self {
        WbError::Serde(err.to_string())
    }
}

#[cfg(feature = "csv")]
impl From<csv::Error> for WbError {
    fn from(err: csv::Error) -> Self {
        WbError::Csv(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for WbError {
    fn from(err: arrow::error::ArrowError) -> Self {
        WbError::Arrow(err.to_string())
    }
}

#[cfg(feature = "parquet")]
impl From<parquet::errors::ParquetError> for WbError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        WbError::Parquet(err.to_string())
    }
}

impl From<datafusion::error::DataFusionError> for WbError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        WbError::Query(err.to_string())
    }
}

impl From<glob::PatternError> for WbError {
    fn from(err: glob::PatternError) -> Self {
        WbError::validation(format!("invalid glob pattern: {err}"))
    }
}

impl From<glob::GlobError> for WbError {
    fn from(err: glob::GlobError) -> Self {
        WbError::Io(err.to_string())
    }
}

impl WbError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        WbError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        WbError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        WbError::Internal(message.into())
    }

    /// Helper for a codec that was compiled out.
    pub fn missing_dependency(format: impl Into<String>, feature: impl Into<String>) -> Self {
        WbError::MissingDependency {
            format: format.into(),
            feature: feature.into(),
        }
    }
}
