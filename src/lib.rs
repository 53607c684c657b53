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

//! # Workbench Core Library
//!
//! A local data workbench: a filesystem warehouse of named, partitioned
//! datasets stored as batch files, SQL over those datasets, and a small
//! registry of projects to organise outputs.
//!
//! ## Module Overview
//!
//! - **warehouse**: dataset registry, partition paths, batch writer/reader, SQL
//! - **table**: `WbTable`, the in-memory tabular value moved in and out
//! - **io**: CSV / JSONL / Parquet codecs for one batch file
//! - **store**: JSON document persistence shared by the manifests
//! - **projects**: project registry and current selection
//! - **workspace**: standard workspace folders
//! - **config** / **logging**: runtime settings and logger setup
//! - **cli**: the `workbench` command line
//!
//! ## Feature Flags
//!
//! - `csv`: CSV batches
//! - `parquet`: Parquet batches
//! - `full` (default): both
//!
//! A format whose feature is disabled fails with `MissingDependency` when a
//! batch of that format is read or written.
//!
//! ## Quick Start
//!
//! ```rust
//! use workbench::{WbWarehouse, WbTable, WbWriteOptions, WbReadOptions};
//!
//! let wh = WbWarehouse::open("warehouse")?;
//! let table = WbTable::from_rows(
//!     vec!["event".into(), "value".into()],
//!     vec![vec!["alpha".into(), 1.into()]],
//! )?;
//! wh.write_df("events", &table, WbWriteOptions::new())?;
//! let back = wh.read_df("events", WbReadOptions::new())?;
//! let n = wh.sql("select count(*) as n from ds_events", &Default::default())?;
//! ```
//!
//! ## Error Handling
//!
//! All library operations return `Result<T, WbError>`; the binary wraps them
//! in `anyhow`.

pub mod cli;
pub mod config;
pub mod errors;
pub mod io;
pub mod logging;
pub mod projects;
pub mod store;
pub mod table;
pub mod warehouse;
pub mod workspace;

pub use config::WbConfig;
pub use errors::{Result, WbError};
pub use io::{WbIO, WbWriteMode};
pub use logging::WbLogConfig;
pub use projects::{WbProject, WbProjectContext, WbProjects};
pub use table::{WbRecord, WbTable};
pub use warehouse::{
    WbDataset, WbExtraViews, WbFormat, WbPartition, WbReadOptions, WbWarehouse, WbWriteOptions,
};
pub use workspace::init_workspace;
