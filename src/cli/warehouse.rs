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

//! `workbench warehouse` subcommands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::Session;
use crate::io::WbIO;
use crate::store::ensure_dir;
use crate::table::WbTable;
use crate::warehouse::{
    display_partitioning, WbExtraViews, WbFormat, WbPartition, WbReadOptions, WbWriteOptions,
};

#[derive(Debug, Args)]
pub struct WarehouseArgs {
    #[command(subcommand)]
    pub command: WarehouseCommands,
}

#[derive(Debug, Subcommand)]
pub enum WarehouseCommands {
    /// List registered datasets.
    List,
    /// Register a dataset (no-op if it exists, unless --overwrite).
    Register(RegisterArgs),
    /// Write a small sample batch.
    WriteSample(WriteSampleArgs),
    /// Print the first rows of a dataset.
    Show(ShowArgs),
    /// Run SQL; every dataset is available as ds_<name>.
    Sql(SqlArgs),
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    /// csv | jsonl | parquet
    #[arg(long, default_value = "csv")]
    pub format: String,
    /// Comma-separated partition keys.
    #[arg(long, default_value = "")]
    pub partitioning: String,
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Args)]
pub struct WriteSampleArgs {
    #[arg(long)]
    pub name: String,
    /// Comma-separated k=v pairs, e.g. date=2025-01-01,source=api
    #[arg(long)]
    pub partition: Option<String>,
    /// Override the dataset format.
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value_t = 5)]
    pub limit: usize,
}

#[derive(Debug, Args)]
pub struct SqlArgs {
    #[arg(long)]
    pub query: String,
    /// Keep at most this many result rows.
    #[arg(long)]
    pub limit: Option<usize>,
    /// Save the result; format follows the extension, csv otherwise.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn execute(args: WarehouseArgs, session: &Session) -> Result<()> {
    let wh = session.warehouse()?;
    match args.command {
        WarehouseCommands::List => {
            let datasets = wh.list_datasets()?;
            if datasets.is_empty() {
                log::warn!("No datasets registered.");
                return Ok(());
            }
            for (name, ds) in datasets {
                log::info!(
                    "{name} format={} partitions={}",
                    ds.format,
                    display_partitioning(&ds.partitioning)
                );
            }
            Ok(())
        }
        WarehouseCommands::Register(args) => {
            let format: WbFormat = args.format.parse()?;
            let ds = wh.register_dataset(
                &args.name,
                format,
                split_keys(&args.partitioning),
                args.overwrite,
            )?;
            log::info!(
                "Registered: {} format={} partitions={}",
                ds.name,
                ds.format,
                display_partitioning(&ds.partitioning)
            );
            Ok(())
        }
        WarehouseCommands::WriteSample(args) => {
            let mut options = WbWriteOptions::new();
            if let Some(format) = &args.format {
                options = options.format(format.parse()?);
            }
            if let Some(spec) = &args.partition {
                let partition = WbPartition::parse(spec)
                    .context("partition must be comma-separated k=v pairs")?;
                if !partition.is_empty() {
                    options = options.partition(partition);
                }
            }
            let path = wh.write_df(&args.name, &sample_table(), options)?;
            log::info!("Wrote sample batch: {}", path.display());
            Ok(())
        }
        WarehouseCommands::Show(args) => {
            let table = wh.read_df(&args.name, WbReadOptions::new().limit(args.limit))?;
            if table.is_empty() {
                log::warn!("Dataset {} is empty.", args.name);
                return Ok(());
            }
            println!("{table}");
            Ok(())
        }
        WarehouseCommands::Sql(args) => {
            let mut table = wh.sql(&args.query, &WbExtraViews::new())?;
            if let Some(limit) = args.limit {
                table = table.head(limit);
            }
            match &args.output {
                Some(output) => {
                    save_table(output, &table)?;
                    log::info!("Saved query result: {}", output.display());
                }
                None => println!("{table}"),
            }
            Ok(())
        }
    }
}

/// Writes `table` to `output`, creating parent folders. The format follows
/// the extension; anything unrecognized is written as csv.
pub fn save_table(output: &std::path::Path, table: &WbTable) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let written = match WbFormat::from_path(output) {
        Some(_) => WbIO::write_auto(output, table),
        None => WbIO::write(output, WbFormat::Csv, table, crate::io::WbWriteMode::Overwrite),
    };
    written.with_context(|| format!("failed to save {}", output.display()))
}

fn split_keys(keys: &str) -> Vec<String> {
    keys.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn sample_table() -> WbTable {
    WbTable::from_records([
        json!({"when": "2025-01-01T00:00:00Z", "value": 1, "note": "sample"}),
        json!({"when": "2025-01-01T01:00:00Z", "value": 2, "note": "sample"}),
    ]
    .into_iter()
    .filter_map(|v| v.as_object().cloned()))
}
