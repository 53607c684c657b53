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

//! `workbench workflow` subcommands.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::cli::warehouse::save_table;
use crate::cli::Session;
use crate::projects::WbProjects;
use crate::table::WbTable;
use crate::warehouse::{WbExtraViews, WbPartition, WbWarehouse, WbWriteOptions};
use crate::workspace::init_workspace;

pub const SAMPLE_DATASET: &str = "events_demo";

const SAMPLE_AGGREGATE: &str = "select event, count(*) as n, sum(value) as sum_value \
     from ds_events_demo group by event order by event";

#[derive(Debug, Args)]
pub struct WorkflowArgs {
    #[command(subcommand)]
    pub command: WorkflowCommands,
}

#[derive(Debug, Subcommand)]
pub enum WorkflowCommands {
    /// Land sample events, aggregate them with SQL and save the result.
    Sample,
    /// Set up the workspace, create and select a project, then run the sample.
    FirstProject(FirstProjectArgs),
}

#[derive(Debug, Args)]
pub struct FirstProjectArgs {
    /// Project to create and select.
    #[arg(long, default_value = "demo")]
    pub name: String,

    /// Workspace root.
    #[arg(long, default_value = ".")]
    pub base: PathBuf,
}

pub fn execute(args: WorkflowArgs, session: &Session) -> Result<()> {
    let wh = session.warehouse()?;
    let projects = session.projects()?;
    let output = match args.command {
        WorkflowCommands::Sample => run_sample(&wh, &projects)?,
        WorkflowCommands::FirstProject(args) => {
            run_first_project(&args.base, &wh, &projects, &args.name)?
        }
    };
    log::info!("Saved aggregation: {}", output.display());
    Ok(())
}

/// Ensures the workspace folders under `base`, creates project `name` and
/// makes it current, then runs [`run_sample`] inside it.
pub fn run_first_project(
    base: &Path,
    wh: &WbWarehouse,
    projects: &WbProjects,
    name: &str,
) -> Result<PathBuf> {
    init_workspace(base)?;
    projects.create(name, "First project")?;
    projects.set_current(name)?;
    log::info!("Project ready: {name}");
    run_sample(wh, projects)
}

/// Lands today's sample batch, aggregates `ds_events_demo` and writes
/// `artifacts/agg.csv` under the current project (or the working directory).
pub fn run_sample(wh: &WbWarehouse, projects: &WbProjects) -> Result<PathBuf> {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let path = wh.write_df(
        SAMPLE_DATASET,
        &sample_events(),
        WbWriteOptions::new().partition(WbPartition::new().with("date", today)),
    )?;
    log::info!("Landed sample data: {}", path.display());

    let aggregate = wh.sql(SAMPLE_AGGREGATE, &WbExtraViews::new())?;

    let base = projects.current_root()?.unwrap_or_default();
    let output = base.join("artifacts").join("agg.csv");
    save_table(&output, &aggregate)?;
    Ok(output)
}

fn sample_events() -> WbTable {
    WbTable::from_records(
        [
            json!({"event": "alpha", "value": 1}),
            json!({"event": "beta", "value": 2}),
            json!({"event": "alpha", "value": 1}),
            json!({"event": "gamma", "value": 3}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned()),
    )
}
