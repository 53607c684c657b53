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

//! # Command Line
//!
//! - `workbench init` - create the standard workspace folders
//! - `workbench warehouse ...` - list, register, write, show and query datasets
//! - `workbench projects ...` - manage projects and the current selection
//! - `workbench workflow sample` - land, aggregate and save a demo dataset
//! - `workbench workflow first-project` - init, create and select a project, run the sample
//!
//! Global flags: `-v` (repeatable), `--config FILE` (or `WORKBENCH_CONFIG`),
//! `--warehouse DIR`, `--projects DIR`. Flags beat `WORKBENCH_*` variables,
//! which beat the config file.

pub mod projects;
pub mod warehouse;
pub mod workflow;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::WbConfig;
use crate::logging::WbLogConfig;
use crate::projects::WbProjects;
use crate::warehouse::WbWarehouse;
use crate::workspace::init_workspace;

/// Local data workbench.
#[derive(Debug, Parser)]
#[command(name = "workbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// YAML config file; ignored when absent.
    #[arg(long, global = true, env = "WORKBENCH_CONFIG", default_value = "workbench.yaml")]
    pub config: PathBuf,

    /// Warehouse directory.
    #[arg(long, global = true)]
    pub warehouse: Option<PathBuf>,

    /// Projects directory.
    #[arg(long, global = true)]
    pub projects: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create data, reports, templates and logs folders.
    Init(InitArgs),
    /// Dataset warehouse.
    Warehouse(warehouse::WarehouseArgs),
    /// Project registry.
    Projects(projects::ProjectsArgs),
    /// End-to-end sample workflows.
    Workflow(workflow::WorkflowArgs),
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Workspace root.
    #[arg(long, default_value = ".")]
    pub base: PathBuf,
}

impl Cli {
    /// Effective configuration: file and environment, then flags.
    pub fn settings(&self) -> Result<WbConfig> {
        let mut config = WbConfig::load(Some(self.config.as_path()))?;
        if let Some(dir) = &self.warehouse {
            config.warehouse_dir = dir.clone();
        }
        if let Some(dir) = &self.projects {
            config.projects_dir = dir.clone();
        }
        Ok(config)
    }

    /// Verbose flags win over the configured level.
    pub fn log_config(&self, config: &WbConfig) -> WbLogConfig {
        if self.verbose > 0 {
            WbLogConfig::from_verbosity(self.verbose)
        } else {
            WbLogConfig::default().level(&config.log_level)
        }
    }
}

/// Resolved settings handed to every command.
#[derive(Debug, Clone)]
pub struct Session {
    pub config: WbConfig,
}

impl Session {
    pub fn new(config: WbConfig) -> Self {
        Session { config }
    }

    pub fn warehouse(&self) -> Result<WbWarehouse> {
        Ok(WbWarehouse::open(&self.config.warehouse_dir)?
            .with_default_format(self.config.default_format))
    }

    pub fn projects(&self) -> Result<WbProjects> {
        Ok(WbProjects::open(&self.config.projects_dir)?)
    }
}

pub fn execute(command: Commands, session: &Session) -> Result<()> {
    match command {
        Commands::Init(args) => {
            for dir in init_workspace(&args.base)? {
                log::debug!("ensured {}", dir.display());
            }
            log::info!("data/{{raw,processed}}, reports/{{excel,pdf}}, templates, logs");
            Ok(())
        }
        Commands::Warehouse(args) => warehouse::execute(args, session),
        Commands::Projects(args) => projects::execute(args, session),
        Commands::Workflow(args) => workflow::execute(args, session),
    }
}
