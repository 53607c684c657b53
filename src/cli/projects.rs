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

//! `workbench projects` subcommands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::cli::Session;

const RECENT_PROJECTS: usize = 10;

#[derive(Debug, Args)]
pub struct ProjectsArgs {
    #[command(subcommand)]
    pub command: ProjectsCommands,
}

#[derive(Debug, Subcommand)]
pub enum ProjectsCommands {
    /// List projects; the current one is starred.
    List,
    /// Create a project and, unless --no-current, select it.
    Create(CreateArgs),
    /// Select a project as current.
    Resume(ResumeArgs),
    /// Show the current and recently updated projects.
    Context(ContextArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,
    /// Short description.
    #[arg(long, default_value = "")]
    pub desc: String,
    #[arg(long)]
    pub no_current: bool,
}

#[derive(Debug, Args)]
pub struct ResumeArgs {
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct ContextArgs {
    #[arg(long)]
    pub json: bool,
}

pub fn execute(args: ProjectsArgs, session: &Session) -> Result<()> {
    let projects = session.projects()?;
    match args.command {
        ProjectsCommands::List => {
            let current = projects.current()?;
            let items = projects.list()?;
            if items.is_empty() {
                log::warn!("No projects found. Create one with: projects create --name <NAME>");
                return Ok(());
            }
            for (name, project) in items {
                let marker = if current.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    "-"
                };
                log::info!("{marker} {name}: {}", project.description);
            }
            Ok(())
        }
        ProjectsCommands::Create(args) => {
            let project = projects.create(&args.name, &args.desc)?;
            log::info!("Project created: {}", project.name);
            if !args.no_current {
                projects.set_current(&args.name)?;
            }
            Ok(())
        }
        ProjectsCommands::Resume(args) => match args.name {
            Some(name) => {
                projects.set_current(&name)?;
                log::info!("Resumed project: {name}");
                Ok(())
            }
            None => {
                let context = projects.context(RECENT_PROJECTS)?;
                log::info!("Available to resume (most recent first):");
                for name in &context.projects {
                    log::info!("- {name}");
                }
                anyhow::bail!("no project specified; select with: projects resume --name <NAME>")
            }
        },
        ProjectsCommands::Context(args) => {
            let context = projects.context(RECENT_PROJECTS)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&context)?);
            } else {
                log::info!(
                    "Current project: {}",
                    context.current.as_deref().unwrap_or("-")
                );
                log::info!("Recent projects:");
                for name in &context.recent {
                    log::info!("- {name}");
                }
            }
            Ok(())
        }
    }
}
