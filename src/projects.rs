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

//! # Projects Registry
//!
//! Named work areas under a projects directory, one of which may be marked
//! current. The registry is a single JSON document:
//!
//! ```text
//! projects/
//!   manifest.json   {"projects": {name: {description, created, updated}}, "current": name|null}
//!   <name>/notes/ scratch/ reports/ artifacts/ templates/
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WbError};
use crate::store::{ensure_dir, WbJsonStore};

pub const PROJECTS_MANIFEST: &str = "manifest.json";

/// Subdirectories scaffolded for every new project.
pub const PROJECT_DIRS: [&str; 5] = ["notes", "scratch", "reports", "artifacts", "templates"];

const TS_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn now_timestamp() -> String {
    Utc::now().format(TS_FMT).to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbProjectMeta {
    #[serde(default)]
    pub description: String,
    #[serde(default = "now_timestamp")]
    pub created: String,
    #[serde(default = "now_timestamp")]
    pub updated: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WbProjectsDocument {
    #[serde(default)]
    pub projects: BTreeMap<String, WbProjectMeta>,
    #[serde(default)]
    pub current: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbProject {
    pub name: String,
    pub description: String,
    pub created: String,
    pub updated: String,
}

impl WbProject {
    fn from_meta(name: &str, meta: &WbProjectMeta) -> Self {
        WbProject {
            name: name.to_string(),
            description: meta.description.clone(),
            created: meta.created.clone(),
            updated: meta.updated.clone(),
        }
    }
}

/// Summary returned by [`WbProjects::context`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbProjectContext {
    pub current: Option<String>,
    /// All project names, most recently updated first.
    pub projects: Vec<String>,
    pub recent: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WbProjects {
    base_path: PathBuf,
    store: WbJsonStore<WbProjectsDocument>,
}

impl WbProjects {
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = ensure_dir(base_path.into())?;
        let store = WbJsonStore::open(base_path.join(PROJECTS_MANIFEST))?;
        Ok(WbProjects { base_path, store })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn list(&self) -> Result<BTreeMap<String, WbProject>> {
        let document = self.store.read()?;
        Ok(document
            .projects
            .iter()
            .map(|(name, meta)| (name.clone(), WbProject::from_meta(name, meta)))
            .collect())
    }

    pub fn current(&self) -> Result<Option<String>> {
        Ok(self.store.read()?.current)
    }

    /// Marks `name` current and bumps its `updated` timestamp.
    pub fn set_current(&self, name: &str) -> Result<()> {
        let mut document = self.store.read()?;
        let meta = document
            .projects
            .get_mut(name)
            .ok_or_else(|| WbError::ProjectNotFound {
                name: name.to_string(),
            })?;
        meta.updated = now_timestamp();
        document.current = Some(name.to_string());
        self.store.write(&document)?;
        log::info!("current project set to {name}");
        Ok(())
    }

    /// Creates a project and its directories. An existing project is
    /// returned as stored; `description` is then ignored.
    pub fn create(&self, name: &str, description: &str) -> Result<WbProject> {
        validate_project_name(name)?;
        let mut document = self.store.read()?;
        if let Some(meta) = document.projects.get(name) {
            log::debug!("project {name} already exists");
            return Ok(WbProject::from_meta(name, meta));
        }

        let now = now_timestamp();
        let meta = WbProjectMeta {
            description: description.to_string(),
            created: now.clone(),
            updated: now,
        };
        let project = WbProject::from_meta(name, &meta);
        document.projects.insert(name.to_string(), meta);
        self.store.write(&document)?;

        let root = self.root_for(name);
        for sub in PROJECT_DIRS {
            ensure_dir(root.join(sub))?;
        }
        log::info!("created project {name} at {}", root.display());
        Ok(project)
    }

    /// Current project plus every project ordered by `updated`, newest first;
    /// `recent` keeps the first `recent` of them. Ties keep name order.
    pub fn context(&self, recent: usize) -> Result<WbProjectContext> {
        let document = self.store.read()?;
        let mut ordered: Vec<(&String, &WbProjectMeta)> = document.projects.iter().collect();
        ordered.sort_by(|a, b| b.1.updated.cmp(&a.1.updated));

        let projects: Vec<String> = ordered.into_iter().map(|(name, _)| name.clone()).collect();
        let recent = projects.iter().take(recent).cloned().collect();
        Ok(WbProjectContext {
            current: document.current,
            projects,
            recent,
        })
    }

    pub fn root_for(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Root directory of the current project, created if missing.
    pub fn current_root(&self) -> Result<Option<PathBuf>> {
        match self.current()? {
            Some(name) => Ok(Some(ensure_dir(self.root_for(&name))?)),
            None => Ok(None),
        }
    }
}

fn validate_project_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(WbError::validation(format!("invalid project name '{name}'")));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(WbError::validation(format!(
            "project name '{name}' cannot contain path separators"
        )));
    }
    Ok(())
}
