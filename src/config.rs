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

//! # Workbench Configuration
//!
//! Settings are resolved in three layers, later ones winning:
//!
//! 1. built-in defaults (`warehouse/`, `projects/`, csv, `info`)
//! 2. an optional YAML file
//! 3. `WORKBENCH_WAREHOUSE`, `WORKBENCH_PROJECTS`, `WORKBENCH_LOG_LEVEL`
//!
//! ```yaml
//! warehouse_dir: /data/warehouse
//! default_format: parquet
//! log_level: debug
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::warehouse::WbFormat;

pub const ENV_WAREHOUSE: &str = "WORKBENCH_WAREHOUSE";
pub const ENV_PROJECTS: &str = "WORKBENCH_PROJECTS";
pub const ENV_LOG_LEVEL: &str = "WORKBENCH_LOG_LEVEL";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WbConfig {
    pub warehouse_dir: PathBuf,
    pub projects_dir: PathBuf,
    /// Format for datasets registered implicitly by a write.
    pub default_format: WbFormat,
    pub log_level: String,
}

impl Default for WbConfig {
    fn default() -> Self {
        WbConfig {
            warehouse_dir: PathBuf::from("warehouse"),
            projects_dir: PathBuf::from("projects"),
            default_format: WbFormat::Csv,
            log_level: "info".to_string(),
        }
    }
}

impl WbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warehouse_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.warehouse_dir = dir.into();
        self
    }

    pub fn projects_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.projects_dir = dir.into();
        self
    }

    pub fn default_format(mut self, format: WbFormat) -> Self {
        self.default_format = format;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    /// Defaults, overlaid by `path` when given and present, then by the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) if path.exists() => Self::from_yaml(&fs::read_to_string(path)?)?,
            Some(path) => {
                log::debug!("config file {} not found; using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Parses a YAML document; absent keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let file: WbConfigFile = if text.trim().is_empty() {
            WbConfigFile::default()
        } else {
            serde_yaml::from_str(text)?
        };
        file.build()
    }

    /// Applies the `WORKBENCH_*` overrides found through `lookup`.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_WAREHOUSE).filter(|v| !v.is_empty()) {
            self.warehouse_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_PROJECTS).filter(|v| !v.is_empty()) {
            self.projects_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.is_empty()) {
            self.log_level = level;
        }
        Ok(self)
    }
}

/// On-disk shape of the config file: every key optional.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WbConfigFile {
    pub warehouse_dir: Option<PathBuf>,
    pub projects_dir: Option<PathBuf>,
    pub default_format: Option<String>,
    pub log_level: Option<String>,
}

impl WbConfigFile {
    pub fn build(self) -> Result<WbConfig> {
        let base = WbConfig::default();
        Ok(WbConfig {
            warehouse_dir: self.warehouse_dir.unwrap_or(base.warehouse_dir),
            projects_dir: self.projects_dir.unwrap_or(base.projects_dir),
            default_format: match self.default_format {
                Some(format) => format.parse()?,
                None => base.default_format,
            },
            log_level: self.log_level.unwrap_or(base.log_level),
        })
    }
}
