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

//! Standard workspace folders.

use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::store::ensure_dir;

pub const WORKSPACE_DIRS: [&str; 6] = [
    "data/raw",
    "data/processed",
    "reports/excel",
    "reports/pdf",
    "templates",
    "logs",
];

/// Ensures the standard folders under `base` and returns them in order.
pub fn init_workspace(base: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let base = base.as_ref();
    let dirs = WORKSPACE_DIRS
        .iter()
        .map(|dir| ensure_dir(base.join(dir)))
        .collect::<Result<Vec<_>>>()?;
    log::info!("workspace folders ensured under {}", base.display());
    Ok(dirs)
}
