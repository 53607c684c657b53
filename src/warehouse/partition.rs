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

//! Hive-style partition paths.
//!
//! A partition is an ordered list of `key=value` pairs. The order given by
//! the caller is the order of the directory segments, so `{date, source}`
//! and `{source, date}` resolve to different directories. Partition values
//! live only in the path; nothing is added to row data.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, WbError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbPartition {
    pairs: Vec<(String, String)>,
}

impl WbPartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `key=value` segment.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Parses `k1=v1,k2=v2`. Empty pieces are skipped; a piece without `=`
    /// is rejected. Only the first `=` splits, so values may contain `=`.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut partition = WbPartition::new();
        for piece in spec.split(',') {
            if piece.is_empty() {
                continue;
            }
            let (key, value) = piece.split_once('=').ok_or_else(|| {
                WbError::validation(format!("partition must be k=v pairs, got '{piece}'"))
            })?;
            partition.pairs.push((key.to_string(), value.to_string()));
        }
        partition.validate()?;
        Ok(partition)
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Directory segments in order, e.g. `["date=2025-01-01", "source=api"]`.
    pub fn segments(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    /// Keys must be non-empty and no key or value may contain a path
    /// separator.
    pub fn validate(&self) -> Result<()> {
        for (key, value) in self.iter() {
            if key.is_empty() {
                return Err(WbError::validation("partition key cannot be empty"));
            }
            if [key, value]
                .iter()
                .any(|part| part.contains('/') || part.contains('\\'))
            {
                return Err(WbError::validation(format!(
                    "partition segment '{key}={value}' cannot contain a path separator"
                )));
            }
        }
        Ok(())
    }

    /// Appends this partition's segments to `base`.
    pub fn resolve(&self, base: &Path) -> PathBuf {
        self.segments()
            .into_iter()
            .fold(base.to_path_buf(), |dir, segment| dir.join(segment))
    }
}

impl fmt::Display for WbPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments().join(","))
    }
}
