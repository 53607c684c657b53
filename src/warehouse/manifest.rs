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

//! Warehouse manifest document.
//!
//! ```json
//! {
//!   "datasets": {
//!     "events": { "format": "parquet", "partitioning": ["date"] }
//!   }
//! }
//! ```
//!
//! Unknown keys are ignored on read and missing fields take their defaults.
//! Only `format` and `partitioning` are ever written.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::store::WbJsonStore;
use crate::warehouse::dataset::{WbDataset, WbFormat};

pub type WbManifestStore = WbJsonStore<WbManifest>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WbManifest {
    #[serde(default)]
    pub datasets: BTreeMap<String, WbManifestEntry>,
}

/// Manifest entry as stored. `format` stays a raw string so an entry edited
/// by hand still loads; it is parsed when the dataset is materialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WbManifestEntry {
    #[serde(default = "default_format_name")]
    pub format: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub partitioning: Vec<String>,
}

fn default_format_name() -> String {
    WbFormat::default().as_str().to_string()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WbManifestEntry {
    pub fn from_dataset(dataset: &WbDataset) -> Self {
        WbManifestEntry {
            format: dataset.format.as_str().to_string(),
            partitioning: dataset.partitioning.clone(),
        }
    }

    /// Rebuilds the dataset; an unknown format name fails with
    /// `UnsupportedFormat`.
    pub fn to_dataset(&self, name: &str) -> Result<WbDataset> {
        let format: WbFormat = self.format.parse()?;
        Ok(WbDataset::new(name, format).with_partitioning(self.partitioning.clone()))
    }
}
