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

//! # JSON File Store
//!
//! Both the warehouse manifest and the projects registry are single JSON
//! documents rewritten in full on every change. `WbJsonStore` owns one such
//! file: reads tolerate a missing or unparsable file by returning the
//! document's default, writes pretty-print the whole document.
//!
//! There is no locking. Concurrent writers race and the last write wins.

use std::fs;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{Result, WbError};

/// Creates `path` and all of its parents. Idempotent.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    fs::create_dir_all(path)?;
    Ok(path.to_path_buf())
}

/// Handle on a JSON document persisted at a fixed path.
#[derive(Debug, Clone)]
pub struct WbJsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T> WbJsonStore<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    /// Opens the store, creating the parent directory and an empty document
    /// when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = WbJsonStore {
            path: path.into(),
            _marker: PhantomData,
        };
        if let Some(parent) = store.path.parent() {
            ensure_dir(parent)?;
        }
        if !store.path.exists() {
            store.write(&T::default())?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document, reporting an unparsable file as `ManifestCorrupt`.
    ///
    /// A missing file is not corruption and yields the default document.
    pub fn try_read(&self) -> Result<T> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(T::default()),
            Err(err) if err.kind() == ErrorKind::InvalidData => {
                return Err(WbError::ManifestCorrupt {
                    path: self.path.display().to_string(),
                    message: err.to_string(),
                })
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&content).map_err(|err| WbError::ManifestCorrupt {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })
    }

    /// Loads the document; corruption is recovered as the default document.
    ///
    /// The unreadable content stays on disk until the next [`write`](Self::write)
    /// replaces it.
    pub fn read(&self) -> Result<T> {
        match self.try_read() {
            Err(WbError::ManifestCorrupt { path, message }) => {
                log::warn!("ignoring unreadable manifest {path}: {message}");
                Ok(T::default())
            }
            other => other,
        }
    }

    /// Serializes the full document, replacing the file.
    pub fn write(&self, document: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
