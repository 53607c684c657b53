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

//! Logger setup for the `workbench` binary.
//!
//! The library only emits through the `log` facade; this module installs
//! `env_logger` behind it. `RUST_LOG`, when set, takes precedence over the
//! configured level.

use std::io::Write;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, WbError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WbLogConfig {
    pub level: String,
    pub timestamps: bool,
}

impl Default for WbLogConfig {
    fn default() -> Self {
        WbLogConfig {
            level: "info".to_string(),
            timestamps: true,
        }
    }
}

impl WbLogConfig {
    /// `-v` count to level: 0 info, 1 debug, 2 and above trace.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        WbLogConfig {
            level: level.to_string(),
            ..Self::default()
        }
    }

    pub fn level(mut self, level: &str) -> Self {
        self.level = level.to_string();
        self
    }

    pub fn level_filter(&self) -> LevelFilter {
        parse_level(&self.level)
    }

    /// Installs the global logger. Fails if one is already installed.
    pub fn init(&self) -> Result<()> {
        let timestamps = self.timestamps;
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(self.level_filter().as_str()),
        )
        .format(move |buf, record| {
            let level = record.level();
            let target = record.target();
            let style = buf.default_level_style(level);
            let args = record.args();
            if timestamps {
                let timestamp = buf.timestamp();
                writeln!(buf, "[{timestamp} {style}{level}{style:#} {target}] {args}")
            } else {
                writeln!(buf, "[{style}{level}{style:#} {target}] {args}")
            }
        })
        .try_init()
        .map_err(|err| WbError::internal(format!("logger already initialized: {err}")))
    }
}

/// Unknown names fall back to info.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}
