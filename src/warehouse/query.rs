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

//! SQL over warehouse datasets.
//!
//! Every call opens a fresh DataFusion session and declares one view per
//! registered dataset, `ds_<name>`, scanning all of the dataset's files of
//! its format recursively. Views therefore always reflect what is on disk
//! when the call starts; nothing is cached between calls.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use datafusion::arrow::datatypes::Schema;
use datafusion::datasource::MemTable;
use datafusion::prelude::{
    CsvReadOptions, NdJsonReadOptions, ParquetReadOptions, SessionConfig, SessionContext,
};

use crate::errors::{Result, WbError};
use crate::table::WbTable;
use crate::warehouse::batch::batch_files;
use crate::warehouse::dataset::WbFormat;
use crate::warehouse::WbWarehouse;

/// Extra views for [`WbWarehouse::sql`]: view name → file path or glob.
pub type WbExtraViews = BTreeMap<String, String>;

impl WbWarehouse {
    /// Runs `query` against `ds_<name>` views for every dataset plus
    /// `extra_views`, returning the whole result.
    ///
    /// An extra view whose path does not end in `.csv`, `.jsonl` or
    /// `.parquet` is skipped; a query naming it fails as an unknown table.
    pub fn sql(&self, query: &str, extra_views: &WbExtraViews) -> Result<WbTable> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.sql_async(query, extra_views))
    }

    async fn sql_async(&self, query: &str, extra_views: &WbExtraViews) -> Result<WbTable> {
        let config = SessionConfig::new()
            .set_bool("datafusion.execution.listing_table_ignore_subdirectory", false);
        let ctx = SessionContext::new_with_config(config);

        for (name, dataset) in self.list_datasets()? {
            let dir = self.partition_path(&name, None)?;
            let view = dataset.view_name();
            if batch_files(&dir, dataset.format)?.is_empty() {
                log::debug!("view {view}: no {} files yet", dataset.format);
                register_empty(&ctx, &view)?;
                continue;
            }
            let location = format!("{}/", std::path::absolute(&dir)?.display());
            register_view(&ctx, &view, &location, dataset.format).await?;
        }

        for (view, location) in extra_views {
            match WbFormat::from_path(Path::new(location)) {
                Some(format) => register_view(&ctx, view, location, format).await?,
                None => log::debug!("skipping extra view {view}: unrecognized extension in {location}"),
            }
        }

        log::debug!("executing sql: {query}");
        let frame = ctx.sql(query).await?;
        let schema: Schema = frame.schema().as_arrow().clone();
        let batches = frame.collect().await?;
        WbTable::from_record_batches(&schema, &batches)
    }
}

async fn register_view(
    ctx: &SessionContext,
    view: &str,
    location: &str,
    format: WbFormat,
) -> Result<()> {
    log::debug!("view {view} -> {location} ({format})");
    match format {
        WbFormat::Parquet => {
            ctx.register_parquet(view, location, ParquetReadOptions::default())
                .await?
        }
        WbFormat::Csv => {
            ctx.register_csv(
                view,
                location,
                CsvReadOptions::new()
                    .has_header(true)
                    .file_extension(format.extension()),
            )
            .await?
        }
        WbFormat::Jsonl => {
            ctx.register_json(
                view,
                location,
                NdJsonReadOptions::default().file_extension(format.extension()),
            )
            .await?
        }
    }
    Ok(())
}

/// Declares a view with no columns and no rows.
fn register_empty(ctx: &SessionContext, view: &str) -> Result<()> {
    let table = MemTable::try_new(Arc::new(Schema::empty()), vec![vec![]])?;
    ctx.register_table(view, Arc::new(table))
        .map_err(|err| WbError::Query(err.to_string()))?;
    Ok(())
}
