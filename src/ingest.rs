use std::path::Path;

use polars::prelude::{IntoLazy, UnionArgs, col};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::{
    config::IngestConfig,
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
};

pub mod parse;
pub mod report;
pub mod scan;
pub mod volume;

pub use report::{LoadOutcome, LoadReport, LoadedFile, SkippedFile};

/// Loads every candidate file of `dir` and merges them into one canonical table.
///
/// Files are read sequentially in file name order. A file that fails to parse is
/// logged, recorded in the [`LoadReport`] and left out; it never aborts the load.
/// If no file parses, the result is an empty table that still carries the
/// canonical schema.
///
/// This function does not cache. See [`crate::cache::TableCache`] for the
/// memoized entry point.
///
/// # Errors
/// Only a missing or unreadable `dir` is fatal.
pub fn merge_directory(dir: impl AsRef<Path>, config: &IngestConfig) -> CoinlensResult<LoadOutcome> {
    let dir = dir.as_ref();
    let candidates = scan::list_candidates(dir, &config.extension)?;

    let mut frames = Vec::with_capacity(candidates.len());
    let mut report = LoadReport::default();

    for path in &candidates {
        let file_name = scan::file_name_of(path);
        match parse::read_source(path, config) {
            Ok(df) => {
                debug!(file = %file_name, rows = df.height(), "Parsed source file");
                report.loaded.push(LoadedFile {
                    file_name,
                    rows: df.height(),
                });
                frames.push(df.lazy());
            }
            Err(e) => {
                warn!(file = %file_name, error = %e, "Skipping source file that failed to parse");
                report.skipped.push(SkippedFile {
                    file_name,
                    reason: e.to_string(),
                });
            }
        }
    }

    let table = if frames.is_empty() {
        MarketTable::empty()
    } else {
        let canonical = MarketCol::iter().map(col).collect::<Vec<_>>();
        let merged = polars::prelude::concat(
            frames,
            UnionArgs {
                rechunk: true,
                ..Default::default()
            },
        )
        .map_err(|e| polars_err("Merge plan failed", e))?
        .select(canonical)
        .collect()
        .map_err(|e| polars_err("Merge failed", e))?;
        MarketTable::new(merged)?
    };

    info!(
        dir = %dir.display(),
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        rows = table.height(),
        "Merged market data"
    );

    Ok(LoadOutcome { table, report })
}
