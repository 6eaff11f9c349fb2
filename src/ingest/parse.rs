use std::path::Path;

use polars::{
    frame::DataFrame,
    prelude::{IntoLazy, LazyCsvReader, LazyFileListReader, PlPath},
};

use crate::{
    config::IngestConfig,
    error::{CoinlensResult, DataError, IoError},
    ingest::volume::ColumnMapping,
};

/// Zero inference rows makes polars read every column as text. Dtypes come from
/// the canonical cast in [`ColumnMapping::projection`], so a decimal appearing
/// late in an integer-looking column cannot fail the read.
const TEXT_ONLY_INFERENCE: Option<usize> = Some(0);

/// Parses one source file into a frame with the canonical schema.
///
/// The file is accepted or rejected as a whole: a malformed CSV, a missing
/// canonical column, an ambiguous volume column, a failed cast or a single null
/// value in a canonical column rejects the entire file.
pub(crate) fn read_source(path: &Path, config: &IngestConfig) -> CoinlensResult<DataFrame> {
    let uri = path.to_str().ok_or_else(|| {
        IoError::FileSystem(format!(
            "Path contains invalid UTF-8 characters: {}",
            path.display()
        ))
    })?;

    let raw = LazyCsvReader::new(PlPath::new(uri))
        .with_has_header(true)
        .with_separator(config.separator)
        .with_skip_rows(config.skip_rows)
        .with_infer_schema_length(TEXT_ONLY_INFERENCE)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|e| IoError::ReadFailed(e.to_string()))?;

    let names = raw
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>();
    let mapping = ColumnMapping::resolve(&names, config)?;

    let df = raw
        .lazy()
        .select(mapping.projection())
        .collect()
        .map_err(|e| DataError::DataFrame(format!("Failed to normalize columns: {e}")))?;

    if let Some(column) = df.get_columns().iter().find(|c| c.null_count() > 0) {
        return Err(DataError::NullValues {
            column: column.name().to_string(),
            count: column.null_count(),
        }
        .into());
    }

    Ok(df)
}
