use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use polars::{
    frame::DataFrame,
    prelude::{CsvWriter, SerWriter},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    error::{CoinlensResult, IoError},
    polars_ext::DataFrameExt,
};

/// Common interface of every tabular output (market table, view results).
pub trait Frame {
    fn as_df(&self) -> &DataFrame;
}

pub trait FrameName {
    fn base_name(&self) -> String;

    fn filename(&self, ext: FileExtension) -> String {
        format!("{}.{}", self.base_name(), ext)
    }
}

pub trait ToJson {
    /// Serializes the frame to a `Value::Array` of row objects.
    fn to_json(&self) -> CoinlensResult<Value>;
}

impl<T: Frame> ToJson for T {
    fn to_json(&self) -> CoinlensResult<Value> {
        let rows = self.as_df().to_json_rows()?;
        Ok(Value::Array(rows.into_iter().map(Value::Object).collect()))
    }
}

/// Comma separated export with a header row.
///
/// A [`MarketTable`](crate::data::table::MarketTable) written this way carries the
/// canonical header, so the file is itself a valid ingestion source.
pub trait ToCsv: Frame + FrameName {
    /// Writes `<dir>/<base_name>.csv`, creating `dir` and overwriting an existing
    /// file. Returns the path written.
    fn to_csv(&self, dir: impl AsRef<Path>) -> CoinlensResult<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            IoError::FileSystem(format!("Failed to create {}: {e}", dir.display()))
        })?;

        let path = dir.join(self.filename(FileExtension::Csv));
        let write_failed = |e: &dyn std::fmt::Display| {
            IoError::WriteFailed(format!("'{}': {e}", path.display()))
        };

        let mut file = File::create(&path).map_err(|e| write_failed(&e))?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut self.as_df().clone())
            .map_err(|e| write_failed(&e))?;

        Ok(path)
    }
}

impl<T: Frame + FrameName> ToCsv for T {}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum FileExtension {
    Csv,
    Json,
}
