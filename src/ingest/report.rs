use serde::{Deserialize, Serialize};

use crate::data::table::MarketTable;

/// A source file that made it into the merged table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedFile {
    pub file_name: String,
    pub rows: usize,
}

/// A source file that was excluded, with the reason it failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// Per-file account of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub loaded: Vec<LoadedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl LoadReport {
    /// Sum of the row counts of all loaded files.
    pub fn total_rows(&self) -> usize {
        self.loaded.iter().map(|f| f.rows).sum()
    }

    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skipped.iter().any(|f| f.file_name == file_name)
    }
}

/// The merged table together with the report of how it was built.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub table: MarketTable,
    pub report: LoadReport,
}
