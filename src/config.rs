use serde::{Deserialize, Serialize};

/// Controls how a directory of per-symbol CSV files is scanned and parsed.
///
/// # Example
/// ```
/// # use coinlens::prelude::*;
/// let config = IngestConfig::default()
///     .with_skip_rows(1)
///     .with_quote_asset("USDT");
/// assert_eq!(config.skip_rows, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IngestConfig {
    /// File name suffix selecting candidate files. Matched case-sensitively.
    pub extension: String,

    /// Field separator of the source files.
    pub separator: u8,

    /// Number of lines to skip before the header row.
    ///
    /// CryptoDataDownload exports start with a banner line, so they need `1`.
    pub skip_rows: usize,

    /// Quote asset of the traded pairs.
    ///
    /// `Volume <quote_asset>` is kept as the quote volume column; every other
    /// `Volume <X>` column is treated as the base volume.
    pub quote_asset: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            extension: ".csv".to_string(),
            separator: b',',
            skip_rows: 0,
            quote_asset: "USDT".to_string(),
        }
    }
}

impl IngestConfig {
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn with_quote_asset(mut self, quote_asset: impl Into<String>) -> Self {
        self.quote_asset = quote_asset.into();
        self
    }

    /// Name of the quote volume column in source files, e.g. `Volume USDT`.
    pub fn quote_volume_column(&self) -> String {
        format!("Volume {}", self.quote_asset)
    }
}
