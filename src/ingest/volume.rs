use polars::prelude::{Expr, col};
use strum::IntoEnumIterator;

use crate::{
    config::IngestConfig,
    data::market_col::MarketCol,
    error::{CoinlensError, CoinlensResult, DataError},
};

const VOLUME_PREFIX: &str = "Volume ";

/// Canonical name of a source column.
///
/// Every `Volume <X>` header other than the quote volume column collapses to
/// `Volume`. All other names, including `Volume` itself, pass through unchanged,
/// so applying the rename twice gives the same result as applying it once.
pub fn rename_volume_column<'a>(name: &'a str, config: &IngestConfig) -> &'a str {
    if is_base_volume(name, config) {
        MarketCol::Volume.as_str()
    } else {
        name
    }
}

fn is_base_volume(name: &str, config: &IngestConfig) -> bool {
    if name == MarketCol::Volume.as_str() {
        return true;
    }
    match name.strip_prefix(VOLUME_PREFIX) {
        Some(asset) => !asset.is_empty() && name != config.quote_volume_column(),
        None => false,
    }
}

/// Source column feeding each canonical column of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    sources: Vec<(MarketCol, String)>,
}

impl ColumnMapping {
    /// Resolves the canonical columns against the header of one source file.
    ///
    /// # Errors
    /// - [`DataError::MissingColumn`] if a canonical column has no source.
    /// - [`DataError::AmbiguousVolumeColumn`] if more than one header renames to `Volume`.
    pub fn resolve<S: AsRef<str>>(names: &[S], config: &IngestConfig) -> CoinlensResult<Self> {
        let volume_sources = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|n| is_base_volume(n, config))
            .collect::<Vec<_>>();

        if volume_sources.len() > 1 {
            return Err(DataError::AmbiguousVolumeColumn(
                volume_sources.iter().map(|s| s.to_string()).collect(),
            )
            .into());
        }

        let quote = config.quote_volume_column();
        let sources = MarketCol::iter()
            .map(|c| {
                let source = match c {
                    MarketCol::Volume => volume_sources.first().copied(),
                    MarketCol::VolumeQuote => names
                        .iter()
                        .map(AsRef::as_ref)
                        .find(|n| *n == quote.as_str()),
                    other => names
                        .iter()
                        .map(AsRef::as_ref)
                        .find(|n| *n == other.as_str()),
                };
                source
                    .map(|s| (c, s.to_string()))
                    .ok_or_else(|| CoinlensError::from(DataError::MissingColumn(c.to_string())))
            })
            .collect::<CoinlensResult<Vec<_>>>()?;

        Ok(Self { sources })
    }

    pub fn source(&self, column: MarketCol) -> Option<&str> {
        self.sources
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, s)| s.as_str())
    }

    /// Projection renaming, casting and ordering source columns into the canonical layout.
    pub(crate) fn projection(&self) -> Vec<Expr> {
        self.sources
            .iter()
            .map(|(c, source)| col(source.as_str()).strict_cast(c.dtype()).alias(*c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(volume: &str) -> Vec<String> {
        [
            "Unix",
            "Date",
            "Symbol",
            "Open",
            "High",
            "Low",
            "Close",
            volume,
            "Volume USDT",
            "tradecount",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    #[test]
    fn test_rename_volume_column() {
        let cfg = IngestConfig::default();
        assert_eq!(rename_volume_column("Volume BTC", &cfg), "Volume");
        assert_eq!(rename_volume_column("Volume SHIB", &cfg), "Volume");
        assert_eq!(rename_volume_column("Volume USDT", &cfg), "Volume USDT");
        assert_eq!(rename_volume_column("Volume", &cfg), "Volume");
        assert_eq!(rename_volume_column("Close", &cfg), "Close");
        assert_eq!(rename_volume_column("Volume ", &cfg), "Volume ");
    }

    #[test]
    fn test_rename_is_idempotent() {
        let cfg = IngestConfig::default();
        for name in header("Volume ETH") {
            let once = rename_volume_column(&name, &cfg);
            let twice = rename_volume_column(once, &cfg);
            assert_eq!(once, twice, "rename not idempotent for '{name}'");
        }
    }

    #[test]
    fn test_resolve_maps_per_symbol_volume() {
        let cfg = IngestConfig::default();
        let mapping = ColumnMapping::resolve(&header("Volume DOGE"), &cfg).expect("resolve");

        assert_eq!(mapping.source(MarketCol::Volume), Some("Volume DOGE"));
        assert_eq!(mapping.source(MarketCol::VolumeQuote), Some("Volume USDT"));
        assert_eq!(mapping.source(MarketCol::TradeCount), Some("tradecount"));
        assert_eq!(mapping.projection().len(), 10);
    }

    #[test]
    fn test_resolve_accepts_already_normalized_header() {
        let cfg = IngestConfig::default();
        let mapping = ColumnMapping::resolve(&header("Volume"), &cfg).expect("resolve");
        assert_eq!(mapping.source(MarketCol::Volume), Some("Volume"));
    }

    #[test]
    fn test_resolve_uses_configured_quote_asset() {
        let cfg = IngestConfig::default().with_quote_asset("BUSD");
        let mut names = header("Volume BTC");
        names[8] = "Volume BUSD".to_string();

        let mapping = ColumnMapping::resolve(&names, &cfg).expect("resolve");
        assert_eq!(mapping.source(MarketCol::VolumeQuote), Some("Volume BUSD"));
        assert_eq!(mapping.source(MarketCol::Volume), Some("Volume BTC"));
    }

    #[test]
    fn test_resolve_rejects_missing_and_ambiguous_columns() {
        let cfg = IngestConfig::default();

        let mut missing = header("Volume BTC");
        missing.retain(|n| n != "tradecount");
        let err = ColumnMapping::resolve(&missing, &cfg).expect_err("missing column");
        assert!(err.to_string().contains("tradecount"));

        let mut ambiguous = header("Volume BTC");
        ambiguous.push("Volume ETH".to_string());
        let err = ColumnMapping::resolve(&ambiguous, &cfg).expect_err("ambiguous volume");
        assert!(matches!(
            err,
            crate::error::CoinlensError::Data(DataError::AmbiguousVolumeColumn(_))
        ));
    }
}
