use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use parking_lot::RwLock;
use tracing::debug;

use crate::{
    config::IngestConfig,
    data::table::MarketTable,
    error::{CoinlensResult, IoError},
    ingest::{self, LoadOutcome, scan::DirFingerprint},
};

static GLOBAL_CACHE: LazyLock<TableCache> = LazyLock::new(TableCache::default);

/// Loads and merges `dir` through the process-wide cache using [`IngestConfig::default`].
///
/// Repeated calls on an unchanged directory return the memoized table without
/// touching the source files again. A change to the directory listing, or to the
/// size or mtime of a candidate file, triggers a rebuild.
///
/// # Errors
/// Fails only if `dir` is missing or unreadable.
pub fn load_and_merge(dir: impl AsRef<Path>) -> CoinlensResult<MarketTable> {
    GLOBAL_CACHE.get_or_load(dir)
}

/// Like [`load_and_merge`], but also returns which files were loaded or skipped.
pub fn load_and_merge_with_report(dir: impl AsRef<Path>) -> CoinlensResult<LoadOutcome> {
    GLOBAL_CACHE.get_or_load_with_report(dir)
}

/// The cache behind [`load_and_merge`].
pub fn global_cache() -> &'static TableCache {
    &GLOBAL_CACHE
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: DirFingerprint,
    outcome: LoadOutcome,
}

/// Memoizes merged tables keyed on the canonical directory path.
///
/// Reads take a shared lock. A rebuild happens outside the lock and only the
/// insertion takes the exclusive lock.
#[derive(Debug, Default)]
pub struct TableCache {
    config: IngestConfig,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl TableCache {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    pub fn get_or_load(&self, dir: impl AsRef<Path>) -> CoinlensResult<MarketTable> {
        self.get_or_load_with_report(dir).map(|o| o.table)
    }

    pub fn get_or_load_with_report(&self, dir: impl AsRef<Path>) -> CoinlensResult<LoadOutcome> {
        let key = canonical_key(dir.as_ref())?;
        let fingerprint = DirFingerprint::capture(&key, &self.config.extension)?;

        if let Some(entry) = self.entries.read().get(&key) {
            if entry.fingerprint == fingerprint {
                debug!(dir = %key.display(), "Market table cache hit");
                return Ok(entry.outcome.clone());
            }
            debug!(dir = %key.display(), "Market table cache stale");
        }

        debug!(dir = %key.display(), "Market table cache miss");
        let outcome = ingest::merge_directory(&key, &self.config)?;
        self.entries.write().insert(
            key,
            CacheEntry {
                fingerprint,
                outcome: outcome.clone(),
            },
        );
        Ok(outcome)
    }

    /// Evicts the entry for `dir`. Returns whether an entry was present.
    pub fn invalidate(&self, dir: impl AsRef<Path>) -> bool {
        let key = canonical_key(dir.as_ref()).unwrap_or_else(|_| dir.as_ref().to_path_buf());
        self.entries.write().remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, dir: impl AsRef<Path>) -> bool {
        canonical_key(dir.as_ref())
            .map(|key| self.entries.read().contains_key(&key))
            .unwrap_or(false)
    }
}

fn canonical_key(dir: &Path) -> CoinlensResult<PathBuf> {
    fs::canonicalize(dir).map_err(|source| {
        IoError::DirectoryUnreadable {
            path: dir.to_path_buf(),
            source,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Frame;

    const ETH_CSV: &str = "\
Unix,Date,Symbol,Open,High,Low,Close,Volume ETH,Volume USDT,tradecount
1609459200,2021-01-01,ETH,736.42,749.0,714.29,728.91,675715.1,494749565.2,512337
";

    #[test]
    fn test_cache_hit_returns_identical_table() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(tmp.path().join("ETH.csv"), ETH_CSV).expect("failed to write fixture");

        let cache = TableCache::default();
        let first = cache.get_or_load(tmp.path()).expect("first load");
        let second = cache.get_or_load(tmp.path()).expect("second load");

        assert_eq!(cache.len(), 1);
        assert!(first.as_df().equals(second.as_df()));
    }

    #[test]
    fn test_cache_rebuilds_when_directory_changes() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(tmp.path().join("ETH.csv"), ETH_CSV).expect("failed to write fixture");

        let cache = TableCache::default();
        assert_eq!(cache.get_or_load(tmp.path()).expect("load").height(), 1);

        let btc = ETH_CSV.replace("ETH", "BTC");
        fs::write(tmp.path().join("BTC.csv"), btc).expect("failed to write fixture");

        let reloaded = cache.get_or_load(tmp.path()).expect("reload");
        assert_eq!(reloaded.height(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let cache = TableCache::default();

        cache.get_or_load(tmp.path()).expect("load empty dir");
        assert!(cache.contains(tmp.path()));
        assert!(cache.invalidate(tmp.path()));
        assert!(!cache.invalidate(tmp.path()));

        cache.get_or_load(tmp.path()).expect("load empty dir");
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_missing_directory_is_not_cached() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let cache = TableCache::default();

        assert!(cache.get_or_load(tmp.path().join("missing")).is_err());
        assert!(cache.is_empty());
    }
}
