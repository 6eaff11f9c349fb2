// 1. Traits
pub use crate::io::{FileExtension, Frame, FrameName, ToCsv, ToJson};

// 2. Ingestion
pub use crate::cache::{TableCache, global_cache, load_and_merge, load_and_merge_with_report};
pub use crate::config::IngestConfig;
pub use crate::ingest::{
    LoadOutcome, LoadReport, LoadedFile, SkippedFile, merge_directory,
    volume::{ColumnMapping, rename_volume_column},
};

// 3. Market Data Types
pub use crate::data::{bar::Bar, coin::KnownCoin, market_col::MarketCol, table::MarketTable};

// 4. Views
pub use crate::views::{
    GrowthKind, TimeScale, ViewFrame, YearRange,
    battle::{BattleQuery, compare},
    chart::{ChartKind, ChartSpec},
    fluctuations::{SpreadQuery, open_close_spread},
    growth::{GrowthQuery, growth},
    market_cap::market_share,
    overview::{RECENT_BARS, last_closes, price_on},
    trade_count::trade_counts,
    volume::{VolumeAnalysis, VolumeLeader, VolumeQuery, volume_analysis},
};

// 5. Errors
pub use crate::error::{CoinlensError, CoinlensResult, DataError, IoError, SystemError};
