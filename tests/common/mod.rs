#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

pub const HEADER_PREFIX: &str = "Unix,Date,Symbol,Open,High,Low,Close";

pub fn fixture_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// A well-formed per-symbol export with `rows` daily bars starting 2021-01-01.
pub fn symbol_csv(symbol: &str, rows: usize) -> String {
    let mut body = format!("{HEADER_PREFIX},Volume {symbol},Volume USDT,tradecount\n");
    for i in 0..rows {
        let unix = 1_609_459_200 + 86_400 * i as i64;
        let day = i + 1;
        let close = 100.0 + i as f64;
        body.push_str(&format!(
            "{unix},2021-01-{day:02},{symbol},{open},{high},{low},{close},{vol},{quote},{trades}\n",
            open = close - 1.0,
            high = close + 2.0,
            low = close - 2.0,
            vol = 10.0 * (i + 1) as f64,
            quote = 1000.0 * (i + 1) as f64,
            trades = 50 + i,
        ));
    }
    body
}

pub fn write_csv(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("Failed to write CSV fixture");
    path
}
