mod common;

use chrono::NaiveDate;
use coinlens::prelude::*;
use common::fixture_dir;
use polars::prelude::LazyCsvReader;
use polars::prelude::{LazyFileListReader, PlPath};

fn fixture_table() -> MarketTable {
    merge_directory(fixture_dir("binance"), &IngestConfig::default())
        .expect("Failed to load fixture directory")
        .table
}

fn f64_column(view: &ViewFrame, name: &str) -> Vec<Option<f64>> {
    view.as_df()
        .column(name)
        .expect("column")
        .f64()
        .expect("f64")
        .into_iter()
        .collect()
}

#[test]
fn overview_reads_prices_across_date_formats() {
    let table = fixture_table();

    // 1. Plain date column
    let day = NaiveDate::from_ymd_opt(2022, 1, 2).expect("date");
    assert_eq!(price_on(&table, "BTC", day).expect("price"), Some(47286.18));

    // 2. Date column with a time component
    let day = NaiveDate::from_ymd_opt(2023, 5, 5).expect("date");
    assert_eq!(price_on(&table, "PEPE", day).expect("price"), Some(0.00000297));

    // 3. No bar that day
    let day = NaiveDate::from_ymd_opt(2020, 1, 1).expect("date");
    assert_eq!(price_on(&table, "BTC", day).expect("price"), None);

    let recent = last_closes(&table, "BTC", RECENT_BARS).expect("last closes");
    assert_eq!(recent.height(), 4);
    assert_eq!(recent.charts()[0].kind, ChartKind::Bar);
}

#[test]
fn trade_counts_sum_every_file() {
    let view = trade_counts(&fixture_table()).expect("trade counts");

    let counts = view
        .as_df()
        .column("tradecount")
        .expect("column")
        .i64()
        .expect("i64")
        .into_iter()
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![Some(4490388), Some(1438163), Some(398112)]);
}

#[test]
fn yearly_growth_starts_at_zero_percent() {
    let table = fixture_table();
    let query = GrowthQuery::new("BTC", YearRange::new(2022, 2023))
        .with_scale(TimeScale::Yearly)
        .with_kind(GrowthKind::Percentage);

    let view = growth(&table, &query).expect("growth");

    let closes = f64_column(&view, "Close");
    assert_eq!(closes.len(), 2);
    assert_eq!(closes[0], Some(0.0));
    assert!(closes[1].expect("2023 bucket") < 0.0);
}

#[test]
fn volume_leaders_over_fixture_years() {
    let table = fixture_table();
    let query = VolumeQuery::new(["BTC", "ETH"], YearRange::new(2022, 2023));

    let analysis = volume_analysis(&table, &query).expect("volume analysis");

    assert_eq!(analysis.averages.height(), 4);
    assert_eq!(analysis.trend.height(), 7);

    let most = analysis.most_traded.expect("most traded");
    assert_eq!((most.symbol.as_str(), most.year), ("ETH", 2022));
    let least = analysis.least_traded.expect("least traded");
    assert_eq!((least.symbol.as_str(), least.year), ("BTC", 2022));
}

#[test]
fn battle_and_spread_select_requested_symbols() {
    let table = fixture_table();

    let battle = compare(&table, &BattleQuery::new(["ETH", "BTC"], YearRange::single(2023)))
        .expect("compare");
    assert_eq!(f64_column(&battle, "Close"), vec![Some(16616.75), Some(1200.34)]);

    let spread = open_close_spread(
        &table,
        &SpreadQuery::new(["BTC", "ETH"], YearRange::single(2023)),
    )
    .expect("spread");
    assert_eq!(spread.height(), 2);
}

#[test]
fn views_export_to_csv_and_chart_json() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    let view = market_share(&fixture_table()).expect("market share");

    // === CSV ===
    let path = view.to_csv(tmp.path()).expect("csv export");
    assert_eq!(path, tmp.path().join(view.filename(FileExtension::Csv)));
    let written = LazyCsvReader::new(PlPath::new(&path.to_string_lossy()))
        .with_has_header(true)
        .finish()
        .expect("lazy csv")
        .collect()
        .expect("collect");
    assert_eq!(written.height(), 3);

    // === Chart JSON ===
    let doc = view.to_chart_json().expect("chart json");
    assert_eq!(doc["name"], "market_cap");
    assert_eq!(doc["charts"].as_array().map(Vec::len), Some(2));
    assert_eq!(doc["data"].as_array().map(Vec::len), Some(3));
    assert_eq!(doc["data"][0]["Symbol"], "BTC");
}
