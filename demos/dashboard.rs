use std::{env, fs, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use coinlens::prelude::*;
use time::macros::format_description;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Usage: `cargo run --example dashboard -- <csv-dir> [out-dir]`
fn main() -> Result<()> {
    let _guard = init_tracing()?;

    let mut args = env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "data".to_string()));
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "reports".to_string()));

    let load_start = Instant::now();
    let outcome = global_cache()
        .get_or_load_with_report(&data_dir)
        .with_context(|| format!("Failed to load {}", data_dir.display()))?;
    let load_time = load_start.elapsed();

    let table = outcome.table;
    println!("--- Load Report ---");
    for file in &outcome.report.loaded {
        println!("loaded  {:<32} {:>8} rows", file.file_name, file.rows);
    }
    for file in &outcome.report.skipped {
        println!("skipped {:<32} {}", file.file_name, file.reason);
    }
    println!("{} rows in {load_time:?}", table.height());

    let Some(years) = YearRange::spanning(&table)? else {
        println!("No data to chart.");
        return Ok(());
    };
    let symbols = table.symbols()?;

    // === Overview ===
    for symbol in &symbols {
        let about = KnownCoin::describe(symbol).unwrap_or("No description available.");
        println!("\n{symbol}: {about}");
        let recent = last_closes(&table, symbol, RECENT_BARS)?;
        recent.to_csv(out_dir.join("overview").join(symbol))?;
    }
    if let (Some(symbol), Some(day)) = (symbols.first(), NaiveDate::from_ymd_opt(years.end, 1, 1)) {
        match price_on(&table, symbol, day)? {
            Some(close) => println!("{symbol} closed at {close} on {day}"),
            None => println!("{symbol} has no bar on {day}"),
        }
    }

    // === Comparison views ===
    let views = vec![
        growth(
            &table,
            &GrowthQuery::new(symbols[0].as_str(), years)
                .with_scale(TimeScale::Monthly)
                .with_kind(GrowthKind::Percentage),
        )?,
        compare(&table, &BattleQuery::new(&symbols, years))?,
        open_close_spread(&table, &SpreadQuery::new(&symbols, years))?,
        trade_counts(&table)?,
        market_share(&table)?,
    ];

    let analysis = volume_analysis(&table, &VolumeQuery::new(&symbols, years))?;
    if let Some(most) = &analysis.most_traded {
        println!("Most traded: {} in {} ({:.2})", most.symbol, most.year, most.avg_volume);
    }
    if let Some(least) = &analysis.least_traded {
        println!("Least traded: {} in {} ({:.2})", least.symbol, least.year, least.avg_volume);
    }

    fs::create_dir_all(&out_dir)?;
    for view in views
        .iter()
        .chain([&analysis.averages, &analysis.trend])
    {
        view.to_csv(&out_dir)?;
        let doc = serde_json::to_string_pretty(&view.to_chart_json()?)?;
        fs::write(out_dir.join(view.filename(FileExtension::Json)), doc)?;
    }

    info!(out_dir = %out_dir.display(), views = views.len() + 2, "Dashboard exported");
    Ok(())
}

// ================================================================================================
// Tracing Configuration
// ================================================================================================

fn init_tracing() -> Result<Option<WorkerGuard>> {
    let app_name = "coinlens";

    let in_container =
        env::var("CONTAINER").is_ok() || std::path::Path::new("/.dockerenv").exists();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if in_container {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_thread_names(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!("Logging to stdout (container mode)");
        Ok(None)
    } else {
        let log_dir = dirs::state_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local/state")))
            .context("Failed to find a state directory")?
            .join(app_name)
            .join("logs");
        fs::create_dir_all(&log_dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&format_description!(
                "[year][month][day]-[hour][minute][second]"
            ))
            .context("Failed to format timestamp")?;
        let file_name = format!("{app_name}-{timestamp}.log");

        let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(non_blocking)
            .with_thread_names(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
            .init();

        info!(log_file = %log_dir.join(file_name).display(), "Logging to file (local mode)");
        Ok(Some(guard))
    }
}
