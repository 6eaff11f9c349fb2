use polars::prelude::{SortMultipleOptions, col};
use serde::{Deserialize, Serialize};

use crate::{
    data::{market_col::MarketCol, table::MarketTable},
    error::{CoinlensResult, polars_err},
    io::Frame,
    polars_ext::year_expr,
    views::{
        ViewFrame, YearRange,
        chart::{ChartKind, ChartSpec},
        selection,
    },
};

/// Name of the derived calendar year column.
pub const YEAR: &str = "Year";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeQuery {
    pub symbols: Vec<String>,
    pub years: YearRange,
}

impl VolumeQuery {
    pub fn new<I, S>(symbols: I, years: YearRange) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            symbols: symbols.into_iter().map(Into::into).collect(),
            years,
        }
    }
}

/// One (symbol, year) entry of the average volume table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeLeader {
    pub symbol: String,
    pub year: i32,
    pub avg_volume: f64,
}

#[derive(Debug, Clone)]
pub struct VolumeAnalysis {
    /// Mean base volume per symbol and year, as a bar chart.
    pub averages: ViewFrame,
    /// Raw volume per bar over time, as a line chart.
    pub trend: ViewFrame,
    /// Highest yearly average. Ties keep the first entry in (symbol, year) order.
    pub most_traded: Option<VolumeLeader>,
    /// Lowest yearly average. Ties keep the first entry in (symbol, year) order.
    pub least_traded: Option<VolumeLeader>,
}

pub fn volume_analysis(table: &MarketTable, query: &VolumeQuery) -> CoinlensResult<VolumeAnalysis> {
    let selected = selection(table, &query.symbols, query.years);

    let averages = selected
        .clone()
        .group_by([col(MarketCol::Symbol), year_expr().alias(YEAR)])
        .agg([col(MarketCol::Volume).mean()])
        .sort(
            [MarketCol::Symbol.as_str(), YEAR],
            SortMultipleOptions::default(),
        )
        .collect()
        .map_err(|e| polars_err("Failed to average volume", e))?;

    let trend = selected
        .select([
            col(MarketCol::Date),
            col(MarketCol::Symbol),
            col(MarketCol::Volume),
        ])
        .sort(
            [MarketCol::Date.as_str(), MarketCol::Symbol.as_str()],
            SortMultipleOptions::default(),
        )
        .collect()
        .map_err(|e| polars_err("Failed to collect volume trend", e))?;

    let averages = ViewFrame::new(
        "average_volume",
        averages,
        vec![
            ChartSpec::new(
                ChartKind::Bar,
                "Average Trading Volume Across Cryptocurrencies",
                MarketCol::Symbol.as_str(),
                MarketCol::Volume.as_str(),
            )
            .with_color(MarketCol::Symbol.as_str())
            .with_y_label("Average Trading Volume"),
        ],
    );
    let trend = ViewFrame::new(
        "volume_trend",
        trend,
        vec![
            ChartSpec::new(
                ChartKind::Line,
                "Volume Trend Over Time",
                MarketCol::Date.as_str(),
                MarketCol::Volume.as_str(),
            )
            .with_color(MarketCol::Symbol.as_str())
            .with_y_label("Trading Volume")
            .with_markers(),
        ],
    );

    let leaders = leaders(&averages)?;
    let most_traded = leaders
        .iter()
        .fold(None::<&VolumeLeader>, |best, l| match best {
            Some(b) if b.avg_volume >= l.avg_volume => Some(b),
            _ => Some(l),
        })
        .cloned();
    let least_traded = leaders
        .iter()
        .fold(None::<&VolumeLeader>, |best, l| match best {
            Some(b) if b.avg_volume <= l.avg_volume => Some(b),
            _ => Some(l),
        })
        .cloned();

    Ok(VolumeAnalysis {
        averages,
        trend,
        most_traded,
        least_traded,
    })
}

fn leaders(averages: &ViewFrame) -> CoinlensResult<Vec<VolumeLeader>> {
    let df = averages.as_df();
    let err = |e| polars_err("Failed to read average volume", e);

    let symbols = df.column(MarketCol::Symbol.as_str()).map_err(err)?.str().map_err(err)?;
    let years = df.column(YEAR).map_err(err)?.i32().map_err(err)?;
    let volumes = df.column(MarketCol::Volume.as_str()).map_err(err)?.f64().map_err(err)?;

    Ok(symbols
        .into_iter()
        .zip(years.into_iter())
        .zip(volumes.into_iter())
        .filter_map(|((symbol, year), volume)| {
            Some(VolumeLeader {
                symbol: symbol?.to_string(),
                year: year?,
                avg_volume: volume?,
            })
        })
        .collect())
}
