use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Coins the dashboard ships descriptions for.
///
/// This lookup is descriptive only. Ingestion carries any symbol found in the
/// source files, whether or not it appears here.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum KnownCoin {
    Btc,
    Eth,
    Bnb,
    Ada,
    Doge,
    Xrp,
    Ltc,
    Dot,
    Sol,
    Link,
}

impl KnownCoin {
    pub fn ticker(&self) -> &'static str {
        self.into()
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Btc => "Bitcoin - The first and most popular cryptocurrency.",
            Self::Eth => "Ethereum - A blockchain for smart contracts.",
            Self::Bnb => "Binance Coin - The native token of Binance exchange.",
            Self::Ada => "Cardano - A proof-of-stake blockchain platform.",
            Self::Doge => "Dogecoin - A meme coin that gained popularity.",
            Self::Xrp => "XRP - A digital payment protocol.",
            Self::Ltc => "Litecoin - A faster alternative to Bitcoin.",
            Self::Dot => "Polkadot - A multi-chain blockchain platform.",
            Self::Sol => "Solana - A high-performance blockchain.",
            Self::Link => "Chainlink - A decentralized oracle network.",
        }
    }

    /// Description for an arbitrary ticker, if it is a known coin.
    pub fn describe(symbol: &str) -> Option<&'static str> {
        symbol.parse::<Self>().ok().map(|c| c.description())
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_ticker_round_trips_through_parse() {
        for coin in KnownCoin::iter() {
            let parsed: KnownCoin = coin.ticker().parse().expect("ticker should parse");
            assert_eq!(parsed, coin);
        }
        assert_eq!(KnownCoin::Doge.ticker(), "DOGE");
    }

    #[test]
    fn test_describe_is_case_insensitive_and_optional() {
        assert_eq!(
            KnownCoin::describe("btc"),
            Some("Bitcoin - The first and most popular cryptocurrency.")
        );
        assert_eq!(KnownCoin::describe("PEPE"), None);
    }
}
