//! Plain-text single-number endpoints under `blockchain.info/q/`

/// One `/q/` query; the body is a bare decimal number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    /// Transactions in the last 24 hours
    TransactionCount,
    /// Transactions waiting in the mempool
    UnconfirmedCount,
    /// Average seconds between blocks
    BlockInterval,
    /// Current difficulty target
    Difficulty,
    /// Market capitalization in USD
    MarketCap,
}

impl Query {
    const BASE: &'static str = "https://blockchain.info/q";

    pub fn path(&self) -> &'static str {
        match self {
            Self::TransactionCount => "24hrtransactioncount",
            Self::UnconfirmedCount => "unconfirmedcount",
            Self::BlockInterval => "interval",
            Self::Difficulty => "getdifficulty",
            Self::MarketCap => "marketcap",
        }
    }

    pub fn default_url(&self) -> String {
        format!("{}/{}", Self::BASE, self.path())
    }
}
