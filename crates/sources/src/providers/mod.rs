//! Single-endpoint sources, one module per origin host

#[macro_use]
mod macros;
pub mod common;

mod bitcoin_average;
mod bitcoin_de;
mod bitcoinchain;
mod bitfinex;
mod bitstamp;
mod block_explorer;
mod blockr;
mod coindesk;
mod coinmarketcap;
mod kraken;

pub use bitcoin_average::BitcoinAverage;
pub use bitcoin_de::BitcoinDe;
pub use bitcoinchain::Bitcoinchain;
pub use bitfinex::Bitfinex;
pub use bitstamp::Bitstamp;
pub use block_explorer::BlockExplorer;
pub use blockr::Blockr;
pub use coindesk::CoinDesk;
pub use coinmarketcap::CoinMarketCap;
pub use kraken::Kraken;
