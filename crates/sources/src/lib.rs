//! # Sources
//!
//! Everything that turns a third-party HTTP endpoint into metric points.
//!
//! - [`http::HttpFetcher`] performs the request and maps failures to
//!   `Network` / `Decode`
//! - [`blockchain_info::BlockchainInfo`] is the cadence-tiered aggregator
//! - [`providers`] holds the single-endpoint sources, one per origin host

pub mod blockchain_info;
pub mod http;
pub mod providers;

pub use blockchain_info::{BlockchainInfo, BlockchainInfoEndpoints, HashrateDistribution, Miner};
pub use http::HttpFetcher;
pub use providers::*;
