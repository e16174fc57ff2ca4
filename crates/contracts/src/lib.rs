//! # Contracts
//!
//! Shared interface contracts for the crawler workspace: the normalized
//! metric model, the error taxonomy and the traits that sit between
//! fetching raw data, producing points and persisting them.
//! Business crates depend on this crate, never the other way round.
//!
//! ## Time Model
//! - Points carry an absolute UTC timestamp (`chrono::DateTime<Utc>`)
//! - The store is written with second precision

mod cadence;
mod crawler_name;
mod error;
mod point;
mod settings;
mod sink;
mod source;
mod timestamp;

pub use cadence::*;
pub use crawler_name::CrawlerName;
pub use error::*;
pub use point::*;
pub use settings::*;
pub use sink::*;
pub use source::*;
pub use timestamp::UnixSeconds;
