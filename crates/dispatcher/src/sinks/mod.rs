//! Sink implementations
//!
//! Contains InfluxSink (InfluxDB 1.x HTTP) and LogSink (dry run).

mod influx;
pub mod line_protocol;
mod log;

pub use self::influx::InfluxSink;
pub use self::log::LogSink;
