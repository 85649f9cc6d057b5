//! Data ingestion layer for the traffic monitor.
//!
//! Responsible for reading line sources, storing intervals, maintaining the
//! running aggregates and assembling the final report.

pub mod aggregator;
pub mod reader;
pub mod report;
pub mod store;

pub use traffic_core as core;
