//! Domain layer for the traffic monitor.
//!
//! Holds the reading and window models, the line parser, the shared error
//! type, CLI settings and report formatting helpers.

pub mod error;
pub mod formatting;
pub mod models;
pub mod parser;
pub mod settings;

pub use error::{Result, TrafficError};
