//! MongoDB connection management and operations.
//!
//! This module provides:
//! - `ConnectionManager`: connects, pings, and lists databases/collections
//! - `ops`: read-only operations (collection stats, index listing)
//! - `source`: the `StatsSource` seam the collectors read through

pub mod manager;
pub mod ops;
pub mod source;

pub use manager::ConnectionManager;
pub use source::{IndexSpec, MongoSource, StatsSource};
