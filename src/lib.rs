//! Tools for inspecting MongoDB collection and index statistics.
//!
//! The binaries (`collection-stats`, `index-stats`, `redundant-indexes`) share a
//! single pipeline: resolve [`config::Settings`], connect through
//! [`connection::ConnectionManager`], gather a [`models::StatsSnapshot`] with
//! [`stats::StatsCollector`], and render it with [`stats::Reporter`].
//!
//! `dump-query` works offline on `mongodump` output through [`helpers::dump`].

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod helpers;
pub mod models;
pub mod stats;

pub use error::{Error, Result};
