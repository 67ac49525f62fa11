//! Statistics collection, reporting, and index analysis.

pub mod collector;
pub mod memory;
pub mod redundant;
pub mod report;

pub use collector::{CollectOptions, LOCAL_DATABASE, StatsCollector};
pub use memory::physical_ram;
pub use redundant::{RedundantIndex, RedundantIndexFinder, RedundantReport};
pub use report::{DEFAULT_TOP_INDEXES, Reporter, group_table};
