// Data structures and types

pub mod stats;

pub use stats::{
    CollectionRecord, IndexRecord, MemoryHeadroom, RunSummary, SkippedUnit, StatsSnapshot,
};
