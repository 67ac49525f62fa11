//! Read-only database operations split into focused modules.

pub mod indexes;
pub mod stats;
