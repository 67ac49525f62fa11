//! Walks every database and collection and aggregates their statistics.

use crate::connection::StatsSource;
use crate::error::{Error, Result};
use crate::models::{CollectionRecord, MemoryHeadroom, RunSummary, SkippedUnit, StatsSnapshot};

/// Holds the replication oplog; excluded unless asked for.
pub const LOCAL_DATABASE: &str = "local";

#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Restrict the run to one database.
    pub database: Option<String>,
    pub include_local: bool,
    /// Physical RAM of the server's host. No memory estimate without it.
    pub total_ram: Option<u64>,
    /// Bytes held back from the RAM headroom. Defaults to the total index size.
    pub reserved_margin: Option<u64>,
}

pub struct StatsCollector<'a, S: StatsSource> {
    source: &'a S,
    options: CollectOptions,
}

impl<'a, S: StatsSource> StatsCollector<'a, S> {
    pub fn new(source: &'a S, options: CollectOptions) -> Self {
        Self { source, options }
    }

    /// Run one collection pass.
    ///
    /// Failing to enumerate databases is fatal. A database or collection whose
    /// statistics cannot be read is logged, recorded in `skipped`, and left out.
    pub fn collect(&self) -> Result<StatsSnapshot> {
        let mut snapshot = StatsSnapshot::default();

        for database in target_databases(self.source, &self.options)? {
            let collections = match self.source.collection_names(&database) {
                Ok(collections) => collections,
                Err(err) => {
                    skip_or_fail(&mut snapshot.skipped, &database, err)?;
                    continue;
                }
            };

            for collection in collections {
                let namespace = format!("{database}.{collection}");
                log::info!("Checking {namespace}");

                let stats = match self.source.collection_stats(&database, &collection) {
                    Ok(stats) => stats,
                    Err(err) => {
                        skip_or_fail(&mut snapshot.skipped, &namespace, err)?;
                        continue;
                    }
                };

                let (record, indexes) =
                    CollectionRecord::from_stats(&database, &collection, &stats);
                snapshot.collections.push(record);
                snapshot.indexes.extend(indexes);
            }
        }

        if snapshot.is_empty() {
            log::info!("No collections found");
        }

        snapshot.summary = self.summarize(&snapshot.collections);
        Ok(snapshot)
    }

    fn summarize(&self, collections: &[CollectionRecord]) -> RunSummary {
        let mut summary = RunSummary::from_records(collections);

        if let Some(total_ram) = self.options.total_ram {
            let reserved = self.options.reserved_margin.unwrap_or(summary.total_index_size);
            let memory = MemoryHeadroom::new(total_ram, reserved, summary.working_set());
            if memory.is_overcommitted() {
                log::warn!(
                    "Data and indexes ({} bytes) exceed the RAM headroom ({} bytes)",
                    memory.used,
                    memory.headroom
                );
            }
            summary.memory = Some(memory);
        }

        summary
    }
}

/// Databases a run should visit, honouring the single-database and `local` options.
pub fn target_databases<S: StatsSource>(
    source: &S,
    options: &CollectOptions,
) -> Result<Vec<String>> {
    if let Some(database) = &options.database {
        return Ok(vec![database.clone()]);
    }

    let databases = source.database_names()?;
    Ok(databases
        .into_iter()
        .filter(|name| options.include_local || name != LOCAL_DATABASE)
        .collect())
}

/// Record a recoverable failure and carry on; propagate anything else.
pub(crate) fn skip_or_fail(
    skipped: &mut Vec<SkippedUnit>,
    namespace: &str,
    err: Error,
) -> Result<()> {
    if !err.is_recoverable() {
        return Err(err);
    }
    log::warn!("Skipping {namespace}: {err}");
    let reason = match err {
        Error::StatsUnavailable { reason, .. } => reason,
        other => other.to_string(),
    };
    skipped.push(SkippedUnit { namespace: namespace.to_string(), reason });
    Ok(())
}
