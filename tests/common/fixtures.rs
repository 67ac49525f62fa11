//! Test fixtures for integration tests.

#![allow(dead_code)]

use mongodb::bson::{Document, doc};
use mongodb_tools::connection::{IndexSpec, StatsSource};
use mongodb_tools::{Error, Result};

/// Generate a batch of test documents for bulk inserts.
pub fn generate_test_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "index": i as i32,
                "name": format!("Document {}", i),
                "category": if i % 2 == 0 { "even" } else { "odd" },
                "value": (i * 10) as i32,
                "nested": {
                    "field": format!("nested_{}", i),
                    "number": i as i32,
                },
            }
        })
        .collect()
}

/// Build a `collStats` reply the way the server shapes it.
pub fn coll_stats(ns: &str, count: i64, size: i64, index_sizes: Document) -> Document {
    let total_index_size: i64 = index_sizes.values().filter_map(|value| value.as_i64()).sum();
    let avg_obj_size = if count > 0 { size / count } else { 0 };
    doc! {
        "ns": ns,
        "count": count,
        "size": size,
        "storageSize": size + size / 4,
        "avgObjSize": avg_obj_size,
        "nindexes": index_sizes.len() as i32,
        "totalIndexSize": total_index_size,
        "indexSizes": index_sizes,
        "ok": 1.0,
    }
}

struct FixtureCollection {
    database: String,
    collection: String,
    stats: Option<Document>,
    indexes: Vec<IndexSpec>,
}

/// In-memory [`StatsSource`] for running the collectors without a server.
#[derive(Default)]
pub struct FixtureSource {
    collections: Vec<FixtureCollection>,
    unlistable_databases: Vec<String>,
}

impl FixtureSource {
    pub fn with_stats(mut self, database: &str, collection: &str, stats: Document) -> Self {
        self.collections.push(FixtureCollection {
            database: database.into(),
            collection: collection.into(),
            stats: Some(stats),
            indexes: Vec::new(),
        });
        self
    }

    /// A collection whose `collStats` call is refused.
    pub fn with_denied(mut self, database: &str, collection: &str) -> Self {
        self.collections.push(FixtureCollection {
            database: database.into(),
            collection: collection.into(),
            stats: None,
            indexes: Vec::new(),
        });
        self
    }

    /// A database whose collections cannot be listed.
    pub fn with_unlistable(mut self, database: &str) -> Self {
        self.unlistable_databases.push(database.into());
        self
    }

    /// A collection that only answers `listIndexes`.
    pub fn with_indexes(
        mut self,
        database: &str,
        collection: &str,
        indexes: &[(&str, Document)],
    ) -> Self {
        let indexes = indexes
            .iter()
            .map(|(name, keys)| IndexSpec::new(*name, keys.clone()))
            .collect();
        self.collections.push(FixtureCollection {
            database: database.into(),
            collection: collection.into(),
            stats: None,
            indexes,
        });
        self
    }

    fn find(&self, database: &str, collection: &str) -> Option<&FixtureCollection> {
        self.collections.iter().find(|c| c.database == database && c.collection == collection)
    }
}

impl StatsSource for FixtureSource {
    fn database_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        let all = self.collections.iter().map(|c| &c.database).chain(&self.unlistable_databases);
        for name in all {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        Ok(names)
    }

    fn collection_names(&self, database: &str) -> Result<Vec<String>> {
        if self.unlistable_databases.iter().any(|name| name == database) {
            return Err(Error::stats_unavailable(database, "not authorized on this database"));
        }
        Ok(self
            .collections
            .iter()
            .filter(|c| c.database == database)
            .map(|c| c.collection.clone())
            .collect())
    }

    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document> {
        self.find(database, collection)
            .and_then(|c| c.stats.clone())
            .ok_or_else(|| Error::stats_unavailable(format!("{database}.{collection}"), "unauthorized"))
    }

    fn index_specs(&self, database: &str, collection: &str) -> Result<Vec<IndexSpec>> {
        Ok(self.find(database, collection).map(|c| c.indexes.clone()).unwrap_or_default())
    }
}

/// Two example databases as a small production deployment would report them,
/// plus a `local` database that runs skip by default.
pub fn sample_dataset() -> FixtureSource {
    FixtureSource::default()
        .with_stats(
            "examples1",
            "user",
            coll_stats(
                "examples1.user",
                101_879,
                14_260_634,
                doc! {
                    "_id_": 5_668_864_i64,
                    "name_1": 4_079_616_i64,
                    "email_1": 4_735_488_i64,
                    "created_at_1": 1_454_387_i64,
                },
            ),
        )
        .with_stats(
            "examples1",
            "address",
            coll_stats(
                "examples1.address",
                101_886,
                10_601_824,
                doc! { "_id_": 2_301_952_i64, "user_id_1": 1_015_808_i64 },
            ),
        )
        .with_stats(
            "examples1",
            "system.indexes",
            coll_stats("examples1.system.indexes", 6, 620, doc! {}),
        )
        .with_stats(
            "examples2",
            "things",
            coll_stats("examples2.things", 100_000, 14_795_407, doc! { "_id_": 5_945_446_i64 }),
        )
        .with_stats(
            "examples2",
            "system.indexes",
            coll_stats("examples2.system.indexes", 2, 196, doc! {}),
        )
        .with_stats(
            "local",
            "startup_log",
            coll_stats("local.startup_log", 1, 4_000_000, doc! { "_id_": 4096_i64 }),
        )
}
