//! Detection of indexes made unnecessary by a wider index on the same collection.
//!
//! `{a: 1}` is covered by `{a: 1, b: 1}`: any query that can use the first can
//! use the second. An index is only reported when dropping it loses nothing but
//! the index itself, so indexes carrying a unique constraint, a TTL, or a partial
//! filter are kept, as is `_id_`, which is always unique. A sparse or partial
//! index never counts as the covering one because it skips documents.

use std::fmt;

use mongodb::bson::{Bson, Document};

use crate::connection::{IndexSpec, StatsSource};
use crate::error::Result;
use crate::models::SkippedUnit;
use crate::stats::collector::{CollectOptions, skip_or_fail, target_databases};

const ID_INDEX: &str = "_id_";

/// An index whose key pattern is a strict prefix of another index's.
#[derive(Debug, Clone, PartialEq)]
pub struct RedundantIndex {
    pub namespace: String,
    pub index: String,
    pub keys: Document,
    pub covered_by: String,
    pub covering_keys: Document,
}

impl fmt::Display for RedundantIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Index {ns}[{}] may be redundant with {ns}[{}]",
            self.index,
            self.covered_by,
            ns = self.namespace
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct RedundantReport {
    pub findings: Vec<RedundantIndex>,
    pub skipped: Vec<SkippedUnit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Direction {
    Order(i64),
    Kind(String),
}

fn key_pattern(keys: &Document) -> Vec<(&str, Direction)> {
    keys.iter().map(|(field, value)| (field.as_str(), direction(value))).collect()
}

fn direction(value: &Bson) -> Direction {
    match value {
        Bson::Int32(v) => Direction::Order(i64::from(*v)),
        Bson::Int64(v) => Direction::Order(*v),
        Bson::Double(v) if v.fract() == 0.0 => Direction::Order(*v as i64),
        Bson::String(kind) => Direction::Kind(kind.clone()),
        other => Direction::Kind(other.to_string()),
    }
}

/// Whether the index does more than speed up queries.
fn has_side_effects(index: &IndexSpec) -> bool {
    index.unique
        || index.name == ID_INDEX
        || index.expire_after_secs.is_some()
        || index.partial_filter.is_some()
}

/// Pairs `(redundant, covering)` of positions in `indexes`.
pub fn covered_indexes(indexes: &[IndexSpec]) -> Vec<(usize, usize)> {
    let patterns: Vec<_> = indexes.iter().map(|index| key_pattern(&index.keys)).collect();
    let mut pairs = Vec::new();

    for (i, candidate) in indexes.iter().enumerate() {
        if has_side_effects(candidate) {
            continue;
        }
        let narrow = &patterns[i];
        for (j, wider) in patterns.iter().enumerate() {
            if i == j || indexes[j].is_filtered() {
                continue;
            }
            if narrow.len() < wider.len() && wider.starts_with(narrow) {
                pairs.push((i, j));
            }
        }
    }

    pairs
}

pub struct RedundantIndexFinder<'a, S: StatsSource> {
    source: &'a S,
    options: CollectOptions,
}

impl<'a, S: StatsSource> RedundantIndexFinder<'a, S> {
    pub fn new(source: &'a S, options: CollectOptions) -> Self {
        Self { source, options }
    }

    pub fn find(&self) -> Result<RedundantReport> {
        let mut report = RedundantReport::default();

        for database in target_databases(self.source, &self.options)? {
            log::info!("Checking DB: {database}");
            let collections = match self.source.collection_names(&database) {
                Ok(collections) => collections,
                Err(err) => {
                    skip_or_fail(&mut report.skipped, &database, err)?;
                    continue;
                }
            };

            for collection in collections {
                let namespace = format!("{database}.{collection}");
                let indexes = match self.source.index_specs(&database, &collection) {
                    Ok(indexes) => indexes,
                    Err(err) => {
                        skip_or_fail(&mut report.skipped, &namespace, err)?;
                        continue;
                    }
                };

                for (narrow, wide) in covered_indexes(&indexes) {
                    report.findings.push(RedundantIndex {
                        namespace: namespace.clone(),
                        index: indexes[narrow].name.clone(),
                        keys: indexes[narrow].keys.clone(),
                        covered_by: indexes[wide].name.clone(),
                        covering_keys: indexes[wide].keys.clone(),
                    });
                }
            }
        }

        Ok(report)
    }
}
