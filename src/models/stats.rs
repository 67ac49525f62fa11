// Collection and index statistics records

use mongodb::bson::{Bson, Document};

use crate::helpers::percent_of;

/// Statistics for one collection, read from `collStats`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRecord {
    pub database: String,
    pub collection: String,
    pub document_count: u64,
    /// Uncompressed data size (`size`)
    pub data_size: u64,
    /// Bytes allocated on disk (`storageSize`)
    pub storage_size: u64,
    pub avg_obj_size: u64,
    pub index_count: u64,
    pub total_index_size: u64,
}

/// Size of a single index, taken from `collStats.indexSizes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub database: String,
    pub collection: String,
    pub name: String,
    pub size: u64,
}

impl CollectionRecord {
    /// Parse a `collStats` reply into the collection record and its index records.
    ///
    /// When the reply carries `indexSizes`, the index count and total index size
    /// are derived from it so the per-index rows always add up to the collection
    /// total. Otherwise `nindexes`/`totalIndexSize` are used as reported.
    pub fn from_stats(
        database: &str,
        collection: &str,
        doc: &Document,
    ) -> (Self, Vec<IndexRecord>) {
        let indexes: Option<Vec<IndexRecord>> = doc.get_document("indexSizes").ok().map(|sizes| {
            sizes
                .iter()
                .map(|(name, value)| IndexRecord {
                    database: database.to_string(),
                    collection: collection.to_string(),
                    name: name.clone(),
                    size: bson_to_u64(value).unwrap_or(0),
                })
                .collect()
        });

        let reported_index_size = read_u64(doc, "totalIndexSize");
        let (index_count, total_index_size) = match &indexes {
            Some(indexes) => {
                let sum = indexes.iter().map(|index| index.size).sum::<u64>();
                if sum != reported_index_size {
                    log::debug!(
                        "{database}.{collection}: indexSizes sum {sum} differs from totalIndexSize {reported_index_size}"
                    );
                }
                (indexes.len() as u64, sum)
            }
            None => (read_u64(doc, "nindexes"), reported_index_size),
        };

        let record = Self {
            database: database.to_string(),
            collection: collection.to_string(),
            document_count: read_u64(doc, "count"),
            data_size: read_u64(doc, "size"),
            storage_size: read_u64(doc, "storageSize"),
            avg_obj_size: read_u64(doc, "avgObjSize"),
            index_count,
            total_index_size,
        };

        (record, indexes.unwrap_or_default())
    }

    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

impl IndexRecord {
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.collection)
    }
}

/// RAM estimate for the machine hosting the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryHeadroom {
    pub total_ram: u64,
    pub reserved_margin: u64,
    /// `total_ram - reserved_margin`; negative when the margin exceeds RAM.
    pub headroom: i64,
    /// Data plus index bytes across every collection.
    pub used: u64,
}

impl MemoryHeadroom {
    pub fn new(total_ram: u64, reserved_margin: u64, used: u64) -> Self {
        let headroom = clamp_i64(total_ram as i128 - reserved_margin as i128);
        Self { total_ram, reserved_margin, headroom, used }
    }

    /// `headroom - used`. Not clipped: a negative value means the working set
    /// does not fit.
    pub fn available(&self) -> i64 {
        clamp_i64(self.headroom as i128 - self.used as i128)
    }

    /// `used / headroom * 100`; `None` when there is no headroom to divide by.
    pub fn percent_used(&self) -> Option<f64> {
        (self.headroom > 0).then(|| self.used as f64 / self.headroom as f64 * 100.0)
    }

    pub fn is_overcommitted(&self) -> bool {
        (self.used as i128) > self.headroom as i128
    }
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Totals over every collection in a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total_documents: u64,
    pub total_data_size: u64,
    pub total_index_size: u64,
    pub memory: Option<MemoryHeadroom>,
}

impl RunSummary {
    pub fn from_records(collections: &[CollectionRecord]) -> Self {
        collections.iter().fold(Self::default(), |mut summary, record| {
            summary.total_documents += record.document_count;
            summary.total_data_size += record.data_size;
            summary.total_index_size += record.total_index_size;
            summary
        })
    }

    /// Bytes the data set would occupy if fully resident: data plus indexes.
    pub fn working_set(&self) -> u64 {
        self.total_data_size + self.total_index_size
    }
}

/// A database or collection left out of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedUnit {
    pub namespace: String,
    pub reason: String,
}

/// Everything one collection pass produced.
#[derive(Debug, Clone, Default)]
pub struct StatsSnapshot {
    pub collections: Vec<CollectionRecord>,
    pub indexes: Vec<IndexRecord>,
    pub summary: RunSummary,
    pub skipped: Vec<SkippedUnit>,
}

impl StatsSnapshot {
    /// Percentage of the total data size held by `record`.
    pub fn data_share(&self, record: &CollectionRecord) -> f64 {
        percent_of(record.data_size, self.summary.total_data_size)
    }

    /// Percentage of the total index size held by `index`.
    pub fn index_share(&self, index: &IndexRecord) -> f64 {
        percent_of(index.size, self.summary.total_index_size)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

fn read_u64(doc: &Document, key: &str) -> u64 {
    read_u64_opt(doc, key).unwrap_or(0)
}

fn read_u64_opt(doc: &Document, key: &str) -> Option<u64> {
    doc.get(key).and_then(bson_to_u64)
}

pub(crate) fn bson_to_u64(value: &Bson) -> Option<u64> {
    match value {
        Bson::Int32(v) if *v >= 0 => Some(*v as u64),
        Bson::Int64(v) if *v >= 0 => Some(*v as u64),
        Bson::Double(v) if *v >= 0.0 => Some(*v as u64),
        _ => None,
    }
}
