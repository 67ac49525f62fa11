//! Read-only view of a server's introspection commands.

use mongodb::Client;
use mongodb::bson::Document;

use crate::connection::ConnectionManager;
use crate::error::{Error, Result};

/// Key pattern, name, and the options that change what an index can serve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSpec {
    pub name: String,
    pub keys: Document,
    pub unique: bool,
    pub sparse: bool,
    /// TTL in seconds (`expireAfterSeconds`).
    pub expire_after_secs: Option<u64>,
    pub partial_filter: Option<Document>,
}

impl IndexSpec {
    pub fn new(name: impl Into<String>, keys: Document) -> Self {
        Self { name: name.into(), keys, ..Default::default() }
    }

    /// Only indexes a subset of the collection's documents.
    pub fn is_filtered(&self) -> bool {
        self.sparse || self.partial_filter.is_some()
    }
}

/// Metadata queries the collectors depend on.
///
/// Per-database and per-collection failures are reported as
/// [`Error::StatsUnavailable`] so callers can skip the unit and continue.
pub trait StatsSource {
    fn database_names(&self) -> Result<Vec<String>>;

    fn collection_names(&self, database: &str) -> Result<Vec<String>>;

    /// Raw `collStats` reply for one collection.
    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document>;

    fn index_specs(&self, database: &str, collection: &str) -> Result<Vec<IndexSpec>>;
}

/// [`StatsSource`] backed by a live server.
pub struct MongoSource<'a> {
    manager: &'a ConnectionManager,
    client: Client,
}

impl<'a> MongoSource<'a> {
    pub fn new(manager: &'a ConnectionManager, client: Client) -> Self {
        Self { manager, client }
    }

    /// Connect to `uri` and wrap the client.
    pub fn connect(manager: &'a ConnectionManager, uri: &str) -> Result<Self> {
        let client = manager.connect(uri)?;
        Ok(Self::new(manager, client))
    }
}

impl StatsSource for MongoSource<'_> {
    fn database_names(&self) -> Result<Vec<String>> {
        self.manager.list_databases(&self.client)
    }

    fn collection_names(&self, database: &str) -> Result<Vec<String>> {
        self.manager
            .list_stat_collections(&self.client, database)
            .map_err(|err| Error::stats_unavailable(database, err))
    }

    fn collection_stats(&self, database: &str, collection: &str) -> Result<Document> {
        self.manager
            .collection_stats(&self.client, database, collection)
            .map_err(|err| Error::stats_unavailable(format!("{database}.{collection}"), err))
    }

    fn index_specs(&self, database: &str, collection: &str) -> Result<Vec<IndexSpec>> {
        let models = self
            .manager
            .list_indexes(&self.client, database, collection)
            .map_err(|err| Error::stats_unavailable(format!("{database}.{collection}"), err))?;

        Ok(models
            .into_iter()
            .map(|model| {
                let name = model
                    .options
                    .as_ref()
                    .and_then(|options| options.name.clone())
                    .unwrap_or_else(|| default_index_name(&model.keys));
                let mut spec = IndexSpec::new(name, model.keys);
                if let Some(options) = model.options {
                    spec.unique = options.unique.unwrap_or(false);
                    spec.sparse = options.sparse.unwrap_or(false);
                    spec.expire_after_secs = options.expire_after.map(|ttl| ttl.as_secs());
                    spec.partial_filter = options.partial_filter_expression;
                }
                spec
            })
            .collect())
    }
}

/// Name the server would generate for an unnamed index: `field_dir` pairs joined by `_`.
pub fn default_index_name(keys: &Document) -> String {
    keys.iter()
        .map(|(field, direction)| match direction {
            mongodb::bson::Bson::String(kind) => format!("{field}_{kind}"),
            other => format!("{field}_{other}"),
        })
        .collect::<Vec<_>>()
        .join("_")
}
