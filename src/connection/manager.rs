//! Core ConnectionManager struct and basic connection methods.

use mongodb::Client;
use mongodb::bson::doc;
use mongodb::results::{CollectionSpecification, CollectionType};
use tokio::runtime::{Builder, Runtime};

use crate::error::{Error, Result};
use crate::helpers::redact_uri_password;

/// Runs MongoDB driver calls to completion for the synchronous report pipeline
pub struct ConnectionManager {
    /// Tokio runtime for MongoDB async operations
    pub(crate) runtime: Runtime,
}

impl ConnectionManager {
    /// Create a new connection manager with a single-threaded runtime
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime })
    }

    /// Connect and ping the server (runs in Tokio runtime)
    pub fn connect(&self, uri: &str) -> Result<Client> {
        let redacted = redact_uri_password(uri);
        log::debug!("Connecting to {redacted}");

        self.runtime
            .block_on(async {
                let client = Client::with_uri_str(uri).await?;

                // Ping to verify connection
                client.database("admin").run_command(doc! { "ping": 1 }).await?;

                Ok::<Client, mongodb::error::Error>(client)
            })
            .map_err(|source| Error::Connection { uri: redacted, source })
    }

    /// List databases for a connected client (runs in Tokio runtime)
    pub fn list_databases(&self, client: &Client) -> Result<Vec<String>> {
        let client = client.clone();
        self.runtime.block_on(async {
            let mut databases = client.list_database_names().await?;
            databases.sort_unstable_by_key(|name| name.to_lowercase());
            Ok(databases)
        })
    }

    /// List collection specs in a database (runs in Tokio runtime)
    pub fn list_collection_specs(
        &self,
        client: &Client,
        database: &str,
    ) -> Result<Vec<CollectionSpecification>> {
        use futures::TryStreamExt;

        let client = client.clone();
        let database = database.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let cursor = db.list_collections().await?;
            let mut specs: Vec<CollectionSpecification> = cursor.try_collect().await?;
            specs.sort_unstable_by_key(|spec| spec.name.to_lowercase());
            Ok(specs)
        })
    }

    /// Names of the collections in a database that carry storage statistics.
    /// Views are left out since `collStats` has nothing to report for them.
    pub fn list_stat_collections(&self, client: &Client, database: &str) -> Result<Vec<String>> {
        let specs = self.list_collection_specs(client, database)?;
        Ok(specs
            .into_iter()
            .filter_map(|spec| match spec.collection_type {
                CollectionType::View => {
                    log::debug!("Skipping view {database}.{}", spec.name);
                    None
                }
                _ => Some(spec.name),
            })
            .collect())
    }
}
