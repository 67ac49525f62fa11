//! Collection statistics operations.

use mongodb::Client;
use mongodb::bson::{Document, doc};
use mongodb::options::SelectionCriteria;

use crate::connection::ConnectionManager;
use crate::error::Result;

/// Server selection for `collStats`.
///
/// `runCommand` ignores the client's default read preference, so the one from the
/// connection string has to be passed on each call.
pub(crate) fn stats_read_criteria(client: &Client) -> Option<SelectionCriteria> {
    client.selection_criteria().cloned()
}

impl ConnectionManager {
    /// Fetch collection stats (runs in Tokio runtime)
    pub fn collection_stats(
        &self,
        client: &Client,
        database: &str,
        collection: &str,
    ) -> Result<Document> {
        let client = client.clone();
        let database = database.to_string();
        let collection = collection.to_string();
        self.runtime.block_on(async {
            let db = client.database(&database);
            let mut command = db.run_command(doc! { "collStats": collection });
            if let Some(criteria) = stats_read_criteria(&client) {
                command = command.selection_criteria(criteria);
            }
            let stats = command.await?;
            Ok(stats)
        })
    }
}
