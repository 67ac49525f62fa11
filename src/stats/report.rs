//! Table views over a [`StatsSnapshot`].
//!
//! Rendering is pure: every method returns text and the binaries decide where
//! it goes.

use comfy_table::{CellAlignment, ContentArrangement, Table, presets};

use crate::helpers::dump::Group;
use crate::helpers::{format_bytes, format_percent, format_signed_bytes, percent_of};
use crate::models::{CollectionRecord, IndexRecord, StatsSnapshot};

/// How many indexes the "largest indexes" view shows by default.
pub const DEFAULT_TOP_INDEXES: usize = 5;

const COLLECTION_HEADERS: [&str; 7] =
    ["Collection", "Count", "% Size", "DB Size", "Avg Obj Size", "Indexes", "Index Size"];
const INDEX_HEADERS: [&str; 4] = ["Collection", "Index", "% Size", "Index Size"];

pub struct Reporter<'a> {
    snapshot: &'a StatsSnapshot,
}

impl<'a> Reporter<'a> {
    pub fn new(snapshot: &'a StatsSnapshot) -> Self {
        Self { snapshot }
    }

    /// Collections by descending data size, ties by namespace.
    pub fn collections_by_size(&self) -> Vec<&'a CollectionRecord> {
        let mut records: Vec<_> = self.snapshot.collections.iter().collect();
        records.sort_by(|a, b| {
            b.data_size
                .cmp(&a.data_size)
                .then_with(|| (&a.database, &a.collection).cmp(&(&b.database, &b.collection)))
        });
        records
    }

    /// Indexes grouped by namespace; the server's index order is kept inside a collection.
    pub fn indexes_by_namespace(&self) -> Vec<&'a IndexRecord> {
        let mut indexes: Vec<_> = self.snapshot.indexes.iter().collect();
        indexes.sort_by(|a, b| (&a.database, &a.collection).cmp(&(&b.database, &b.collection)));
        indexes
    }

    /// The `limit` largest indexes, ties broken by namespace then index name.
    pub fn largest_indexes(&self, limit: usize) -> Vec<&'a IndexRecord> {
        let mut indexes: Vec<_> = self.snapshot.indexes.iter().collect();
        indexes.sort_by(|a, b| {
            b.size.cmp(&a.size).then_with(|| {
                (&a.database, &a.collection, &a.name).cmp(&(&b.database, &b.collection, &b.name))
            })
        });
        indexes.truncate(limit);
        indexes
    }

    pub fn collection_table(&self) -> Table {
        let mut table = new_table(&COLLECTION_HEADERS);
        for record in self.collections_by_size() {
            table.add_row(vec![
                record.namespace(),
                record.document_count.to_string(),
                format_percent(self.snapshot.data_share(record)),
                format_bytes(record.data_size),
                format_bytes(record.avg_obj_size),
                record.index_count.to_string(),
                format_bytes(record.total_index_size),
            ]);
        }
        align_right(&mut table, &[1, 2, 3, 4, 6]);
        table
    }

    pub fn index_table(&self) -> Table {
        self.index_rows(self.indexes_by_namespace())
    }

    pub fn largest_index_table(&self, limit: usize) -> Table {
        self.index_rows(self.largest_indexes(limit))
    }

    fn index_rows(&self, indexes: Vec<&IndexRecord>) -> Table {
        let mut table = new_table(&INDEX_HEADERS);
        for index in indexes {
            table.add_row(vec![
                index.namespace(),
                index.name.clone(),
                format_percent(self.snapshot.index_share(index)),
                format_bytes(index.size),
            ]);
        }
        align_right(&mut table, &[2, 3]);
        table
    }

    /// Totals, followed by the RAM estimate when one was computed.
    pub fn summary_lines(&self) -> Vec<String> {
        let summary = &self.snapshot.summary;
        let mut lines = vec![
            format!("Total Documents: {}", summary.total_documents),
            format!("Total Data Size: {}", format_bytes(summary.total_data_size)),
            format!("Total Index Size: {}", format_bytes(summary.total_index_size)),
        ];

        if let Some(memory) = &summary.memory {
            let percent = memory.percent_used().map(format_percent).unwrap_or_else(|| "n/a".into());
            let over = if memory.is_overcommitted() { " (over capacity)" } else { "" };

            lines.push(format!("RAM Headroom: {}", format_signed_bytes(memory.headroom)));
            lines.push(format!("RAM Used: {} ({percent})", format_bytes(memory.used)));
            lines.push(format!(
                "Available RAM Headroom: {}{over}",
                format_signed_bytes(memory.available())
            ));
        }

        lines
    }

    /// Output of `collection-stats`.
    pub fn render_collection_report(&self) -> String {
        let mut out = self.collection_table().to_string();
        out.push('\n');
        for line in self.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Output of `index-stats`.
    pub fn render_index_report(&self, top: usize) -> String {
        let mut out = String::from("Index Overview\n");
        out.push_str(&self.index_table().to_string());
        out.push_str(&format!("\n\nTop {top} Largest Indexes\n"));
        out.push_str(&self.largest_index_table(top).to_string());
        out.push_str("\n\n");
        for line in self.summary_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Distinct values of a grouping field with their document counts and shares.
pub fn group_table(field: &str, groups: &[Group]) -> Table {
    let total: u64 = groups.iter().map(|group| group.count).sum();
    let mut table = new_table(&[field, "Count", "% Docs"]);
    for group in groups {
        let key = group.key.as_ref().map_or_else(|| "null".to_string(), ToString::to_string);
        table.add_row(vec![
            key,
            group.count.to_string(),
            format_percent(percent_of(group.count, total)),
        ]);
    }
    align_right(&mut table, &[1, 2]);
    table
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::ASCII_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Disabled)
        .set_header(headers.to_vec());
    table
}

fn align_right(table: &mut Table, columns: &[usize]) {
    for &index in columns {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
}
