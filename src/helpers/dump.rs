//! Streaming access to `mongodump` output.
//!
//! A dump holds one `<collection>.bson` file per collection: BSON documents
//! written back to back with no framing beyond each document's own length prefix.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use mongodb::bson::{Bson, Document};

use crate::error::{Error, Result};

/// Iterator over the documents of a `.bson` dump file.
///
/// Documents are decoded one at a time. Iteration stops after the first error.
pub struct DumpReader<R> {
    reader: BufReader<R>,
    done: bool,
}

impl DumpReader<File> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> DumpReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader: BufReader::new(reader), done: false }
    }
}

impl<R: Read> Iterator for DumpReader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let at_end = match self.reader.fill_buf() {
            Ok(buf) => buf.is_empty(),
            Err(err) => {
                self.done = true;
                return Some(Err(err.into()));
            }
        };
        if at_end {
            self.done = true;
            return None;
        }

        let document = Document::from_reader(&mut self.reader);
        if document.is_err() {
            self.done = true;
        }
        Some(document.map_err(Error::from))
    }
}

/// Value at a dotted path (`address.city`, `tags.0`), descending through
/// embedded documents and array positions.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut value = doc.get(parts.next()?)?;

    for part in parts {
        value = match value {
            Bson::Document(inner) => inner.get(part)?,
            Bson::Array(items) => items.get(part.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    Some(value)
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

/// Equality with numeric types compared by value, so `5`, `5i64` and `5.0` match.
pub fn values_equal(a: &Bson, b: &Bson) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Whether the field at `path` exists and equals `value`.
pub fn field_equals(doc: &Document, path: &str, value: &Bson) -> bool {
    get_path(doc, path).is_some_and(|found| values_equal(found, value))
}

/// Interpret a command-line value: extended JSON when it parses, a string otherwise.
///
/// `42` → Int32, `true` → Boolean, `{"$oid": "..."}` → ObjectId, `active` → String.
pub fn parse_value(text: &str) -> Bson {
    serde_json::from_str::<serde_json::Value>(text.trim())
        .ok()
        .and_then(|json| Bson::try_from(json).ok())
        .unwrap_or_else(|| Bson::String(text.to_string()))
}

/// Documents sharing one value of the grouping field.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// `None` for documents where the field is missing or null.
    pub key: Option<Bson>,
    pub count: u64,
    pub documents: Vec<Document>,
}

/// Incremental group-by over a document stream, in first-seen order.
#[derive(Debug, Default)]
pub struct Groups {
    path: String,
    keep_documents: bool,
    positions: HashMap<String, usize>,
    groups: Vec<Group>,
}

impl Groups {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), keep_documents: true, ..Default::default() }
    }

    /// Count members without holding on to them.
    pub fn counting(path: impl Into<String>) -> Self {
        Self { keep_documents: false, ..Self::new(path) }
    }

    pub fn insert(&mut self, doc: Document) {
        let key = get_path(&doc, &self.path).filter(|value| !matches!(value, Bson::Null)).cloned();
        let position = *self.positions.entry(group_key(key.as_ref())).or_insert_with(|| {
            self.groups.push(Group { key, count: 0, documents: Vec::new() });
            self.groups.len() - 1
        });

        let group = &mut self.groups[position];
        group.count += 1;
        if self.keep_documents {
            group.documents.push(doc);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }
}

/// Hashable identity of a grouping value, with numbers folded together like [`values_equal`].
fn group_key(value: Option<&Bson>) -> String {
    match value {
        None => "null".to_string(),
        Some(value) => match as_number(value) {
            Some(number) => number.to_string(),
            None => value.clone().into_relaxed_extjson().to_string(),
        },
    }
}

/// Group documents by the value at `path`.
pub fn group_by<I>(docs: I, path: &str) -> Vec<Group>
where
    I: IntoIterator<Item = Document>,
{
    let mut groups = Groups::new(path);
    for doc in docs {
        groups.insert(doc);
    }
    groups.into_groups()
}
