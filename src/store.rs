// File: src/store.rs
// The table-store port the check engine reads through. The persistence side
// (how a Document got stored between import and analysis) is the caller's
// concern; the engine only ever asks for whole tables by name.
use crate::document::Document;
use crate::error::Result;
use crate::scalar::Row;

/// Read-only access to the keyed table store backing one import.
///
/// Implementations must return an empty vec for tables they do not hold;
/// absence of an optional table (TASKRSRC, CALENDAR...) is not an error.
#[allow(async_fn_in_trait)]
pub trait TableStore {
    async fn rows(&self, table: &str) -> Result<Vec<Row>>;
}

/// In-memory store over a parsed [`Document`], used by the CLI and tests.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    doc: Document,
}

impl MemoryStore {
    pub fn new(doc: Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }
}

impl TableStore for MemoryStore {
    async fn rows(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.doc.rows(table).to_vec())
    }
}
