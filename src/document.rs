// File: src/document.rs
// The relational table model both parsers produce. A Document is built once
// per import and treated as immutable afterwards; re-importing replaces it.
use crate::scalar::{Row, Scalar};
use serde::Serialize;
use std::collections::HashMap;

/// ERMHDR metadata from an XER export (absent for XML imports).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportHeader {
    pub version: Option<String>,
    pub export_date: Option<String>,
    pub context: Option<String>,
    pub user: Option<String>,
    pub database: Option<String>,
    pub module: Option<String>,
    pub base_currency: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Table {
    pub name: String,
    /// Declared field order, first-seen. Every row's key set is a subset.
    pub fields: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// Ordered collection of tables keyed by name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub header: Option<ExportHeader>,
    tables: Vec<Table>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table named `name`, creating it at the end if missing.
    pub fn table_mut(&mut self, name: &str) -> &mut Table {
        if let Some(&i) = self.index.get(name) {
            return &mut self.tables[i];
        }
        self.index.insert(name.to_string(), self.tables.len());
        self.tables.push(Table::new(name));
        self.tables.last_mut().unwrap()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Rows of `name`, or an empty slice when the table is absent. Checks
    /// load optional tables (TASKRSRC, CALENDAR) through this.
    pub fn rows(&self, name: &str) -> &[Row] {
        self.table(name).map(|t| t.rows.as_slice()).unwrap_or(&[])
    }

    /// Appends a row, folding any previously unseen keys into the declared
    /// field list so field order stays first-seen.
    pub fn push_row(&mut self, table: &str, row: Row) {
        let t = self.table_mut(table);
        for key in row.keys() {
            if !t.fields.iter().any(|f| f == key) {
                t.fields.push(key.clone());
            }
        }
        t.rows.push(row);
    }
}

/// Convenience for the XML mappers: insert only non-null values.
pub fn put(row: &mut Row, field: &str, value: Scalar) {
    if !value.is_null() {
        row.insert(field.to_string(), value);
    }
}
