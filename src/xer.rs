// File: src/xer.rs
// Line-oriented parser for Primavera's tab-delimited XER export.
//
// Grammar, one line at a time:
//   ERMHDR <tab> ...      export header
//   %T <tab> name         opens a table (re-opening appends to it)
//   %F <tab> f1 <tab> ... declares field order for the open block
//   %R <tab> v1 <tab> ... appends a row under the declared fields
//   %E                    stop; remaining lines are ignored
// Blank lines are skipped. Only structural violations abort; cell-level
// oddities are coerced or nulled.
use crate::document::{Document, ExportHeader};
use crate::error::{Error, Result};
use crate::scalar::{CoerceOptions, Row, Scalar, coerce};

#[derive(Debug, Clone, Copy, Default)]
pub struct XerOptions {
    pub coerce: CoerceOptions,
}

pub fn parse_xer(text: &str, opts: &XerOptions) -> Result<Document> {
    let mut doc = Document::new();
    let mut current: Option<String> = None;
    let mut block_fields: Vec<String> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line = idx + 1;
        if raw_line.trim().is_empty() {
            continue;
        }
        let mut cells = raw_line.split('\t');
        let marker = cells.next().unwrap_or("").trim();
        match marker {
            "ERMHDR" => {
                doc.header = Some(parse_header(cells));
            }
            "%T" => {
                let name = cells.next().unwrap_or("").trim().to_string();
                if name.is_empty() {
                    return Err(Error::ParseStructure {
                        line,
                        message: "%T without a table name".to_string(),
                    });
                }
                doc.table_mut(&name);
                block_fields.clear();
                current = Some(name);
            }
            "%F" => {
                let Some(name) = current.as_deref() else {
                    return Err(Error::ParseStructure {
                        line,
                        message: "%F field declaration before any %T".to_string(),
                    });
                };
                block_fields = cells.map(|f| f.trim().to_string()).collect();
                // A re-opened table may declare a different field set; the
                // table keeps the union in first-seen order so that every
                // stored row's keys stay within the declared fields.
                let table = doc.table_mut(name);
                for field in &block_fields {
                    if !table.fields.contains(field) {
                        table.fields.push(field.clone());
                    }
                }
            }
            "%R" => {
                let Some(name) = current.as_deref() else {
                    return Err(Error::ParseStructure {
                        line,
                        message: "%R record before any %T".to_string(),
                    });
                };
                if block_fields.is_empty() {
                    return Err(Error::ParseStructure {
                        line,
                        message: format!("%R record in table {name} before %F"),
                    });
                }
                let row = build_row(&block_fields, cells, &opts.coerce);
                doc.table_mut(name).rows.push(row);
            }
            "%E" => break,
            // Unknown markers are tolerated; real exports occasionally carry
            // vendor extensions between tables.
            _ => continue,
        }
    }

    append_summary(&mut doc);
    Ok(doc)
}

fn parse_header<'a>(cells: impl Iterator<Item = &'a str>) -> ExportHeader {
    let vals: Vec<Option<String>> = cells
        .map(|c| {
            let t = c.trim();
            (!t.is_empty()).then(|| t.to_string())
        })
        .collect();
    let at = |i: usize| vals.get(i).cloned().flatten();
    ExportHeader {
        version: at(0),
        export_date: at(1),
        context: at(2),
        user: at(3),
        database: at(4),
        module: at(5),
        base_currency: at(6),
    }
}

fn build_row<'a>(
    fields: &[String],
    cells: impl Iterator<Item = &'a str>,
    opts: &CoerceOptions,
) -> Row {
    let mut row = Row::with_capacity(fields.len());
    let mut values = cells;
    for field in fields {
        // Values beyond the declared field count are dropped by never being
        // pulled; missing trailing values coerce from "".
        let cell = values.next().unwrap_or("");
        row.insert(field.clone(), coerce(cell, opts));
    }
    row
}

/// Appends the derived SUMMARIZE table: one row per parsed table with its
/// field/row counts, preceded by a header echo when an ERMHDR was seen.
/// Consumed by presentation layers only; no check reads it.
fn append_summary(doc: &mut Document) {
    let mut rows: Vec<Row> = Vec::with_capacity(doc.tables().len() + 1);
    if let Some(h) = &doc.header {
        let mut row = Row::new();
        row.insert("table_name".into(), Scalar::Str("ERMHDR".into()));
        row.insert("row_cnt".into(), Scalar::Num(1.0));
        if let Some(v) = &h.version {
            row.insert("info".into(), Scalar::Str(v.clone()));
        }
        rows.push(row);
    }
    for t in doc.tables() {
        let mut row = Row::new();
        row.insert("table_name".into(), Scalar::Str(t.name.clone()));
        row.insert("field_cnt".into(), Scalar::Num(t.fields.len() as f64));
        row.insert("row_cnt".into(), Scalar::Num(t.rows.len() as f64));
        rows.push(row);
    }
    let summary = doc.table_mut("SUMMARIZE");
    summary.fields = vec![
        "table_name".into(),
        "field_cnt".into(),
        "row_cnt".into(),
        "info".into(),
    ];
    summary.rows = rows;
}
