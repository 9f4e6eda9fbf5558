// File: src/p6xml/mod.rs
// P6 XML import: walks the exported document, maps Project/WBS/Activity/
// PredecessorLink/ResourceAssignment/Resource/ResourceRole/Calendar/Currency
// elements into the same relational tables the XER parser produces.
mod mappers;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::model::fields::first_id;
use crate::scalar::Row;
use mappers::{
    calendar_row, currency_row, pred_row, project_row, rsrc_row, rsrcrole_row, task_row,
    taskrsrc_row, wbs_row,
};
use roxmltree::Node;
use std::collections::HashSet;

/// FNV-1a 32-bit, wrapping semantics. Used to derive stable synthetic numeric
/// keys for elements without a usable `ObjectId`. This is a stable hash, not
/// a UUID; collisions are tolerated at practical input sizes.
pub fn fnv1a_32(input: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in input.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Joins the distinguishing parts and hashes them into an i64-safe key.
pub(crate) fn synthetic_key(parts: &[&str]) -> i64 {
    i64::from(fnv1a_32(&parts.join("|")))
}

/// Tracks primary keys already emitted per table so project-scoped and
/// document-root-scoped entities merge without duplicates. First row wins.
#[derive(Default)]
struct SeenKeys {
    tasks: HashSet<i64>,
    links: HashSet<i64>,
    resources: HashSet<i64>,
    roles: HashSet<i64>,
    calendars: HashSet<i64>,
    currencies: HashSet<i64>,
    assignments: HashSet<i64>,
}

pub fn parse_p6xml(text: &str) -> Result<Document> {
    let xml =
        roxmltree::Document::parse(text).map_err(|e| Error::MalformedXml(e.to_string()))?;
    let root = xml.root_element();

    let mut doc = Document::new();
    let mut seen = SeenKeys::default();

    for project in root
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Project")
    {
        if !has_schedule_content(project) {
            // Metadata-only project node (enterprise summaries etc.).
            continue;
        }
        map_project(project, &mut doc, &mut seen);
    }

    // Document-root-level Resource/ResourceRole/Calendar/Currency live
    // outside any Project element and merge into the same tables.
    for node in root
        .descendants()
        .filter(|n| n.is_element() && !inside_project(*n))
    {
        match node.tag_name().name() {
            "Resource" => push_resource(node, &mut doc, &mut seen),
            "ResourceRole" => {
                if !inside(node, "Resource")
                    && let Some(row) = rsrcrole_row(node, None)
                {
                    push_unique(&mut doc, "RSRCROLE", "rsrc_role_id", row, &mut seen.roles);
                }
            }
            "Calendar" => {
                push_unique(&mut doc, "CALENDAR", "clndr_id", calendar_row(node), &mut seen.calendars);
            }
            "Currency" => {
                push_unique(&mut doc, "CURRTYPE", "curr_id", currency_row(node), &mut seen.currencies);
            }
            _ => {}
        }
    }

    Ok(doc)
}

/// A real schedule export nests WBS or Activity content under the project;
/// nodes without either are exporter metadata and are skipped.
fn has_schedule_content(project: Node<'_, '_>) -> bool {
    project.descendants().any(|n| {
        n.is_element() && matches!(n.tag_name().name(), "WBS" | "Activity")
    })
}

fn inside_project(node: Node<'_, '_>) -> bool {
    inside(node, "Project")
}

fn inside(node: Node<'_, '_>, ancestor: &str) -> bool {
    node.ancestors()
        .skip(1)
        .any(|a| a.is_element() && a.tag_name().name() == ancestor)
}

fn map_project(project: Node<'_, '_>, doc: &mut Document, seen: &mut SeenKeys) {
    let proj_id = mappers::object_id_or(
        project,
        &[&mappers::child_text(project, &["Id", "Name"]).unwrap_or_default()],
    );
    doc.push_row("PROJECT", project_row(project, proj_id));

    for node in project.descendants().filter(|n| n.is_element()) {
        match node.tag_name().name() {
            "WBS" => doc.push_row("PROJWBS", wbs_row(node, proj_id)),
            "Activity" => {
                let row = task_row(node, proj_id);
                push_unique(doc, "TASK", "task_id", row, &mut seen.tasks);
            }
            // Both the Activity-nested PredecessorLink form and the
            // project-level Relationship form land here exactly once each;
            // the key set folds re-exported duplicates.
            "PredecessorLink" | "Relationship" => {
                let successor = node
                    .ancestors()
                    .find(|a| a.is_element() && a.tag_name().name() == "Activity")
                    .map(|a| mappers::activity_key(a, proj_id));
                if let Some(row) = pred_row(node, proj_id, successor) {
                    push_unique(doc, "TASKPRED", "task_pred_id", row, &mut seen.links);
                }
            }
            "Resource" => push_resource(node, doc, seen),
            "ResourceRole" if !inside(node, "Resource") => {
                if let Some(row) = rsrcrole_row(node, None) {
                    push_unique(doc, "RSRCROLE", "rsrc_role_id", row, &mut seen.roles);
                }
            }
            "Calendar" => {
                push_unique(doc, "CALENDAR", "clndr_id", calendar_row(node), &mut seen.calendars);
            }
            "ResourceAssignment" => {
                if let Some(row) = taskrsrc_row(node, proj_id) {
                    push_unique(doc, "TASKRSRC", "taskrsrc_id", row, &mut seen.assignments);
                }
            }
            _ => {}
        }
    }
}

fn push_resource(node: Node<'_, '_>, doc: &mut Document, seen: &mut SeenKeys) {
    let row = rsrc_row(node);
    let rsrc_key = first_id(&row, &["rsrc_id"]);
    push_unique(doc, "RSRC", "rsrc_id", row, &mut seen.resources);
    for child in node
        .children()
        .filter(|n| n.is_element() && n.tag_name().name() == "ResourceRole")
    {
        if let Some(role) = rsrcrole_row(child, rsrc_key) {
            push_unique(doc, "RSRCROLE", "rsrc_role_id", role, &mut seen.roles);
        }
    }
}

fn push_unique(doc: &mut Document, table: &str, key_field: &str, row: Row, seen: &mut HashSet<i64>) {
    match first_id(&row, &[key_field]) {
        Some(key) if !seen.insert(key) => {} // already merged
        _ => doc.push_row(table, row),
    }
}

#[cfg(test)]
mod tests {
    use super::fnv1a_32;

    #[test]
    fn fnv_reference_vectors() {
        // Published FNV-1a 32-bit values.
        assert_eq!(fnv1a_32(""), 0x811c_9dc5);
        assert_eq!(fnv1a_32("a"), 0xe40c_292c);
        assert_eq!(fnv1a_32("foobar"), 0xbf9c_f968);
    }
}
