// File: src/p6xml/mappers.rs
// DOM-to-row mappers. Each semantic field reads from an ordered list of
// candidate tag names and takes the first present, non-empty value, because
// P6 exporters disagree on tag spelling across schema versions. Values land
// in XER-style column names so the check engine reads both formats the same
// way.
use crate::document::put;
use crate::p6xml::synthetic_key;
use crate::scalar::{Row, Scalar, parse_date};
use roxmltree::Node;

/// First candidate child element with non-empty text.
pub(crate) fn child_text(node: Node<'_, '_>, names: &[&str]) -> Option<String> {
    for name in names {
        for child in node.children() {
            if child.is_element() && child.tag_name().name() == *name {
                if let Some(text) = child.text() {
                    let t = text.trim();
                    if !t.is_empty() {
                        return Some(t.to_string());
                    }
                }
            }
        }
    }
    None
}

pub(crate) fn child_num(node: Node<'_, '_>, names: &[&str]) -> Option<f64> {
    child_text(node, names).and_then(|t| t.parse::<f64>().ok())
}

pub(crate) fn child_id(node: Node<'_, '_>, names: &[&str]) -> Option<i64> {
    child_text(node, names).and_then(|t| t.parse::<i64>().ok())
}

pub(crate) fn child_date(node: Node<'_, '_>, names: &[&str]) -> Scalar {
    child_text(node, names)
        .and_then(|t| parse_date(&t))
        .map(Scalar::Date)
        .unwrap_or(Scalar::Null)
}

fn str_or_null(v: Option<String>) -> Scalar {
    v.map(Scalar::Str).unwrap_or(Scalar::Null)
}

fn num_or_null(v: Option<f64>) -> Scalar {
    v.map(Scalar::Num).unwrap_or(Scalar::Null)
}

fn id_or_null(v: Option<i64>) -> Scalar {
    v.map(|n| Scalar::Num(n as f64)).unwrap_or(Scalar::Null)
}

/// Numeric `ObjectId` when present, else the FNV-1a synthetic key over the
/// given distinguishing parts.
pub(crate) fn object_id_or(node: Node<'_, '_>, parts: &[&str]) -> i64 {
    child_id(node, &["ObjectId"]).unwrap_or_else(|| synthetic_key(parts))
}

pub(crate) fn project_row(node: Node<'_, '_>, proj_id: i64) -> Row {
    let mut row = Row::new();
    put(&mut row, "proj_id", Scalar::Num(proj_id as f64));
    put(&mut row, "proj_short_name", str_or_null(child_text(node, &["Id", "Name"])));
    put(
        &mut row,
        "last_recalc_date",
        child_date(node, &["DataDate", "CurrentDataDate"]),
    );
    put(
        &mut row,
        "scd_end_date",
        child_date(node, &["ScheduledFinishDate", "FinishDate", "PlannedFinishDate"]),
    );
    put(&mut row, "plan_start_date", child_date(node, &["PlannedStartDate", "StartDate"]));
    row
}

pub(crate) fn wbs_row(node: Node<'_, '_>, proj_id: i64) -> Row {
    let name = child_text(node, &["Name"]);
    let code = child_text(node, &["Code"]);
    let key = object_id_or(
        node,
        &[
            &proj_id.to_string(),
            code.as_deref().unwrap_or(""),
            name.as_deref().unwrap_or(""),
        ],
    );
    let mut row = Row::new();
    put(&mut row, "wbs_id", Scalar::Num(key as f64));
    put(&mut row, "proj_id", Scalar::Num(proj_id as f64));
    put(
        &mut row,
        "parent_wbs_id",
        id_or_null(child_id(node, &["ParentObjectId"])),
    );
    put(&mut row, "wbs_short_name", str_or_null(code));
    put(&mut row, "wbs_name", str_or_null(name));
    row
}

/// Key derivation for an `Activity` node, shared between the task mapper and
/// the successor-fallback path of nested `PredecessorLink` elements.
pub(crate) fn activity_key(node: Node<'_, '_>, proj_id: i64) -> i64 {
    object_id_or(
        node,
        &[
            &proj_id.to_string(),
            child_text(node, &["Id", "ActivityId"]).as_deref().unwrap_or(""),
            child_text(node, &["Name"]).as_deref().unwrap_or(""),
        ],
    )
}

pub(crate) fn task_row(node: Node<'_, '_>, proj_id: i64) -> Row {
    let code = child_text(node, &["Id", "ActivityId"]);
    let name = child_text(node, &["Name"]);
    let key = activity_key(node, proj_id);
    let mut row = Row::new();
    put(&mut row, "task_id", Scalar::Num(key as f64));
    put(&mut row, "proj_id", Scalar::Num(proj_id as f64));
    put(
        &mut row,
        "clndr_id",
        id_or_null(child_id(node, &["CalendarObjectId"])),
    );
    put(&mut row, "wbs_id", id_or_null(child_id(node, &["WBSObjectId"])));
    put(&mut row, "task_code", str_or_null(code));
    put(&mut row, "task_name", str_or_null(name));
    put(
        &mut row,
        "task_type",
        str_or_null(child_text(node, &["Type", "ActivityType"])),
    );
    put(
        &mut row,
        "status_code",
        str_or_null(child_text(node, &["Status", "StatusCode"])),
    );
    put(
        &mut row,
        "cstr_type",
        str_or_null(child_text(node, &["PrimaryConstraintType", "ConstraintType"])),
    );
    put(
        &mut row,
        "cstr_date",
        child_date(node, &["PrimaryConstraintDate", "ConstraintDate"]),
    );
    put(
        &mut row,
        "early_start_date",
        child_date(node, &["EarlyStartDate", "RemainingEarlyStartDate"]),
    );
    put(
        &mut row,
        "early_end_date",
        child_date(node, &["EarlyFinishDate", "RemainingEarlyFinishDate"]),
    );
    put(
        &mut row,
        "late_start_date",
        child_date(node, &["LateStartDate", "RemainingLateStartDate"]),
    );
    put(
        &mut row,
        "late_end_date",
        child_date(node, &["LateFinishDate", "RemainingLateFinishDate"]),
    );
    put(&mut row, "act_start_date", child_date(node, &["ActualStartDate"]));
    put(&mut row, "act_end_date", child_date(node, &["ActualFinishDate"]));
    put(
        &mut row,
        "target_start_date",
        child_date(node, &["BaselineStartDate", "PlannedStartDate"]),
    );
    put(
        &mut row,
        "target_end_date",
        child_date(node, &["BaselineFinishDate", "PlannedFinishDate"]),
    );
    put(
        &mut row,
        "total_float_hr_cnt",
        num_or_null(child_num(node, &["TotalFloat", "TotalFloatHourCount"])),
    );
    put(
        &mut row,
        "remain_drtn_hr_cnt",
        num_or_null(child_num(node, &["RemainingDuration", "RemainingDurationHourCount"])),
    );
    put(
        &mut row,
        "target_drtn_hr_cnt",
        num_or_null(child_num(node, &["PlannedDuration", "BaselineDuration"])),
    );
    row
}

/// Maps a `PredecessorLink` or `Relationship` element. Links nested in an
/// `Activity` often omit the successor id; `successor_fallback` supplies the
/// enclosing activity's key in that case.
pub(crate) fn pred_row(
    node: Node<'_, '_>,
    proj_id: i64,
    successor_fallback: Option<i64>,
) -> Option<Row> {
    let pred = child_id(node, &["PredecessorActivityObjectId", "PredecessorObjectId"])?;
    let succ = child_id(node, &["SuccessorActivityObjectId", "SuccessorObjectId"])
        .or(successor_fallback)?;
    let link_type = child_text(node, &["Type", "RelationshipType"]);
    let lag = child_num(node, &["Lag", "LagHourCount"]);
    let key = object_id_or(
        node,
        &[
            &pred.to_string(),
            &succ.to_string(),
            link_type.as_deref().unwrap_or(""),
            &lag.map(|l| l.to_string()).unwrap_or_default(),
        ],
    );
    let mut row = Row::new();
    put(&mut row, "task_pred_id", Scalar::Num(key as f64));
    put(&mut row, "proj_id", Scalar::Num(proj_id as f64));
    put(&mut row, "task_id", Scalar::Num(succ as f64));
    put(&mut row, "pred_task_id", Scalar::Num(pred as f64));
    put(&mut row, "pred_type", str_or_null(link_type));
    put(&mut row, "lag_hr_cnt", num_or_null(lag));
    Some(row)
}

pub(crate) fn rsrc_row(node: Node<'_, '_>) -> Row {
    let short = child_text(node, &["Id"]);
    let name = child_text(node, &["Name"]);
    let key = object_id_or(
        node,
        &[short.as_deref().unwrap_or(""), name.as_deref().unwrap_or("")],
    );
    let mut row = Row::new();
    put(&mut row, "rsrc_id", Scalar::Num(key as f64));
    put(&mut row, "rsrc_short_name", str_or_null(short));
    put(&mut row, "rsrc_name", str_or_null(name));
    put(
        &mut row,
        "rsrc_type",
        str_or_null(child_text(node, &["ResourceType", "Type"])),
    );
    put(
        &mut row,
        "clndr_id",
        id_or_null(child_id(node, &["CalendarObjectId"])),
    );
    row
}

/// `resource_fallback` carries the enclosing `Resource` key for nested roles.
pub(crate) fn rsrcrole_row(node: Node<'_, '_>, resource_fallback: Option<i64>) -> Option<Row> {
    let rsrc = child_id(node, &["ResourceObjectId"]).or(resource_fallback)?;
    let role = child_id(node, &["RoleObjectId"]);
    let key = object_id_or(
        node,
        &[
            &rsrc.to_string(),
            &role.map(|r| r.to_string()).unwrap_or_default(),
        ],
    );
    let mut row = Row::new();
    put(&mut row, "rsrc_role_id", Scalar::Num(key as f64));
    put(&mut row, "rsrc_id", Scalar::Num(rsrc as f64));
    put(&mut row, "role_id", id_or_null(role));
    Some(row)
}

pub(crate) fn calendar_row(node: Node<'_, '_>) -> Row {
    let name = child_text(node, &["Name"]);
    let key = object_id_or(node, &[name.as_deref().unwrap_or("")]);
    let mut row = Row::new();
    put(&mut row, "clndr_id", Scalar::Num(key as f64));
    put(&mut row, "clndr_name", str_or_null(name));
    put(&mut row, "clndr_type", str_or_null(child_text(node, &["Type"])));
    put(&mut row, "day_hr_cnt", num_or_null(child_num(node, &["HoursPerDay"])));
    put(&mut row, "week_hr_cnt", num_or_null(child_num(node, &["HoursPerWeek"])));
    put(&mut row, "month_hr_cnt", num_or_null(child_num(node, &["HoursPerMonth"])));
    put(&mut row, "year_hr_cnt", num_or_null(child_num(node, &["HoursPerYear"])));
    row
}

pub(crate) fn taskrsrc_row(node: Node<'_, '_>, proj_id: i64) -> Option<Row> {
    let task = child_id(node, &["ActivityObjectId"])?;
    let rsrc = child_id(node, &["ResourceObjectId"]);
    let role = child_id(node, &["RoleObjectId"]);
    let key = object_id_or(
        node,
        &[
            &task.to_string(),
            &rsrc.map(|r| r.to_string()).unwrap_or_default(),
            &role.map(|r| r.to_string()).unwrap_or_default(),
        ],
    );
    let mut row = Row::new();
    put(&mut row, "taskrsrc_id", Scalar::Num(key as f64));
    put(&mut row, "proj_id", Scalar::Num(proj_id as f64));
    put(&mut row, "task_id", Scalar::Num(task as f64));
    put(&mut row, "rsrc_id", id_or_null(rsrc));
    put(&mut row, "role_id", id_or_null(role));
    put(
        &mut row,
        "target_qty",
        num_or_null(child_num(node, &["PlannedUnits", "BudgetedUnits"])),
    );
    put(&mut row, "remain_qty", num_or_null(child_num(node, &["RemainingUnits"])));
    put(&mut row, "act_reg_qty", num_or_null(child_num(node, &["ActualUnits"])));
    put(
        &mut row,
        "target_cost",
        num_or_null(child_num(node, &["PlannedCost", "BudgetedCost"])),
    );
    put(&mut row, "remain_cost", num_or_null(child_num(node, &["RemainingCost"])));
    put(&mut row, "act_reg_cost", num_or_null(child_num(node, &["ActualCost"])));
    Some(row)
}

pub(crate) fn currency_row(node: Node<'_, '_>) -> Row {
    let short = child_text(node, &["Id"]);
    let key = object_id_or(node, &[short.as_deref().unwrap_or("")]);
    let mut row = Row::new();
    put(&mut row, "curr_id", Scalar::Num(key as f64));
    put(&mut row, "curr_short_name", str_or_null(short));
    put(&mut row, "curr_type", str_or_null(child_text(node, &["Name"])));
    put(&mut row, "curr_symbol", str_or_null(child_text(node, &["Symbol"])));
    row
}
