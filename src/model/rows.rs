// File: src/model/rows.rs
// Read-only typed views over table rows. Decoding never fails a check: rows
// without a usable primary key yield None and the caller bumps a DQ counter.
use crate::model::enums::{ConstraintType, LinkType, TaskStatus, TaskType};
use crate::model::fields::{first_date, first_id, first_num, first_str};
use crate::scalar::Row;
use chrono::NaiveDateTime;

// Candidate-field priority lists. Order is contractual: it decides which
// export variant wins when several are present, and the numbers a port
// produces are only comparable if the order is identical.
pub const BASELINE_FINISH_FIELDS: &[&str] = &[
    "bl_finish_date",
    "baseline_finish_date",
    "target_end_date",
    "plan_end_date",
];
pub const BASELINE_START_FIELDS: &[&str] = &[
    "bl_start_date",
    "baseline_start_date",
    "target_start_date",
    "plan_start_date",
];
pub const DATA_DATE_FIELDS: &[&str] = &[
    "last_recalc_date",
    "data_date",
    "cur_data_date",
    "next_data_date",
];
pub const PROJECT_FINISH_FIELDS: &[&str] = &["scd_end_date", "plan_end_date", "fcst_end_date"];

#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task_id: i64,
    pub proj_id: Option<i64>,
    pub clndr_id: Option<i64>,
    pub task_code: Option<String>,
    pub task_name: Option<String>,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub cstr_type: Option<ConstraintType>,
    pub cstr_date: Option<NaiveDateTime>,
    pub early_start: Option<NaiveDateTime>,
    pub early_end: Option<NaiveDateTime>,
    pub late_start: Option<NaiveDateTime>,
    pub late_end: Option<NaiveDateTime>,
    pub act_start: Option<NaiveDateTime>,
    pub act_end: Option<NaiveDateTime>,
    pub baseline_start: Option<NaiveDateTime>,
    pub baseline_end: Option<NaiveDateTime>,
    pub total_float_hr: Option<f64>,
    pub remain_dur_hr: Option<f64>,
    pub target_dur_hr: Option<f64>,
}

impl TaskRow {
    pub fn from_row(row: &Row) -> Option<TaskRow> {
        let task_id = first_id(row, &["task_id"])?;
        Some(TaskRow {
            task_id,
            proj_id: first_id(row, &["proj_id"]),
            clndr_id: first_id(row, &["clndr_id"]),
            task_code: first_str(row, &["task_code"]),
            task_name: first_str(row, &["task_name"]),
            task_type: first_str(row, &["task_type"])
                .map(|s| TaskType::parse(&s))
                .unwrap_or(TaskType::Unknown),
            status: first_str(row, &["status_code"])
                .map(|s| TaskStatus::parse(&s))
                .unwrap_or(TaskStatus::Unknown),
            cstr_type: first_str(row, &["cstr_type"]).map(|s| ConstraintType::parse(&s)),
            cstr_date: first_date(row, &["cstr_date"]),
            early_start: first_date(row, &["early_start_date", "restart_date"]),
            early_end: first_date(row, &["early_end_date", "reend_date"]),
            late_start: first_date(row, &["late_start_date"]),
            late_end: first_date(row, &["late_end_date"]),
            act_start: first_date(row, &["act_start_date"]),
            act_end: first_date(row, &["act_end_date"]),
            baseline_start: first_date(row, BASELINE_START_FIELDS),
            baseline_end: first_date(row, BASELINE_FINISH_FIELDS),
            total_float_hr: first_num(row, &["total_float_hr_cnt"]),
            remain_dur_hr: first_num(row, &["remain_drtn_hr_cnt"]),
            target_dur_hr: first_num(row, &["target_drtn_hr_cnt"]),
        })
    }

    /// Forecast finish: early finish, else late finish, else actual finish.
    /// Fixed priority shared by checks 12 and 13.
    pub fn forecast_finish(&self) -> Option<NaiveDateTime> {
        self.early_end.or(self.late_end).or(self.act_end)
    }

    /// Label for detail lists: activity code when present, else the id.
    pub fn label(&self) -> String {
        self.task_code
            .clone()
            .unwrap_or_else(|| self.task_id.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct TaskPredRow {
    pub task_pred_id: Option<i64>,
    /// Successor side of the relationship.
    pub task_id: i64,
    pub pred_task_id: i64,
    pub pred_type: LinkType,
    /// Lag already expressed in hours, when the export carries it that way.
    pub lag_hr: Option<f64>,
    /// Raw (value, unit) pair, for exports that carry lag as e.g. "2 DAYS".
    pub lag_raw: Option<f64>,
    pub lag_units: Option<String>,
}

impl TaskPredRow {
    pub fn from_row(row: &Row) -> Option<TaskPredRow> {
        let task_id = first_id(row, &["task_id", "succ_task_id"])?;
        let pred_task_id = first_id(row, &["pred_task_id"])?;
        Some(TaskPredRow {
            task_pred_id: first_id(row, &["task_pred_id"]),
            task_id,
            pred_task_id,
            pred_type: first_str(row, &["pred_type"])
                .map(|s| LinkType::parse(&s))
                .unwrap_or(LinkType::Unknown),
            lag_hr: first_num(row, &["lag_hr_cnt"]),
            lag_raw: first_num(row, &["lag_raw"]),
            lag_units: first_str(row, &["lag_units"]),
        })
    }

    /// Lag in hours given the hours-per-day the caller resolved from the
    /// configured calendar source. Falls back to the raw (value, unit) pair.
    pub fn lag_hours(&self, hours_per_day: f64) -> Option<f64> {
        if let Some(h) = self.lag_hr {
            return Some(h);
        }
        let raw = self.lag_raw?;
        let units = self
            .lag_units
            .as_deref()
            .map(|u| u.trim().to_ascii_uppercase())
            .unwrap_or_else(|| "H".to_string());
        match units.as_str() {
            "H" | "HR" | "HRS" | "HOUR" | "HOURS" => Some(raw),
            "D" | "DAY" | "DAYS" => Some(raw * hours_per_day),
            "W" | "WK" | "WEEK" | "WEEKS" => Some(raw * hours_per_day * 5.0),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskRsrcRow {
    pub taskrsrc_id: Option<i64>,
    pub task_id: i64,
    pub rsrc_id: Option<i64>,
    pub role_id: Option<i64>,
    pub target_qty: Option<f64>,
    pub remain_qty: Option<f64>,
    pub target_cost: Option<f64>,
    pub remain_cost: Option<f64>,
}

impl TaskRsrcRow {
    pub fn from_row(row: &Row) -> Option<TaskRsrcRow> {
        let task_id = first_id(row, &["task_id"])?;
        Some(TaskRsrcRow {
            taskrsrc_id: first_id(row, &["taskrsrc_id"]),
            task_id,
            rsrc_id: first_id(row, &["rsrc_id"]),
            role_id: first_id(row, &["role_id"]),
            target_qty: first_num(row, &["target_qty"]),
            remain_qty: first_num(row, &["remain_qty"]),
            target_cost: first_num(row, &["target_cost"]),
            remain_cost: first_num(row, &["remain_cost"]),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub proj_id: i64,
    pub short_name: Option<String>,
    pub data_date: Option<NaiveDateTime>,
    pub scd_end: Option<NaiveDateTime>,
}

impl ProjectRow {
    pub fn from_row(row: &Row) -> Option<ProjectRow> {
        let proj_id = first_id(row, &["proj_id"])?;
        Some(ProjectRow {
            proj_id,
            short_name: first_str(row, &["proj_short_name"]),
            data_date: first_date(row, DATA_DATE_FIELDS),
            scd_end: first_date(row, PROJECT_FINISH_FIELDS),
        })
    }
}
