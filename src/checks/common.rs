// File: src/checks/common.rs
// Shared machinery for the fourteen checks: option structs, clamped threshold
// bands, the DQ counter block, project/table loading and the eligible-set and
// link-dedup pipelines every check starts from.
use crate::calendar::{CalendarIndex, DEFAULT_HOURS_PER_DAY};
use crate::error::{Error, Result};
use crate::model::fields::first_id;
use crate::model::{ProjectRow, TaskPredRow, TaskRow, TaskType};
use crate::scalar::Row;
use crate::store::TableStore;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

pub(crate) fn default_true() -> bool {
    true
}
fn default_details_limit() -> usize {
    100
}
fn default_fixed_hpd() -> f64 {
    DEFAULT_HOURS_PER_DAY
}

/// Data-quality counters: every tolerated anomaly (duplicate link, unknown
/// enum code, missing field...) bumps a named counter instead of failing the
/// check. Serialized as a plain name -> count map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dq(BTreeMap<String, u64>);

impl Dq {
    pub fn bump(&mut self, counter: &str) {
        self.add(counter, 1);
    }

    pub fn add(&mut self, counter: &str, n: u64) {
        if n > 0 {
            *self.0.entry(counter.to_string()).or_insert(0) += n;
        }
    }

    pub fn get(&self, counter: &str) -> u64 {
        self.0.get(counter).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn counters(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Upper-bound threshold band: the metric passes while it stays at or below
/// `required`; `great <= average <= required` is enforced on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBand")]
pub struct UpperThresholds {
    pub great: f64,
    pub average: f64,
    pub required: f64,
}

/// Lower-bound band: passes at or above `required`; `great >= average >=
/// required` enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBand")]
pub struct LowerThresholds {
    pub great: f64,
    pub average: f64,
    pub required: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct RawBand {
    great: f64,
    average: f64,
    required: f64,
}

impl From<RawBand> for UpperThresholds {
    fn from(r: RawBand) -> Self {
        UpperThresholds::new(r.great, r.average, r.required)
    }
}

impl From<RawBand> for LowerThresholds {
    fn from(r: RawBand) -> Self {
        LowerThresholds::new(r.great, r.average, r.required)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Great,
    Average,
    Poor,
}

impl UpperThresholds {
    /// Clamps so `great <= average <= required` always holds.
    pub fn new(great: f64, average: f64, required: f64) -> Self {
        let average = average.min(required);
        let great = great.min(average);
        Self { great, average, required }
    }

    pub fn passes(&self, value: f64) -> bool {
        value <= self.required
    }

    pub fn grade(&self, value: f64) -> Grade {
        if value <= self.great {
            Grade::Great
        } else if value <= self.average {
            Grade::Average
        } else {
            Grade::Poor
        }
    }
}

impl LowerThresholds {
    /// Clamps so `great >= average >= required` always holds.
    pub fn new(great: f64, average: f64, required: f64) -> Self {
        let average = average.max(required);
        let great = great.max(average);
        Self { great, average, required }
    }

    pub fn passes(&self, value: f64) -> bool {
        value >= self.required
    }

    pub fn grade(&self, value: f64) -> Grade {
        if value >= self.great {
            Grade::Great
        } else if value >= self.average {
            Grade::Average
        } else {
            Grade::Poor
        }
    }
}

/// Detail-list controls shared by every check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DetailOptions {
    #[serde(default = "default_true")]
    pub include_details: bool,
    #[serde(default = "default_details_limit")]
    pub details_limit: usize,
}

impl Default for DetailOptions {
    fn default() -> Self {
        Self {
            include_details: true,
            details_limit: default_details_limit(),
        }
    }
}

impl DetailOptions {
    /// Pushes onto a bounded detail list; silently drops past the cap.
    pub(crate) fn push<T>(&self, list: &mut Vec<T>, item: T) {
        if self.include_details && list.len() < self.details_limit {
            list.push(item);
        }
    }
}

/// Caller-supplied eligibility toggles. Defaults mirror the DCMA reading:
/// summary-like activities are always excluded, the rest is opt-in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivityFilters {
    #[serde(default)]
    pub ignore_milestone_activities: bool,
    #[serde(default = "default_true")]
    pub ignore_loe_activities: bool,
    #[serde(default = "default_true")]
    pub ignore_wbs_summary_activities: bool,
    #[serde(default)]
    pub ignore_completed_activities: bool,
}

impl Default for ActivityFilters {
    fn default() -> Self {
        Self {
            ignore_milestone_activities: false,
            ignore_loe_activities: true,
            ignore_wbs_summary_activities: true,
            ignore_completed_activities: false,
        }
    }
}

/// Which calendar resolves hours-per-day for link-lag conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSource {
    #[default]
    Successor,
    Predecessor,
    Fixed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalendarOptions {
    #[serde(default)]
    pub calendar_source: CalendarSource,
    #[serde(default = "default_fixed_hpd")]
    pub fixed_hours_per_day: f64,
    /// Fallback when neither the task nor the project supplies a calendar.
    #[serde(default = "default_fixed_hpd")]
    pub hours_per_day: f64,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            calendar_source: CalendarSource::Successor,
            fixed_hours_per_day: DEFAULT_HOURS_PER_DAY,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
        }
    }
}

// --- LOADING PIPELINE ---

/// Everything a check reads, loaded fresh per call: no state is shared
/// between check invocations.
pub(crate) struct ProjectData {
    pub project: ProjectRow,
    pub tasks: Vec<Row>,
    pub links: Vec<Row>,
    pub assignments: Vec<Row>,
    pub calendars: CalendarIndex,
}

pub(crate) async fn load_project<S: TableStore>(
    store: &S,
    proj_id: i64,
    fallback_hpd: f64,
) -> Result<ProjectData> {
    let projects = store.rows("PROJECT").await?;
    let project = projects
        .iter()
        .filter_map(|r| ProjectRow::from_row(r))
        .find(|p| p.proj_id == proj_id)
        .ok_or(Error::ProjectNotFound { proj_id })?;

    let tasks = store.rows("TASK").await?;
    let links = store.rows("TASKPRED").await?;
    let assignments = store.rows("TASKRSRC").await?;
    let calendars = CalendarIndex::build(&store.rows("CALENDAR").await?, fallback_hpd);

    Ok(ProjectData {
        project,
        tasks,
        links,
        assignments,
        calendars,
    })
}

impl ProjectData {
    /// The project's data date, required by the date-sensitive checks.
    pub fn data_date(&self) -> Result<NaiveDateTime> {
        self.project.data_date.ok_or(Error::InvalidDataDate {
            proj_id: self.project.proj_id,
        })
    }
}

/// Decodes and filters the project's tasks into the eligible set.
/// Every exclusion bumps a named DQ counter; nothing is silently dropped.
pub(crate) fn eligible_tasks(
    data: &ProjectData,
    filters: &ActivityFilters,
    dq: &mut Dq,
) -> Vec<TaskRow> {
    let proj_id = data.project.proj_id;
    let mut seen_ids: HashSet<i64> = HashSet::with_capacity(data.tasks.len());
    let mut out = Vec::with_capacity(data.tasks.len());
    for row in &data.tasks {
        let Some(task) = TaskRow::from_row(row) else {
            dq.bump("task_missing_id");
            continue;
        };
        if task.proj_id.is_some_and(|p| p != proj_id) {
            dq.bump("task_other_project");
            continue;
        }
        if !seen_ids.insert(task.task_id) {
            dq.bump("task_duplicate_id");
            continue;
        }
        if task.task_type == TaskType::Unknown {
            dq.bump("task_unknown_type");
        }
        if filters.ignore_wbs_summary_activities && task.task_type == TaskType::WbsSummary {
            dq.bump("excluded_wbs_summary");
            continue;
        }
        if filters.ignore_loe_activities && task.task_type.is_summary_like()
            && task.task_type != TaskType::WbsSummary
        {
            dq.bump("excluded_loe");
            continue;
        }
        if filters.ignore_milestone_activities && task.task_type.is_milestone() {
            dq.bump("excluded_milestone");
            continue;
        }
        if filters.ignore_completed_activities && task.status.is_completed() {
            dq.bump("excluded_completed");
            continue;
        }
        out.push(task);
    }
    out
}

/// All task ids belonging to the project, before any filter. Link
/// internal/external classification works against this set.
pub(crate) fn project_task_ids(data: &ProjectData) -> HashSet<i64> {
    let proj_id = data.project.proj_id;
    data.tasks
        .iter()
        .filter(|r| first_id(r, &["proj_id"]).is_none_or(|p| p == proj_id))
        .filter_map(|r| first_id(r, &["task_id"]))
        .collect()
}

/// Composite identity used to fold re-exported duplicate links.
fn link_key(l: &TaskPredRow, ignore_lag: bool) -> (i64, i64, crate::model::LinkType, u64, String) {
    let lag_bits = if ignore_lag {
        0
    } else {
        l.lag_hr.or(l.lag_raw).unwrap_or(0.0).to_bits()
    };
    let units = if ignore_lag {
        String::new()
    } else {
        l.lag_units.clone().unwrap_or_default()
    };
    (l.task_id, l.pred_task_id, l.pred_type, lag_bits, units)
}

/// Decodes TASKPRED rows and keeps the internal, deduplicated links.
/// Self-loops, duplicates and externally-referencing links are counted in
/// `dq`, never silently discarded. Idempotent: feeding the output through
/// again yields the same set.
pub(crate) fn internal_links(
    rows: &[Row],
    task_ids: &HashSet<i64>,
    ignore_lag_in_key: bool,
    dq: &mut Dq,
) -> Vec<TaskPredRow> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(link) = TaskPredRow::from_row(row) else {
            dq.bump("link_missing_endpoint");
            continue;
        };
        if link.task_id == link.pred_task_id {
            dq.bump("link_self_loop");
            continue;
        }
        let internal = task_ids.contains(&link.task_id) && task_ids.contains(&link.pred_task_id);
        if !internal {
            // One endpoint outside the project is an external dependency;
            // neither endpoint means the row belongs to another project.
            if task_ids.contains(&link.task_id) || task_ids.contains(&link.pred_task_id) {
                dq.bump("link_external");
            } else {
                dq.bump("link_other_project");
            }
            continue;
        }
        if !seen.insert(link_key(&link, ignore_lag_in_key)) {
            dq.bump("link_duplicate");
            continue;
        }
        out.push(link);
    }
    out
}

/// Hours-per-day used for converting one link's lag, per the configured
/// calendar source, via each endpoint task's own calendar.
pub(crate) fn link_hours_per_day(
    link: &TaskPredRow,
    task_calendar: &std::collections::HashMap<i64, Option<i64>>,
    calendars: &CalendarIndex,
    opts: &CalendarOptions,
) -> f64 {
    match opts.calendar_source {
        CalendarSource::Fixed => opts.fixed_hours_per_day,
        CalendarSource::Successor => {
            calendars.hours_per_day(task_calendar.get(&link.task_id).copied().flatten())
        }
        CalendarSource::Predecessor => {
            calendars.hours_per_day(task_calendar.get(&link.pred_task_id).copied().flatten())
        }
    }
}
