// File: src/checks/resources.rs
// DCMA Check 10: Resources: activities of at least one working day of
// duration should carry at least one resource assignment.
use crate::calendar::DEFAULT_HOURS_PER_DAY;
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, UpperThresholds, eligible_tasks, load_project,
};
use crate::error::Result;
use crate::model::TaskRsrcRow;
use crate::scalar::percent_of;
use crate::store::TableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(0.0, 0.0, 0.0)
}
fn default_hours_per_day() -> f64 {
    DEFAULT_HOURS_PER_DAY
}
fn default_min_days() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Minimum duration, in working days, for a task to need resources.
    #[serde(default = "default_min_days")]
    pub min_duration_days: f64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    /// Percent of qualifying tasks allowed to have no assignment.
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            min_duration_days: default_min_days(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceResult {
    pub proj_id: i64,
    /// Tasks long enough to need resources.
    pub evaluated_count: usize,
    pub unresourced_count: usize,
    pub percent_unresourced: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<ResourceDetail>,
    pub dq: Dq,
}

pub async fn analyze_resources<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &ResourceOptions,
) -> Result<ResourceResult> {
    let data = load_project(store, proj_id, opts.hours_per_day).await?;
    let mut dq = Dq::default();

    // Milestones have zero duration by definition; keep them out regardless
    // of the caller's milestone toggle.
    let mut filters = opts.filters;
    filters.ignore_milestone_activities = true;

    let eligible = eligible_tasks(&data, &filters, &mut dq);
    let assignments = assignment_counts(&data.assignments, &mut dq);

    let mut evaluated = 0;
    let mut unresourced = 0;
    let mut details = Vec::new();

    for task in &eligible {
        let Some(duration) = task.target_dur_hr.or(task.remain_dur_hr) else {
            dq.bump("task_missing_duration");
            continue;
        };
        let hpd = data.calendars.hours_per_day(task.clndr_id);
        if duration < opts.min_duration_days * hpd {
            dq.bump("excluded_short_duration");
            continue;
        }
        evaluated += 1;
        if assignments.get(&task.task_id).copied().unwrap_or(0) == 0 {
            unresourced += 1;
            opts.details.push(
                &mut details,
                ResourceDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    duration_hours: duration,
                },
            );
        }
    }

    let percent_unresourced = percent_of(unresourced, evaluated);
    Ok(ResourceResult {
        proj_id,
        evaluated_count: evaluated,
        unresourced_count: unresourced,
        percent_unresourced,
        grade: opts.thresholds.grade(percent_unresourced),
        threshold_exceeded: !opts.thresholds.passes(percent_unresourced),
        details,
        dq,
    })
}

fn assignment_counts(rows: &[crate::scalar::Row], dq: &mut Dq) -> HashMap<i64, usize> {
    let mut counts = HashMap::with_capacity(rows.len());
    for row in rows {
        match TaskRsrcRow::from_row(row) {
            Some(a) => *counts.entry(a.task_id).or_insert(0) += 1,
            None => dq.bump("assignment_missing_task_id"),
        }
    }
    counts
}
