// File: src/checks/missed.rs
// DCMA Check 11: Missed Tasks: completed activities that finished later
// than their baseline finish, day-truncated.
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, UpperThresholds, eligible_tasks, load_project,
};
use crate::error::Result;
use crate::scalar::{day_of, percent_of};
use crate::store::TableStore;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissedTaskOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

impl Default for MissedTaskOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MissedTaskDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub baseline_finish: NaiveDateTime,
    pub actual_finish: NaiveDateTime,
    pub slip_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissedTaskResult {
    pub proj_id: i64,
    /// Completed tasks with both a baseline finish and an actual finish.
    pub evaluated_count: usize,
    pub missed_count: usize,
    pub percent_missed: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<MissedTaskDetail>,
    pub dq: Dq,
}

pub async fn analyze_missed_tasks<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &MissedTaskOptions,
) -> Result<MissedTaskResult> {
    let data = load_project(store, proj_id, crate::calendar::DEFAULT_HOURS_PER_DAY).await?;
    let mut dq = Dq::default();

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut evaluated = 0;
    let mut missed = 0;
    let mut details = Vec::new();

    for task in &eligible {
        if !task.status.is_completed() {
            continue;
        }
        let Some(baseline) = task.baseline_end else {
            dq.bump("completed_missing_baseline_finish");
            continue;
        };
        let Some(actual) = task.act_end else {
            dq.bump("completed_missing_actual_finish");
            continue;
        };
        evaluated += 1;
        if day_of(actual) > day_of(baseline) {
            missed += 1;
            opts.details.push(
                &mut details,
                MissedTaskDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    baseline_finish: baseline,
                    actual_finish: actual,
                    slip_days: (day_of(actual) - day_of(baseline)).num_days(),
                },
            );
        }
    }

    let percent_missed = percent_of(missed, evaluated);
    Ok(MissedTaskResult {
        proj_id,
        evaluated_count: evaluated,
        missed_count: missed,
        percent_missed,
        grade: opts.thresholds.grade(percent_missed),
        threshold_exceeded: !opts.thresholds.passes(percent_missed),
        details,
        dq,
    })
}
