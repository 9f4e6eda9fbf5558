// File: src/checks/float.rs
// DCMA Checks 6 and 7: High Float and Negative Float. Both convert the
// day-based thresholds to hours through each task's own calendar.
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, UpperThresholds, eligible_tasks, load_project,
};
use crate::calendar::DEFAULT_HOURS_PER_DAY;
use crate::error::Result;
use crate::scalar::{percent_of, round_pct};
use crate::store::TableStore;
use serde::{Deserialize, Serialize};

fn default_high_float_days() -> f64 {
    44.0
}
fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}

/// Incomplete work only: a finished task's float is history.
fn incomplete_filters() -> ActivityFilters {
    ActivityFilters {
        ignore_completed_activities: true,
        ..ActivityFilters::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighFloatOptions {
    #[serde(default = "incomplete_filters")]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Calendar days of total float above which a task counts as high-float.
    #[serde(default = "default_high_float_days")]
    pub threshold_days: f64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

fn default_hours_per_day() -> f64 {
    DEFAULT_HOURS_PER_DAY
}

impl Default for HighFloatOptions {
    fn default() -> Self {
        Self {
            filters: incomplete_filters(),
            details: DetailOptions::default(),
            threshold_days: default_high_float_days(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FloatDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub total_float_hours: f64,
    pub total_float_days: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighFloatResult {
    pub proj_id: i64,
    pub evaluated_count: usize,
    pub high_float_count: usize,
    pub percent_high_float: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<FloatDetail>,
    pub dq: Dq,
}

pub async fn analyze_high_float<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &HighFloatOptions,
) -> Result<HighFloatResult> {
    let data = load_project(store, proj_id, opts.hours_per_day).await?;
    let mut dq = Dq::default();

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut evaluated = 0;
    let mut high = 0;
    let mut details = Vec::new();

    for task in &eligible {
        let Some(tf) = task.total_float_hr else {
            dq.bump("task_missing_total_float");
            continue;
        };
        evaluated += 1;
        let hpd = data.calendars.hours_per_day(task.clndr_id);
        if tf > opts.threshold_days * hpd {
            high += 1;
            opts.details.push(
                &mut details,
                FloatDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    total_float_hours: tf,
                    total_float_days: round_pct(tf / hpd),
                },
            );
        }
    }

    let percent_high_float = percent_of(high, evaluated);
    Ok(HighFloatResult {
        proj_id,
        evaluated_count: evaluated,
        high_float_count: high,
        percent_high_float,
        grade: opts.thresholds.grade(percent_high_float),
        threshold_exceeded: !opts.thresholds.passes(percent_high_float),
        details,
        dq,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegativeFloatOptions {
    #[serde(default = "incomplete_filters")]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Days of negative float tolerated before a task counts.
    #[serde(default)]
    pub tolerance_days: f64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    /// Tasks allowed below the tolerance before the check fails.
    #[serde(default)]
    pub allowed_count: usize,
}

impl Default for NegativeFloatOptions {
    fn default() -> Self {
        Self {
            filters: incomplete_filters(),
            details: DetailOptions::default(),
            tolerance_days: 0.0,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            allowed_count: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NegativeFloatResult {
    pub proj_id: i64,
    pub evaluated_count: usize,
    pub negative_float_count: usize,
    pub percent_negative_float: f64,
    pub passed: bool,
    pub details: Vec<FloatDetail>,
    pub dq: Dq,
}

pub async fn analyze_negative_float<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &NegativeFloatOptions,
) -> Result<NegativeFloatResult> {
    let data = load_project(store, proj_id, opts.hours_per_day).await?;
    let mut dq = Dq::default();

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut evaluated = 0;
    let mut negative = 0;
    let mut details = Vec::new();

    for task in &eligible {
        let Some(tf) = task.total_float_hr else {
            dq.bump("task_missing_total_float");
            continue;
        };
        evaluated += 1;
        let hpd = data.calendars.hours_per_day(task.clndr_id);
        if tf < -(opts.tolerance_days.abs() * hpd) {
            negative += 1;
            opts.details.push(
                &mut details,
                FloatDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    total_float_hours: tf,
                    total_float_days: round_pct(tf / hpd),
                },
            );
        }
    }

    Ok(NegativeFloatResult {
        proj_id,
        evaluated_count: evaluated,
        negative_float_count: negative,
        percent_negative_float: percent_of(negative, evaluated),
        passed: negative <= opts.allowed_count,
        details,
        dq,
    })
}
