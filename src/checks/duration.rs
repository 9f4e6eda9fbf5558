// File: src/checks/duration.rs
// DCMA Check 8: High Duration: incomplete activities whose remaining
// duration exceeds the day threshold, per-task calendar applied.
use crate::calendar::DEFAULT_HOURS_PER_DAY;
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, UpperThresholds, eligible_tasks, load_project,
};
use crate::error::Result;
use crate::scalar::{percent_of, round_pct};
use crate::store::TableStore;
use serde::{Deserialize, Serialize};

fn default_threshold_days() -> f64 {
    44.0
}
fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}
fn default_hours_per_day() -> f64 {
    DEFAULT_HOURS_PER_DAY
}

fn incomplete_filters() -> ActivityFilters {
    ActivityFilters {
        ignore_completed_activities: true,
        ..ActivityFilters::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighDurationOptions {
    #[serde(default = "incomplete_filters")]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Remaining-duration ceiling in working days.
    #[serde(default = "default_threshold_days")]
    pub threshold_days: f64,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

impl Default for HighDurationOptions {
    fn default() -> Self {
        Self {
            filters: incomplete_filters(),
            details: DetailOptions::default(),
            threshold_days: default_threshold_days(),
            hours_per_day: DEFAULT_HOURS_PER_DAY,
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DurationDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub remaining_hours: f64,
    pub remaining_days: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HighDurationResult {
    pub proj_id: i64,
    /// Incomplete tasks with a resolvable remaining duration.
    pub evaluated_count: usize,
    pub high_duration_count: usize,
    pub percent_high_duration: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<DurationDetail>,
    pub dq: Dq,
}

pub async fn analyze_high_duration<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &HighDurationOptions,
) -> Result<HighDurationResult> {
    let data = load_project(store, proj_id, opts.hours_per_day).await?;
    let mut dq = Dq::default();

    // Milestones carry no duration; keep them out of the denominator even
    // when the caller left the milestone toggle off.
    let mut filters = opts.filters;
    filters.ignore_milestone_activities = true;

    let eligible = eligible_tasks(&data, &filters, &mut dq);
    let mut evaluated = 0;
    let mut high = 0;
    let mut details = Vec::new();

    for task in &eligible {
        if task.status.is_completed() {
            dq.bump("excluded_completed");
            continue;
        }
        let Some(rd) = task.remain_dur_hr else {
            dq.bump("task_missing_remaining_duration");
            continue;
        };
        if rd < 0.0 {
            dq.bump("task_negative_remaining_duration");
            continue;
        }
        evaluated += 1;
        let hpd = data.calendars.hours_per_day(task.clndr_id);
        if rd > opts.threshold_days * hpd {
            high += 1;
            opts.details.push(
                &mut details,
                DurationDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    remaining_hours: rd,
                    remaining_days: round_pct(rd / hpd),
                },
            );
        }
    }

    let percent_high_duration = percent_of(high, evaluated);
    Ok(HighDurationResult {
        proj_id,
        evaluated_count: evaluated,
        high_duration_count: high,
        percent_high_duration,
        grade: opts.thresholds.grade(percent_high_duration),
        threshold_exceeded: !opts.thresholds.passes(percent_high_duration),
        details,
        dq,
    })
}
