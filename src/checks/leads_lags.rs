// File: src/checks/leads_lags.rs
// DCMA Checks 2 and 3: Leads (negative lag) and Lags (positive lag) across
// the project's internal relationships. Lag-to-hours conversion respects the
// configured calendar source so mixed-calendar projects stay correct.
use crate::checks::common::{
    CalendarOptions, DetailOptions, Dq, Grade, ProjectData, UpperThresholds, internal_links,
    link_hours_per_day, load_project, project_task_ids,
};
use crate::error::Result;
use crate::model::fields::first_id;
use crate::model::{LinkType, TaskPredRow};
use crate::scalar::percent_of;
use crate::store::TableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn leads_thresholds() -> UpperThresholds {
    // Strict DCMA reading: no leads at all.
    UpperThresholds::new(0.0, 0.0, 0.0)
}

fn lags_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadLagOptions {
    #[serde(default)]
    pub details: DetailOptions,
    #[serde(default)]
    pub calendar: CalendarOptions,
    /// Hours of lag tolerated before a link counts against the metric.
    #[serde(default)]
    pub tolerance_hours: f64,
    #[serde(default = "leads_thresholds")]
    pub lead_thresholds: UpperThresholds,
    #[serde(default = "lags_thresholds")]
    pub lag_thresholds: UpperThresholds,
}

impl Default for LeadLagOptions {
    fn default() -> Self {
        Self {
            details: DetailOptions::default(),
            calendar: CalendarOptions::default(),
            tolerance_hours: 0.0,
            lead_thresholds: leads_thresholds(),
            lag_thresholds: lags_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkDetail {
    pub pred_task_id: i64,
    pub task_id: i64,
    pub pred_type: LinkType,
    pub lag_hours: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadLagResult {
    pub proj_id: i64,
    pub link_count: usize,
    pub violation_count: usize,
    pub percent: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<LinkDetail>,
    pub dq: Dq,
}

/// Check 2 (Leads): links whose lag is below `-tolerance_hours`.
pub async fn analyze_leads<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &LeadLagOptions,
) -> Result<LeadLagResult> {
    analyze_lag_direction(store, proj_id, opts, Direction::Lead).await
}

/// Check 3 (Lags): links whose lag is above `tolerance_hours`.
pub async fn analyze_lags<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &LeadLagOptions,
) -> Result<LeadLagResult> {
    analyze_lag_direction(store, proj_id, opts, Direction::Lag).await
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Lead,
    Lag,
}

async fn analyze_lag_direction<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &LeadLagOptions,
    direction: Direction,
) -> Result<LeadLagResult> {
    let data = load_project(store, proj_id, opts.calendar.hours_per_day).await?;
    let mut dq = Dq::default();

    let task_ids = project_task_ids(&data);
    let links = internal_links(&data.links, &task_ids, false, &mut dq);
    let task_calendar = task_calendar_map(&data);

    let tolerance = opts.tolerance_hours.abs();
    let mut violation_count = 0;
    let mut details = Vec::new();

    for link in &links {
        let lag = resolved_lag_hours(link, &task_calendar, &data, opts, &mut dq);
        let violates = match direction {
            Direction::Lead => lag < -tolerance,
            Direction::Lag => lag > tolerance,
        };
        if violates {
            violation_count += 1;
            opts.details.push(
                &mut details,
                LinkDetail {
                    pred_task_id: link.pred_task_id,
                    task_id: link.task_id,
                    pred_type: link.pred_type,
                    lag_hours: lag,
                },
            );
        }
    }

    let percent = percent_of(violation_count, links.len());
    let thresholds = match direction {
        Direction::Lead => &opts.lead_thresholds,
        Direction::Lag => &opts.lag_thresholds,
    };
    Ok(LeadLagResult {
        proj_id,
        link_count: links.len(),
        violation_count,
        percent,
        grade: thresholds.grade(percent),
        threshold_exceeded: !thresholds.passes(percent),
        details,
        dq,
    })
}

/// task id -> calendar id for every project task, for per-link HPD lookup.
pub(crate) fn task_calendar_map(data: &ProjectData) -> HashMap<i64, Option<i64>> {
    data.tasks
        .iter()
        .filter_map(|r| {
            first_id(r, &["task_id"]).map(|id| (id, first_id(r, &["clndr_id"])))
        })
        .collect()
}

/// Lag in hours for one link. Links carrying no lag at all mean zero; a raw
/// value with unrecognized units is treated as zero and tallied.
pub(crate) fn resolved_lag_hours(
    link: &TaskPredRow,
    task_calendar: &HashMap<i64, Option<i64>>,
    data: &ProjectData,
    opts: &LeadLagOptions,
    dq: &mut Dq,
) -> f64 {
    let hpd = link_hours_per_day(link, task_calendar, &data.calendars, &opts.calendar);
    match link.lag_hours(hpd) {
        Some(h) => h,
        None if link.lag_raw.is_some() => {
            dq.bump("link_lag_unknown_units");
            0.0
        }
        None => 0.0,
    }
}
