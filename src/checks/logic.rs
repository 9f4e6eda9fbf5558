// File: src/checks/logic.rs
// DCMA Check 1: Logic. Percentage of eligible activities missing a
// predecessor or a successor. Start milestones are excused from needing a
// predecessor, finish milestones from needing a successor, and a link to a
// task outside the project still counts as logic for the internal endpoint.
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, ProjectData, UpperThresholds, eligible_tasks,
    load_project, project_task_ids,
};
use crate::error::Result;
use crate::model::{TaskPredRow, TaskType};
use crate::scalar::percent_of;
use crate::store::TableStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogicOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Percent of activities allowed to miss logic.
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

impl Default for LogicOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LogicDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub missing_predecessor: bool,
    pub missing_successor: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogicResult {
    pub proj_id: i64,
    pub eligible_count: usize,
    pub missing_predecessor: usize,
    pub missing_successor: usize,
    /// Tasks missing either end, counted once.
    pub unique_missing_any: usize,
    pub percent_missing_any: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<LogicDetail>,
    pub dq: Dq,
}

pub async fn analyze_logic<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &LogicOptions,
) -> Result<LogicResult> {
    let data = load_project(store, proj_id, crate::calendar::DEFAULT_HOURS_PER_DAY).await?;
    let mut dq = Dq::default();

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let (has_pred, has_succ) = logic_presence(&data, &mut dq);

    let mut missing_predecessor = 0;
    let mut missing_successor = 0;
    let mut unique_missing_any = 0;
    let mut details = Vec::new();

    for task in &eligible {
        let needs_pred = task.task_type != TaskType::StartMilestone;
        let needs_succ = task.task_type != TaskType::FinishMilestone;
        let miss_pred = needs_pred && !has_pred.contains(&task.task_id);
        let miss_succ = needs_succ && !has_succ.contains(&task.task_id);
        if miss_pred {
            missing_predecessor += 1;
        }
        if miss_succ {
            missing_successor += 1;
        }
        if miss_pred || miss_succ {
            unique_missing_any += 1;
            opts.details.push(
                &mut details,
                LogicDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    missing_predecessor: miss_pred,
                    missing_successor: miss_succ,
                },
            );
        }
    }

    let percent_missing_any = percent_of(unique_missing_any, eligible.len());
    Ok(LogicResult {
        proj_id,
        eligible_count: eligible.len(),
        missing_predecessor,
        missing_successor,
        unique_missing_any,
        percent_missing_any,
        grade: opts.thresholds.grade(percent_missing_any),
        threshold_exceeded: !opts.thresholds.passes(percent_missing_any),
        details,
        dq,
    })
}

/// Which project tasks have at least one predecessor / successor link.
/// External links count for their internal endpoint; self-loops count for
/// neither and are tallied.
fn logic_presence(data: &ProjectData, dq: &mut Dq) -> (HashSet<i64>, HashSet<i64>) {
    let task_ids = project_task_ids(data);
    let mut has_pred = HashSet::new();
    let mut has_succ = HashSet::new();
    for row in &data.links {
        let Some(link) = TaskPredRow::from_row(row) else {
            dq.bump("link_missing_endpoint");
            continue;
        };
        if link.task_id == link.pred_task_id {
            dq.bump("link_self_loop");
            continue;
        }
        if task_ids.contains(&link.task_id) {
            has_pred.insert(link.task_id);
        }
        if task_ids.contains(&link.pred_task_id) {
            has_succ.insert(link.pred_task_id);
        }
    }
    (has_pred, has_succ)
}
