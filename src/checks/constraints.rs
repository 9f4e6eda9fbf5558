// File: src/checks/constraints.rs
// DCMA Check 5: Hard Constraints. Counts Mandatory-Start/Finish plus the
// pinned Start-On/Finish-On types as hard (the original tool's stricter
// reading; see ConstraintType::is_hard). Reports the hard share both among
// constrained tasks and among all eligible activities.
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, Grade, UpperThresholds, eligible_tasks, load_project,
};
use crate::error::Result;
use crate::model::ConstraintType;
use crate::scalar::percent_of;
use crate::store::TableStore;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_thresholds() -> UpperThresholds {
    UpperThresholds::new(2.0, 5.0, 5.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstraintOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Percent of eligible activities allowed to carry a hard constraint.
    #[serde(default = "default_thresholds")]
    pub thresholds: UpperThresholds,
}

impl Default for ConstraintOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub cstr_type: ConstraintType,
    pub cstr_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstraintResult {
    pub proj_id: i64,
    pub eligible_count: usize,
    /// Tasks with a recognized constraint type.
    pub constrained_count: usize,
    pub hard_count: usize,
    pub percent_hard_of_constrained: f64,
    pub percent_hard_of_all: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    pub details: Vec<ConstraintDetail>,
    pub dq: Dq,
}

pub async fn analyze_hard_constraints<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &ConstraintOptions,
) -> Result<ConstraintResult> {
    let data = load_project(store, proj_id, crate::calendar::DEFAULT_HOURS_PER_DAY).await?;
    let mut dq = Dq::default();

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut constrained = 0;
    let mut hard = 0;
    let mut details = Vec::new();

    for task in &eligible {
        let Some(cstr) = task.cstr_type else {
            continue;
        };
        if cstr == ConstraintType::Unknown {
            dq.bump("task_unknown_constraint_type");
            continue;
        }
        constrained += 1;
        if cstr.is_hard() {
            hard += 1;
            opts.details.push(
                &mut details,
                ConstraintDetail {
                    task_id: task.task_id,
                    task_code: task.task_code.clone(),
                    cstr_type: cstr,
                    cstr_date: task.cstr_date,
                },
            );
        }
    }

    let percent_hard_of_all = percent_of(hard, eligible.len());
    Ok(ConstraintResult {
        proj_id,
        eligible_count: eligible.len(),
        constrained_count: constrained,
        hard_count: hard,
        percent_hard_of_constrained: percent_of(hard, constrained),
        percent_hard_of_all,
        grade: opts.thresholds.grade(percent_hard_of_all),
        threshold_exceeded: !opts.thresholds.passes(percent_hard_of_all),
        details,
        dq,
    })
}
