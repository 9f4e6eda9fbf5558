// File: src/checks/critical_path.rs
// DCMA Check 12: Critical Path Test. Extracts the near-zero-float subgraph
// and verifies it forms a single unbroken chain: one connected component,
// exactly one start and one end, and the end carries the project's forecast
// finish. Traversal is an iterative BFS over arena-indexed adjacency lists;
// no recursion, so stack depth stays bounded on large schedules.
use crate::checks::common::{
    ActivityFilters, DetailOptions, Dq, eligible_tasks, internal_links, load_project,
    project_task_ids,
};
use crate::calendar::DEFAULT_HOURS_PER_DAY;
use crate::error::Result;
use crate::model::{TaskRow, TaskType};
use crate::scalar::day_of;
use crate::store::TableStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalPathOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Float threshold in hours; when None it is derived as half the
    /// project's median hours-per-day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub float_threshold_hours: Option<f64>,
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
}

fn default_hours_per_day() -> f64 {
    DEFAULT_HOURS_PER_DAY
}

impl Default for CriticalPathOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            float_threshold_hours: None,
            hours_per_day: DEFAULT_HOURS_PER_DAY,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CriticalTaskDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub total_float_hours: f64,
    pub is_start: bool,
    pub is_end: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriticalPathResult {
    pub proj_id: i64,
    pub float_threshold_hours: f64,
    pub critical_count: usize,
    pub component_count: usize,
    pub start_count: usize,
    pub end_count: usize,
    pub project_finish: Option<NaiveDate>,
    /// The single end task's forecast finish lands on the project finish.
    pub reaches_project_finish: bool,
    pub passed: bool,
    pub details: Vec<CriticalTaskDetail>,
    pub dq: Dq,
}

pub async fn analyze_critical_path<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &CriticalPathOptions,
) -> Result<CriticalPathResult> {
    let data = load_project(store, proj_id, opts.hours_per_day).await?;
    let mut dq = Dq::default();

    let threshold = opts
        .float_threshold_hours
        .unwrap_or_else(|| data.calendars.median_hours_per_day() / 2.0);

    let candidates = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut critical: Vec<TaskRow> = Vec::new();
    for task in candidates {
        if task.task_type == TaskType::Template {
            dq.bump("excluded_template");
            continue;
        }
        let Some(tf) = task.total_float_hr else {
            dq.bump("task_missing_total_float");
            continue;
        };
        if tf.abs() <= threshold {
            critical.push(task);
        }
    }

    // Project forecast finish: latest forecast finish over every project
    // task (not just the critical ones), falling back to the scheduled end
    // carried on the PROJECT row.
    let project_finish = data
        .tasks
        .iter()
        .filter_map(|r| TaskRow::from_row(r))
        .filter_map(|t| t.forecast_finish())
        .max()
        .or(data.project.scd_end)
        .map(day_of);
    if project_finish.is_none() {
        dq.bump("no_project_forecast_finish");
    }

    if critical.is_empty() {
        dq.bump("no_critical_tasks");
        return Ok(CriticalPathResult {
            proj_id,
            float_threshold_hours: threshold,
            critical_count: 0,
            component_count: 0,
            start_count: 0,
            end_count: 0,
            project_finish,
            reaches_project_finish: false,
            passed: false,
            details: Vec::new(),
            dq,
        });
    }

    // Arena-indexed adjacency over the critical-only subgraph.
    let index: HashMap<i64, usize> = critical
        .iter()
        .enumerate()
        .map(|(i, t)| (t.task_id, i))
        .collect();
    let task_ids = project_task_ids(&data);
    let links = internal_links(&data.links, &task_ids, false, &mut dq);

    let n = critical.len();
    let mut undirected: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut has_critical_pred = vec![false; n];
    let mut has_critical_succ = vec![false; n];
    for link in &links {
        let (Some(&succ), Some(&pred)) =
            (index.get(&link.task_id), index.get(&link.pred_task_id))
        else {
            continue;
        };
        undirected[succ].push(pred);
        undirected[pred].push(succ);
        has_critical_pred[succ] = true;
        has_critical_succ[pred] = true;
    }

    let component_count = count_components(&undirected);

    let starts: Vec<usize> = (0..n).filter(|&i| !has_critical_pred[i]).collect();
    let ends: Vec<usize> = (0..n).filter(|&i| !has_critical_succ[i]).collect();

    let reaches_project_finish = match (ends.as_slice(), project_finish) {
        ([end], Some(finish)) => critical[*end]
            .forecast_finish()
            .map(day_of)
            .is_some_and(|f| f == finish),
        _ => false,
    };

    let passed = component_count == 1
        && starts.len() == 1
        && ends.len() == 1
        && reaches_project_finish;

    let start_set: HashSet<usize> = starts.iter().copied().collect();
    let end_set: HashSet<usize> = ends.iter().copied().collect();
    let mut details = Vec::new();
    for (i, task) in critical.iter().enumerate() {
        opts.details.push(
            &mut details,
            CriticalTaskDetail {
                task_id: task.task_id,
                task_code: task.task_code.clone(),
                total_float_hours: task.total_float_hr.unwrap_or(0.0),
                is_start: start_set.contains(&i),
                is_end: end_set.contains(&i),
            },
        );
    }

    Ok(CriticalPathResult {
        proj_id,
        float_threshold_hours: threshold,
        critical_count: n,
        component_count,
        start_count: starts.len(),
        end_count: ends.len(),
        project_finish,
        reaches_project_finish,
        passed,
        details,
        dq,
    })
}

/// Connected components of the undirected view, iterative BFS.
fn count_components(adjacency: &[Vec<usize>]) -> usize {
    let n = adjacency.len();
    let mut visited = vec![false; n];
    let mut components = 0;
    let mut queue = VecDeque::new();
    for root in 0..n {
        if visited[root] {
            continue;
        }
        components += 1;
        visited[root] = true;
        queue.push_back(root);
        while let Some(node) = queue.pop_front() {
            for &next in &adjacency[node] {
                if !visited[next] {
                    visited[next] = true;
                    queue.push_back(next);
                }
            }
        }
    }
    components
}

#[cfg(test)]
mod tests {
    use super::count_components;

    #[test]
    fn component_counting() {
        assert_eq!(count_components(&[]), 0);
        assert_eq!(count_components(&[vec![]]), 1);
        // 0-1 connected, 2 isolated.
        assert_eq!(count_components(&[vec![1], vec![0], vec![]]), 2);
        // Chain of three.
        assert_eq!(count_components(&[vec![1], vec![0, 2], vec![1]]), 1);
    }
}
