// File: tests/check_resources.rs
mod common;

use common::{Fixture, n, row, s};
use p6health::checks::{ResourceOptions, analyze_resources};

#[tokio::test]
async fn day_long_tasks_need_an_assignment() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("target_drtn_hr_cnt", n(40.0))])
        .task(1, 2, &[("target_drtn_hr_cnt", n(40.0))])
        // Under a day of work: exempt.
        .task(1, 3, &[("target_drtn_hr_cnt", n(4.0))])
        .assignment(1, 500)
        .store();
    let result = analyze_resources(&store, 1, &ResourceOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 2);
    assert_eq!(result.unresourced_count, 1);
    assert_eq!(result.details[0].task_id, 2);
    assert_eq!(result.dq.get("excluded_short_duration"), 1);
    // Default threshold tolerates nothing.
    assert!(result.threshold_exceeded);
}

#[tokio::test]
async fn remaining_duration_backs_up_a_missing_planned_duration() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("remain_drtn_hr_cnt", n(16.0))])
        .task(1, 2, &[])
        .store();
    let result = analyze_resources(&store, 1, &ResourceOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 1);
    assert_eq!(result.dq.get("task_missing_duration"), 1);
}

#[tokio::test]
async fn milestones_never_need_resources() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[("task_type", s("TT_FinMile")), ("target_drtn_hr_cnt", n(40.0))],
        )
        .store();
    let result = analyze_resources(&store, 1, &ResourceOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 0);
    assert_eq!(result.dq.get("excluded_milestone"), 1);
    assert!(!result.threshold_exceeded);
}

#[tokio::test]
async fn assignments_without_a_task_id_are_tallied() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("target_drtn_hr_cnt", n(40.0))])
        .assignment(1, 500)
        .push("TASKRSRC", row(&[("rsrc_id", n(501.0))]))
        .store();
    let result = analyze_resources(&store, 1, &ResourceOptions::default())
        .await
        .unwrap();
    assert_eq!(result.unresourced_count, 0);
    assert_eq!(result.dq.get("assignment_missing_task_id"), 1);
}
