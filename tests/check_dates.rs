// File: tests/check_dates.rs
// Invalid dates (check 9), missed tasks (check 11), and the loading-error
// taxonomy the date-sensitive checks share.
mod common;

use common::{Fixture, d, s};
use p6health::checks::{
    Grade, InvalidDatesOptions, MissedTaskOptions, analyze_invalid_dates, analyze_missed_tasks,
};
use p6health::error::Error;

#[tokio::test]
async fn forecast_dates_before_the_data_date_fail_9a() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("early_start_date", d("2024-01-09 08:00"))])
        .task(1, 2, &[("late_end_date", d("2024-01-10 17:00"))])
        .store();
    let result = analyze_invalid_dates(&store, 1, &InvalidDatesOptions::default())
        .await
        .unwrap();
    // Day truncation keeps task 2's same-day late finish valid.
    assert_eq!(result.invalid_forecast_count, 1);
    assert_eq!(result.invalid_actual_count, 0);
    assert!(!result.passed);
    assert_eq!(result.details.len(), 1);
    assert_eq!(result.details[0].field, "early_start_date");
}

#[tokio::test]
async fn actual_dates_after_the_data_date_fail_9b() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("status_code", s("TK_Complete")),
                ("act_start_date", d("2024-01-08 08:00")),
                ("act_end_date", d("2024-01-12 17:00")),
            ],
        )
        .store();
    let result = analyze_invalid_dates(&store, 1, &InvalidDatesOptions::default())
        .await
        .unwrap();
    assert_eq!(result.invalid_forecast_count, 0);
    assert_eq!(result.invalid_actual_count, 1);
    assert_eq!(result.details[0].field, "act_end_date");
}

#[tokio::test]
async fn completed_tasks_skip_the_forecast_half() {
    // Stale forecast dates on finished work are noise, not a 9a failure.
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("status_code", s("TK_Complete")),
                ("early_start_date", d("2023-12-01 08:00")),
                ("act_end_date", d("2024-01-05 17:00")),
            ],
        )
        .store();
    let result = analyze_invalid_dates(&store, 1, &InvalidDatesOptions::default())
        .await
        .unwrap();
    assert!(result.passed);
}

#[tokio::test]
async fn tolerance_widens_the_valid_window() {
    let opts = InvalidDatesOptions {
        tolerance_days: 2,
        ..Default::default()
    };
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("early_start_date", d("2024-01-08 08:00"))])
        .task(1, 2, &[("act_start_date", d("2024-01-12 08:00"))])
        .store();
    let result = analyze_invalid_dates(&store, 1, &opts).await.unwrap();
    assert!(result.passed);
}

#[tokio::test]
async fn unknown_project_and_missing_data_date_are_hard_errors() {
    let store = Fixture::new().project(1, "2024-01-10 00:00").store();
    let err = analyze_invalid_dates(&store, 42, &InvalidDatesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ProjectNotFound { proj_id: 42 }));

    let undated = Fixture::new().project_undated(7).store();
    let err = analyze_invalid_dates(&undated, 7, &InvalidDatesOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidDataDate { proj_id: 7 }));
}

#[tokio::test]
async fn missed_tasks_compare_actual_to_baseline_finish() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        // Finished three days past baseline: missed.
        .task(
            1,
            1,
            &[
                ("status_code", s("TK_Complete")),
                ("target_end_date", d("2024-01-05 17:00")),
                ("act_end_date", d("2024-01-08 17:00")),
            ],
        )
        // Finished on the baseline day, later hour: not missed.
        .task(
            1,
            2,
            &[
                ("status_code", s("TK_Complete")),
                ("target_end_date", d("2024-01-05 08:00")),
                ("act_end_date", d("2024-01-05 17:00")),
            ],
        )
        // Still running: out of scope.
        .task(1, 3, &[("target_end_date", d("2024-01-05 17:00"))])
        .store();
    let result = analyze_missed_tasks(&store, 1, &MissedTaskOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 2);
    assert_eq!(result.missed_count, 1);
    assert_eq!(result.percent_missed, 50.0);
    assert_eq!(result.grade, Grade::Poor);
    assert_eq!(result.details[0].slip_days, 3);
}

#[tokio::test]
async fn completed_tasks_without_dates_feed_dq() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("status_code", s("TK_Complete"))])
        .task(
            1,
            2,
            &[("status_code", s("TK_Complete")), ("target_end_date", d("2024-01-05 17:00"))],
        )
        .store();
    let result = analyze_missed_tasks(&store, 1, &MissedTaskOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 0);
    assert_eq!(result.missed_count, 0);
    assert_eq!(result.dq.get("completed_missing_baseline_finish"), 1);
    assert_eq!(result.dq.get("completed_missing_actual_finish"), 1);
    // No evaluated tasks means a clean 0%.
    assert_eq!(result.percent_missed, 0.0);
    assert!(!result.threshold_exceeded);
}

#[tokio::test]
async fn baseline_field_priority_prefers_explicit_baseline_columns() {
    // bl_finish_date outranks target_end_date when both are present.
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("status_code", s("TK_Complete")),
                ("bl_finish_date", d("2024-01-09 17:00")),
                ("target_end_date", d("2024-01-02 17:00")),
                ("act_end_date", d("2024-01-08 17:00")),
            ],
        )
        .store();
    let result = analyze_missed_tasks(&store, 1, &MissedTaskOptions::default())
        .await
        .unwrap();
    assert_eq!(result.missed_count, 0);
}
