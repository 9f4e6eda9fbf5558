// File: tests/check_float.rs
// High float (check 6) and negative float (check 7).
mod common;

use common::{Fixture, n, s};
use p6health::checks::{
    Grade, HighFloatOptions, NegativeFloatOptions, analyze_high_float, analyze_negative_float,
};

#[tokio::test]
async fn high_float_threshold_is_calendar_aware() {
    // 44 days on a 8h calendar is 352 hours; on a 10h calendar it is 440.
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .calendar(7, 8.0)
        .calendar(8, 10.0)
        .task(1, 1, &[("clndr_id", n(7.0)), ("total_float_hr_cnt", n(360.0))])
        .task(1, 2, &[("clndr_id", n(8.0)), ("total_float_hr_cnt", n(360.0))])
        .task(1, 3, &[("clndr_id", n(7.0)), ("total_float_hr_cnt", n(352.0))])
        .store();
    let result = analyze_high_float(&store, 1, &HighFloatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 3);
    // Only task 1 exceeds its own calendar's ceiling; 352 sits exactly on it.
    assert_eq!(result.high_float_count, 1);
    assert_eq!(result.details[0].task_id, 1);
    assert_eq!(result.details[0].total_float_days, 45.0);
    assert_eq!(result.percent_high_float, 33.33);
    assert!(result.threshold_exceeded);
}

#[tokio::test]
async fn high_float_skips_completed_and_unfloated_tasks() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[("status_code", s("TK_Complete")), ("total_float_hr_cnt", n(9999.0))],
        )
        .task(1, 2, &[])
        .task(1, 3, &[("total_float_hr_cnt", n(0.0))])
        .store();
    let result = analyze_high_float(&store, 1, &HighFloatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.evaluated_count, 1);
    assert_eq!(result.high_float_count, 0);
    assert_eq!(result.dq.get("excluded_completed"), 1);
    assert_eq!(result.dq.get("task_missing_total_float"), 1);
    assert_eq!(result.grade, Grade::Great);
}

#[tokio::test]
async fn negative_float_fails_on_the_first_offender_by_default() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("total_float_hr_cnt", n(-8.0))])
        .task(1, 2, &[("total_float_hr_cnt", n(24.0))])
        .store();
    let result = analyze_negative_float(&store, 1, &NegativeFloatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.negative_float_count, 1);
    assert!(!result.passed);
    assert_eq!(result.details[0].total_float_days, -1.0);
}

#[tokio::test]
async fn negative_float_tolerance_and_allowance() {
    // One day of tolerance on the default 8h day excuses -8h exactly.
    let opts = NegativeFloatOptions {
        tolerance_days: 1.0,
        allowed_count: 1,
        ..Default::default()
    };
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("total_float_hr_cnt", n(-8.0))])
        .task(1, 2, &[("total_float_hr_cnt", n(-9.0))])
        .store();
    let result = analyze_negative_float(&store, 1, &opts).await.unwrap();
    assert_eq!(result.negative_float_count, 1);
    assert!(result.passed);
}

#[tokio::test]
async fn zero_float_is_not_negative() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("total_float_hr_cnt", n(0.0))])
        .store();
    let result = analyze_negative_float(&store, 1, &NegativeFloatOptions::default())
        .await
        .unwrap();
    assert_eq!(result.negative_float_count, 0);
    assert!(result.passed);
}
