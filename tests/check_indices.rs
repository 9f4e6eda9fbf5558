// File: tests/check_indices.rs
// CPLI (check 13) and BEI (check 14).
mod common;

use common::{Fixture, d, s};
use p6health::checks::{BeiOptions, CpliOptions, analyze_bei, analyze_cpli};

#[tokio::test]
async fn cpli_from_forecast_and_baseline_finishes() {
    // Data date Jan 10, forecast finish Feb 9 (CPL 30), baseline Feb 12
    // (PTF 3): CPLI = 33/30 = 1.1, outside the 5% band.
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("early_end_date", d("2024-02-09 17:00")),
                ("target_end_date", d("2024-02-12 17:00")),
            ],
        )
        .store();
    let result = analyze_cpli(&store, 1, &CpliOptions::default())
        .await
        .unwrap();
    assert_eq!(result.cpl_days, Some(30));
    assert_eq!(result.ptf_days, Some(3));
    assert_eq!(result.cpli, Some(1.1));
    assert!(!result.within_tolerance);
    assert!(!result.passed);
}

#[tokio::test]
async fn cpli_on_plan_is_exactly_one() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("early_end_date", d("2024-02-09 17:00")),
                ("target_end_date", d("2024-02-09 17:00")),
            ],
        )
        .store();
    let result = analyze_cpli(&store, 1, &CpliOptions::default())
        .await
        .unwrap();
    assert_eq!(result.cpli, Some(1.0));
    assert!(result.passed);
}

#[tokio::test]
async fn cpli_without_a_baseline_defaults_ptf_to_zero() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("early_end_date", d("2024-02-09 17:00"))])
        .store();
    let result = analyze_cpli(&store, 1, &CpliOptions::default())
        .await
        .unwrap();
    assert_eq!(result.ptf_days, Some(0));
    assert_eq!(result.cpli, Some(1.0));
    assert_eq!(result.dq.get("baseline_missing_defaulted_to_forecast"), 1);
}

#[tokio::test]
async fn cpli_is_undefined_when_the_forecast_is_not_ahead() {
    // Forecast finish on the data date itself: zero-length path, no ratio.
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("early_end_date", d("2024-01-10 08:00"))])
        .store();
    let result = analyze_cpli(&store, 1, &CpliOptions::default())
        .await
        .unwrap();
    assert_eq!(result.cpl_days, Some(0));
    assert_eq!(result.cpli, None);
    assert!(!result.passed);
    assert_eq!(result.dq.get("nonpositive_critical_path_length"), 1);
}

#[tokio::test]
async fn bei_is_completed_over_planned() {
    // Four tasks planned to finish by the data date, three actually did.
    let mut fx = Fixture::new().project(1, "2024-01-10 00:00");
    for id in 1..=3 {
        fx = fx.task(
            1,
            id,
            &[
                ("status_code", s("TK_Complete")),
                ("target_end_date", d("2024-01-05 17:00")),
                ("act_end_date", d("2024-01-06 17:00")),
            ],
        );
    }
    fx = fx
        .task(1, 4, &[("target_end_date", d("2024-01-08 17:00"))])
        .task(1, 5, &[("target_end_date", d("2024-02-20 17:00"))]);
    let store = fx.store();
    let result = analyze_bei(&store, 1, &BeiOptions::default()).await.unwrap();
    assert_eq!(result.planned_count, 4);
    assert_eq!(result.completed_count, 3);
    assert_eq!(result.bei, Some(0.75));
    assert!(!result.passed);
}

#[tokio::test]
async fn completed_status_without_an_actual_finish_still_counts() {
    let store = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[("status_code", s("TK_Complete")), ("target_end_date", d("2024-01-05 17:00"))],
        )
        .store();
    let result = analyze_bei(&store, 1, &BeiOptions::default()).await.unwrap();
    assert_eq!(result.completed_count, 1);
    assert_eq!(result.bei, Some(1.0));
    assert!(result.passed);
    assert_eq!(result.dq.get("completed_without_actual_finish"), 1);
}

#[tokio::test]
async fn bei_with_nothing_planned_passes_only_when_nothing_finished() {
    let clean = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(1, 1, &[("target_end_date", d("2024-03-01 17:00"))])
        .store();
    let result = analyze_bei(&clean, 1, &BeiOptions::default()).await.unwrap();
    assert_eq!(result.bei, None);
    assert!(result.passed);
    assert_eq!(result.dq.get("no_tasks_planned_by_data_date"), 1);

    let early = Fixture::new()
        .project(1, "2024-01-10 00:00")
        .task(
            1,
            1,
            &[
                ("status_code", s("TK_Complete")),
                ("target_end_date", d("2024-03-01 17:00")),
                ("act_end_date", d("2024-01-05 17:00")),
            ],
        )
        .store();
    let result = analyze_bei(&early, 1, &BeiOptions::default()).await.unwrap();
    assert_eq!(result.bei, None);
    assert!(!result.passed);
}
