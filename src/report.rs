// File: src/report.rs
// Runs all fourteen checks for one project and renders a plain-text summary.
// Each check loads its own tables; a failure in one aborts the run, per the
// error taxonomy (only structural conditions ever abort).
use crate::checks::{
    self, BeiResult, ConstraintResult, CpliResult, CriticalPathResult, Grade, HighDurationResult,
    HighFloatResult, InvalidDatesResult, LeadLagResult, LogicResult, MissedTaskResult,
    RelationshipResult, ResourceResult,
};
use crate::error::Result;
use crate::settings::CheckSettings;
use crate::store::TableStore;
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub proj_id: i64,
    pub logic: LogicResult,
    pub leads: LeadLagResult,
    pub lags: LeadLagResult,
    pub relationship_types: RelationshipResult,
    pub hard_constraints: ConstraintResult,
    pub high_float: HighFloatResult,
    pub negative_float: checks::NegativeFloatResult,
    pub high_duration: HighDurationResult,
    pub invalid_dates: InvalidDatesResult,
    pub resources: ResourceResult,
    pub missed_tasks: MissedTaskResult,
    pub critical_path: CriticalPathResult,
    pub cpli: CpliResult,
    pub bei: BeiResult,
}

pub async fn run_all<S: TableStore>(
    store: &S,
    proj_id: i64,
    settings: &CheckSettings,
) -> Result<HealthReport> {
    log::info!("running DCMA assessment for project {proj_id}");
    Ok(HealthReport {
        proj_id,
        logic: checks::analyze_logic(store, proj_id, &settings.logic).await?,
        leads: checks::analyze_leads(store, proj_id, &settings.leads_lags).await?,
        lags: checks::analyze_lags(store, proj_id, &settings.leads_lags).await?,
        relationship_types: checks::analyze_relationship_types(
            store,
            proj_id,
            &settings.relationship_types,
        )
        .await?,
        hard_constraints: checks::analyze_hard_constraints(
            store,
            proj_id,
            &settings.hard_constraints,
        )
        .await?,
        high_float: checks::analyze_high_float(store, proj_id, &settings.high_float).await?,
        negative_float: checks::analyze_negative_float(store, proj_id, &settings.negative_float)
            .await?,
        high_duration: checks::analyze_high_duration(store, proj_id, &settings.high_duration)
            .await?,
        invalid_dates: checks::analyze_invalid_dates(store, proj_id, &settings.invalid_dates)
            .await?,
        resources: checks::analyze_resources(store, proj_id, &settings.resources).await?,
        missed_tasks: checks::analyze_missed_tasks(store, proj_id, &settings.missed_tasks).await?,
        critical_path: checks::analyze_critical_path(store, proj_id, &settings.critical_path)
            .await?,
        cpli: checks::analyze_cpli(store, proj_id, &settings.cpli).await?,
        bei: checks::analyze_bei(store, proj_id, &settings.bei).await?,
    })
}

fn verdict(passed: bool) -> &'static str {
    if passed { "PASS" } else { "FAIL" }
}

fn grade_verdict(grade: Grade, exceeded: bool) -> &'static str {
    match (exceeded, grade) {
        (true, _) => "FAIL",
        (false, Grade::Great) => "PASS (great)",
        (false, Grade::Average) => "PASS (average)",
        (false, Grade::Poor) => "PASS (poor)",
    }
}

impl HealthReport {
    /// Fixed-width text rendering for terminal output.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "DCMA 14-point assessment for project {}", self.proj_id);
        let _ = writeln!(out);
        let r = &self.logic;
        let _ = writeln!(
            out,
            " 1. Logic               {:>8.2}%  missing {} of {}  {}",
            r.percent_missing_any,
            r.unique_missing_any,
            r.eligible_count,
            grade_verdict(r.grade, r.threshold_exceeded)
        );
        let _ = writeln!(
            out,
            " 2. Leads               {:>8.2}%  {} of {} links  {}",
            self.leads.percent,
            self.leads.violation_count,
            self.leads.link_count,
            grade_verdict(self.leads.grade, self.leads.threshold_exceeded)
        );
        let _ = writeln!(
            out,
            " 3. Lags                {:>8.2}%  {} of {} links  {}",
            self.lags.percent,
            self.lags.violation_count,
            self.lags.link_count,
            grade_verdict(self.lags.grade, self.lags.threshold_exceeded)
        );
        let _ = writeln!(
            out,
            " 4. Relationship types  {:>8.2}%  FS {} of {}  {}",
            self.relationship_types.percent_fs,
            self.relationship_types.fs_count,
            self.relationship_types.link_count,
            grade_verdict(
                self.relationship_types.grade,
                self.relationship_types.threshold_exceeded
            )
        );
        let _ = writeln!(
            out,
            " 5. Hard constraints    {:>8.2}%  {} of {}  {}",
            self.hard_constraints.percent_hard_of_all,
            self.hard_constraints.hard_count,
            self.hard_constraints.eligible_count,
            grade_verdict(
                self.hard_constraints.grade,
                self.hard_constraints.threshold_exceeded
            )
        );
        let _ = writeln!(
            out,
            " 6. High float          {:>8.2}%  {} of {}  {}",
            self.high_float.percent_high_float,
            self.high_float.high_float_count,
            self.high_float.evaluated_count,
            grade_verdict(self.high_float.grade, self.high_float.threshold_exceeded)
        );
        let _ = writeln!(
            out,
            " 7. Negative float      {:>8}   tasks  {}",
            self.negative_float.negative_float_count,
            verdict(self.negative_float.passed)
        );
        let _ = writeln!(
            out,
            " 8. High duration       {:>8.2}%  {} of {}  {}",
            self.high_duration.percent_high_duration,
            self.high_duration.high_duration_count,
            self.high_duration.evaluated_count,
            grade_verdict(
                self.high_duration.grade,
                self.high_duration.threshold_exceeded
            )
        );
        let _ = writeln!(
            out,
            " 9. Invalid dates       {:>8}   forecast {} / actual {}  {}",
            self.invalid_dates.invalid_forecast_count + self.invalid_dates.invalid_actual_count,
            self.invalid_dates.invalid_forecast_count,
            self.invalid_dates.invalid_actual_count,
            verdict(self.invalid_dates.passed)
        );
        let _ = writeln!(
            out,
            "10. Resources           {:>8.2}%  {} of {} unresourced  {}",
            self.resources.percent_unresourced,
            self.resources.unresourced_count,
            self.resources.evaluated_count,
            grade_verdict(self.resources.grade, self.resources.threshold_exceeded)
        );
        let _ = writeln!(
            out,
            "11. Missed tasks        {:>8.2}%  {} of {}  {}",
            self.missed_tasks.percent_missed,
            self.missed_tasks.missed_count,
            self.missed_tasks.evaluated_count,
            grade_verdict(self.missed_tasks.grade, self.missed_tasks.threshold_exceeded)
        );
        let cp = &self.critical_path;
        let _ = writeln!(
            out,
            "12. Critical path test  {:>8}   critical, {} component(s), {} start, {} end  {}",
            cp.critical_count,
            cp.component_count,
            cp.start_count,
            cp.end_count,
            verdict(cp.passed)
        );
        let _ = writeln!(
            out,
            "13. CPLI                {:>8}   {}",
            self.cpli
                .cpli
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            verdict(self.cpli.passed)
        );
        let _ = writeln!(
            out,
            "14. BEI                 {:>8}   {} done / {} planned  {}",
            self.bei
                .bei
                .map(|v| format!("{v:.2}"))
                .unwrap_or_else(|| "n/a".to_string()),
            self.bei.completed_count,
            self.bei.planned_count,
            verdict(self.bei.passed)
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_reflects_pass_state() {
        assert_eq!(verdict(true), "PASS");
        assert_eq!(verdict(false), "FAIL");
    }

    #[test]
    fn grade_verdict_keeps_grade_visible() {
        assert_eq!(grade_verdict(Grade::Great, false), "PASS (great)");
        assert_eq!(grade_verdict(Grade::Average, false), "PASS (average)");
        // A custom threshold can pass a metric whose grade is still poor;
        // the text keeps the grade rather than collapsing to plain PASS.
        assert_eq!(grade_verdict(Grade::Poor, false), "PASS (poor)");
        assert_eq!(grade_verdict(Grade::Poor, true), "FAIL");
        assert_eq!(grade_verdict(Grade::Great, true), "FAIL");
    }
}
