// File: src/calendar.rs
// Cascading hours-per-day resolution. Mixed-calendar projects are the norm in
// real exports, so every hour<->day conversion goes through the task's own
// calendar rather than a single project-wide constant.
use crate::model::fields::{first_id, first_num};
use crate::scalar::Row;
use std::collections::HashMap;

pub const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Working days assumed per month/year when only those totals are present.
const DAYS_PER_MONTH: f64 = 21.667;
const DAYS_PER_YEAR: f64 = 260.0;

/// Resolves the effective hours-per-day for one calendar row.
///
/// Total function: always returns a positive number, falling through
/// day -> week/5 -> month/21.667 -> year/260 -> `fallback`.
pub fn effective_hours_per_day(row: &Row, fallback: f64) -> f64 {
    let positive = |v: Option<f64>| v.filter(|n| n.is_finite() && *n > 0.0);
    if let Some(day) = positive(first_num(row, &["day_hr_cnt"])) {
        return day;
    }
    if let Some(week) = positive(first_num(row, &["week_hr_cnt"])) {
        return week / 5.0;
    }
    if let Some(month) = positive(first_num(row, &["month_hr_cnt"])) {
        return month / DAYS_PER_MONTH;
    }
    if let Some(year) = positive(first_num(row, &["year_hr_cnt"])) {
        return year / DAYS_PER_YEAR;
    }
    fallback
}

/// Per-call index of calendar id -> effective hours-per-day.
#[derive(Debug, Clone)]
pub struct CalendarIndex {
    by_id: HashMap<i64, f64>,
    fallback: f64,
}

impl CalendarIndex {
    pub fn build(calendar_rows: &[Row], fallback: f64) -> Self {
        let fallback = if fallback.is_finite() && fallback > 0.0 {
            fallback
        } else {
            DEFAULT_HOURS_PER_DAY
        };
        let mut by_id = HashMap::with_capacity(calendar_rows.len());
        for row in calendar_rows {
            if let Some(id) = first_id(row, &["clndr_id"]) {
                by_id.insert(id, effective_hours_per_day(row, fallback));
            }
        }
        Self { by_id, fallback }
    }

    /// Hours-per-day for a task's calendar; the fallback when the task has no
    /// calendar reference or the referenced calendar is missing.
    pub fn hours_per_day(&self, clndr_id: Option<i64>) -> f64 {
        clndr_id
            .and_then(|id| self.by_id.get(&id).copied())
            .unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> f64 {
        self.fallback
    }

    /// Median of the indexed calendars' hours-per-day; the fallback when no
    /// calendars were indexed. Check 12 derives its float threshold from this.
    pub fn median_hours_per_day(&self) -> f64 {
        if self.by_id.is_empty() {
            return self.fallback;
        }
        let mut all: Vec<f64> = self.by_id.values().copied().collect();
        all.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = all.len() / 2;
        if all.len() % 2 == 1 {
            all[mid]
        } else {
            (all[mid - 1] + all[mid]) / 2.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    fn cal(pairs: &[(&str, f64)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Scalar::Num(*v)))
            .collect()
    }

    #[test]
    fn cascade_order() {
        assert_eq!(effective_hours_per_day(&cal(&[("day_hr_cnt", 10.0)]), 8.0), 10.0);
        assert_eq!(effective_hours_per_day(&cal(&[("week_hr_cnt", 40.0)]), 8.0), 8.0);
        let monthly = effective_hours_per_day(&cal(&[("month_hr_cnt", 173.336)]), 8.0);
        assert!((monthly - 8.0).abs() < 1e-3);
        assert_eq!(effective_hours_per_day(&cal(&[("year_hr_cnt", 2080.0)]), 8.0), 8.0);
    }

    #[test]
    fn total_even_on_garbage() {
        // Zero and negative counts fall through to the fallback.
        let row = cal(&[("day_hr_cnt", 0.0), ("week_hr_cnt", -5.0)]);
        assert_eq!(effective_hours_per_day(&row, 8.0), 8.0);
        assert_eq!(effective_hours_per_day(&Row::new(), 7.5), 7.5);
    }

    #[test]
    fn index_lookup_and_median() {
        let mut a = cal(&[("day_hr_cnt", 8.0)]);
        a.insert("clndr_id".into(), Scalar::Num(1.0));
        let mut b = cal(&[("day_hr_cnt", 10.0)]);
        b.insert("clndr_id".into(), Scalar::Num(2.0));
        let idx = CalendarIndex::build(&[a, b], 8.0);
        assert_eq!(idx.hours_per_day(Some(2)), 10.0);
        assert_eq!(idx.hours_per_day(Some(99)), 8.0);
        assert_eq!(idx.hours_per_day(None), 8.0);
        assert_eq!(idx.median_hours_per_day(), 9.0);
    }
}
