// File: src/checks/dates.rs
// DCMA Check 9: Invalid Dates, both halves:
//   9a: incomplete work with any forecast date before the data date;
//   9b: any actual date after the data date.
// All comparisons are day-truncated.
use crate::checks::common::{ActivityFilters, DetailOptions, Dq, eligible_tasks, load_project};
use crate::error::Result;
use crate::scalar::day_of;
use crate::store::TableStore;
use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvalidDatesOptions {
    #[serde(default)]
    pub filters: ActivityFilters,
    #[serde(default)]
    pub details: DetailOptions,
    /// Calendar days of slack around the data date before a date counts as
    /// invalid.
    #[serde(default)]
    pub tolerance_days: u64,
}

impl Default for InvalidDatesOptions {
    fn default() -> Self {
        Self {
            filters: ActivityFilters::default(),
            details: DetailOptions::default(),
            tolerance_days: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidDateDetail {
    pub task_id: i64,
    pub task_code: Option<String>,
    pub field: &'static str,
    pub value: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvalidDatesResult {
    pub proj_id: i64,
    pub data_date: NaiveDate,
    /// 9a: incomplete tasks with a forecast date in the past.
    pub invalid_forecast_count: usize,
    /// 9b: tasks with an actual date in the future.
    pub invalid_actual_count: usize,
    pub passed: bool,
    pub details: Vec<InvalidDateDetail>,
    pub dq: Dq,
}

pub async fn analyze_invalid_dates<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &InvalidDatesOptions,
) -> Result<InvalidDatesResult> {
    let data = load_project(store, proj_id, crate::calendar::DEFAULT_HOURS_PER_DAY).await?;
    let mut dq = Dq::default();
    let data_date = day_of(data.data_date()?);

    let earliest_forecast = data_date
        .checked_sub_days(Days::new(opts.tolerance_days))
        .unwrap_or(data_date);
    let latest_actual = data_date
        .checked_add_days(Days::new(opts.tolerance_days))
        .unwrap_or(data_date);

    let eligible = eligible_tasks(&data, &opts.filters, &mut dq);
    let mut invalid_forecast = 0;
    let mut invalid_actual = 0;
    let mut details = Vec::new();

    for task in &eligible {
        // 9a: forecast dates live at or after the data date.
        if !task.status.is_completed() {
            let forecasts: [(&'static str, Option<NaiveDateTime>); 4] = [
                ("early_start_date", task.early_start),
                ("early_end_date", task.early_end),
                ("late_start_date", task.late_start),
                ("late_end_date", task.late_end),
            ];
            let mut hit = false;
            for (field, value) in forecasts {
                if let Some(dt) = value
                    && day_of(dt) < earliest_forecast
                {
                    hit = true;
                    opts.details.push(
                        &mut details,
                        InvalidDateDetail {
                            task_id: task.task_id,
                            task_code: task.task_code.clone(),
                            field,
                            value: dt,
                        },
                    );
                }
            }
            if hit {
                invalid_forecast += 1;
            }
        }

        // 9b: actual dates live at or before the data date.
        let actuals: [(&'static str, Option<NaiveDateTime>); 2] = [
            ("act_start_date", task.act_start),
            ("act_end_date", task.act_end),
        ];
        let mut hit = false;
        for (field, value) in actuals {
            if let Some(dt) = value
                && day_of(dt) > latest_actual
            {
                hit = true;
                opts.details.push(
                    &mut details,
                    InvalidDateDetail {
                        task_id: task.task_id,
                        task_code: task.task_code.clone(),
                        field,
                        value: dt,
                    },
                );
            }
        }
        if hit {
            invalid_actual += 1;
        }
    }

    Ok(InvalidDatesResult {
        proj_id,
        data_date,
        invalid_forecast_count: invalid_forecast,
        invalid_actual_count: invalid_actual,
        passed: invalid_forecast == 0 && invalid_actual == 0,
        details,
        dq,
    })
}
