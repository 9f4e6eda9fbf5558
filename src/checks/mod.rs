// File: src/checks/mod.rs
// The fourteen DCMA analyzers. Each is a stateless async function: it loads
// the tables it needs for one project, builds its eligible set, computes the
// metric and returns a result record with a data-quality block. No check
// mutates the table store or shares state with another.
pub mod common;
pub mod constraints;
pub mod critical_path;
pub mod dates;
pub mod duration;
pub mod float;
pub mod indices;
pub mod leads_lags;
pub mod logic;
pub mod missed;
pub mod relationships;
pub mod resources;

pub use common::{
    ActivityFilters, CalendarOptions, CalendarSource, DetailOptions, Dq, Grade, LowerThresholds,
    UpperThresholds,
};
pub use constraints::{ConstraintOptions, ConstraintResult, analyze_hard_constraints};
pub use critical_path::{CriticalPathOptions, CriticalPathResult, analyze_critical_path};
pub use dates::{InvalidDatesOptions, InvalidDatesResult, analyze_invalid_dates};
pub use duration::{HighDurationOptions, HighDurationResult, analyze_high_duration};
pub use float::{
    HighFloatOptions, HighFloatResult, NegativeFloatOptions, NegativeFloatResult,
    analyze_high_float, analyze_negative_float,
};
pub use indices::{
    BeiOptions, BeiResult, CpliOptions, CpliResult, analyze_bei, analyze_cpli,
};
pub use leads_lags::{LeadLagOptions, LeadLagResult, analyze_lags, analyze_leads};
pub use logic::{LogicOptions, LogicResult, analyze_logic};
pub use missed::{MissedTaskOptions, MissedTaskResult, analyze_missed_tasks};
pub use relationships::{RelationshipOptions, RelationshipResult, analyze_relationship_types};
pub use resources::{ResourceOptions, ResourceResult, analyze_resources};
