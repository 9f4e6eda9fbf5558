// File: src/model/enums.rs
// Canonical enum codes plus the case/whitespace-insensitive reverse lookup
// used for the free-text values P6 XML exporters emit. Unrecognized text maps
// to Unknown and is tallied by the caller; it never aborts parsing.
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter};

/// Lowercases and collapses runs of whitespace/underscores/hyphens so
/// "Finish to Start", "FINISH_TO_START" and "finish-to-start" all agree.
pub fn normalize_enum_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_gap = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_gap = !out.is_empty();
        } else {
            if pending_gap {
                out.push(' ');
                pending_gap = false;
            }
            out.extend(c.to_lowercase());
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TaskType {
    Task,
    ResourceDependent,
    LevelOfEffort,
    WbsSummary,
    StartMilestone,
    FinishMilestone,
    Hammock,
    Template,
    Unknown,
}

static TASK_TYPE_LOOKUP: Lazy<HashMap<&'static str, TaskType>> = Lazy::new(|| {
    use TaskType::*;
    HashMap::from([
        ("tt task", Task),
        ("task dependent", Task),
        ("task", Task),
        ("tt rsrc", ResourceDependent),
        ("resource dependent", ResourceDependent),
        ("tt loe", LevelOfEffort),
        ("level of effort", LevelOfEffort),
        ("tt wbs", WbsSummary),
        ("wbs summary", WbsSummary),
        ("tt mile", StartMilestone),
        ("start milestone", StartMilestone),
        ("tt finmile", FinishMilestone),
        ("finish milestone", FinishMilestone),
        ("tt hammock", Hammock),
        ("hammock", Hammock),
        ("tt tmpl", Template),
        ("template", Template),
    ])
});

impl TaskType {
    pub fn parse(raw: &str) -> TaskType {
        TASK_TYPE_LOOKUP
            .get(normalize_enum_text(raw).as_str())
            .copied()
            .unwrap_or(TaskType::Unknown)
    }

    pub fn is_milestone(self) -> bool {
        matches!(self, TaskType::StartMilestone | TaskType::FinishMilestone)
    }

    /// Summary-like types carry no work of their own.
    pub fn is_summary_like(self) -> bool {
        matches!(
            self,
            TaskType::WbsSummary | TaskType::LevelOfEffort | TaskType::Hammock
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum TaskStatus {
    NotStarted,
    InProgress,
    Completed,
    Unknown,
}

static STATUS_LOOKUP: Lazy<HashMap<&'static str, TaskStatus>> = Lazy::new(|| {
    use TaskStatus::*;
    HashMap::from([
        ("tk notstart", NotStarted),
        ("not started", NotStarted),
        ("tk active", InProgress),
        ("in progress", InProgress),
        ("tk complete", Completed),
        ("completed", Completed),
        ("complete", Completed),
    ])
});

impl TaskStatus {
    pub fn parse(raw: &str) -> TaskStatus {
        STATUS_LOOKUP
            .get(normalize_enum_text(raw).as_str())
            .copied()
            .unwrap_or(TaskStatus::Unknown)
    }

    pub fn is_completed(self) -> bool {
        self == TaskStatus::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum LinkType {
    FS,
    SS,
    FF,
    SF,
    Unknown,
}

static LINK_LOOKUP: Lazy<HashMap<&'static str, LinkType>> = Lazy::new(|| {
    use LinkType::*;
    HashMap::from([
        ("pr fs", FS),
        ("fs", FS),
        ("finish to start", FS),
        ("pr ss", SS),
        ("ss", SS),
        ("start to start", SS),
        ("pr ff", FF),
        ("ff", FF),
        ("finish to finish", FF),
        ("pr sf", SF),
        ("sf", SF),
        ("start to finish", SF),
    ])
});

impl LinkType {
    pub fn parse(raw: &str) -> LinkType {
        LINK_LOOKUP
            .get(normalize_enum_text(raw).as_str())
            .copied()
            .unwrap_or(LinkType::Unknown)
    }
}

/// XER constraint codes; XML free text normalizes into the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum ConstraintType {
    /// CS_MSO "Start On"
    StartOn,
    /// CS_MSOA "Start On or After"
    StartOnOrAfter,
    /// CS_MSOB "Start On or Before"
    StartOnOrBefore,
    /// CS_MEO "Finish On"
    FinishOn,
    /// CS_MEOA "Finish On or After"
    FinishOnOrAfter,
    /// CS_MEOB "Finish On or Before"
    FinishOnOrBefore,
    /// CS_MANDSTART "Mandatory Start"
    MandatoryStart,
    /// CS_MANDFIN "Mandatory Finish"
    MandatoryFinish,
    /// CS_ALAP "As Late As Possible"
    AsLateAsPossible,
    Unknown,
}

static CONSTRAINT_LOOKUP: Lazy<HashMap<&'static str, ConstraintType>> = Lazy::new(|| {
    use ConstraintType::*;
    HashMap::from([
        ("cs mso", StartOn),
        ("start on", StartOn),
        ("cs msoa", StartOnOrAfter),
        ("start on or after", StartOnOrAfter),
        ("cs msob", StartOnOrBefore),
        ("start on or before", StartOnOrBefore),
        ("cs meo", FinishOn),
        ("finish on", FinishOn),
        ("cs meoa", FinishOnOrAfter),
        ("finish on or after", FinishOnOrAfter),
        ("cs meob", FinishOnOrBefore),
        ("finish on or before", FinishOnOrBefore),
        ("cs mandstart", MandatoryStart),
        ("mandatory start", MandatoryStart),
        ("cs mandfin", MandatoryFinish),
        ("mandatory finish", MandatoryFinish),
        ("cs alap", AsLateAsPossible),
        ("as late as possible", AsLateAsPossible),
    ])
});

impl ConstraintType {
    pub fn parse(raw: &str) -> ConstraintType {
        CONSTRAINT_LOOKUP
            .get(normalize_enum_text(raw).as_str())
            .copied()
            .unwrap_or(ConstraintType::Unknown)
    }

    /// The DCMA "hard" set as the original tool reads it: mandatory dates
    /// plus the pinned Start-On/Finish-On constraints. Stricter than the
    /// literal DCMA text, kept as a policy choice.
    pub fn is_hard(self) -> bool {
        matches!(
            self,
            ConstraintType::MandatoryStart
                | ConstraintType::MandatoryFinish
                | ConstraintType::StartOn
                | ConstraintType::FinishOn
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_lookup_is_forgiving() {
        assert_eq!(TaskType::parse("TT_WBS"), TaskType::WbsSummary);
        assert_eq!(TaskType::parse("  wbs   summary "), TaskType::WbsSummary);
        assert_eq!(TaskType::parse("Start Milestone"), TaskType::StartMilestone);
        assert_eq!(TaskType::parse("nonsense"), TaskType::Unknown);
        assert_eq!(LinkType::parse("Finish to Start"), LinkType::FS);
        assert_eq!(LinkType::parse("PR_FF"), LinkType::FF);
        assert_eq!(TaskStatus::parse("TK_Complete"), TaskStatus::Completed);
        assert_eq!(ConstraintType::parse("CS_MANDSTART"), ConstraintType::MandatoryStart);
        assert_eq!(ConstraintType::parse("Mandatory-Finish"), ConstraintType::MandatoryFinish);
    }

    #[test]
    fn hard_constraint_policy() {
        assert!(ConstraintType::StartOn.is_hard());
        assert!(ConstraintType::MandatoryFinish.is_hard());
        assert!(!ConstraintType::StartOnOrAfter.is_hard());
        assert!(!ConstraintType::AsLateAsPossible.is_hard());
    }
}
