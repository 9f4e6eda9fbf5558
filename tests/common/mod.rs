// File: tests/common/mod.rs
// Shared fixture builder: assembles a Document table by table the way an
// import would, then wraps it in a MemoryStore for the checks.
#![allow(dead_code)]
use p6health::document::Document;
use p6health::scalar::{Row, Scalar, parse_date};
use p6health::store::MemoryStore;

pub fn s(v: &str) -> Scalar {
    Scalar::Str(v.to_string())
}

pub fn n(v: f64) -> Scalar {
    Scalar::Num(v)
}

pub fn d(v: &str) -> Scalar {
    Scalar::Date(parse_date(v).expect("fixture date"))
}

pub fn row(pairs: &[(&str, Scalar)]) -> Row {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub struct Fixture {
    doc: Document,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            doc: Document::new(),
        }
    }

    pub fn project(mut self, proj_id: i64, data_date: &str) -> Self {
        self.doc.push_row(
            "PROJECT",
            row(&[
                ("proj_id", n(proj_id as f64)),
                ("proj_short_name", s("FIX")),
                ("last_recalc_date", d(data_date)),
            ]),
        );
        self
    }

    /// Project row without a data date, for InvalidDataDate cases.
    pub fn project_undated(mut self, proj_id: i64) -> Self {
        self.doc.push_row(
            "PROJECT",
            row(&[("proj_id", n(proj_id as f64)), ("proj_short_name", s("FIX"))]),
        );
        self
    }

    /// Minimal plain task; extra field pairs override/extend the defaults.
    pub fn task(mut self, proj_id: i64, task_id: i64, extra: &[(&str, Scalar)]) -> Self {
        let mut r = row(&[
            ("task_id", n(task_id as f64)),
            ("proj_id", n(proj_id as f64)),
            ("task_code", s(&format!("A{task_id}"))),
            ("task_type", s("TT_Task")),
            ("status_code", s("TK_NotStart")),
        ]);
        for (k, v) in extra {
            r.insert(k.to_string(), v.clone());
        }
        self.doc.push_row("TASK", r);
        self
    }

    pub fn link(mut self, pred: i64, succ: i64, extra: &[(&str, Scalar)]) -> Self {
        let mut r = row(&[
            ("task_id", n(succ as f64)),
            ("pred_task_id", n(pred as f64)),
            ("pred_type", s("PR_FS")),
        ]);
        for (k, v) in extra {
            r.insert(k.to_string(), v.clone());
        }
        self.doc.push_row("TASKPRED", r);
        self
    }

    pub fn calendar(mut self, clndr_id: i64, day_hr: f64) -> Self {
        self.doc.push_row(
            "CALENDAR",
            row(&[("clndr_id", n(clndr_id as f64)), ("day_hr_cnt", n(day_hr))]),
        );
        self
    }

    pub fn assignment(mut self, task_id: i64, rsrc_id: i64) -> Self {
        self.doc.push_row(
            "TASKRSRC",
            row(&[
                ("taskrsrc_id", n((task_id * 1000 + rsrc_id) as f64)),
                ("task_id", n(task_id as f64)),
                ("rsrc_id", n(rsrc_id as f64)),
            ]),
        );
        self
    }

    pub fn push(mut self, table: &str, r: Row) -> Self {
        self.doc.push_row(table, r);
        self
    }

    pub fn store(self) -> MemoryStore {
        MemoryStore::new(self.doc)
    }
}
