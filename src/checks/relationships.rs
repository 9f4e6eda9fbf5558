// File: src/checks/relationships.rs
// DCMA Check 4: Relationship Types. Share of internal links that are
// Finish-to-Start; a healthy network is FS-dominated.
use crate::checks::common::{
    DetailOptions, Dq, Grade, LowerThresholds, internal_links, load_project, project_task_ids,
};
use crate::checks::leads_lags::LinkDetail;
use crate::error::Result;
use crate::model::LinkType;
use crate::scalar::percent_of;
use crate::store::TableStore;
use serde::{Deserialize, Serialize};

fn default_thresholds() -> LowerThresholds {
    LowerThresholds::new(95.0, 90.0, 90.0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipOptions {
    #[serde(default)]
    pub details: DetailOptions,
    /// Fold links that differ only in lag into one relationship before
    /// computing the mix.
    #[serde(default)]
    pub dedup_ignore_lag: bool,
    /// Minimum percent of FS links.
    #[serde(default = "default_thresholds")]
    pub thresholds: LowerThresholds,
}

impl Default for RelationshipOptions {
    fn default() -> Self {
        Self {
            details: DetailOptions::default(),
            dedup_ignore_lag: false,
            thresholds: default_thresholds(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipResult {
    pub proj_id: i64,
    pub link_count: usize,
    pub fs_count: usize,
    pub ss_count: usize,
    pub ff_count: usize,
    pub sf_count: usize,
    pub unknown_count: usize,
    pub percent_fs: f64,
    pub grade: Grade,
    pub threshold_exceeded: bool,
    /// Non-FS links, for drill-down.
    pub details: Vec<LinkDetail>,
    pub dq: Dq,
}

pub async fn analyze_relationship_types<S: TableStore>(
    store: &S,
    proj_id: i64,
    opts: &RelationshipOptions,
) -> Result<RelationshipResult> {
    let data = load_project(store, proj_id, crate::calendar::DEFAULT_HOURS_PER_DAY).await?;
    let mut dq = Dq::default();

    let task_ids = project_task_ids(&data);
    let links = internal_links(&data.links, &task_ids, opts.dedup_ignore_lag, &mut dq);

    let mut fs = 0;
    let mut ss = 0;
    let mut ff = 0;
    let mut sf = 0;
    let mut unknown = 0;
    let mut details = Vec::new();

    for link in &links {
        match link.pred_type {
            LinkType::FS => fs += 1,
            LinkType::SS => ss += 1,
            LinkType::FF => ff += 1,
            LinkType::SF => sf += 1,
            LinkType::Unknown => {
                unknown += 1;
                dq.bump("link_unknown_type");
            }
        }
        if link.pred_type != LinkType::FS {
            opts.details.push(
                &mut details,
                LinkDetail {
                    pred_task_id: link.pred_task_id,
                    task_id: link.task_id,
                    pred_type: link.pred_type,
                    lag_hours: link.lag_hr.unwrap_or(0.0),
                },
            );
        }
    }

    let percent_fs = percent_of(fs, links.len());
    Ok(RelationshipResult {
        proj_id,
        link_count: links.len(),
        fs_count: fs,
        ss_count: ss,
        ff_count: ff,
        sf_count: sf,
        unknown_count: unknown,
        percent_fs,
        grade: opts.thresholds.grade(percent_fs),
        threshold_exceeded: !opts.thresholds.passes(percent_fs),
        details,
        dq,
    })
}
