// File: src/settings.rs
// Per-check configuration, persisted as TOML. The engine itself only ever
// sees immutable option structs passed by reference; this repository is the
// port the presentation layer loads and saves them through.
use crate::checks::{
    BeiOptions, ConstraintOptions, CpliOptions, CriticalPathOptions, HighDurationOptions,
    HighFloatOptions, InvalidDatesOptions, LeadLagOptions, LogicOptions, MissedTaskOptions,
    NegativeFloatOptions, RelationshipOptions, ResourceOptions,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// One options block per check. Missing keys fall back to the DCMA defaults,
/// so a partial settings file is always valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    pub logic: LogicOptions,
    pub leads_lags: LeadLagOptions,
    pub relationship_types: RelationshipOptions,
    pub hard_constraints: ConstraintOptions,
    pub high_float: HighFloatOptions,
    pub negative_float: NegativeFloatOptions,
    pub high_duration: HighDurationOptions,
    pub invalid_dates: InvalidDatesOptions,
    pub resources: ResourceOptions,
    pub missed_tasks: MissedTaskOptions,
    pub critical_path: CriticalPathOptions,
    pub cpli: CpliOptions,
    pub bei: BeiOptions,
}

pub struct SettingsRepository {
    path: PathBuf,
}

impl SettingsRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads settings, returning defaults when the file does not exist yet.
    pub fn load(&self) -> Result<CheckSettings> {
        if !self.path.exists() {
            return Ok(CheckSettings::default());
        }
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("reading settings from {}", self.path.display()))?;
        let settings = toml::from_str(&text)
            .with_context(|| format!("parsing settings file {}", self.path.display()))?;
        Ok(settings)
    }

    pub fn save(&self, settings: &CheckSettings) -> Result<()> {
        let text = toml::to_string_pretty(settings).context("serializing settings")?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        fs::write(&self.path, text)
            .with_context(|| format!("writing settings to {}", self.path.display()))?;
        Ok(())
    }
}
