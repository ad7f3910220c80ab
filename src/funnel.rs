//! Recruitment funnel normalization.
//!
//! The analytics endpoint reports pipeline stages with whatever labels the
//! hiring teams configured, so interview rounds arrive as `stage-1`,
//! `Stage 2`, `interview-onsite` and so on. The dashboard wants one
//! `Interview` bucket, a leading `Applications` stage, and conversion rates
//! that match the collapsed counts.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

pub const INTERVIEW_STAGE: &str = "Interview";
pub const APPLICATIONS_STAGE: &str = "Applications";

static NUMBERED_STAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^stage[-_\s]?\d+").expect("valid stage pattern"));
static INTERVIEW_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^interview").expect("valid interview pattern"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStage {
    pub stage: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub conversion_rate: Option<f64>,
}

impl FunnelStage {
    pub fn new(stage: impl Into<String>, count: u64) -> Self {
        Self {
            stage: stage.into(),
            count,
            conversion_rate: None,
        }
    }
}

/// `/analytics/funnel` answers either a bare list or `{ "stages": [...] }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FunnelPayload {
    Stages(Vec<FunnelStage>),
    Wrapped { stages: Vec<FunnelStage> },
}

impl FunnelPayload {
    pub fn into_stages(self) -> Vec<FunnelStage> {
        match self {
            FunnelPayload::Stages(stages) | FunnelPayload::Wrapped { stages } => stages,
        }
    }
}

/// Anchored at the raw label: a leading space keeps a stage out of the bucket.
pub fn is_interview_stage(label: &str) -> bool {
    NUMBERED_STAGE.is_match(label) || INTERVIEW_PREFIX.is_match(label)
}

/// Percentage of `previous` that reached `count`, one decimal place.
/// A missing or zero previous stage counts as 100%.
pub fn conversion_rate(count: u64, previous: Option<u64>) -> f64 {
    match previous {
        Some(prev) if prev > 0 => (count as f64 / prev as f64 * 1000.0).round() / 10.0,
        _ => 100.0,
    }
}

pub fn normalize_funnel(stages: &[FunnelStage]) -> Vec<FunnelStage> {
    let mut out: Vec<FunnelStage> = Vec::with_capacity(stages.len() + 2);
    let mut interview_count: u64 = 0;
    let mut accumulating = false;
    // Index of the emitted Interview bucket once it exists.
    let mut interview_slot: Option<usize> = None;

    for entry in stages {
        if is_interview_stage(&entry.stage) {
            match interview_slot {
                Some(idx) => out[idx].count += entry.count,
                None => {
                    interview_count += entry.count;
                    accumulating = true;
                }
            }
            continue;
        }

        if accumulating {
            interview_slot = Some(out.len());
            out.push(FunnelStage::new(INTERVIEW_STAGE, interview_count));
            accumulating = false;
        }
        out.push(FunnelStage::new(entry.stage.clone(), entry.count));
    }

    if accumulating {
        out.push(FunnelStage::new(INTERVIEW_STAGE, interview_count));
    }

    if out.is_empty() {
        return out;
    }

    let has_applications = out
        .iter()
        .any(|s| s.stage.to_lowercase().contains("application"));
    if !has_applications {
        let total = out.iter().map(|s| s.count).sum();
        out.insert(0, FunnelStage::new(APPLICATIONS_STAGE, total));
    }

    let mut previous: Option<u64> = None;
    for stage in out.iter_mut() {
        stage.conversion_rate = Some(conversion_rate(stage.count, previous));
        previous = Some(stage.count);
    }
    if let Some(first) = out.first_mut() {
        first.conversion_rate = Some(100.0);
    }

    out
}
