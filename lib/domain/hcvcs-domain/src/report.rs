use chrono::{DateTime, Local};
use serde::Serialize;

use crate::attributes::AttributeMap;
use crate::finding::Finding;

/// Informational cluster facts printed ahead of the warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub name: Option<String>,
    pub cluster_time: Option<String>,
    pub last_updated: Option<String>,
    pub features: Option<String>,
    pub wac_port: Option<String>,
}

impl ClusterSummary {
    pub fn from_info(info: &AttributeMap) -> Self {
        let cluster_time = info.get("ClusterTime").map(str::to_string);
        let last_updated = cluster_time
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|utc| utc.with_timezone(&Local).format("%F %T").to_string());
        Self {
            name: info.get("ClusterName").map(str::to_string),
            cluster_time,
            last_updated,
            features: info.get("VCSFeatures").map(str::to_string),
            wac_port: info.get("WACPort").map(str::to_string),
        }
    }
}

/// Everything the health check found for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub target: String,
    pub summary: ClusterSummary,
    pub findings: Vec<Finding>,
}

impl HealthReport {
    pub fn new(target: impl Into<String>, summary: ClusterSummary) -> Self {
        Self {
            target: target.into(),
            summary,
            findings: Vec::new(),
        }
    }

    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Result of checking one target in a possibly multi-target run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TargetOutcome {
    Checked(HealthReport),
    Unreachable { target: String, reason: String },
}

impl TargetOutcome {
    pub fn target(&self) -> &str {
        match self {
            Self::Checked(report) => &report.target,
            Self::Unreachable { target, .. } => target,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, Self::Checked(_))
    }

    pub fn report(&self) -> Option<&HealthReport> {
        match self {
            Self::Checked(report) => Some(report),
            Self::Unreachable { .. } => None,
        }
    }
}
