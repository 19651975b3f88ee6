//! Text rendering of health check outcomes.

use hcvcs_domain::{ClusterSummary, Finding, TargetOutcome};

pub fn header_line(system: &str) -> String {
    format!("Checking system: {system}")
}

pub fn summary_lines(summary: &ClusterSummary) -> Vec<String> {
    let mut lines = Vec::new();
    match (&summary.name, &summary.last_updated, &summary.cluster_time) {
        (Some(name), Some(updated), Some(epoch)) => lines.push(format!(
            "  Cluster \"{name}\" was last updated {updated} ({epoch})"
        )),
        (Some(name), _, _) => lines.push(format!("  Cluster \"{name}\"")),
        _ => {}
    }
    // VCSFeatures NONE means a non-global cluster; WACPort is where global
    // clusters connect.
    if let (Some(features), Some(port)) = (&summary.features, &summary.wac_port) {
        lines.push(format!("  VCSFeatures: {features}, WACPort: {port}"));
    }
    lines
}

/// Group and resource findings are indented one level deeper.
pub fn finding_line(finding: &Finding) -> String {
    let indent = if finding.group().is_some() { "    " } else { "  " };
    format!("{indent}Warn: {finding}")
}

/// Body lines for one outcome, without the header.
pub fn outcome_lines(outcome: &TargetOutcome) -> Vec<String> {
    match outcome {
        TargetOutcome::Checked(report) => {
            let mut lines = summary_lines(&report.summary);
            lines.extend(report.findings.iter().map(finding_line));
            lines
        }
        TargetOutcome::Unreachable { reason, .. } => {
            vec![format!("  Error: {reason}. Moving on.")]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcvcs_domain::{HealthReport, Mismatch};

    #[test]
    fn test_summary_lines() {
        let summary = ClusterSummary {
            name: Some("prodclus".to_string()),
            cluster_time: Some("1262304000".to_string()),
            last_updated: Some("2010-01-01 00:00:00".to_string()),
            features: Some("NONE".to_string()),
            wac_port: Some("14155".to_string()),
        };
        assert_eq!(
            summary_lines(&summary),
            vec![
                "  Cluster \"prodclus\" was last updated 2010-01-01 00:00:00 (1262304000)",
                "  VCSFeatures: NONE, WACPort: 14155",
            ]
        );
        assert!(summary_lines(&ClusterSummary::default()).is_empty());
    }

    #[test]
    fn test_finding_indentation() {
        assert_eq!(
            finding_line(&Finding::ClusterWritable),
            "  Warn: Cluster is Writable. (haconf -dump -makero)"
        );
        let group_level = Finding::GroupAttribute {
            group: "appSG".to_string(),
            mismatch: Mismatch {
                attribute: "AutoStart".to_string(),
                expected: "1".to_string(),
                actual: "0".to_string(),
            },
        };
        assert!(finding_line(&group_level).starts_with("    Warn: Expecting group appSG"));
    }

    #[test]
    fn test_outcome_lines() {
        let mut report = HealthReport::new("charlie", ClusterSummary::default());
        report.push(Finding::GroupAutoDisabled {
            group: "appSG".to_string(),
        });
        assert_eq!(
            outcome_lines(&TargetOutcome::Checked(report)),
            vec!["    Warn: group \"appSG\" is currently autodisabled."]
        );

        let unreachable = TargetOutcome::Unreachable {
            target: "delta".to_string(),
            reason: "Problem communicating with cluster: timed out".to_string(),
        };
        assert_eq!(
            outcome_lines(&unreachable),
            vec!["  Error: Problem communicating with cluster: timed out. Moving on."]
        );
    }
}
