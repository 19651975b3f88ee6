//! Rule evaluation: cluster, then each group, then each resource.

use tracing::debug;

use hcvcs_domain::{
    AttributeMap, ClusterStatus, ClusterSummary, Expectations, Finding, HealthReport,
};
use hcvcs_ports::CommandPort;

use crate::model::ClusterModel;

/// State token of a healthy cluster member.
const RUNNING: &str = "RUNNING";

#[derive(Debug, Clone, Default)]
pub struct HealthCheck {
    expectations: Expectations,
}

impl HealthCheck {
    pub fn new(expectations: Expectations) -> Self {
        Self { expectations }
    }

    pub fn expectations(&self) -> &Expectations {
        &self.expectations
    }

    /// Runs every check for `system` against `model`. Findings never stop
    /// the evaluation.
    pub fn evaluate<P: CommandPort>(&self, system: &str, model: &ClusterModel<P>) -> HealthReport {
        let mut report = HealthReport::new(system, ClusterSummary::from_info(model.info()));
        report.extend(self.cluster_findings(system, model.info(), model.status()));
        for group in model.groups() {
            report.extend(self.group_findings(system, group, model));
        }
        report
    }

    pub fn cluster_findings(
        &self,
        system: &str,
        info: &AttributeMap,
        status: &ClusterStatus,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        if info.get("ReadOnly").is_some_and(|read_only| read_only != "1") {
            findings.push(Finding::ClusterWritable);
        }

        match status.system(system) {
            Some(member) => {
                if member.frozen {
                    findings.push(Finding::SystemFrozen {
                        system: system.to_string(),
                    });
                }
                if member.state != RUNNING {
                    findings.push(Finding::SystemNotRunning {
                        system: system.to_string(),
                        state: member.state.clone(),
                    });
                }
            }
            None => findings.push(Finding::SystemNotInCluster {
                system: system.to_string(),
            }),
        }

        findings.extend(
            self.expectations
                .cluster
                .compare(info)
                .into_iter()
                .map(|mismatch| Finding::ClusterAttribute {
                    system: system.to_string(),
                    mismatch,
                }),
        );
        findings
    }

    pub fn group_findings<P: CommandPort>(
        &self,
        system: &str,
        group: &str,
        model: &ClusterModel<P>,
    ) -> Vec<Finding> {
        let mut findings = Vec::new();

        match model
            .status()
            .system(system)
            .and_then(|member| member.group(group))
        {
            Some(runtime) => {
                if !runtime.probed {
                    findings.push(Finding::GroupNotProbed {
                        group: group.to_string(),
                        system: system.to_string(),
                    });
                }
                if runtime.autodisabled {
                    findings.push(Finding::GroupAutoDisabled {
                        group: group.to_string(),
                    });
                }
            }
            None => debug!(group, system, "group has no runtime entry on system"),
        }

        let attributes = AttributeMap::from_quads(&model.group_attributes(Some(group), Some(system)));
        findings.extend(
            self.expectations
                .group_table(&attributes)
                .compare(&attributes)
                .into_iter()
                .map(|mismatch| Finding::GroupAttribute {
                    group: group.to_string(),
                    mismatch,
                }),
        );

        if let Some(system_list) = attributes.get("SystemList") {
            let missing = missing_systems(system_list, model.status().system_names());
            if !missing.is_empty() {
                findings.push(Finding::GroupCoverage {
                    group: group.to_string(),
                    missing,
                });
            }
        }

        for (resource, _) in model
            .list_resources(Some(group))
            .into_iter()
            .filter(|(_, placed_on)| placed_on == system)
        {
            let attributes =
                AttributeMap::from_quads(&model.resource_attributes(Some(resource.as_str()), Some(system)));
            findings.extend(
                self.expectations
                    .resource
                    .compare(&attributes)
                    .into_iter()
                    .map(|mismatch| Finding::ResourceAttribute {
                        resource: resource.clone(),
                        group: group.to_string(),
                        mismatch,
                    }),
            );
        }

        findings
    }
}

/// Cluster systems a group's `SystemList` does not name, sorted.
///
/// `SystemList` alternates system names and priorities, so only the
/// even-indexed tokens are names.
pub fn missing_systems<'a, I>(system_list: &str, cluster_systems: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let configured: Vec<&str> = system_list.split_whitespace().step_by(2).collect();
    let mut missing: Vec<String> = cluster_systems
        .into_iter()
        .filter(|system| !configured.contains(system))
        .map(str::to_string)
        .collect();
    missing.sort();
    missing.dedup();
    missing
}
