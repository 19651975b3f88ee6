//! In-memory view of one cluster, built from a single target.

use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, warn};

use hcvcs_domain::{
    AttributeMap, ClusterStatus, CommandSet, GroupRuntimeStatus, PairRecord, QuadRecord,
};
use hcvcs_ports::{CommandPort, TransportError};

use crate::normalize::{LineFilter, records, tokens};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Problem communicating with cluster: status summary returned no data")]
    Unavailable,
    #[error("Problem communicating with cluster: {0}")]
    Transport(#[from] TransportError),
}

/// Cluster attributes and status captured at build time. Group and
/// resource queries run live against the target on every call.
pub struct ClusterModel<P> {
    port: P,
    commands: CommandSet,
    info: AttributeMap,
    status: ClusterStatus,
}

impl<P: CommandPort> ClusterModel<P> {
    /// Either returns a complete model or fails; nothing partial escapes.
    pub fn build(port: P, commands: CommandSet) -> Result<Self, ModelError> {
        let info_output = port.execute(&commands.cluster_info)?;
        let info_records: Vec<PairRecord> = records(
            info_output.data().unwrap_or_default(),
            LineFilter::non_comment(),
        );
        let info = AttributeMap::from_pairs(&info_records);

        let status_output = port.execute(&commands.status_summary)?;
        let status = parse_status_summary(status_output.data().unwrap_or_default());
        if status.is_empty() {
            return Err(ModelError::Unavailable);
        }

        if status.len() > 1 {
            for system in status.systems_without_groups() {
                debug!(system, "cluster member hosts no service group");
            }
        }

        debug!(
            systems = status.len(),
            groups = status.groups().len(),
            attributes = info.len(),
            "cluster model built"
        );
        Ok(Self {
            port,
            commands,
            info,
            status,
        })
    }

    pub fn info(&self) -> &AttributeMap {
        &self.info
    }

    pub fn status(&self) -> &ClusterStatus {
        &self.status
    }

    pub fn groups(&self) -> BTreeSet<&str> {
        self.status.groups()
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// `(resource, system)` for every system a resource is configured on.
    pub fn list_resources(&self, group: Option<&str>) -> Vec<(String, String)> {
        let command = match group {
            Some(group) => format!("{} Group={group}", self.commands.resource_list),
            None => self.commands.resource_list.clone(),
        };
        let text = self.query(&command);
        records::<2>(&text, LineFilter::word_start())
            .into_iter()
            .map(PairRecord::into_pair)
            .collect()
    }

    /// Resource attribute records, optionally limited to one resource and
    /// to values scoped to `system` or `global`.
    pub fn resource_attributes(
        &self,
        resource: Option<&str>,
        system: Option<&str>,
    ) -> Vec<QuadRecord> {
        let text = self.query(&self.commands.resource_display);
        filter_quads(records(&text, LineFilter::non_comment()), resource, system)
    }

    /// `(group, system)` for every system a group can run on.
    pub fn list_groups(&self) -> Vec<(String, String)> {
        let text = self.query(&self.commands.group_list);
        records::<2>(&text, LineFilter::word_start())
            .into_iter()
            .map(PairRecord::into_pair)
            .collect()
    }

    pub fn group_attributes(&self, group: Option<&str>, system: Option<&str>) -> Vec<QuadRecord> {
        let command = match group {
            Some(group) => format!("{} {group}", self.commands.group_display),
            None => self.commands.group_display.clone(),
        };
        let text = self.query(&command);
        filter_quads(records(&text, LineFilter::non_comment()), group, system)
    }

    /// Command output, or nothing when the command or the connection failed.
    fn query(&self, command: &str) -> String {
        match self.port.execute(command) {
            Ok(output) => {
                if !output.succeeded {
                    debug!(command, "query returned no data");
                }
                output.data().map(str::to_string).unwrap_or_default()
            }
            Err(err) => {
                warn!(command, error = %err, "query failed");
                String::new()
            }
        }
    }
}

fn filter_quads(
    records: Vec<QuadRecord>,
    entity: Option<&str>,
    system: Option<&str>,
) -> Vec<QuadRecord> {
    records
        .into_iter()
        .filter(|record| entity.is_none_or(|entity| record.entity() == entity))
        .filter(|record| system.is_none_or(|system| record.applies_to(system)))
        .collect()
}

/// Parses `hastatus -sum` style output.
///
/// `A system state frozen` lines describe members, `B group system probed
/// autodisabled state` lines describe group placement. Anything else,
/// including short lines, is ignored.
pub fn parse_status_summary(text: &str) -> ClusterStatus {
    let mut status = ClusterStatus::new();
    for line in tokens(text, LineFilter::word_start()) {
        let fields: Vec<&str> = line.iter().map(String::as_str).collect();
        match fields.as_slice() {
            ["A", system, state, frozen, ..] => {
                status.set_system(system, state, *frozen != "0");
            }
            ["B", group, system, probed, autodisabled, state, ..] => {
                status.set_group(
                    system,
                    group,
                    GroupRuntimeStatus {
                        probed: *probed == "Y",
                        autodisabled: *autodisabled == "Y",
                        state: state.to_string(),
                    },
                );
            }
            _ => {}
        }
    }
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use hcvcs_ports::InMemoryCommandPort;

    const STATUS: &str = "\
-- SYSTEM STATE
-- System               State                Frozen

A  charlie              RUNNING              0
A  delta                RUNNING              1

-- GROUP STATE
-- Group           System               Probed     AutoDisabled    State

B  myS1oraSG       charlie              Y          N               ONLINE
B  myS1oraSG       delta                Y          N               OFFLINE
B  webSG           delta                N          Y               OFFLINE
";

    const RESOURCES: &str = "\
#Resource    Attribute             System     Value
oraMnt       Critical              global     1
oraMnt       Enabled               charlie    1
oraMnt       Enabled               delta      0
oraNic       Critical              global     0
";

    fn port() -> InMemoryCommandPort {
        let commands = CommandSet::default();
        InMemoryCommandPort::new()
            .with_output(
                commands.cluster_info.as_str(),
                "#Attribute  Value\nClusterName  prodclus\nReadOnly  1\n",
            )
            .with_output(commands.status_summary.as_str(), STATUS)
            .with_output(
                "/opt/VRTS/bin/hares -list Group=myS1oraSG",
                "oraMnt charlie\noraMnt delta\noraNic charlie\n",
            )
            .with_output(commands.resource_display.as_str(), RESOURCES)
            .with_output(
                commands.group_list.as_str(),
                "myS1oraSG charlie\nmyS1oraSG delta\nwebSG delta\n",
            )
            .with_output(
                "/opt/VRTS/bin/hagrp -display webSG",
                "#Group Attribute System Value\nwebSG Parallel global 1\nwebSG State delta |OFFLINE|\n",
            )
    }

    #[test]
    fn test_single_member_status_line() {
        let status = parse_status_summary("A charlie RUNNING 0\nB myS1oraSG charlie Y N ONLINE\n");
        let charlie = status.system("charlie").unwrap();
        assert_eq!(charlie.state, "RUNNING");
        assert!(!charlie.frozen);
        assert_eq!(status.groups().into_iter().collect::<Vec<_>>(), vec!["myS1oraSG"]);
        assert_eq!(
            charlie.group("myS1oraSG"),
            Some(&GroupRuntimeStatus {
                probed: true,
                autodisabled: false,
                state: "ONLINE".to_string(),
            })
        );
    }

    #[test]
    fn test_status_ignores_unknown_and_short_lines() {
        let status = parse_status_summary("C oraMnt charlie\nB shortSG charlie Y\nA echo\n");
        assert!(status.is_empty());
    }

    #[test]
    fn test_build_populates_info_and_status() {
        let model = ClusterModel::build(port(), CommandSet::default()).unwrap();
        assert_eq!(model.info().get("ClusterName"), Some("prodclus"));
        assert_eq!(model.status().len(), 2);
        assert!(model.status().system("delta").unwrap().frozen);
        assert_eq!(
            model.groups().into_iter().collect::<Vec<_>>(),
            vec!["myS1oraSG", "webSG"]
        );
    }

    #[test]
    fn test_member_without_groups_still_modelled() {
        let port = InMemoryCommandPort::new().with_output(
            "/opt/VRTS/bin/hastatus -sum",
            "A charlie RUNNING 0\nA delta RUNNING 0\nB appSG charlie Y N ONLINE\n",
        );
        let model = ClusterModel::build(port, CommandSet::default()).unwrap();
        assert_eq!(model.status().len(), 2);
        assert_eq!(model.status().systems_without_groups(), vec!["delta"]);
    }

    #[test]
    fn test_build_fails_without_status() {
        let port = InMemoryCommandPort::new().with_output("/opt/VRTS/bin/haclus -display", "ClusterName x\n");
        let err = ClusterModel::build(port, CommandSet::default()).err().unwrap();
        assert!(matches!(err, ModelError::Unavailable));
    }

    #[test]
    fn test_build_propagates_transport_failure() {
        let err = ClusterModel::build(InMemoryCommandPort::unreachable("delta"), CommandSet::default())
            .err()
            .unwrap();
        assert!(matches!(err, ModelError::Transport(_)));
        assert!(err.to_string().starts_with("Problem communicating with cluster"));
    }

    #[test]
    fn test_build_tolerates_missing_cluster_info() {
        let port = InMemoryCommandPort::new().with_output("/opt/VRTS/bin/hastatus -sum", STATUS);
        let model = ClusterModel::build(port, CommandSet::default()).unwrap();
        assert!(model.info().is_empty());
        assert_eq!(model.status().len(), 2);
    }

    #[test]
    fn test_list_resources_for_group() {
        let model = ClusterModel::build(port(), CommandSet::default()).unwrap();
        let resources = model.list_resources(Some("myS1oraSG"));
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0], ("oraMnt".to_string(), "charlie".to_string()));
        assert!(model.list_resources(None).is_empty());
    }

    #[test]
    fn test_resource_attributes_scope_filter() {
        let model = ClusterModel::build(port(), CommandSet::default()).unwrap();
        let attributes = model.resource_attributes(Some("oraMnt"), Some("charlie"));
        let scopes: Vec<_> = attributes.iter().map(|record| record.scope()).collect();
        assert_eq!(scopes, vec!["global", "charlie"]);

        let everything = model.resource_attributes(None, None);
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn test_group_queries() {
        let model = ClusterModel::build(port(), CommandSet::default()).unwrap();
        assert_eq!(model.list_groups().len(), 3);

        let attributes = model.group_attributes(Some("webSG"), Some("charlie"));
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0].attribute(), "Parallel");

        assert!(model.group_attributes(Some("missingSG"), None).is_empty());
    }

    #[test]
    fn test_queries_are_not_cached() {
        let port = port();
        let model = ClusterModel::build(port.clone(), CommandSet::default()).unwrap();
        model.list_groups();
        model.list_groups();
        let group_lists = port
            .calls()
            .iter()
            .filter(|call| call.as_str() == "/opt/VRTS/bin/hagrp -list")
            .count();
        assert_eq!(group_lists, 2);
    }
}
