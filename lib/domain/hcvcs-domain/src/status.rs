use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Runtime state of one service group on one system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupRuntimeStatus {
    pub probed: bool,
    pub autodisabled: bool,
    pub state: String,
}

/// Runtime state of one cluster member and the groups it hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemStatus {
    pub state: String,
    pub frozen: bool,
    pub groups: BTreeMap<String, GroupRuntimeStatus>,
}

impl SystemStatus {
    pub fn group(&self, name: &str) -> Option<&GroupRuntimeStatus> {
        self.groups.get(name)
    }
}

/// Status table keyed by system name.
///
/// The group set is always derived from the per-system entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterStatus {
    systems: BTreeMap<String, SystemStatus>,
}

impl ClusterStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a system line. Group entries seen earlier are kept.
    pub fn set_system(&mut self, system: &str, state: &str, frozen: bool) {
        let entry = self.systems.entry(system.to_string()).or_default();
        entry.state = state.to_string();
        entry.frozen = frozen;
    }

    pub fn set_group(&mut self, system: &str, group: &str, status: GroupRuntimeStatus) {
        self.systems
            .entry(system.to_string())
            .or_default()
            .groups
            .insert(group.to_string(), status);
    }

    pub fn system(&self, name: &str) -> Option<&SystemStatus> {
        self.systems.get(name)
    }

    pub fn systems(&self) -> impl Iterator<Item = (&str, &SystemStatus)> {
        self.systems
            .iter()
            .map(|(name, status)| (name.as_str(), status))
    }

    pub fn system_names(&self) -> BTreeSet<&str> {
        self.systems.keys().map(String::as_str).collect()
    }

    pub fn groups(&self) -> BTreeSet<&str> {
        self.systems
            .values()
            .flat_map(|status| status.groups.keys())
            .map(String::as_str)
            .collect()
    }

    /// Members hosting no group at all. In a multi-member cluster every
    /// member should carry at least one group entry.
    pub fn systems_without_groups(&self) -> Vec<&str> {
        self.systems
            .iter()
            .filter(|(_, status)| status.groups.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }
}
