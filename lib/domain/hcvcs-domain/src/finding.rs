use std::fmt;

use serde::Serialize;

use crate::expectations::Mismatch;

/// A single configuration drift warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    ClusterWritable,
    SystemNotInCluster {
        system: String,
    },
    SystemFrozen {
        system: String,
    },
    SystemNotRunning {
        system: String,
        state: String,
    },
    ClusterAttribute {
        system: String,
        #[serde(flatten)]
        mismatch: Mismatch,
    },
    GroupNotProbed {
        group: String,
        system: String,
    },
    GroupAutoDisabled {
        group: String,
    },
    GroupAttribute {
        group: String,
        #[serde(flatten)]
        mismatch: Mismatch,
    },
    GroupCoverage {
        group: String,
        missing: Vec<String>,
    },
    ResourceAttribute {
        resource: String,
        group: String,
        #[serde(flatten)]
        mismatch: Mismatch,
    },
}

impl Finding {
    /// Group name for group and resource level findings.
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::GroupNotProbed { group, .. }
            | Self::GroupAutoDisabled { group }
            | Self::GroupAttribute { group, .. }
            | Self::GroupCoverage { group, .. }
            | Self::ResourceAttribute { group, .. } => Some(group),
            _ => None,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClusterWritable => {
                write!(f, "Cluster is Writable. (haconf -dump -makero)")
            }
            Self::SystemNotInCluster { system } => {
                write!(f, "system {system} is not a member of the cluster.")
            }
            Self::SystemFrozen { system } => write!(f, "system {system} is frozen."),
            Self::SystemNotRunning { system, state } => {
                write!(f, "system {system} state is \"{state}\".")
            }
            Self::ClusterAttribute { system, mismatch } => write!(
                f,
                "Expecting cluster \"{system}\" value \"{}\" to be \"{}\": Currently \"{}\".",
                mismatch.attribute, mismatch.expected, mismatch.actual
            ),
            Self::GroupNotProbed { group, system } => {
                write!(f, "group \"{group}\" is not probed on system \"{system}\".")
            }
            Self::GroupAutoDisabled { group } => {
                write!(f, "group \"{group}\" is currently autodisabled.")
            }
            Self::GroupAttribute { group, mismatch } => write!(
                f,
                "Expecting group {group} \"{}\" to be \"{}\": Currently \"{}\".",
                mismatch.attribute, mismatch.expected, mismatch.actual
            ),
            Self::GroupCoverage { group, missing } => write!(
                f,
                "group {group} is not configured to run on cluster nodes: {}",
                missing.join(", ")
            ),
            Self::ResourceAttribute {
                resource,
                group,
                mismatch,
            } => write!(
                f,
                "Resource \"{resource}\", in group \"{group}\", attr \"{}\" should be \"{}\": Currently \"{}\".",
                mismatch.attribute, mismatch.expected, mismatch.actual
            ),
        }
    }
}
