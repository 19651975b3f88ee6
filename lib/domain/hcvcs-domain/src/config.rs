//! Process-wide configuration, loaded once at startup.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::expectations::{ExpectationTable, Expectations};

/// PATH used for every remote command; the cluster binaries live outside
/// the default login PATH.
pub const REMOTE_PATH: &str =
    "/sbin:/bin:/usr/sbin:/usr/bin:/usr/local/sbin:/usr/local/bin:/opt/VRTS/bin:/opt/VRTSvcs/bin";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HcvcsConfig {
    pub remote: RemoteConfig,
    pub commands: CommandSet,
    pub expectations: ExpectationsConfig,
}

impl HcvcsConfig {
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("Invalid config at {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Trust unknown hosts on first contact, reject changed keys.
    #[default]
    AcceptNew,
    Strict,
    Off,
}

impl HostKeyPolicy {
    pub fn ssh_option(self) -> &'static str {
        match self {
            Self::AcceptNew => "StrictHostKeyChecking=accept-new",
            Self::Strict => "StrictHostKeyChecking=yes",
            Self::Off => "StrictHostKeyChecking=no",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoteConfig {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub identity_file: Option<PathBuf>,
    pub connect_timeout_secs: u64,
    pub host_key_policy: HostKeyPolicy,
    pub path: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            username: "root".to_string(),
            password: None,
            identity_file: None,
            connect_timeout_secs: 5,
            host_key_policy: HostKeyPolicy::default(),
            path: REMOTE_PATH.to_string(),
        }
    }
}

/// Command strings for the four logical queries against the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandSet {
    pub cluster_info: String,
    pub status_summary: String,
    pub resource_list: String,
    pub resource_display: String,
    pub group_list: String,
    pub group_display: String,
}

impl Default for CommandSet {
    fn default() -> Self {
        Self {
            cluster_info: "/opt/VRTS/bin/haclus -display".to_string(),
            status_summary: "/opt/VRTS/bin/hastatus -sum".to_string(),
            resource_list: "/opt/VRTS/bin/hares -list".to_string(),
            resource_display: "/opt/VRTS/bin/hares -display".to_string(),
            group_list: "/opt/VRTS/bin/hagrp -list".to_string(),
            group_display: "/opt/VRTS/bin/hagrp -display".to_string(),
        }
    }
}

/// Tables given in the config file replace the built-in ones wholesale.
/// Parallel groups are always the failover table plus `parallel_overrides`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExpectationsConfig {
    pub cluster: Option<ExpectationTable>,
    pub failover_group: Option<ExpectationTable>,
    pub parallel_overrides: Option<ExpectationTable>,
    pub resource: Option<ExpectationTable>,
}

impl ExpectationsConfig {
    pub fn build(&self) -> Expectations {
        let parallel_overrides: BTreeMap<String, String> = match &self.parallel_overrides {
            Some(table) => table
                .iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            None => Expectations::standard_parallel_overrides(),
        };
        Expectations::new(
            self.cluster
                .clone()
                .unwrap_or_else(Expectations::standard_cluster),
            self.failover_group
                .clone()
                .unwrap_or_else(Expectations::standard_failover_group),
            &parallel_overrides,
            self.resource
                .clone()
                .unwrap_or_else(Expectations::standard_resource),
        )
    }
}
