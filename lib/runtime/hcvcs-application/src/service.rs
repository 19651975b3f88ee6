use tracing::{info, warn};

use hcvcs_domain::{CommandSet, Expectations, TargetOutcome};
use hcvcs_ports::{ConnectorPort, LOCAL_ALIASES};

use crate::health::HealthCheck;
use crate::model::ClusterModel;

/// Runs the health check against one or more targets. Each target gets
/// its own session and model; a failing target never stops the others.
pub struct HealthCheckService<C> {
    connector: C,
    commands: CommandSet,
    health: HealthCheck,
}

impl<C: ConnectorPort> HealthCheckService<C> {
    pub fn new(connector: C, commands: CommandSet, expectations: Expectations) -> Self {
        Self {
            connector,
            commands,
            health: HealthCheck::new(expectations),
        }
    }

    /// Cluster system name for a target argument; local aliases mean this host.
    pub fn system_name<'a>(&'a self, name: &'a str) -> &'a str {
        let name = name.trim();
        if LOCAL_ALIASES.contains(&name) {
            self.connector.local_hostname()
        } else {
            name
        }
    }

    pub fn check_target(&self, name: &str) -> TargetOutcome {
        let system = self.system_name(name);
        let target = self.connector.resolve(system);
        info!(system, %target, "checking system");

        let port = match self.connector.connect(&target) {
            Ok(port) => port,
            Err(err) => return unreachable(system, err.to_string()),
        };
        // The model owns the session; both are released when this returns.
        let model = match ClusterModel::build(port, self.commands.clone()) {
            Ok(model) => model,
            Err(err) => return unreachable(system, err.to_string()),
        };

        let report = self.health.evaluate(system, &model);
        info!(system, findings = report.findings.len(), "check complete");
        TargetOutcome::Checked(report)
    }

    pub fn check_all<'a, I>(&self, names: I) -> Vec<TargetOutcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .map(|name| self.check_target(name))
            .collect()
    }
}

fn unreachable(system: &str, reason: String) -> TargetOutcome {
    warn!(system, %reason, "cannot check system");
    TargetOutcome::Unreachable {
        target: system.to_string(),
        reason,
    }
}
