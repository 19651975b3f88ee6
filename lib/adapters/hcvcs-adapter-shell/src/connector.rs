use tracing::debug;

use hcvcs_domain::RemoteConfig;
use hcvcs_ports::{CommandPort, ConnectorPort, Target, TransportError};

use crate::hostname::local_hostname;
use crate::local::LocalCommandAdapter;
use crate::ssh::SshSession;

/// Connects to the local host directly and to everything else over ssh.
#[derive(Debug, Clone)]
pub struct ShellConnector {
    hostname: String,
    remote: RemoteConfig,
}

impl ShellConnector {
    pub fn new(remote: RemoteConfig) -> Self {
        Self::with_hostname(local_hostname(), remote)
    }

    pub fn with_hostname(hostname: impl Into<String>, remote: RemoteConfig) -> Self {
        Self {
            hostname: hostname.into(),
            remote,
        }
    }
}

impl ConnectorPort for ShellConnector {
    fn local_hostname(&self) -> &str {
        &self.hostname
    }

    fn connect(&self, target: &Target) -> Result<Box<dyn CommandPort>, TransportError> {
        debug!(%target, "connecting");
        match target {
            Target::Local => Ok(Box::new(LocalCommandAdapter::new())),
            Target::Remote(host) => Ok(Box::new(SshSession::new(host.as_str(), self.remote.clone())?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_own_hostname_runs_locally() {
        let connector = ShellConnector::with_hostname("charlie", RemoteConfig::default());
        let port = connector.connect(&connector.resolve("charlie")).unwrap();
        let output = port.execute("echo ok").unwrap();
        assert_eq!(output.text, "ok\n");
    }

    #[test]
    fn test_remote_connect_is_lazy() {
        let connector = ShellConnector::with_hostname("charlie", RemoteConfig::default());
        let target = connector.resolve("delta");
        assert!(target.is_remote());
        assert!(connector.connect(&target).is_ok());
    }
}
