use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::{CommandOutput, CommandPort, ConnectorPort, Target, TransportError};

/// Scripted command port for tests and offline runs. Commands without a
/// scripted response fail like a missing binary would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandPort {
    responses: BTreeMap<String, CommandOutput>,
    unreachable: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl InMemoryCommandPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output(mut self, command: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses
            .insert(command.into(), CommandOutput::success(text));
        self
    }

    pub fn with_failure(mut self, command: impl Into<String>) -> Self {
        self.responses.insert(command.into(), CommandOutput::failed());
        self
    }

    /// Every command fails with a transport error naming `host`.
    pub fn unreachable(host: impl Into<String>) -> Self {
        Self {
            unreachable: Some(host.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        if let Ok(guard) = self.calls.lock() {
            guard.clone()
        } else {
            Vec::new()
        }
    }
}

impl CommandPort for InMemoryCommandPort {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError> {
        if let Ok(mut guard) = self.calls.lock() {
            guard.push(command.to_string());
        }
        if let Some(host) = &self.unreachable {
            return Err(TransportError::Connect {
                host: host.clone(),
                detail: "host unreachable".to_string(),
            });
        }
        Ok(self
            .responses
            .get(command.trim())
            .cloned()
            .unwrap_or_else(CommandOutput::failed))
    }
}

/// Connector handing out scripted ports keyed by host name.
#[derive(Debug, Clone)]
pub struct InMemoryConnector {
    hostname: String,
    hosts: BTreeMap<String, InMemoryCommandPort>,
}

impl InMemoryConnector {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            hosts: BTreeMap::new(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>, port: InMemoryCommandPort) -> Self {
        self.hosts.insert(host.into(), port);
        self
    }
}

impl ConnectorPort for InMemoryConnector {
    fn local_hostname(&self) -> &str {
        &self.hostname
    }

    fn connect(&self, target: &Target) -> Result<Box<dyn CommandPort>, TransportError> {
        let host = match target {
            Target::Local => self.hostname.as_str(),
            Target::Remote(host) => host.as_str(),
        };
        self.hosts
            .get(host)
            .cloned()
            .map(|port| Box::new(port) as Box<dyn CommandPort>)
            .ok_or_else(|| TransportError::Connect {
                host: host.to_string(),
                detail: "no such host".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_and_unknown_commands() {
        let port = InMemoryCommandPort::new()
            .with_output("hastatus -sum", "A charlie RUNNING 0\n")
            .with_failure("hares -list");

        let ok = port.execute("hastatus -sum").unwrap();
        assert!(ok.succeeded);
        assert_eq!(ok.text, "A charlie RUNNING 0\n");
        assert!(!port.execute("hares -list").unwrap().succeeded);
        assert!(!port.execute("hagrp -list").unwrap().succeeded);
        assert_eq!(port.calls().len(), 3);
    }

    #[test]
    fn test_unreachable_port() {
        let port = InMemoryCommandPort::unreachable("delta");
        assert!(matches!(
            port.execute("hastatus -sum"),
            Err(TransportError::Connect { .. })
        ));
    }

    #[test]
    fn test_connector_maps_local_to_hostname() {
        let connector = InMemoryConnector::new("charlie")
            .with_host("charlie", InMemoryCommandPort::new().with_output("uname", "Linux"));

        let target = connector.resolve("local");
        assert_eq!(target, Target::Local);
        let port = connector.connect(&target).unwrap();
        assert_eq!(port.execute("uname").unwrap().text, "Linux");
        assert!(connector.connect(&Target::Remote("zulu".to_string())).is_err());
    }
}
