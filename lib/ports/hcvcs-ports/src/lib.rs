//! Ports between the health check and the hosts it inspects.

mod memory;

use std::fmt;

use thiserror::Error;

pub use memory::{InMemoryCommandPort, InMemoryConnector};

/// Host names that always mean "run it here".
pub const LOCAL_ALIASES: [&str; 2] = ["", "local"];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Local,
    Remote(String),
}

impl Target {
    pub fn resolve(name: &str, local_hostname: &str) -> Self {
        let name = name.trim();
        if LOCAL_ALIASES.contains(&name) || name == local_hostname {
            Self::Local
        } else {
            Self::Remote(name.to_string())
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote(host) => write!(f, "{host}"),
        }
    }
}

/// Raw command output. A failed command carries no text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub succeeded: bool,
}

impl CommandOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            succeeded: true,
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    /// The text when the command succeeded, `None` otherwise.
    pub fn data(&self) -> Option<&str> {
        self.succeeded.then_some(self.text.as_str())
    }
}

/// The target could not be reached or the session broke. Unlike a failing
/// command this is worth telling the operator about.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot connect to {host}: {detail}")]
    Connect { host: String, detail: String },
    #[error("remote execution on {host} failed: {detail}")]
    Exec { host: String, detail: String },
    #[error("session setup failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Runs commands against one target.
pub trait CommandPort: Send + Sync {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError>;
}

impl<P: CommandPort + ?Sized> CommandPort for Box<P> {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError> {
        (**self).execute(command)
    }
}

impl<P: CommandPort + ?Sized> CommandPort for &P {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError> {
        (**self).execute(command)
    }
}

/// Opens a command port per target. Each port owns its session, which
/// is released when the port is dropped.
pub trait ConnectorPort: Send + Sync {
    fn local_hostname(&self) -> &str;

    fn connect(&self, target: &Target) -> Result<Box<dyn CommandPort>, TransportError>;

    fn resolve(&self, name: &str) -> Target {
        Target::resolve(name, self.local_hostname())
    }
}
