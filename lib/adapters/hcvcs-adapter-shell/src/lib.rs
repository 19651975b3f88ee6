//! Process-backed command execution: local subprocesses and ssh sessions.

mod connector;
mod hostname;
mod local;
mod ssh;

pub use connector::ShellConnector;
pub use hostname::local_hostname;
pub use local::{LocalCommandAdapter, run_local};
pub use ssh::SshSession;
