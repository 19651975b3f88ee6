use std::process::{Command, Stdio};

use tracing::debug;

use hcvcs_ports::{CommandOutput, CommandPort, TransportError};

/// Runs commands on this host. Never reports a transport error: a command
/// that cannot start or exits non-zero simply yields no data.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalCommandAdapter;

impl LocalCommandAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl CommandPort for LocalCommandAdapter {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError> {
        Ok(run_local(command))
    }
}

/// Splits `command` on whitespace (no shell involved) and runs it with
/// stdout and stderr captured together.
pub fn run_local(command: &str) -> CommandOutput {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return CommandOutput::failed();
    };

    debug!(command, "running local command");
    let output = match Command::new(program)
        .args(parts)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(err) => {
            debug!(command, error = %err, "failed to launch command");
            return CommandOutput::failed();
        }
    };

    if !output.status.success() {
        debug!(command, status = ?output.status.code(), "command exited non-zero");
        return CommandOutput::failed();
    }

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    CommandOutput::success(text)
}
