//! Remote execution through the system ssh client.
//!
//! One master connection is opened per session on first use and every
//! command is multiplexed over its control socket. The master is shut down
//! and the socket directory removed when the session is dropped.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Mutex;

use tempfile::TempDir;
use tracing::{debug, warn};

use hcvcs_domain::RemoteConfig;
use hcvcs_ports::{CommandOutput, CommandPort, TransportError};

/// ssh exits with 255 when the connection itself failed.
const SSH_TRANSPORT_FAILURE: i32 = 255;

pub struct SshSession {
    host: String,
    config: RemoteConfig,
    program: PathBuf,
    control_dir: TempDir,
    opened: Mutex<bool>,
}

impl SshSession {
    pub fn new(host: impl Into<String>, config: RemoteConfig) -> Result<Self, TransportError> {
        let control_dir = tempfile::Builder::new().prefix("hcvcs-").tempdir()?;
        Ok(Self {
            host: host.into(),
            config,
            program: PathBuf::from("ssh"),
            control_dir,
            opened: Mutex::new(false),
        })
    }

    /// Uses `program` instead of the `ssh` found on PATH.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn control_path(&self) -> PathBuf {
        self.control_dir.path().join("master")
    }

    fn log_path(&self) -> PathBuf {
        self.control_dir.path().join("master.log")
    }

    /// Options shared by the master and every multiplexed command.
    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!("ControlPath={}", self.control_path().display()),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.config.connect_timeout_secs),
            "-o".to_string(),
            self.config.host_key_policy.ssh_option().to_string(),
            "-l".to_string(),
            self.config.username.clone(),
        ];
        if let Some(identity) = &self.config.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        if self.config.password.is_none() {
            args.push("-o".to_string());
            args.push("BatchMode=yes".to_string());
        }
        args
    }

    fn master_args(&self) -> Vec<String> {
        let mut args = vec![
            "-M".to_string(),
            "-N".to_string(),
            "-f".to_string(),
            "-E".to_string(),
            self.log_path().display().to_string(),
            "-o".to_string(),
            "ControlPersist=yes".to_string(),
        ];
        args.extend(self.common_args());
        args.push(self.host.clone());
        args
    }

    fn exec_args(&self, command: &str) -> Vec<String> {
        let mut args = vec!["-o".to_string(), "ControlMaster=no".to_string()];
        args.extend(self.common_args());
        args.push(self.host.clone());
        args.push("--".to_string());
        args.push(remote_command_line(&self.config.path, command));
        args
    }

    /// `ssh`, or `sshpass -e ssh` when a password is configured.
    fn ssh(&self) -> Command {
        match &self.config.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.env("SSHPASS", password).arg("-e").arg(&self.program);
                cmd
            }
            None => Command::new(&self.program),
        }
    }

    fn ensure_open(&self) -> Result<(), TransportError> {
        let mut opened = self.opened.lock().map_err(|_| TransportError::Exec {
            host: self.host.clone(),
            detail: "session lock poisoned".to_string(),
        })?;
        if *opened {
            return Ok(());
        }

        debug!(host = %self.host, user = %self.config.username, "opening ssh session");
        let status = self
            .ssh()
            .args(self.master_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|err| TransportError::Connect {
                host: self.host.clone(),
                detail: format!("cannot launch ssh: {err}"),
            })?;

        if !status.success() {
            let log = std::fs::read_to_string(self.log_path()).unwrap_or_default();
            let detail = log
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("ssh exited with {status}"));
            return Err(TransportError::Connect {
                host: self.host.clone(),
                detail,
            });
        }

        *opened = true;
        Ok(())
    }
}

impl CommandPort for SshSession {
    fn execute(&self, command: &str) -> Result<CommandOutput, TransportError> {
        self.ensure_open()?;

        debug!(host = %self.host, command, "running remote command");
        let output = self
            .ssh()
            .args(self.exec_args(command))
            .stdin(Stdio::null())
            .output()
            .map_err(|err| TransportError::Exec {
                host: self.host.clone(),
                detail: err.to_string(),
            })?;

        match output.status.code() {
            Some(0) => Ok(CommandOutput::success(
                String::from_utf8_lossy(&output.stdout).into_owned(),
            )),
            Some(SSH_TRANSPORT_FAILURE) | None => Err(TransportError::Exec {
                host: self.host.clone(),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
            Some(code) => {
                debug!(host = %self.host, command, code, "remote command exited non-zero");
                Ok(CommandOutput::failed())
            }
        }
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        let opened = self.opened.get_mut().map(|opened| *opened).unwrap_or(false);
        if !opened {
            return;
        }
        let mut args = vec!["-O".to_string(), "exit".to_string()];
        args.extend(self.common_args());
        args.push(self.host.clone());
        let result = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(err) = result {
            warn!(host = %self.host, error = %err, "failed to close ssh session");
        }
    }
}

/// The command line run remotely, with the cluster binaries on PATH.
pub(crate) fn remote_command_line(path: &str, command: &str) -> String {
    format!("PATH=\"{path}\" {}", command.trim())
}
