use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing::info;

use hcvcs_domain::{HcvcsConfig, RemoteConfig};

#[derive(Debug, Parser)]
#[command(
    name = "hc-vcs",
    version,
    about = "Audit a cluster server deployment for configuration drift"
)]
pub struct Cli {
    /// Systems to check. Defaults to this host.
    pub targets: Vec<String>,

    /// YAML file with remote, command and expectation settings.
    #[arg(long, env = "HCVCS_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Remote login user.
    #[arg(short, long, env = "HCVCS_USER")]
    pub user: Option<String>,

    /// Remote login password (requires sshpass).
    #[arg(long, env = "HCVCS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Private key for remote logins.
    #[arg(short, long)]
    pub identity: Option<PathBuf>,

    /// Seconds to wait for a remote connection.
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Log more (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Command-line flags win over the config file.
    pub fn remote_config(&self, mut remote: RemoteConfig) -> RemoteConfig {
        if let Some(user) = &self.user {
            remote.username = user.clone();
        }
        if let Some(password) = &self.password {
            remote.password = Some(password.clone());
        }
        if let Some(identity) = &self.identity {
            remote.identity_file = Some(identity.clone());
        }
        if let Some(timeout) = self.connect_timeout {
            remote.connect_timeout_secs = timeout;
        }
        remote
    }

    pub fn target_names(&self) -> Vec<String> {
        if self.targets.is_empty() {
            vec![String::new()]
        } else {
            self.targets.clone()
        }
    }
}

/// Explicit path, then `~/.hcvcs/config.yaml` if present, else defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<HcvcsConfig> {
    if let Some(path) = explicit {
        let config = HcvcsConfig::load_from_path(path)?;
        info!(path = %path.display(), "loaded configuration");
        return Ok(config);
    }

    if let Ok(home) = std::env::var("HOME") {
        let path = Path::new(&home).join(".hcvcs").join("config.yaml");
        if path.is_file() {
            let config = HcvcsConfig::load_from_path(&path)?;
            info!(path = %path.display(), "loaded configuration");
            return Ok(config);
        }
    }

    info!("using default configuration");
    Ok(HcvcsConfig::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_targets_and_flags() {
        let cli = Cli::try_parse_from([
            "hc-vcs",
            "charlie",
            "delta",
            "--user",
            "vcsaudit",
            "--connect-timeout",
            "10",
            "--json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.targets, vec!["charlie", "delta"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);

        let remote = cli.remote_config(RemoteConfig::default());
        assert_eq!(remote.username, "vcsaudit");
        assert_eq!(remote.connect_timeout_secs, 10);
        assert_eq!(remote.password, None);
    }

    #[test]
    fn test_default_target_is_local() {
        let cli = Cli::try_parse_from(["hc-vcs"]).unwrap();
        assert_eq!(cli.target_names(), vec![String::new()]);
        assert_eq!(cli.remote_config(RemoteConfig::default()), RemoteConfig::default());
    }

    #[test]
    fn test_load_explicit_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "remote:\n  connect_timeout_secs: 2").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.remote.connect_timeout_secs, 2);
    }

    #[test]
    fn test_load_invalid_config_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "expectations: [1, 2]").unwrap();
        assert!(load_config(Some(file.path())).is_err());
    }
}
