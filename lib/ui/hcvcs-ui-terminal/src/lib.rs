//! Command-line front end for the cluster health check.

pub mod cli;
pub mod formatting;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use hcvcs_adapter_shell::ShellConnector;
use hcvcs_application::HealthCheckService;
use hcvcs_domain::TargetOutcome;
use hcvcs_ports::ConnectorPort;

pub use cli::{Cli, load_config};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Parses the process arguments and checks every target. Exits with 1 when
/// any target could not be reached.
pub fn run() -> Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref())?;
    let connector = ShellConnector::new(cli.remote_config(config.remote.clone()));
    let service = HealthCheckService::new(
        connector,
        config.commands.clone(),
        config.expectations.build(),
    );

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let reachable = check_targets(&service, &cli.target_names(), format, &mut io::stdout())?;
    Ok(if reachable {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Logs go to stderr so stdout only carries the report.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Checks targets in order, writing text output as each one finishes.
/// Returns whether every target was reachable.
pub fn check_targets<C, W>(
    service: &HealthCheckService<C>,
    targets: &[String],
    format: OutputFormat,
    out: &mut W,
) -> Result<bool>
where
    C: ConnectorPort,
    W: Write,
{
    let mut outcomes = Vec::with_capacity(targets.len());
    for name in targets {
        if format == OutputFormat::Text {
            writeln!(out, "{}", formatting::header_line(service.system_name(name)))?;
            out.flush()?;
        }
        let outcome = service.check_target(name);
        if format == OutputFormat::Text {
            for line in formatting::outcome_lines(&outcome) {
                writeln!(out, "{line}")?;
            }
        }
        outcomes.push(outcome);
    }

    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut *out, &outcomes)?;
        writeln!(out)?;
    }
    Ok(outcomes.iter().all(TargetOutcome::is_reachable))
}
