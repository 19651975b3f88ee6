//! Configuration health check for cluster server deployments.
//!
//! The work happens in the workspace crates; this crate re-exports them
//! under one roof.

pub use hcvcs_adapter_shell as adapters;
pub use hcvcs_application as application;
pub use hcvcs_domain as domain;
pub use hcvcs_ports as ports;

pub use hcvcs_application::{ClusterModel, HealthCheck, HealthCheckService, ModelError};
pub use hcvcs_domain::{Expectations, Finding, HcvcsConfig, HealthReport, TargetOutcome};
pub use hcvcs_ports::{CommandPort, ConnectorPort, Target, TransportError};
