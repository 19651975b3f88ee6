//! Domain models and invariants.

pub mod attributes;
pub mod config;
pub mod expectations;
pub mod finding;
pub mod record;
pub mod report;
pub mod status;

pub use attributes::{AttributeMap, AttributeValue};
pub use config::{CommandSet, ExpectationsConfig, HcvcsConfig, HostKeyPolicy, RemoteConfig};
pub use expectations::{ExpectationTable, Expectations, Mismatch};
pub use finding::Finding;
pub use record::{GLOBAL_SCOPE, PairRecord, QuadRecord, Record};
pub use report::{ClusterSummary, HealthReport, TargetOutcome};
pub use status::{ClusterStatus, GroupRuntimeStatus, SystemStatus};
