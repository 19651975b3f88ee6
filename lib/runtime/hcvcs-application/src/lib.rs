//! Query, normalize and evaluate: the health check pipeline.

pub mod health;
pub mod model;
pub mod normalize;
pub mod service;

pub use health::{HealthCheck, missing_systems};
pub use model::{ClusterModel, ModelError, parse_status_summary};
pub use normalize::{LineFilter, lines, normalize, records, split_padded};
pub use service::HealthCheckService;
