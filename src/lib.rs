//! ecsctl - Compose to ECS conversion and apply
//!
//! ecsctl turns Docker Compose services into ECS container definitions and
//! applies ECS manifests through the AWS CLI. It provides:
//!
//! - Multi-document manifest splitting
//! - Resource kind detection for task and service definitions
//! - Compose service conversion with memory and CPU unit handling
//! - Applying manifests with `aws ecs`

pub mod compose;
pub mod ecs;
pub mod error;
pub mod manifest;
pub mod units;

pub use error::{EcsctlError, Result};
