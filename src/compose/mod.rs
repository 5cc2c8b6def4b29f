//! Docker Compose support
//!
//! Parses compose files and converts their services into ECS container
//! definitions.

pub mod config;
pub mod converter;
pub mod parser;

pub use config::{ComposeManifest, ServiceSpec};
pub use converter::{task_definition_from_compose, ConvertConfig};
pub use parser::ComposeParser;
