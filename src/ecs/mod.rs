//! ECS resource shapes
//!
//! These mirror the input documents accepted by
//! `aws ecs register-task-definition --cli-input-yaml`.

pub mod task_definition;

pub use task_definition::{ContainerDefinition, TaskDefinitionInput};
