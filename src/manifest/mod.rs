//! ECS manifest streams
//!
//! A manifest stream holds one or more YAML documents separated by `---`.
//! Each document is classified by shape and handed to the AWS CLI.

pub mod applier;
pub mod classifier;
pub mod dispatcher;
pub mod splitter;

pub use applier::{Applier, AwsCli};
pub use classifier::{classify, decode, ResourceKind};
pub use dispatcher::{ApplyConfig, ApplyDispatcher, ApplyReport};
pub use splitter::split_documents;
