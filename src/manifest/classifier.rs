//! Resource kind detection
//!
//! ECS input documents carry no `kind` field, so the kind is sniffed from
//! the top-level keys.

use crate::error::{EcsctlError, Result};
use serde_yaml::{Mapping, Value};

/// Key that marks a task definition
pub const TASK_DEFINITION_MARKER: &str = "containerDefinitions";

/// Key that marks a service definition
pub const SERVICE_MARKER: &str = "serviceName";

/// Resource kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Input for `register-task-definition`
    TaskDefinition,
    /// Input for `create-service`
    Service,
    /// Neither or both markers present
    Unrecognized,
}

impl ResourceKind {
    /// `aws ecs` subcommand that applies this kind
    pub fn subcommand(&self) -> Option<&'static str> {
        match self {
            ResourceKind::TaskDefinition => Some("register-task-definition"),
            ResourceKind::Service => Some("create-service"),
            ResourceKind::Unrecognized => None,
        }
    }

    /// File name the document is written to under `manifests/`
    pub fn manifest_file(&self) -> Option<&'static str> {
        match self {
            ResourceKind::TaskDefinition => Some("task_definition.yaml"),
            ResourceKind::Service => Some("svc_definition.yaml"),
            ResourceKind::Unrecognized => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::TaskDefinition => write!(f, "task definition"),
            ResourceKind::Service => write!(f, "service"),
            ResourceKind::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

/// Decode one YAML document into its top-level mapping.
///
/// An empty document decodes to an empty mapping.
pub fn decode(document: &str) -> Result<Mapping> {
    let value: Value =
        serde_yaml::from_str(document).map_err(|e| EcsctlError::Decode(e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        other => Err(EcsctlError::Decode(format!(
            "expected a mapping at the top level, found {}",
            value_type(&other)
        ))),
    }
}

/// Classify a decoded document by its marker keys
pub fn classify(resource: &Mapping) -> ResourceKind {
    let is_task_definition = resource.contains_key(TASK_DEFINITION_MARKER);
    let is_service = resource.contains_key(SERVICE_MARKER);

    match (is_task_definition, is_service) {
        (true, false) => ResourceKind::TaskDefinition,
        (false, true) => ResourceKind::Service,
        _ => ResourceKind::Unrecognized,
    }
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of(document: &str) -> ResourceKind {
        classify(&decode(document).unwrap())
    }

    #[test]
    fn test_task_definition() {
        assert_eq!(kind_of("containerDefinitions:\n- foo\n"), ResourceKind::TaskDefinition);
        assert_eq!(kind_of("family: web\ncontainerDefinitions: []"), ResourceKind::TaskDefinition);
    }

    #[test]
    fn test_service() {
        let kind = kind_of("serviceName: web\ncluster: prod\ndesiredCount: 2");
        assert_eq!(kind, ResourceKind::Service);
    }

    #[test]
    fn test_marker_with_null_value() {
        assert_eq!(kind_of("serviceName:"), ResourceKind::Service);
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(kind_of("apiVersion: v1\nkind: Pod"), ResourceKind::Unrecognized);
        assert_eq!(kind_of("# just a comment"), ResourceKind::Unrecognized);
        assert_eq!(kind_of("{}"), ResourceKind::Unrecognized);
    }

    #[test]
    fn test_both_markers_is_unrecognized() {
        let kind = kind_of("containerDefinitions: []\nserviceName: web");
        assert_eq!(kind, ResourceKind::Unrecognized);
    }

    #[test]
    fn test_nested_markers_are_ignored() {
        let kind = kind_of("spec:\n  serviceName: web\n  containerDefinitions: []");
        assert_eq!(kind, ResourceKind::Unrecognized);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let resource = decode("serviceName: web").unwrap();
        let first = classify(&resource);
        for _ in 0..10 {
            assert_eq!(classify(&resource), first);
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode("key: [unclosed"), Err(EcsctlError::Decode(_))));
        assert!(matches!(decode("- a\n- b"), Err(EcsctlError::Decode(_))));
        assert!(matches!(decode("just text"), Err(EcsctlError::Decode(_))));
    }

    #[test]
    fn test_kind_metadata() {
        assert_eq!(
            ResourceKind::TaskDefinition.subcommand(),
            Some("register-task-definition")
        );
        assert_eq!(ResourceKind::Service.subcommand(), Some("create-service"));
        assert_eq!(ResourceKind::Unrecognized.subcommand(), None);
        assert_eq!(
            ResourceKind::TaskDefinition.manifest_file(),
            Some("task_definition.yaml")
        );
        assert_eq!(ResourceKind::Service.manifest_file(), Some("svc_definition.yaml"));
        assert_eq!(ResourceKind::Unrecognized.manifest_file(), None);
    }
}
