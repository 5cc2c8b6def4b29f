//! Docker Compose configuration types
//!
//! Only the parts of the compose schema that can be expressed as an ECS
//! container definition are modelled. Other keys are ignored by serde.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Docker Compose file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeManifest {
    /// Compose file version
    #[serde(default)]
    pub version: Option<String>,
    /// Services, keyed by service name
    #[serde(default)]
    pub services: HashMap<String, ServiceSpec>,
}

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceSpec {
    /// Command to run
    #[serde(default)]
    pub command: Option<StringOrList>,
    /// Entrypoint
    #[serde(default)]
    pub entrypoint: Option<StringOrList>,
    /// Deploy configuration
    #[serde(default)]
    pub deploy: Option<DeploySpec>,
    /// DNS servers
    #[serde(default)]
    pub dns: Option<StringOrList>,
    /// DNS search domains
    #[serde(default)]
    pub dns_search: Option<StringOrList>,
    /// Labels
    #[serde(default)]
    pub labels: Option<LabelsConfig>,
    /// Security options
    #[serde(default)]
    pub security_opt: Option<Vec<String>>,
    /// Mark the container as essential to its task
    #[serde(default)]
    pub essential: Option<bool>,
    /// Hostname
    #[serde(default)]
    pub hostname: Option<String>,
    /// Image name
    #[serde(default)]
    pub image: Option<String>,
    /// Privileged mode
    #[serde(default)]
    pub privileged: Option<bool>,
    /// TTY
    #[serde(default)]
    pub tty: Option<bool>,
    /// User
    #[serde(default)]
    pub user: Option<String>,
    /// Working directory
    #[serde(default)]
    pub working_dir: Option<String>,
}

/// A value that may be written either as a single string or as a list.
///
/// `command: echo hi` becomes the one-element list `["echo hi"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    /// Single string
    Single(String),
    /// List of strings
    List(Vec<String>),
}

impl StringOrList {
    /// Flatten into an ordered list of strings
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            StringOrList::Single(s) => vec![s.clone()],
            StringOrList::List(list) => list.clone(),
        }
    }
}

/// Labels configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelsConfig {
    /// Array of "key=value" strings
    Array(Vec<String>),
    /// Map of key to value
    Map(HashMap<String, ScalarString>),
}

impl LabelsConfig {
    /// Normalize to a key/value map. Array entries without `=` get an empty value.
    pub fn to_map(&self) -> HashMap<String, String> {
        match self {
            LabelsConfig::Map(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), value.0.clone()))
                .collect(),
            LabelsConfig::Array(items) => items
                .iter()
                .map(|item| match item.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => (item.clone(), String::new()),
                })
                .collect(),
        }
    }
}

/// Deploy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploySpec {
    /// Resource limits and reservations
    #[serde(default)]
    pub resources: Option<ResourcesSpec>,
    /// Number of replicas
    #[serde(default)]
    pub replicas: Option<u32>,
}

/// Resources configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourcesSpec {
    /// Resource limits
    #[serde(default)]
    pub limits: Option<ResourceSpec>,
    /// Resource reservations
    #[serde(default)]
    pub reservations: Option<ResourceSpec>,
}

/// Resource specification
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// CPU limit/reservation
    #[serde(default, deserialize_with = "scalar_string")]
    pub cpus: Option<String>,
    /// Memory limit/reservation
    #[serde(default, deserialize_with = "scalar_string")]
    pub memory: Option<String>,
}

impl ServiceSpec {
    /// Resource limits, if declared
    pub fn limits(&self) -> Option<&ResourceSpec> {
        self.resources()?.limits.as_ref()
    }

    /// Resource reservations, if declared
    pub fn reservations(&self) -> Option<&ResourceSpec> {
        self.resources()?.reservations.as_ref()
    }

    fn resources(&self) -> Option<&ResourcesSpec> {
        self.deploy.as_ref()?.resources.as_ref()
    }
}

/// A YAML scalar read as text: `2`, `true` and `0.5` become `"2"`, `"true"`
/// and `"0.5"`, and `null` becomes the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScalarString(pub String);

impl<'de> Deserialize<'de> for ScalarString {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            String(String),
            Bool(bool),
            Int(i64),
            Float(f64),
            Null,
        }

        Ok(ScalarString(match Scalar::deserialize(deserializer)? {
            Scalar::String(s) => s,
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Null => String::new(),
        }))
    }
}

/// Accept `cpus: 256`, `cpus: 0.5` and `cpus: "256"` alike
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ScalarString>::deserialize(deserializer)?.map(|scalar| scalar.0))
}
