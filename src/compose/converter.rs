//! Compose service to ECS container definition conversion

use super::config::{ComposeManifest, ServiceSpec, StringOrList};
use super::parser::{ComposeParser, DEFAULT_COMPOSE_FILE};
use crate::ecs::{ContainerDefinition, TaskDefinitionInput};
use crate::error::Result;
use crate::units;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Compose conversion configuration
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Compose file to read
    pub compose_file: PathBuf,
    /// Target cluster
    pub cluster: String,
    /// Task definition family; the cluster name when unset
    pub family: Option<String>,
}

impl ConvertConfig {
    /// Create a configuration for `cluster` reading the default compose file
    pub fn new(cluster: &str) -> Self {
        Self {
            compose_file: PathBuf::from(DEFAULT_COMPOSE_FILE),
            cluster: cluster.to_string(),
            family: None,
        }
    }

    /// Task definition family
    pub fn family(&self) -> &str {
        self.family.as_deref().unwrap_or(&self.cluster)
    }
}

/// Build a task definition input from the configured compose file
pub fn task_definition_from_compose(config: &ConvertConfig) -> Result<TaskDefinitionInput> {
    let manifest = ComposeParser::parse_file(&config.compose_file)?;
    let definitions = manifest.to_container_definitions();

    tracing::info!(
        "Converted {} service(s) from {} into family {} for cluster {}",
        definitions.len(),
        config.compose_file.display(),
        config.family(),
        config.cluster
    );

    Ok(TaskDefinitionInput::new(config.family(), definitions))
}

impl ComposeManifest {
    /// Convert every service into a container definition, sorted by name.
    ///
    /// Fields that cannot be converted are left out; conversion never fails.
    pub fn to_container_definitions(&self) -> Vec<ContainerDefinition> {
        let mut definitions: Vec<ContainerDefinition> = self
            .services
            .iter()
            .map(|(name, service)| service.to_container_definition(name))
            .collect();

        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }
}

impl ServiceSpec {
    /// Convert this service into a container definition named `name`
    pub fn to_container_definition(&self, name: &str) -> ContainerDefinition {
        let reservations = self.reservations();
        let limits = self.limits();

        ContainerDefinition {
            name: name.to_string(),
            image: non_empty(&self.image),
            command: non_empty_list(&self.command),
            entry_point: non_empty_list(&self.entrypoint),
            cpu: reservations
                .and_then(|r| r.cpus.as_deref())
                .and_then(|cpus| lenient(name, "cpu", units::parse_cpu_units(cpus))),
            memory: limits
                .and_then(|l| l.memory.as_deref())
                .and_then(|memory| lenient(name, "memory", units::to_megabytes(memory))),
            memory_reservation: reservations
                .and_then(|r| r.memory.as_deref())
                .and_then(|memory| {
                    lenient(name, "memoryReservation", units::to_megabytes(memory))
                }),
            dns_servers: non_empty_list(&self.dns),
            dns_search_domains: non_empty_list(&self.dns_search),
            docker_labels: self
                .labels
                .as_ref()
                .map(|labels| labels.to_map().into_iter().collect::<BTreeMap<_, _>>())
                .filter(|labels| !labels.is_empty()),
            docker_security_options: self.security_opt.clone().filter(|opts| !opts.is_empty()),
            essential: self.essential.unwrap_or(false),
            hostname: non_empty(&self.hostname),
            privileged: self.privileged.unwrap_or(false),
            pseudo_terminal: self.tty.unwrap_or(false),
            user: non_empty(&self.user),
            working_directory: non_empty(&self.working_dir),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|s| !s.is_empty())
}

fn non_empty_list(value: &Option<StringOrList>) -> Option<Vec<String>> {
    value.as_ref().map(StringOrList::to_vec).filter(|list| !list.is_empty())
}

/// Drop a field whose quantity did not parse
fn lenient(service: &str, field: &str, parsed: Result<i64>) -> Option<i64> {
    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("Service {}: leaving {} unset: {}", service, field, e);
            None
        }
    }
}
