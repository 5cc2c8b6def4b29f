//! Docker Compose file parser

use super::config::ComposeManifest;
use crate::error::{EcsctlError, Result};
use std::path::Path;

/// Compose file read when no path is given
pub const DEFAULT_COMPOSE_FILE: &str = "docker-compose.yml";

/// Compose file parser
pub struct ComposeParser;

impl ComposeParser {
    /// Parse compose file from path
    pub fn parse_file(path: &Path) -> Result<ComposeManifest> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            EcsctlError::ComposeParse(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_str(&content)
    }

    /// Parse compose file from string
    pub fn parse_str(content: &str) -> Result<ComposeManifest> {
        serde_yaml::from_str(content)
            .map_err(|e| EcsctlError::ComposeParse(format!("Failed to parse YAML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_simple_compose() {
        let yaml = r#"
version: "3.8"
services:
  web:
    image: nginx:latest
    ports:
      - "80:80"
    environment:
      NGINX_PORT: "80"
  db:
    image: postgres:13
    healthcheck:
      test: ["CMD", "pg_isready"]
"#;

        let manifest = ComposeParser::parse_str(yaml).unwrap();
        assert_eq!(manifest.version.as_deref(), Some("3.8"));
        assert_eq!(manifest.services.len(), 2);
        assert!(manifest.services.contains_key("web"));
        assert!(manifest.services.contains_key("db"));
    }

    #[test]
    fn test_parse_without_services() {
        let manifest = ComposeParser::parse_str("version: '3'").unwrap();
        assert!(manifest.services.is_empty());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = ComposeParser::parse_str("services: [unclosed");
        assert!(matches!(result, Err(EcsctlError::ComposeParse(_))));
    }

    #[test]
    fn test_parse_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(DEFAULT_COMPOSE_FILE);
        std::fs::write(&path, "services:\n  web:\n    image: nginx\n").unwrap();

        let manifest = ComposeParser::parse_file(&path).unwrap();
        assert_eq!(
            manifest.services["web"].image.as_deref(),
            Some("nginx")
        );

        let missing = ComposeParser::parse_file(&temp.path().join("nope.yml"));
        assert!(matches!(missing, Err(EcsctlError::ComposeParse(_))));
    }
}
