//! Appliers hand written manifests to the fleet-management service

use crate::error::{EcsctlError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default name of the external tool
pub const DEFAULT_AWS_BIN: &str = "aws";

/// Something that can apply a manifest file with an `aws ecs` subcommand
pub trait Applier {
    /// Apply the manifest at `manifest` (an absolute path) using `subcommand`
    fn apply(&mut self, subcommand: &str, manifest: &Path) -> Result<()>;
}

/// Applier backed by the AWS CLI
#[derive(Debug, Clone)]
pub struct AwsCli {
    /// Resolved executable path
    program: PathBuf,
}

impl AwsCli {
    /// Locate `bin` and build an applier around it.
    ///
    /// `bin` may be a bare name, searched for in `PATH`, or a path.
    pub fn locate(bin: &str) -> Result<Self> {
        let program =
            find_executable(bin).ok_or_else(|| EcsctlError::ExternalToolNotFound(bin.to_string()))?;

        tracing::debug!("Using {} at {}", bin, program.display());
        Ok(Self { program })
    }

    /// Resolved executable path
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the executable for one apply
    pub fn args(subcommand: &str, manifest: &Path) -> Vec<String> {
        vec![
            "ecs".to_string(),
            subcommand.to_string(),
            "--cli-input-yaml".to_string(),
            format!("file://{}", manifest.display()),
        ]
    }
}

impl Applier for AwsCli {
    fn apply(&mut self, subcommand: &str, manifest: &Path) -> Result<()> {
        let args = Self::args(subcommand, manifest);
        tracing::info!("Executing command {} {}", self.program.display(), args.join(" "));

        let status = Command::new(&self.program).args(&args).status().map_err(|e| {
            EcsctlError::ExternalToolFailure(format!(
                "failed to start {}: {}",
                self.program.display(),
                e
            ))
        })?;

        if !status.success() {
            return Err(EcsctlError::ExternalToolFailure(format!(
                "ecs {} exited with {}",
                subcommand, status
            )));
        }

        Ok(())
    }
}

/// Resolve an executable name against `PATH`
fn find_executable(bin: &str) -> Option<PathBuf> {
    let candidate = Path::new(bin);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(bin))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
