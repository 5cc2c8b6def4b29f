//! Apply pipeline: split, classify, write, invoke

use super::applier::{Applier, AwsCli, DEFAULT_AWS_BIN};
use super::classifier::{classify, decode, ResourceKind};
use super::splitter::split_documents;
use crate::error::{EcsctlError, Result};
use std::path::{Path, PathBuf};

/// Directory, relative to the working directory, that manifests are written to
pub const MANIFESTS_DIR: &str = "manifests";

/// Apply configuration
#[derive(Debug, Clone)]
pub struct ApplyConfig {
    /// Name or path of the AWS CLI executable
    pub aws_bin: String,
    /// Directory holding `manifests/`
    pub workdir: PathBuf,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            aws_bin: DEFAULT_AWS_BIN.to_string(),
            workdir: PathBuf::from("."),
        }
    }
}

impl ApplyConfig {
    /// Locate the AWS CLI and build a dispatcher around it.
    ///
    /// Fails with `ExternalToolNotFound` before anything is written.
    pub fn dispatcher(&self) -> Result<ApplyDispatcher<AwsCli>> {
        let aws = AwsCli::locate(&self.aws_bin)?;
        ApplyDispatcher::new(&self.workdir, aws)
    }
}

/// Outcome of a successful apply
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Kinds applied, in input order
    pub applied: Vec<ResourceKind>,
    /// Documents skipped as unrecognized
    pub skipped: usize,
}

/// Dispatches manifest documents to an [`Applier`]
pub struct ApplyDispatcher<A: Applier> {
    applier: A,
    manifests_dir: PathBuf,
}

impl<A: Applier> ApplyDispatcher<A> {
    /// Create a dispatcher writing under `workdir`
    pub fn new(workdir: &Path, applier: A) -> Result<Self> {
        let workdir = std::path::absolute(workdir)?;

        Ok(Self {
            applier,
            manifests_dir: workdir.join(MANIFESTS_DIR),
        })
    }

    /// Directory manifests are written to
    pub fn manifests_dir(&self) -> &Path {
        &self.manifests_dir
    }

    /// The wrapped applier
    pub fn applier(&self) -> &A {
        &self.applier
    }

    /// Apply every recognized document in `text`, in order.
    ///
    /// Stops at the first decode or applier failure; documents applied before
    /// that are not rolled back.
    pub fn apply(&mut self, text: &str) -> Result<ApplyReport> {
        if text.trim().is_empty() {
            return Err(EcsctlError::EmptyInput);
        }

        let mut report = ApplyReport::default();

        for (index, document) in split_documents(text).enumerate() {
            let resource = decode(document)?;
            let kind = classify(&resource);

            match (kind.subcommand(), kind.manifest_file()) {
                (Some(subcommand), Some(file)) => {
                    tracing::info!("Applying document {} as {}", index + 1, kind);

                    let path = self.write_manifest(file, document)?;
                    self.applier.apply(subcommand, &path)?;
                    report.applied.push(kind);
                }
                _ => {
                    tracing::warn!(
                        "Skipping document {}: expected exactly one of containerDefinitions or serviceName",
                        index + 1
                    );
                    report.skipped += 1;
                }
            }
        }

        Ok(report)
    }

    /// Write `document` to `manifests/<file>`, replacing any previous content
    fn write_manifest(&self, file: &str, document: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.manifests_dir)?;

        let path = self.manifests_dir.join(file);
        std::fs::write(&path, document)?;
        tracing::debug!("Wrote {}", path.display());

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Records each call along with the manifest content at call time
    #[derive(Default)]
    struct RecordingApplier {
        calls: Vec<(String, PathBuf, String)>,
        fail_on: Option<String>,
    }

    impl Applier for RecordingApplier {
        fn apply(&mut self, subcommand: &str, manifest: &Path) -> Result<()> {
            let content = std::fs::read_to_string(manifest)?;
            self.calls
                .push((subcommand.to_string(), manifest.to_path_buf(), content));

            if self.fail_on.as_deref() == Some(subcommand) {
                return Err(EcsctlError::ExternalToolFailure("exit status: 255".to_string()));
            }
            Ok(())
        }
    }

    fn dispatcher(workdir: &Path, applier: RecordingApplier) -> ApplyDispatcher<RecordingApplier> {
        ApplyDispatcher::new(workdir, applier).unwrap()
    }

    #[test]
    fn test_task_definition_document() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let report = dispatcher.apply("containerDefinitions:\n- foo\n").unwrap();
        assert_eq!(report.applied, vec![ResourceKind::TaskDefinition]);
        assert_eq!(report.skipped, 0);

        let path = temp.path().join("manifests/task_definition.yaml");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "containerDefinitions:\n- foo");

        let calls = &dispatcher.applier().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "register-task-definition");
        assert!(calls[0].1.is_absolute());
        assert!(calls[0].1.ends_with("manifests/task_definition.yaml"));
    }

    #[test]
    fn test_unrecognized_document_is_skipped() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let text = "serviceName: web\ncluster: prod\n---\napiVersion: v1\nkind: ConfigMap\n";
        let report = dispatcher.apply(text).unwrap();
        assert_eq!(report.applied, vec![ResourceKind::Service]);
        assert_eq!(report.skipped, 1);

        let calls = &dispatcher.applier().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "create-service");
        assert_eq!(calls[0].2, "serviceName: web\ncluster: prod");

        let written: Vec<_> = std::fs::read_dir(temp.path().join("manifests"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(written, vec!["svc_definition.yaml"]);
    }

    #[test]
    fn test_documents_applied_in_order_and_overwritten() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let text = "family: a\ncontainerDefinitions: []\n---\nserviceName: s\n---\nfamily: b\ncontainerDefinitions: []\n";
        let report = dispatcher.apply(text).unwrap();
        assert_eq!(
            report.applied,
            vec![
                ResourceKind::TaskDefinition,
                ResourceKind::Service,
                ResourceKind::TaskDefinition,
            ]
        );

        let calls = &dispatcher.applier().calls;
        assert_eq!(calls[0].2, "family: a\ncontainerDefinitions: []");
        assert_eq!(calls[2].2, "family: b\ncontainerDefinitions: []");

        // Only the last task definition survives on disk
        let path = temp.path().join("manifests/task_definition.yaml");
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "family: b\ncontainerDefinitions: []"
        );
    }

    #[test]
    fn test_same_input_twice() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let text = "serviceName: web\n";
        dispatcher.apply(text).unwrap();
        dispatcher.apply(text).unwrap();

        let calls = &dispatcher.applier().calls;
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn test_empty_input() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        assert!(matches!(dispatcher.apply(""), Err(EcsctlError::EmptyInput)));
        assert!(matches!(dispatcher.apply("\n  \n"), Err(EcsctlError::EmptyInput)));
        assert!(dispatcher.applier().calls.is_empty());
        assert!(!temp.path().join("manifests").exists());
    }

    #[test]
    fn test_separators_only() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let report = dispatcher.apply("---\n---\n").unwrap();
        assert_eq!(report, ApplyReport::default());
    }

    #[test]
    fn test_decode_error_aborts_remaining_documents() {
        let temp = tempdir().unwrap();
        let mut dispatcher = dispatcher(temp.path(), RecordingApplier::default());

        let text = "serviceName: first\n---\nserviceName: [broken\n---\nserviceName: third\n";
        let result = dispatcher.apply(text);
        assert!(matches!(result, Err(EcsctlError::Decode(_))));

        let calls = &dispatcher.applier().calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].2, "serviceName: first");
    }

    #[test]
    fn test_applier_failure_aborts_remaining_documents() {
        let temp = tempdir().unwrap();
        let applier = RecordingApplier {
            fail_on: Some("register-task-definition".to_string()),
            ..Default::default()
        };
        let mut dispatcher = dispatcher(temp.path(), applier);

        let text = "containerDefinitions: []\n---\nserviceName: web\n";
        let result = dispatcher.apply(text);
        assert!(matches!(result, Err(EcsctlError::ExternalToolFailure(_))));
        assert_eq!(dispatcher.applier().calls.len(), 1);
        assert!(!temp.path().join("manifests/svc_definition.yaml").exists());
    }

    #[test]
    fn test_config_without_aws_cli() {
        let temp = tempdir().unwrap();
        let config = ApplyConfig {
            aws_bin: "ecsctl-no-such-aws".to_string(),
            workdir: temp.path().to_path_buf(),
        };

        let result = config.dispatcher();
        assert!(matches!(result, Err(EcsctlError::ExternalToolNotFound(_))));
        assert!(!temp.path().join(MANIFESTS_DIR).exists());
    }

    #[test]
    fn test_relative_workdir_is_made_absolute() {
        let config = ApplyConfig::default();
        let dispatcher =
            ApplyDispatcher::new(&config.workdir, RecordingApplier::default()).unwrap();
        assert!(dispatcher.manifests_dir().is_absolute());
        assert!(dispatcher.manifests_dir().ends_with(MANIFESTS_DIR));
    }
}
