//! ecsctl - Compose to ECS conversion and apply
//!
//! This is the main CLI entry point for ecsctl.

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ecsctl::compose::parser::DEFAULT_COMPOSE_FILE;
use ecsctl::compose::{task_definition_from_compose, ConvertConfig};
use ecsctl::error::EcsctlError;
use ecsctl::manifest::applier::DEFAULT_AWS_BIN;
use ecsctl::manifest::ApplyConfig;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// ecsctl - Compose to ECS conversion and apply
#[derive(Parser)]
#[command(name = "ecsctl")]
#[command(version)]
#[command(about = "Convert compose files to ECS manifests and apply them", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply task and service definitions
    Apply {
        /// Path to file to apply. Pass `-` to read from stdin
        #[arg(short, long)]
        file: String,

        #[command(flatten)]
        aws: AwsArgs,
    },

    /// Manage task definitions
    #[command(name = "task-definitions")]
    TaskDefinitions {
        #[command(subcommand)]
        command: TaskDefinitionCommands,
    },
}

#[derive(Subcommand)]
enum TaskDefinitionCommands {
    /// Create a task definition from a compose file
    Create {
        /// Task definition family (defaults to the cluster name)
        family: Option<String>,
        /// Target cluster
        #[arg(short, long)]
        cluster: String,
        /// Compose file
        #[arg(short, long, default_value = DEFAULT_COMPOSE_FILE)]
        file: PathBuf,
        /// Output format when printing
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        output: OutputFormat,
        /// Register the task definition instead of printing it
        #[arg(long, conflicts_with = "output")]
        apply: bool,

        #[command(flatten)]
        aws: AwsArgs,
    },
}

#[derive(Args)]
struct AwsArgs {
    /// AWS CLI executable
    #[arg(long, env = "ECSCTL_AWS_BIN", default_value = DEFAULT_AWS_BIN)]
    aws_bin: String,
    /// Directory that receives the manifests/ folder
    #[arg(long, env = "ECSCTL_WORKDIR", default_value = ".")]
    workdir: PathBuf,
}

impl AwsArgs {
    fn config(&self) -> ApplyConfig {
        ApplyConfig {
            aws_bin: self.aws_bin.clone(),
            workdir: self.workdir.clone(),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

fn main() -> ExitCode {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Initialize logging
    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Apply { file, aws } => {
            let text = read_input(&file)?;
            apply(&text, &aws.config())?;
        }

        Commands::TaskDefinitions { command } => match command {
            TaskDefinitionCommands::Create {
                family,
                cluster,
                file,
                output,
                apply: register,
                aws,
            } => {
                let config = ConvertConfig {
                    compose_file: file,
                    cluster,
                    family,
                };
                let input = task_definition_from_compose(&config)?;

                if register {
                    apply(&input.to_yaml()?, &aws.config())?;
                } else {
                    match output {
                        OutputFormat::Yaml => print!("{}", input.to_yaml()?),
                        OutputFormat::Json => println!("{}", input.to_json()?),
                    }
                }
            }
        },
    }

    Ok(())
}

/// Read the manifest stream from a file, or stdin for `-`
fn read_input(file: &str) -> anyhow::Result<String> {
    if file == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("error while reading stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("error while reading provided file {}", file))
    }
}

/// Run the apply pipeline against the AWS CLI
fn apply(text: &str, config: &ApplyConfig) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        println!("{}", EcsctlError::EmptyInput);
        return Ok(());
    }

    let mut dispatcher = config.dispatcher()?;

    let report = dispatcher
        .apply(text)
        .context("apply stopped; documents before the failure were already applied")?;

    tracing::info!(
        "Applied {} document(s), skipped {}",
        report.applied.len(),
        report.skipped
    );

    Ok(())
}
