//! CLI argument parsing
//!
//! # Usage
//!
//! ```bash
//! difundir init --output policy.yaml
//! difundir validate policy.yaml --detailed
//! difundir info policy.yaml --format json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Difundir: Diffusion Policy Configuration
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "difundir")]
#[command(version)]
#[command(about = "Declarative configuration for diffusion-based robot-control policies")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Write the default configuration as YAML
    Init(InitArgs),

    /// Validate a configuration file
    Validate(ValidateArgs),

    /// Display the fully resolved configuration
    Info(InfoArgs),
}

/// Arguments for the init command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InitArgs {
    /// Output path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct ValidateArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Show a configuration summary after validation
    #[arg(short, long)]
    pub detailed: bool,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Arguments for the info command
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct InfoArgs {
    /// Path to YAML configuration file
    #[arg(value_name = "CONFIG")]
    pub config: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

/// Field overrides applied on top of the loaded configuration
#[derive(Parser, Debug, Clone, PartialEq)]
pub struct OverrideArgs {
    /// Override the prediction horizon
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Override the batch size
    #[arg(short, long)]
    pub batch_size: Option<usize>,

    /// Override the learning rate
    #[arg(short, long)]
    pub lr: Option<f32>,

    /// Override the vision backbone
    #[arg(long)]
    pub backbone: Option<String>,
}

/// Output format for the info command
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            _ => Err(format!(
                "Unknown output format: {}. Valid formats: text, json, yaml",
                s
            )),
        }
    }
}

/// Parse CLI arguments from a string slice (for testing)
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Apply command-line overrides to a configuration
pub fn apply_overrides(config: &mut super::DiffusionPolicyConfig, args: &OverrideArgs) {
    if let Some(horizon) = args.horizon {
        config.window.horizon = horizon;
    }
    if let Some(batch_size) = args.batch_size {
        config.training.batch_size = batch_size;
    }
    if let Some(lr) = args.lr {
        config.optimizer.lr = lr;
    }
    if let Some(backbone) = &args.backbone {
        config.vision.backbone = backbone.clone();
    }
}
