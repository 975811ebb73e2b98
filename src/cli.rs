use crate::config::{GeneratorConfig, UserIdentity};
use crate::dependency::DependencyLookup;
use crate::pipeline::{GenerationReport, Pipeline};
use crate::runner::SystemRunner;
use crate::version::VersionSource;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info};
use std::path::PathBuf;

/// Generate Twirp bindings and OpenAPI documentation for protobuf services
#[derive(Parser, Debug)]
#[command(name = "rpc-scaffold")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Project directory (defaults to the current directory)
    #[arg(short = 'p', long = "project", value_name = "DIR", global = true)]
    pub project_path: Option<PathBuf>,

    /// YAML configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run protoc for all services, or for a single named service
    Generate(GenerateArgs),
    /// Write a protobuf service stub to rpc/<APPLICATION>/service.proto
    Stub {
        /// Application name, e.g. "news"
        application: String,
        /// Service name, e.g. "Reader"
        service: String,
        /// Method name, e.g. "Fetch"
        method: String,
    },
    /// List the services found in the project
    List,
    /// Run a program from the tools image with the project mounted
    Tools {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Service to generate (defaults to all discovered services)
    pub service: Option<String>,

    /// Version for the API documentation instead of the nearest git tag
    #[arg(long = "api-version", env = "API_VERSION")]
    pub api_version: Option<String>,

    /// Domain for the production and staging server URLs
    #[arg(long)]
    pub domain: Option<String>,

    /// Tools image to run protoc from
    #[arg(long)]
    pub image: Option<String>,

    /// Go module with shared protobuf definitions
    #[arg(long = "dependency-module", conflicts_with = "no_dependency")]
    pub dependency_module: Option<String>,

    /// Don't look up the shared protobuf module
    #[arg(long = "no-dependency")]
    pub no_dependency: bool,
}

/// Builds the pipeline configuration from the config file, the environment
/// and command line flags, in increasing order of precedence.
pub fn build_config(args: &CliArgs) -> Result<GeneratorConfig> {
    let mut config = match &args.config_path {
        Some(path) => GeneratorConfig::from_yaml_file(path)?,
        None => GeneratorConfig::default(),
    };

    config.project_root = match &args.project_path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    if !config.project_root.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            config.project_root.display()
        );
    }

    if config.user.is_none() {
        config.user = UserIdentity::current();
    }

    if let Command::Generate(generate) = &args.command {
        apply_generate_args(&mut config, generate);
    }

    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn apply_generate_args(config: &mut GeneratorConfig, args: &GenerateArgs) {
    if let Some(version) = args.api_version.as_ref().filter(|v| !v.is_empty()) {
        config.version_override = Some(version.clone());
    }
    if let Some(domain) = &args.domain {
        config.domain = domain.clone();
    }
    if let Some(image) = &args.image {
        config.tools_image = image.clone();
    }
    if let Some(module) = &args.dependency_module {
        config.dependency_module = Some(module.clone());
    }
    if args.no_dependency {
        config.dependency_module = None;
    }
}

/// Run the selected command
pub fn run(args: CliArgs) -> Result<()> {
    let config = build_config(&args)?;
    let runner = SystemRunner;
    let pipeline = Pipeline::new(config, &runner);

    info!("Project path: {}", pipeline.config().project_root.display());

    match args.command {
        Command::Generate(generate) => {
            let report = match generate.service {
                Some(name) => pipeline.generate(&name)?,
                None => pipeline.generate_all()?,
            };
            log_report(&report);
        }
        Command::Stub {
            application,
            service,
            method,
        } => {
            let path = pipeline.stub(&application, &service, &method)?;
            println!("{}", path.display());
        }
        Command::List => {
            for service in pipeline.discover()? {
                let files: Vec<String> = service
                    .proto_files
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                println!("{}\t{}", service.name, files.join(" "));
            }
        }
        Command::Tools { command } => {
            pipeline
                .tools(&command)
                .with_context(|| format!("Failed to run `{}` in tools image", command.join(" ")))?;
        }
    }

    Ok(())
}

fn log_report(report: &GenerationReport) {
    let source = match &report.version.source {
        VersionSource::Override => "override".to_string(),
        VersionSource::Tag => "git tag".to_string(),
        VersionSource::Fallback { reason } => format!("fallback, {}", reason),
    };

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Version: {} ({})", report.version.value, source);
    match &report.dependency {
        DependencyLookup::Found(path) => info!("  - Shared definitions: {}", path.display()),
        DependencyLookup::Unavailable { module, .. } => {
            info!("  - Shared definitions: {} not available", module)
        }
        DependencyLookup::NotConfigured => info!("  - Shared definitions: disabled"),
    }
    info!("  - Services: {}", report.services.join(", "));
}
