use crate::generator::generate;
use crate::serializer::{resolve_output_writer, JsonSink, Sink, YamlSink};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// OpenAPI from doc comments - Build an OpenAPI document from directives in Rust doc comments
#[derive(Parser, Debug)]
#[command(name = "openapi-from-doc")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Root of the source tree to scan
    #[arg(value_name = "PROJECT_PATH", default_value = ".")]
    pub project_path: PathBuf,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (`-` or absent writes to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Validate and log already-parsed arguments
///
/// A relative project path is resolved against the working directory.
pub fn parse_args_from_parsed(mut args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.project_path.is_relative() {
        let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
        args.project_path = cwd.join(&args.project_path);
    }

    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    match &args.output_path {
        Some(output) if output.to_str() != Some("-") => info!("Output file: {}", output.display()),
        _ => info!("Output: stdout"),
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let document = generate(&args.project_path).with_context(|| {
        format!(
            "Failed to generate OpenAPI document from {}",
            args.project_path.display()
        )
    })?;

    let writer = resolve_output_writer(args.output_path.as_deref())
        .context("Failed to open output destination")?;

    info!("Serializing to {:?} format...", args.output_format);
    let written = match args.output_format {
        OutputFormat::Json => JsonSink::new(writer).write(&document),
        OutputFormat::Yaml => YamlSink::new(writer).write(&document),
    };
    written.context("Failed to write OpenAPI document")?;

    info!("Generation complete!");
    Ok(())
}
