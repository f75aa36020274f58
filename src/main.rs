//! openapi-from-doc - Command-line tool for building OpenAPI documents from doc comments.
//!
//! The tool walks a Rust source tree, picks up `gopenapi:` directives written in doc
//! comments, and prints the assembled OpenAPI 3.0 document.
//!
//! # Usage
//!
//! ```bash
//! openapi-from-doc [OPTIONS] [PROJECT_PATH]
//! ```
//!
//! # Examples
//!
//! Print JSON for the current directory:
//! ```bash
//! openapi-from-doc
//! ```
//!
//! Write YAML to a file:
//! ```bash
//! openapi-from-doc ./my-api-project -f yaml -o docs/openapi.yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-from-doc ./my-api-project -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_from_doc::cli;

fn main() -> Result<()> {
    // The verbose flag decides the log level, so parse before initializing the logger
    let args = cli::CliArgs::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    info!("openapi-from-doc starting...");

    let args = cli::parse_args_from_parsed(args)?;
    cli::run(args)?;

    info!("OpenAPI document generation completed successfully");

    Ok(())
}
