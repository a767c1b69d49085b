//! rlockcheck CLI
//!
//! Reports read locks acquired again before they are released.
//!
//! # Usage
//!
//! ```bash
//! # Check a module
//! rlockcheck ./...
//!
//! # JSON output with a configuration file
//! rlockcheck --config rlockcheck.yaml --format json ./pkg
//! ```
//!
//! Exit status: 0 when clean, 1 when violations are found, 2 on errors.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rlockcheck::config::{AnalyzerConfig, OutputFormat, Preset, SearchConfig, Validatable};
use rlockcheck::features::parsing::discover_go_files;
use rlockcheck::{check_program, renderer_for, GoFrontend};

#[derive(Parser)]
#[command(name = "rlockcheck")]
#[command(about = "Find recursive or nested read-lock acquisition in Go code", long_about = None)]
struct Cli {
    /// Files or directories to check (`dir/...` is accepted)
    #[arg(default_value = ".")]
    paths: Vec<String>,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long)]
    format: Option<String>,

    /// Preset: conservative or balanced
    #[arg(long)]
    preset: Option<String>,

    /// Also check `_test.go` files
    #[arg(long)]
    include_tests: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("rlockcheck: {:#}", err);
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Number of violations found
fn run(cli: Cli) -> Result<usize> {
    let config = load_config(&cli)?;

    let roots: Vec<PathBuf> = cli
        .paths
        .iter()
        .map(|p| match p.strip_suffix("/...").unwrap_or(p) {
            "..." => ".",
            root => root,
        })
        .map(PathBuf::from)
        .collect();
    let files = discover_go_files(&roots, config.report.include_tests)
        .context("cannot collect Go sources")?;

    let mut frontend = GoFrontend::new();
    for file in &files {
        frontend
            .add_file(file)
            .with_context(|| format!("cannot read {}", file.display()))?;
    }
    let parsed = frontend.build().context("cannot parse Go sources")?;
    let violations = check_program(&parsed, &config);
    info!(files = files.len(), violations = violations.len(), "check finished");

    let output = renderer_for(config.report.format).render(&violations)?;
    print!("{}", output);
    Ok(violations.len())
}

/// Preset or file, then command-line overrides
fn load_config(cli: &Cli) -> Result<AnalyzerConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::from_yaml_file(path)
            .with_context(|| format!("cannot load {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    if let Some(preset) = &cli.preset {
        let preset = Preset::from_str(preset)?;
        config.preset = preset;
        config.search = SearchConfig::for_preset(preset);
    }
    if let Some(format) = &cli.format {
        config.report.format = OutputFormat::from_str(format)?;
    }
    if cli.include_tests {
        config.report.include_tests = true;
    }
    config.validate()?;
    Ok(config)
}
