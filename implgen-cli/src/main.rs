//! implgen command-line front-end.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use implgen::prelude::*;
use tracing_subscriber::EnvFilter;

/// Generate Java implementations of interfaces and abstract classes.
#[derive(Debug, Parser)]
#[command(name = "implgen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    options: Options,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Implement types from the built-in standard library index.
    Stdlib {
        /// Fully-qualified type names.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Implement types described under a descriptor directory.
    Dir {
        /// Root of the descriptor tree (`<pkg>/<Simple>.xml`).
        #[arg(short, long, env = "IMPLGEN_SOURCE")]
        source: PathBuf,
        /// Fully-qualified type names.
        #[arg(required = true)]
        names: Vec<String>,
    },
}

#[derive(Debug, Args)]
struct Options {
    /// Root of the generated source tree.
    #[arg(short, long, global = true, default_value = ".", env = "IMPLGEN_OUTPUT")]
    output: PathBuf,

    /// Suffix appended to generated type names.
    #[arg(long, global = true, default_value = "Impl")]
    suffix: String,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let implementor = Implementor::builder()
        .output_dir(&cli.options.output)
        .type_suffix(&cli.options.suffix)
        .build();

    let (resolver, names) = match cli.command {
        Command::Stdlib { names } => (
            Resolver::standard_library().context("loading the standard library index")?,
            names,
        ),
        Command::Dir { source, names } => (
            Resolver::from_directory(&source)
                .with_context(|| format!("opening descriptor directory {}", source.display()))?,
            names,
        ),
    };

    for name in &names {
        let outcome = implementor
            .generate(&resolver, name)
            .with_context(|| format!("generating an implementation of {name}"))?;
        println!("{} {}", outcome.type_name, outcome.path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.options.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("implgen: {e:#}");
            ExitCode::FAILURE
        }
    }
}
