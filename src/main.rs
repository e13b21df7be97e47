//! Entry point for the string table compiler.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use lang_strtab::CompileError;
use lang_strtab::config::{
    ConfigError,
    load_settings,
};
use tracing_subscriber::EnvFilter;

/// Compiles `lang/*.properties` into a C string table.
#[derive(Parser, Debug)]
#[command(name = "lang-strtab", version, about)]
struct Args {
    /// Generated C source path
    source: PathBuf,

    /// Generated C header path
    header: PathBuf,

    /// Root holding the locale directory and the optional `.lang-strtab.json`
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Reference locale, overriding the settings file
    #[arg(long)]
    reference: Option<String>,

    /// Transform table relative to the root, overriding the settings file.
    /// Defaults to `transform.tsv` in the locale directory when present
    #[arg(long)]
    transform: Option<PathBuf>,
}

/// Applies command line overrides to the loaded settings and runs the compiler.
fn execute(args: Args) -> Result<(), CompileError> {
    let mut settings = load_settings(&args.root)?;
    if let Some(reference) = args.reference {
        settings.reference_locale = reference;
    }
    if let Some(transform) = args.transform {
        settings.transform_table = Some(transform);
    }
    settings.validate().map_err(ConfigError::ValidationErrors)?;

    lang_strtab::run(&settings, &args.root, &args.source, &args.header)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match execute(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
