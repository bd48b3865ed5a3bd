//! samp-runtime-env
//!
//! Loads an SA-MP runtime configuration from a directory, applies `SAMP_*`
//! environment overrides, defaults and validation, and prints the result.

use anyhow::Result;
use clap::Parser;
use samp_runtime_env::cli::{Cli, Command, ShowArgs};
use samp_runtime_env::config::{EnvSnapshot, Runtime, RuntimeLoader, describe, overlay};
use samp_runtime_env::format::{OutputFormat, format_fields, format_report, format_runtime};
use samp_runtime_env::logging::{self, LogTarget};
use tracing::{debug, info};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let target: LogTarget = cli.log.parse()?;
    logging::init(&target, cli.verbose)?;

    // Freeze the environment once so every step sees the same values.
    let env = EnvSnapshot::capture();
    debug!(count = env.len(), "Captured SAMP_* environment variables");

    match cli.command.unwrap_or(Command::Show(ShowArgs::default())) {
        Command::Show(args) => {
            let loader = RuntimeLoader::load_with_env(&cli.dir, &env)?;
            if cli.verbose {
                eprint!("{}", format_report(loader.report()));
            }
            println!(
                "{}",
                format_runtime(loader.runtime(), OutputFormat::from(args.format))?
            );
        }
        Command::Vars(args) => {
            // Show file values with overrides applied, before defaults.
            let mut runtime = Runtime::from_dir(&cli.dir)?;
            overlay(&mut runtime, &env);
            let fields = describe(&mut runtime);
            println!("{}", format_fields(&fields, OutputFormat::from(args.format))?);
        }
        Command::Check => {
            let loader = RuntimeLoader::load_with_env(&cli.dir, &env)?;
            let source = loader
                .config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string());
            info!("Runtime configuration from {} is valid", source);
            print!("{}", format_report(loader.report()));
            println!("ok");
        }
    }

    Ok(())
}
