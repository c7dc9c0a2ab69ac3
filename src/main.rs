mod cli;

use clap::Parser;
use cli::{Args, LogFormat};
use promlint::config::{self, CONFIG_ENV_VAR, Config};
use promlint::{Domain, EXIT_FATAL, LintError, MetaLinter, RunResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(args: &Args) -> Result<(), String> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&args.log_level)
            .map_err(|e| format!("invalid log level '{}': {}", args.log_level, e))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    match args.log_format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
    Ok(())
}

fn run(args: &Args) -> Result<RunResult, LintError> {
    let domain: Domain = args.domain.parse()?;

    let env = std::env::var(CONFIG_ENV_VAR).ok();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let source = config::discover(args.config_file.as_deref(), env.as_deref(), &cwd);
    info!("Configuration path: {}", source);

    let config = Config::load(&source)?;
    let linter = MetaLinter::from_config(&config)?;
    linter.lint(domain, &args.patterns)
}

fn main() -> ExitCode {
    // clap exits with 2 on usage errors, which would read as "findings".
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_FATAL)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(message) = init_tracing(&args) {
        eprintln!("{}", message);
        return ExitCode::from(EXIT_FATAL);
    }

    info!("Starting promlint {}...", env!("CARGO_PKG_VERSION"));

    let outcome = run(&args);
    match &outcome {
        Ok(result) => {
            let skipped = result.skipped().count();
            if skipped > 0 {
                info!("Skipped {} empty file(s)", skipped);
            }
            if result.passed() {
                info!("Done without errors");
            } else {
                error!(
                    "Done with errors: {} finding(s) in {} file(s)",
                    result.finding_count(),
                    result.failed_files()
                );
            }
        }
        Err(err) => error!("{}", err),
    }
    ExitCode::from(promlint::exit_code(&outcome))
}
