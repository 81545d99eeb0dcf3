//! JobLlama CLI - manage résumés, cover letters, job queries and job flows

mod commands;
mod config;
mod logging;
mod state_dir;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use commands::{Commands, Context};
use jobllama_http::ClientError;
use state_dir::StateDir;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{Level, error, info};

#[derive(Parser)]
#[command(name = "jobllama")]
#[command(about = "Command line client for the JobLlama API")]
#[command(version)]
struct Cli {
    /// Set logging level
    #[arg(short = 'l', long, global = true, default_value = "warn")]
    log_level: LogLevel,

    /// Configuration file (defaults to <config dir>/jobllama.toml)
    #[arg(short = 'c', long, global = true, env = "JOBLLAMA_CONFIG")]
    config: Option<PathBuf>,

    /// State directory for config, session cookies and logs
    #[arg(short = 'd', long, global = true, env = "JOBLLAMA_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Timeout for the whole command in seconds (0 = no timeout)
    #[arg(short = 't', long, global = true, default_value = "60")]
    timeout: u64,

    /// Disable file logging (only log to stderr)
    #[arg(long, global = true)]
    no_file_log: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let state = match cli.state_dir {
        Some(dir) => StateDir::with_override(dir),
        None => StateDir::new(),
    };
    let log_file = (!cli.no_file_log).then(|| state.log_path());
    logging::init_logging(cli.log_level.into(), log_file)?;

    info!("Starting JobLlama CLI");

    let context = match Context::load(state, cli.config) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to load configuration: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    };

    let outcome = if cli.timeout == 0 {
        cli.command.execute(&context).await
    } else {
        let timeout_duration = Duration::from_secs(cli.timeout);
        match tokio::time::timeout(timeout_duration, cli.command.execute(&context)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                error!("Command timed out after {} seconds", cli.timeout);
                eprintln!("error: timed out after {} seconds", cli.timeout);
                std::process::exit(1);
            }
        }
    };

    match outcome {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {e:#}");
            let expired = e
                .downcast_ref::<ClientError>()
                .is_some_and(ClientError::is_session_expired);
            if expired {
                eprintln!("session expired, sign in again with `jobllama auth signin`");
            } else {
                eprintln!("error: {e:#}");
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

#[derive(Clone, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        match log_level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
