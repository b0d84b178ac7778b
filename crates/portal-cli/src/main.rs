//! Entry portal command-line client.

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use portal_cli::logging::{LogConfig, LogFormat, init_logging};
use portal_cli::settings::PortalConfig;
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{Runtime, run_login, run_logout, run_request, run_roster, run_tunnel, run_whoami};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    match run(&cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<bool> {
    if let Command::Roster(command) = &cli.command {
        return run_roster(command);
    }

    let mut config = PortalConfig::load(cli.config.as_deref());
    config.http = config.http.with_base_url_override(cli.base_url.clone());
    let runtime = Runtime::open(config)?;

    match &cli.command {
        Command::Login(args) => run_login(&runtime, args).await,
        Command::Logout(args) => {
            run_logout(&runtime, args).await;
            Ok(true)
        }
        Command::Whoami => Ok(run_whoami(&runtime)),
        Command::Request(args) => run_request(&runtime, args).await,
        Command::Tunnel(args) => Ok(run_tunnel(&runtime, args).await),
        Command::Roster(command) => run_roster(command),
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
