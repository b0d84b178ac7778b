//! CLI argument definitions for the portal client.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use portal_roster::{Roster, Template};

#[derive(Parser)]
#[command(
    name = "portal",
    version,
    about = "Entry portal client - log in, call the backend and work with rosters",
    long_about = "Command-line client for the school arts entry portal.\n\n\
                  Keeps a login session on disk, sends authenticated requests to the\n\
                  backend and imports, checks and exports roster spreadsheets (CSV)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: the platform config folder).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Backend address, overriding config and environment.
    #[arg(long = "base-url", value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Log in and store the session.
    Login(LoginArgs),

    /// Drop the stored session.
    Logout(LogoutArgs),

    /// Show the stored session and the role's menu.
    Whoami,

    /// Send one request to the backend and print the envelope.
    Request(RequestArgs),

    /// Check that the backend address is reachable.
    Tunnel(TunnelArgs),

    /// Roster column layouts, CSV viewing and export.
    #[command(subcommand)]
    Roster(RosterCommand),
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(value_name = "ACCOUNT")]
    pub account: String,

    /// Password; read from stdin when omitted.
    #[arg(long = "password", short = 'p')]
    pub password: Option<String>,

    /// Keep the session for 7 days instead of 2 hours.
    #[arg(long = "remember")]
    pub remember: bool,
}

#[derive(Args)]
pub struct LogoutArgs {
    /// Only clear the local session; do not notify the server.
    #[arg(long = "local")]
    pub local: bool,
}

#[derive(Args)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE).
    #[arg(value_name = "METHOD")]
    pub method: String,

    /// Path relative to the base address, e.g. /artwork/applications/.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Query parameter, repeatable.
    #[arg(long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// JSON request body.
    #[arg(long = "data", short = 'd', value_name = "JSON")]
    pub data: Option<String>,

    /// Send without the Authorization header.
    #[arg(long = "no-auth")]
    pub no_auth: bool,

    /// Request deadline in milliseconds.
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,
}

#[derive(Args)]
pub struct TunnelArgs {
    /// Path to probe.
    #[arg(long = "path", default_value = "/")]
    pub path: String,
}

#[derive(Subcommand)]
pub enum RosterCommand {
    /// List a roster's columns.
    Columns {
        #[arg(value_name = "ROSTER", value_parser = parse_roster)]
        roster: Roster,
    },

    /// Import a CSV, check it and show one page.
    View(RosterViewArgs),

    /// Import a CSV and write the filtered, sorted rows back out.
    Export(RosterExportArgs),

    /// Write an empty import template.
    Template {
        #[arg(value_enum)]
        kind: TemplateArg,

        /// Output file (default: the template's own file name).
        #[arg(long = "output", short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct RosterQueryArgs {
    #[arg(value_name = "ROSTER", value_parser = parse_roster)]
    pub roster: Roster,

    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// Keep rows whose cells contain this text.
    #[arg(long = "search", short = 's')]
    pub search: Option<String>,

    /// Column key to sort by.
    #[arg(long = "sort", value_name = "KEY")]
    pub sort: Option<String>,

    /// Sort descending.
    #[arg(long = "desc", requires = "sort")]
    pub desc: bool,
}

#[derive(Args)]
pub struct RosterViewArgs {
    #[command(flatten)]
    pub query: RosterQueryArgs,

    #[arg(long = "page", default_value_t = 1)]
    pub page: usize,

    #[arg(long = "page-size", default_value_t = portal_table::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Args)]
pub struct RosterExportArgs {
    #[command(flatten)]
    pub query: RosterQueryArgs,

    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TemplateArg {
    Student,
    Teacher,
}

impl TemplateArg {
    pub fn template(self) -> Template {
        match self {
            Self::Student => Template::StudentInfo,
            Self::Teacher => Template::TeacherInfo,
        }
    }
}

fn parse_roster(value: &str) -> Result<Roster, String> {
    value.parse::<Roster>().map_err(|_| {
        let names: Vec<&str> = Roster::ALL.into_iter().map(Roster::name).collect();
        format!("expected one of: {}", names.join(", "))
    })
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
