//! Clap derive structures for the `catalogary` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use catalogary_api::{MetaUse, Scope, TimeWindow, WarningSource};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// catalogary -- German public warning and air-quality open data
#[derive(Debug, Parser)]
#[command(
    name = "catalogary",
    version,
    about = "Query the NINA warning and UBA air-quality open-data APIs",
    long_about = "Fetch civil-protection warnings from the federal NINA backend and\n\
        air-quality measurements from the Umweltbundesamt, as tables, JSON or YAML.\n\n\
        Both public proxies work without credentials; profiles in the config\n\
        file can point at other deployments.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Profile to use
    #[arg(long, short = 'p', env = "CATALOGARY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Base URL (overrides profile)
    #[arg(long, env = "CATALOGARY_URL", global = true)]
    pub url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "CATALOGARY_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "CATALOGARY_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CATALOGARY_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    pub fn format(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List warnings from a provider feed
    #[command(alias = "ws")]
    Warnings(WarningsArgs),

    /// Fetch one warning's detail or geometry document
    #[command(alias = "w")]
    Warning(WarningArgs),

    /// List measurable air-quality components
    Components(ComponentsArgs),

    /// List measuring stations
    Stations(StationsArgs),

    /// Station and component metadata for a time window
    Meta(MetaArgs),

    /// Measurements of one component at one scope
    Measures(MeasuresArgs),

    /// Build a measurement matrix over every component
    Matrix(MatrixArgs),

    /// Inspect the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── NINA ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WarningsArgs {
    /// Provider feed: mowas, katwarn, dwd, biwapp, police, lhp
    pub source: WarningSource,

    /// Value of the `expand` query parameter
    #[arg(long, conflicts_with = "complete")]
    pub expand: Option<String>,

    /// Join every warning with its detail and geometry documents
    #[arg(long)]
    pub complete: bool,

    /// Comma-separated fields kept from each joined document
    #[arg(long, requires = "complete")]
    pub select: Option<String>,
}

#[derive(Debug, Args)]
pub struct WarningArgs {
    #[command(subcommand)]
    pub command: WarningCommand,
}

#[derive(Debug, Subcommand)]
pub enum WarningCommand {
    /// Full warning document
    Detail {
        /// Warning identifier
        id: String,
        #[arg(long)]
        expand: Option<String>,
    },
    /// GeoJSON geometry of the warning
    Geo {
        /// Warning identifier
        id: String,
        #[arg(long)]
        expand: Option<String>,
    },
}

// ── UBA ──────────────────────────────────────────────────────────────

/// Date/time window shared by the measurement commands.
#[derive(Debug, Args)]
pub struct WindowArgs {
    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub date_from: NaiveDate,

    /// Hour of the first day (0-24)
    #[arg(long)]
    pub time_from: Option<u8>,

    /// Last day, YYYY-MM-DD [default: open end]
    #[arg(long)]
    pub date_to: Option<NaiveDate>,

    /// Hour of the last day (0-24)
    #[arg(long)]
    pub time_to: Option<u8>,
}

impl WindowArgs {
    pub fn window(&self) -> Result<TimeWindow, catalogary_api::Error> {
        let mut window = TimeWindow::starting(self.date_from);
        if let Some(hour) = self.time_from {
            window = window.time_from(hour)?;
        }
        if let Some(date) = self.date_to {
            window = window.until(date)?;
        }
        if let Some(hour) = self.time_to {
            window = window.time_to(hour)?;
        }
        Ok(window)
    }
}

#[derive(Debug, Args)]
pub struct ComponentsArgs {
    /// Language of component names
    #[arg(long)]
    pub lang: Option<String>,
}

#[derive(Debug, Args)]
pub struct StationsArgs {
    /// Value of the `expand` query parameter
    #[arg(long)]
    pub expand: Option<String>,
}

#[derive(Debug, Args)]
pub struct MetaArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Data set: transgression, measure, airquality, annualbalance
    #[arg(long = "use", default_value = "transgression")]
    pub use_: MetaUse,

    #[arg(long)]
    pub lang: Option<String>,
}

#[derive(Debug, Args)]
pub struct MeasuresArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Component id
    #[arg(long, default_value = "1")]
    pub component: String,

    /// Scope code (1-6) or label such as 1SMW
    #[arg(long, default_value = "2")]
    pub scope: Scope,

    /// Restrict to one station
    #[arg(long)]
    pub station: Option<String>,
}

#[derive(Debug, Args)]
pub struct MatrixArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Fetch every scope and key cells by component code and scope label
    #[arg(long)]
    pub full: bool,

    /// Scopes to fetch (repeat or comma-separate) [default: hourly mean, or all with --full]
    #[arg(long, value_delimiter = ',')]
    pub scope: Vec<Scope>,

    /// Restrict to these component ids or codes
    #[arg(long, value_delimiter = ',')]
    pub component: Vec<String>,

    /// Pause between calls in milliseconds [default: from config]
    #[arg(long, conflicts_with = "no_delay")]
    pub delay_ms: Option<u64>,

    /// Issue calls back to back
    #[arg(long)]
    pub no_delay: bool,

    /// Language of the component catalog
    #[arg(long)]
    pub lang: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,
    /// Print the effective configuration with secrets masked
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
