use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// Output format for drop reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Note text followed by one line per link
    #[default]
    Text,
    /// JSON document
    Json,
}

#[derive(Parser)]
#[command(name = "gitlink")]
#[command(about = "gitlink - drop git revisions into notes as repository browser links")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/gitlink/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Effective log level: explicit level, then --verbose, then warnings only
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the link text a revision would get
    Resolve {
        /// Repository working directory
        repo: PathBuf,
        /// Revision id (hash, tag or ref)
        treeish: String,
    },

    /// Open the repository browser on a revision, as clicking a link does
    Open {
        /// Repository working directory
        repo: PathBuf,
        /// Revision id (hash, tag or ref)
        treeish: String,
    },

    /// Replay a treeish-list drop into a note and print the result
    Drop {
        /// File holding the drop payload (reads stdin if omitted)
        #[arg(short = 'p', long)]
        payload: Option<PathBuf>,

        /// Initial note text
        #[arg(short = 't', long, default_value = "")]
        text: String,

        /// Drop x coordinate in pixels
        #[arg(short = 'x', long, default_value = "0")]
        x: i32,

        /// Drop y coordinate in pixels
        #[arg(short = 'y', long, default_value = "0")]
        y: i32,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration as TOML
    Config,
}
