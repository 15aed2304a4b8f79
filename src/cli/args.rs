//! CLI argument definitions using clap derive

use crate::content::ContentKind;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// MediSketch - offline study content
///
/// Installs the app shell into a versioned offline cache and loads
/// lectures, quizzes and past exams through it.
#[derive(Parser, Debug)]
#[command(name = "medisketch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "MEDISKETCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Content origin: a base URL or a local public/ directory
    #[arg(long, global = true, env = "MEDISKETCH_ORIGIN")]
    pub origin: Option<String>,

    /// Behave as if the network were unreachable
    #[arg(long, global = true)]
    pub offline: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install this build's cache generation and activate it
    Install(InstallArgs),

    /// Activate an installed, waiting generation
    Activate,

    /// Route one request through the offline layer
    Fetch(FetchArgs),

    /// Load a lecture, quiz or exam
    Load(LoadArgs),

    /// List a subject's lectures, quizzes or exams
    List(ListArgs),

    /// Inspect or clear the offline cache
    Cache(CacheArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Leave the new generation waiting instead of activating it
    #[arg(long)]
    pub wait: bool,
}

/// Arguments for the fetch command
#[derive(Parser, Debug)]
pub struct FetchArgs {
    /// Path or URL to request
    pub path: String,

    /// Treat the request as a top-level navigation
    #[arg(short, long)]
    pub document: bool,

    /// Write the response body to stdout instead of a summary
    #[arg(long)]
    pub body: bool,
}

/// Arguments for the load command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Year identifier (e.g. DCEM2)
    pub year: String,

    /// Subject identifier (e.g. Cardiologie)
    pub subject: String,

    /// Content kind: lecture, quiz or exam
    #[arg(value_parser = parse_kind)]
    pub kind: ContentKind,

    /// Document file name (e.g. hta.json)
    pub file: String,

    /// Give up after this many milliseconds (default: from config)
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: DocumentFormat,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Year identifier
    pub year: String,

    /// Subject identifier
    pub subject: String,

    /// Content kind: lecture, quiz or exam
    #[arg(value_parser = parse_kind)]
    pub kind: ContentKind,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., cache.version)
        key: String,
        /// Value to set (comma-separated for lists)
        value: String,
    },
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List cache generations
    List {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Delete every cache generation
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}

/// Output format for a single document
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DocumentFormat {
    /// Readable outline
    Text,
    /// The decoded document as JSON
    Json,
}

/// Parse a content kind, accepting the French labels too
fn parse_kind(s: &str) -> Result<ContentKind, String> {
    s.parse::<ContentKind>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind_accepts_labels() {
        assert_eq!(parse_kind("qcm").unwrap(), ContentKind::Quiz);
        assert_eq!(parse_kind("lecture").unwrap(), ContentKind::Lecture);
        assert!(parse_kind("podcast").is_err());
    }

    #[test]
    fn cli_parses_install() {
        let cli = Cli::parse_from(["medisketch", "install"]);
        match cli.command {
            Commands::Install(args) => assert!(!args.wait),
            _ => panic!("expected Install command"),
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "medisketch",
            "fetch",
            "/planner",
            "--document",
            "--offline",
            "--origin",
            "./public",
            "-vv",
        ]);
        assert!(cli.offline);
        assert_eq!(cli.origin.as_deref(), Some("./public"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Fetch(args) => {
                assert_eq!(args.path, "/planner");
                assert!(args.document);
                assert!(!args.body);
            }
            _ => panic!("expected Fetch command"),
        }
    }

    #[test]
    fn cli_parses_load() {
        let cli = Cli::parse_from([
            "medisketch",
            "load",
            "DCEM2",
            "Cardiologie",
            "lecture",
            "hta.json",
            "--timeout-ms",
            "250",
            "--format",
            "json",
        ]);
        match cli.command {
            Commands::Load(args) => {
                assert_eq!(args.kind, ContentKind::Lecture);
                assert_eq!(args.file, "hta.json");
                assert_eq!(args.timeout_ms, Some(250));
                assert!(matches!(args.format, DocumentFormat::Json));
            }
            _ => panic!("expected Load command"),
        }
    }

    #[test]
    fn cli_parses_list_with_default_format() {
        let cli = Cli::parse_from(["medisketch", "list", "PCEM1", "Anatomie", "annales"]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.kind, ContentKind::Exam);
                assert!(matches!(args.format, OutputFormat::Table));
            }
            _ => panic!("expected List command"),
        }
    }

    #[test]
    fn cli_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["medisketch", "list", "PCEM1", "Anatomie", "video"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parses_cache_clear() {
        let cli = Cli::parse_from(["medisketch", "cache", "clear", "--yes"]);
        match cli.command {
            Commands::Cache(CacheArgs {
                action: CacheAction::Clear { yes },
            }) => assert!(yes),
            _ => panic!("expected Cache Clear command"),
        }
    }

    #[test]
    fn cli_parses_config_default_action() {
        let cli = Cli::parse_from(["medisketch", "config"]);
        match cli.command {
            Commands::Config(args) => assert!(args.action.is_none()),
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn cli_parses_activate() {
        let cli = Cli::parse_from(["medisketch", "activate"]);
        assert!(matches!(cli.command, Commands::Activate));
    }
}
