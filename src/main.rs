//! MediSketch - offline content delivery for medical study notes
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use medisketch::cli::{commands, App, Cli, Commands};
use medisketch::config::schema::GeneralConfig;
use medisketch::config::ConfigManager;
use medisketch::error::MediResult;
use medisketch::origin::OriginKind;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> MediResult<()> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config.general);
    debug!("Loaded config from {}", manager.path().display());

    let origin = OriginKind::select(&config.origin, cli.origin.as_deref(), cli.offline);

    match cli.command {
        Commands::Config(args) => commands::config(args, &config, &manager).await,
        Commands::Cache(args) => commands::cache(args, &config).await,
        Commands::Install(args) => {
            commands::install(args, &mut App::open(&config, &origin).await?).await
        }
        Commands::Activate => commands::activate(&mut App::open(&config, &origin).await?).await,
        Commands::Fetch(args) => commands::fetch(args, &App::open(&config, &origin).await?).await,
        Commands::Load(args) => commands::load(args, &App::open(&config, &origin).await?).await,
        Commands::List(args) => commands::list(args, &App::open(&config, &origin).await?).await,
    }
}

/// Logs go to stderr: 0 = warn, 1 = info, 2+ = debug
fn init_logging(verbose: u8, general: &GeneralConfig) {
    let level = match verbose.max(u8::from(general.verbose)) {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("medisketch={}", level)))
        .with_target(false)
        .with_writer(std::io::stderr);

    if general.log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
