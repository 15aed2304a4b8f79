//! Cache command - inspect and clear offline cache generations

use crate::cache::{format_bytes, CacheStore};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::{Config, ConfigManager};
use crate::error::MediResult;
use crate::ui::{self, UiContext};
use console::style;
use serde::Serialize;

/// Summary of one generation on disk
#[derive(Debug, Clone, Serialize)]
struct GenerationRow {
    tag: String,
    entries: usize,
    total_bytes: u64,
    current: bool,
}

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> MediResult<()> {
    let store = CacheStore::new(ConfigManager::cache_dir(config));

    match args.action {
        CacheAction::List { format } => list_generations(&store, config, format).await,
        CacheAction::Clear { yes } => {
            let ctx = UiContext::detect().with_auto_yes(yes);
            clear_generations(&ctx, &store).await
        }
    }
}

async fn list_generations(
    store: &CacheStore,
    config: &Config,
    format: OutputFormat,
) -> MediResult<()> {
    let current = config.cache.generation_tag();
    let mut rows = Vec::new();
    for tag in store.list_generations().await? {
        let stats = store.generation_stats(&tag).await?;
        rows.push(GenerationRow {
            current: tag == current,
            tag,
            entries: stats.entries,
            total_bytes: stats.total_bytes,
        });
    }

    match format {
        OutputFormat::Table => print_table(store, &rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Plain => {
            for row in &rows {
                println!("{}", row.tag);
            }
        }
    }

    Ok(())
}

fn print_table(store: &CacheStore, rows: &[GenerationRow]) {
    if rows.is_empty() {
        println!("No cache generations in {}", store.root().display());
        return;
    }

    println!(
        "{:<30} {:<10} {:<12} {:<10}",
        "GENERATION", "ENTRIES", "SIZE", "STATUS"
    );
    println!("{}", "-".repeat(62));

    for row in rows {
        let status = if row.current {
            style("current").green().to_string()
        } else {
            style("stale").yellow().to_string()
        };
        println!(
            "{:<30} {:<10} {:<12} {:<10}",
            row.tag,
            row.entries,
            format_bytes(row.total_bytes),
            status
        );
    }

    println!();
    println!("Total: {} generation(s)", rows.len());
}

async fn clear_generations(ctx: &UiContext, store: &CacheStore) -> MediResult<()> {
    let count = store.list_generations().await?.len();

    if count == 0 {
        ui::step_info(ctx, "Cache is already empty");
        return Ok(());
    }

    let prompt = format!("Delete {} cache generation(s)?", count);
    if !ui::confirm(ctx, &prompt, false).await? {
        ui::step_warn_hint(ctx, "Nothing deleted", "Pass --yes to skip the prompt");
        return Ok(());
    }

    let removed = store.clear().await?;
    ui::step_ok(ctx, &format!("Deleted {} generation(s)", removed));
    ui::remark(ctx, "Run `medisketch install` to restore offline access");
    Ok(())
}
