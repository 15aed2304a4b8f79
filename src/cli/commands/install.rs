//! Install and activate commands - drive the generation lifecycle

use crate::cache::LifecycleState;
use crate::cli::app::App;
use crate::cli::args::InstallArgs;
use crate::error::MediResult;
use crate::ui::{self, TaskSpinner, UiContext};

/// Execute the install command
pub async fn execute(args: InstallArgs, app: &mut App) -> MediResult<()> {
    let ctx = UiContext::detect();
    let tag = app.lifecycle.tag();

    ui::intro(&ctx, &format!("Installing {}", tag));

    match app.lifecycle.state() {
        LifecycleState::Active => {
            ui::outro_success(&ctx, &format!("{} is already active", tag));
            return Ok(());
        }
        LifecycleState::Waiting => {
            ui::step_info(&ctx, &format!("{} already installed", tag));
        }
        _ => install(&ctx, app).await?,
    }

    if args.wait || !app.config.cache.skip_waiting {
        ui::outro_warn(
            &ctx,
            &format!("{} is waiting. Run: medisketch activate", tag),
        );
        return Ok(());
    }

    let report = app.lifecycle.skip_waiting().await?;
    for old in &report.deleted {
        ui::step_info(&ctx, &format!("Deleted old generation {}", old));
    }
    ui::outro_success(&ctx, &format!("{} active", report.tag));
    Ok(())
}

/// Execute the activate command
pub async fn activate(app: &mut App) -> MediResult<()> {
    let ctx = UiContext::detect();
    let tag = app.lifecycle.tag();

    if app.lifecycle.state() == LifecycleState::Active {
        ui::outro_success(&ctx, &format!("{} is already active", tag));
        return Ok(());
    }

    let report = app.lifecycle.activate().await?;
    for old in &report.deleted {
        ui::step_info(&ctx, &format!("Deleted old generation {}", old));
    }
    ui::outro_success(&ctx, &format!("{} active", report.tag));
    Ok(())
}

async fn install(ctx: &UiContext, app: &mut App) -> MediResult<()> {
    let total = app.config.cache.precache.len();
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("Precaching {} assets", total));

    let report = match app.lifecycle.install().await {
        Ok(report) => report,
        Err(e) => {
            spinner.stop_error("Install failed");
            return Err(e);
        }
    };

    spinner.stop(&format!("Cached {} of {} assets", report.cached.len(), total));
    for key in &report.cached {
        ui::step_ok(ctx, key.as_str());
    }
    for (key, reason) in &report.skipped {
        ui::step_warn_hint(ctx, &format!("Skipped {}", key), reason);
    }
    if !report.skipped.is_empty() {
        ui::remark(ctx, "Skipped assets are fetched from the network on first use");
    }

    Ok(())
}
