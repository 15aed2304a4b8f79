//! Fetch command - route a single request through the runtime

use crate::cache::format_bytes;
use crate::cli::app::App;
use crate::cli::args::FetchArgs;
use crate::error::{MediError, MediResult};
use crate::request::Request;
use crate::ui::{self, UiContext};
use std::io::Write;

/// Execute the fetch command
pub async fn execute(args: FetchArgs, app: &App) -> MediResult<()> {
    let request = if args.document {
        Request::document(args.path.as_str())
    } else {
        Request::subresource(args.path.as_str())
    };

    let response = app.runtime.fetch(&request).await?;

    if args.body {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(&response.body)
            .and_then(|()| stdout.flush())
            .map_err(|e| MediError::io("writing response body", e))?;
        return Ok(());
    }

    let ctx = UiContext::detect();
    ui::key_value(&ctx, "key", request.key.as_str());
    ui::key_value(&ctx, "destination", &request.destination.to_string());
    ui::key_value(&ctx, "status", &response.status.to_string());
    ui::key_value(&ctx, "source", &ui::source_label(response.source));
    ui::key_value(
        &ctx,
        "content-type",
        response.content_type.as_deref().unwrap_or("-"),
    );
    ui::key_value(&ctx, "size", &format_bytes(response.body.len() as u64));

    if !response.is_success() {
        ui::step_warn(&ctx, &format!("Origin answered HTTP {}", response.status));
    }

    Ok(())
}
