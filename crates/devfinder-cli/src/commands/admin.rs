//! Admin commands: device mutations and analytics.

use std::path::Path;

use devfinder_core::types::DevicePayload;

use crate::cli::{CreateArgs, DeleteArgs, ShowArgs, UpdateArgs};
use crate::commands::catalog::run_show;
use crate::context::Context;
use crate::error::{CliError, Result};

/// Read a device payload (title, images, specs, price) from a JSON file.
pub async fn read_payload(path: &Path) -> Result<DevicePayload> {
    let content = tokio::fs::read_to_string(path).await?;
    let payload: DevicePayload = serde_json::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("{}: invalid device payload: {}", path.display(), e))
    })?;

    if payload.title.trim().is_empty() {
        return Err(CliError::InvalidArgument(format!(
            "{}: device title must not be empty",
            path.display()
        )));
    }

    Ok(payload)
}

/// Run the create command
pub async fn run_create(ctx: &Context, args: CreateArgs) -> Result<()> {
    let payload = read_payload(&args.file).await?;
    let created = ctx.coordinator.mutations().create(&payload).await?;

    if !ctx.json {
        ctx.print(ctx.formatter.format_message(&format!("Created device {}", created.id())));
    }
    ctx.print(ctx.formatter.format_detail(&created));
    Ok(())
}

/// Run the update command
pub async fn run_update(ctx: &Context, args: UpdateArgs) -> Result<()> {
    let payload = read_payload(&args.file).await?;
    let updated = ctx.coordinator.mutations().update(&args.id, &payload).await?;

    if !ctx.json {
        ctx.print(ctx.formatter.format_message(&format!("Updated device {}", args.id)));
    }
    ctx.print(ctx.formatter.format_detail(&updated));
    Ok(())
}

/// Run the delete command
pub async fn run_delete(ctx: &Context, args: DeleteArgs) -> Result<()> {
    if args.show {
        run_show(ctx, ShowArgs { id: args.id.clone() }).await?;
    }

    ctx.coordinator.mutations().remove(&args.id).await?;
    ctx.print(ctx.formatter.format_message(&format!("Deleted device {}", args.id)));
    Ok(())
}

/// Run the analytics command
pub async fn run_analytics(ctx: &Context) -> Result<()> {
    let analytics = ctx.coordinator.analytics().await?;
    ctx.print(ctx.formatter.format_value(&analytics));
    Ok(())
}
