//! Catalog browsing commands.

use tracing::debug;

use devfinder_core::DetailState;

use crate::cli::{ListArgs, ShowArgs};
use crate::context::Context;
use crate::error::{CliError, Result};

/// Run the list command
pub async fn run_list(ctx: &Context, args: ListArgs) -> Result<()> {
    let catalog = ctx.coordinator.catalog();

    let snapshot = if args.refresh {
        let outcome = catalog.refresh().await;
        debug!(?outcome, "forced catalog refresh");
        catalog.snapshot()
    } else {
        catalog.list().await
    };

    // Nothing cached to fall back on
    if snapshot.is_error && snapshot.devices.is_empty() {
        if let Some(err) = catalog.last_error() {
            return Err(err.into());
        }
    }

    ctx.print(ctx.formatter.format_catalog(&snapshot));
    Ok(())
}

/// Run the show command
pub async fn run_show(ctx: &Context, args: ShowArgs) -> Result<()> {
    let details = ctx.coordinator.details();
    details.fetch(&args.id).await;

    match details.state() {
        DetailState::Resolved { detail, .. } => {
            ctx.print(ctx.formatter.format_detail(&detail));
            Ok(())
        }
        DetailState::Errored { id, error } if error.is_not_found() => Err(CliError::NotFound(id)),
        DetailState::Errored { error, .. } => Err(error.into()),
        state => Err(CliError::Other(format!(
            "Device {} did not resolve (state: {:?})",
            args.id, state
        ))),
    }
}

