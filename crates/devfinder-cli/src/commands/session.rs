//! Search session inspection.

use devfinder_core::TeardownSignal;

use crate::context::Context;
use crate::error::Result;

/// Run the session show command
pub async fn run_session_show(ctx: &Context) -> Result<()> {
    let session = ctx.coordinator.session().snapshot().await;
    ctx.print(ctx.formatter.format_session(&session));
    Ok(())
}

/// Run the session clear command
pub async fn run_session_clear(ctx: &Context) -> Result<()> {
    ctx.coordinator.teardown(TeardownSignal::Unload).await;
    ctx.print(ctx.formatter.format_message("Search session cleared"));
    Ok(())
}
