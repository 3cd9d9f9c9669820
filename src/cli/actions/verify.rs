use crate::cli::{actions::orchestrator, globals::GlobalArgs};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub code: String,
}

#[derive(Debug)]
pub struct ResendArgs {
    pub globals: GlobalArgs,
    pub wait: bool,
}

/// Fill the six code cells and submit them.
/// # Errors
/// Returns an error if the code is incomplete, nothing is pending, or the
/// backend rejects it.
pub async fn execute(args: Args) -> Result<()> {
    let orchestrator = orchestrator(&args.globals, &args.globals.origin)?;
    let verification = orchestrator.verification();

    verification.enter();
    verification.fill(args.code.trim());

    let target = verification.submit().await?;
    debug!(%target, "verification complete");
    Ok(())
}

/// Request a new code, then render the countdown unless told not to wait.
/// # Errors
/// Returns an error if nothing is pending or the backend call fails.
pub async fn resend(args: ResendArgs) -> Result<()> {
    let orchestrator = orchestrator(&args.globals, &args.globals.origin)?;
    let verification = orchestrator.verification();

    let result = verification.resend().await;
    if args.wait && verification.cooldown().is_locked() {
        verification.cooldown().finished().await;
    }
    result?;
    Ok(())
}
