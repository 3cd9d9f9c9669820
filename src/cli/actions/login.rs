use crate::cli::{actions::orchestrator, globals::GlobalArgs};
use crate::hotelituss::{Surface, types::LoginForm};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub form: LoginForm,
}

/// Sign in on the site origin and print the handoff redirect.
/// # Errors
/// Returns an error if validation, storage or the backend call fails.
pub async fn execute(args: Args) -> Result<()> {
    let orchestrator = orchestrator(&args.globals, &args.globals.origin)?;
    orchestrator.open(Surface::Login);

    let target = orchestrator.login(&args.form).await?;
    debug!(%target, "login handed off");
    println!("Run `hotelituss open '{target}'` to land on the reservations site.");
    Ok(())
}

/// Clear the session on the selected origin.
/// # Errors
/// Returns an error if the session file cannot be written.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    let orchestrator = orchestrator(globals, &globals.origin)?;
    orchestrator.logout()?;
    Ok(())
}
