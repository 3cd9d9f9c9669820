use crate::cli::{actions::orchestrator, globals::GlobalArgs};
use crate::hotelituss::{Surface, types::RegistrationForm};
use anyhow::Result;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub form: RegistrationForm,
}

/// Submit the registration form on the site origin.
/// # Errors
/// Returns an error if validation, storage or the backend call fails.
pub async fn execute(args: Args) -> Result<()> {
    let orchestrator = orchestrator(&args.globals, &args.globals.origin)?;
    orchestrator.open(Surface::Registration);

    let surface = orchestrator.register(&args.form).await?;
    debug!(?surface, "registration submitted");

    println!("Run `hotelituss verify --code <CODE>` once the email arrives.");
    Ok(())
}
