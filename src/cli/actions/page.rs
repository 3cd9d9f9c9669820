use crate::cli::{actions::orchestrator, globals::GlobalArgs};
use anyhow::Result;
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub url: Url,
}

/// Load `url` on its own origin, consuming any handoff marker.
/// # Errors
/// Returns an error if the origin's session file cannot be used.
pub fn execute(args: &Args) -> Result<()> {
    let orchestrator = orchestrator(&args.globals, &args.url)?;
    let page = orchestrator.load_page(&args.url)?;
    debug!(url = %page.url, show_login = page.show_login, "page loaded");
    Ok(())
}

/// Render the navigation state of the selected origin.
/// # Errors
/// Returns an error if the session file cannot be read.
pub fn status(globals: &GlobalArgs) -> Result<()> {
    let orchestrator = orchestrator(globals, &globals.origin)?;
    orchestrator.load_page(&globals.origin)?;
    Ok(())
}
