pub mod login;
pub mod page;
pub mod register;
pub mod terminal;
pub mod verify;

mod run;

use crate::cli::globals::GlobalArgs;
use crate::hotelituss::{FileStore, HttpGateway, Orchestrator};
use anyhow::Result;
use std::sync::Arc;
use url::Url;

#[derive(Debug)]
pub enum Action {
    Register(register::Args),
    Verify(verify::Args),
    Resend(verify::ResendArgs),
    Login(login::Args),
    Logout(GlobalArgs),
    Open(page::Args),
    Status(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Wires the workflow for one origin: its session file, the HTTP gateway and
/// the terminal view.
pub(crate) fn orchestrator(
    globals: &GlobalArgs,
    origin: &Url,
) -> Result<Orchestrator<HttpGateway, FileStore>> {
    let store = Arc::new(globals.store_for(origin)?);
    let gateway = Arc::new(HttpGateway::new(&globals.config)?);
    Ok(Orchestrator::new(
        Arc::new(globals.config.clone()),
        gateway,
        store,
        Arc::new(terminal::TerminalView),
    ))
}
