use crate::cli::actions::{Action, login, page, register, verify};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Register(args) => register::execute(args).await,
        Action::Verify(args) => verify::execute(args).await,
        Action::Resend(args) => verify::resend(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Logout(globals) => login::logout(&globals),
        Action::Open(args) => page::execute(&args),
        Action::Status(globals) => page::status(&globals),
    }
}
