//! Command-line argument dispatch.
//!
//! Parses validated CLI matches into the action to run, resolving the site
//! configuration once so every action shares the same URLs and storage.

use crate::cli::{
    actions::{Action, login, page, register, verify},
    commands::{account, site},
    globals::GlobalArgs,
};
use crate::hotelituss::types::{LoginForm, RegistrationForm};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use url::Url;

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow!("missing required argument: --{id}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or a URL is invalid.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(site::Options::parse(matches)?)?;

    match matches.subcommand() {
        Some((account::CMD_REGISTER, sub)) => Ok(Action::Register(register::Args {
            globals,
            form: RegistrationForm {
                name: required(sub, account::ARG_NAME)?,
                email: required(sub, account::ARG_EMAIL)?,
                phone: required(sub, account::ARG_PHONE)?,
                password: SecretString::from(required(sub, account::ARG_PASSWORD)?),
            },
        })),
        Some((account::CMD_VERIFY, sub)) => Ok(Action::Verify(verify::Args {
            globals,
            code: required(sub, account::ARG_CODE)?,
        })),
        Some((account::CMD_RESEND, sub)) => Ok(Action::Resend(verify::ResendArgs {
            globals,
            wait: !sub.get_flag(account::ARG_NO_WAIT),
        })),
        Some((account::CMD_LOGIN, sub)) => Ok(Action::Login(login::Args {
            globals,
            form: LoginForm {
                email: required(sub, account::ARG_EMAIL)?,
                password: SecretString::from(required(sub, account::ARG_PASSWORD)?),
            },
        })),
        Some((account::CMD_LOGOUT, _)) => Ok(Action::Logout(globals)),
        Some((account::CMD_OPEN, sub)) => {
            let raw = required(sub, account::ARG_URL)?;
            let url = Url::parse(&raw).with_context(|| format!("invalid page URL: {raw}"))?;
            Ok(Action::Open(page::Args { globals, url }))
        }
        Some((account::CMD_STATUS, _)) => Ok(Action::Status(globals)),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
