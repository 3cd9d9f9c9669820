use clap::{Arg, ArgMatches, Command};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SITE_URL: &str = "site-url";
pub const ARG_LOGIN_REDIRECT_URL: &str = "login-redirect-url";
pub const ARG_SHOW_LOGIN_URL: &str = "show-login-url";
pub const ARG_ORIGIN: &str = "origin";
pub const ARG_STATE_DIR: &str = "state-dir";

const DEFAULT_STATE_DIR: &str = ".hotelituss";

#[derive(Debug, Clone)]
pub struct Options {
    pub api_url: Option<String>,
    pub site_url: Option<String>,
    pub login_redirect_url: Option<String>,
    pub show_login_url: Option<String>,
    pub origin: Option<String>,
    pub state_dir: PathBuf,
}

impl Options {
    /// Parse site and storage arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the state directory is blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read_optional = |id: &str| -> Option<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let state_dir = matches
            .get_one::<String>(ARG_STATE_DIR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_STATE_DIR}"))?;

        Ok(Self {
            api_url: read_optional(ARG_API_URL),
            site_url: read_optional(ARG_SITE_URL),
            login_redirect_url: read_optional(ARG_LOGIN_REDIRECT_URL),
            show_login_url: read_optional(ARG_SHOW_LOGIN_URL),
            origin: read_optional(ARG_ORIGIN),
            state_dir: PathBuf::from(state_dir),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Base URL of the account backend")
                .env("HOTELITUSS_API_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SITE_URL)
                .long(ARG_SITE_URL)
                .help("Page hosting the registration and login forms")
                .env("HOTELITUSS_SITE_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOGIN_REDIRECT_URL)
                .long(ARG_LOGIN_REDIRECT_URL)
                .help("Page that receives ?logged=true after a login")
                .env("HOTELITUSS_LOGIN_REDIRECT_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SHOW_LOGIN_URL)
                .long(ARG_SHOW_LOGIN_URL)
                .help("Page that receives ?showLogin=true after a verified registration")
                .env("HOTELITUSS_SHOW_LOGIN_URL")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ORIGIN)
                .long(ARG_ORIGIN)
                .help("Origin whose session storage is used (default: the site URL's origin)")
                .env("HOTELITUSS_ORIGIN")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long(ARG_STATE_DIR)
                .help("Directory holding one session file per origin")
                .env("HOTELITUSS_STATE_DIR")
                .default_value(DEFAULT_STATE_DIR)
                .global(true),
        )
}
