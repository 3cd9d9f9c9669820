//! Build-time configuration for the backend and the two site origins, with
//! runtime overrides applied by the caller (CLI flags or environment). The
//! resulting [`Config`] is constructed once at startup and shared by the
//! gateway, the orchestrator and the verification controller.
//! Configuration values are public; do not store secrets here.

use super::errors::ConfigError;
use std::time::Duration;
use url::Url;

/// Seconds a guest must wait between two code resend requests.
pub const RESEND_COOLDOWN_SECS: u64 = 60;
/// Pause between a successful verification and the redirect to the login surface.
pub const REDIRECT_DELAY_MS: u64 = 2_000;
/// Pause between hiding one modal and showing the next.
pub const MODAL_SWITCH_DELAY_MS: u64 = 500;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_SITE_URL: &str = "http://127.0.0.1:5500/index.html";
const DEFAULT_LOGIN_REDIRECT_URL: &str = "http://127.0.0.1:8080/index.html";

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the reservation/auth backend.
    pub api_base_url: Url,
    /// Page hosting the registration and login modals.
    pub site_url: Url,
    /// Page on the other origin that receives `?logged=true` after a login.
    pub login_redirect_url: Url,
    /// Page that receives `?showLogin=true` after a verified registration.
    pub show_login_url: Url,
    pub redirect_delay: Duration,
    pub modal_switch_delay: Duration,
    pub resend_cooldown: Duration,
}

/// Runtime values that replace the build-time defaults when present.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub api_base_url: Option<String>,
    pub site_url: Option<String>,
    pub login_redirect_url: Option<String>,
    pub show_login_url: Option<String>,
}

impl Overrides {
    /// Builds overrides from raw values, dropping blank ones.
    #[must_use]
    pub fn new(
        api_base_url: Option<&str>,
        site_url: Option<&str>,
        login_redirect_url: Option<&str>,
        show_login_url: Option<&str>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.and_then(normalize_value),
            site_url: site_url.and_then(normalize_value),
            login_redirect_url: login_redirect_url.and_then(normalize_value),
            show_login_url: show_login_url.and_then(normalize_value),
        }
    }
}

#[derive(Debug)]
struct RawConfig {
    api_base_url: String,
    site_url: String,
    login_redirect_url: String,
    show_login_url: String,
}

impl Config {
    /// Loads config from build-time environment variables and applies runtime overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the resulting URLs cannot be parsed.
    pub fn load(overrides: Overrides) -> Result<Self, ConfigError> {
        let site_url = option_env!("HOTELITUSS_SITE_URL").unwrap_or(DEFAULT_SITE_URL);
        let mut raw = RawConfig {
            api_base_url: option_env!("HOTELITUSS_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            site_url: site_url.to_string(),
            login_redirect_url: option_env!("HOTELITUSS_LOGIN_REDIRECT_URL")
                .unwrap_or(DEFAULT_LOGIN_REDIRECT_URL)
                .to_string(),
            show_login_url: option_env!("HOTELITUSS_SHOW_LOGIN_URL")
                .unwrap_or(site_url)
                .to_string(),
        };

        apply_overrides(&mut raw, overrides);

        Ok(Self {
            api_base_url: parse_url("api base", &raw.api_base_url)?,
            site_url: parse_url("site", &raw.site_url)?,
            login_redirect_url: parse_url("login redirect", &raw.login_redirect_url)?,
            show_login_url: parse_url("show login", &raw.show_login_url)?,
            redirect_delay: Duration::from_millis(REDIRECT_DELAY_MS),
            modal_switch_delay: Duration::from_millis(MODAL_SWITCH_DELAY_MS),
            resend_cooldown: Duration::from_secs(RESEND_COOLDOWN_SECS),
        })
    }

    /// Replaces the timing constants, mostly useful for headless runs.
    #[must_use]
    pub fn with_delays(mut self, redirect_delay: Duration, modal_switch_delay: Duration) -> Self {
        self.redirect_delay = redirect_delay;
        self.modal_switch_delay = modal_switch_delay;
        self
    }
}

fn apply_overrides(config: &mut RawConfig, overrides: Overrides) {
    if let Some(value) = overrides.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = overrides.site_url {
        config.site_url = value;
    }
    if let Some(value) = overrides.login_redirect_url {
        config.login_redirect_url = value;
    }
    if let Some(value) = overrides.show_login_url {
        config.show_login_url = value;
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|_| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
    })
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
