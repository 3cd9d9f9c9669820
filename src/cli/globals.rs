use crate::cli::commands::site;
use crate::hotelituss::{Config, FileStore, Overrides};
use anyhow::{Context, Result};
use std::path::PathBuf;
use url::Url;

/// Site configuration and storage location shared by every subcommand.
#[derive(Clone, Debug)]
pub struct GlobalArgs {
    pub config: Config,
    pub origin: Url,
    pub state_dir: PathBuf,
}

impl GlobalArgs {
    /// Resolves the site URLs and the origin whose storage is used.
    ///
    /// # Errors
    /// Returns an error if any URL is invalid.
    pub fn new(options: site::Options) -> Result<Self> {
        let config = Config::load(Overrides::new(
            options.api_url.as_deref(),
            options.site_url.as_deref(),
            options.login_redirect_url.as_deref(),
            options.show_login_url.as_deref(),
        ))?;

        let origin = match options.origin {
            Some(raw) => Url::parse(&raw).with_context(|| format!("invalid --origin: {raw}"))?,
            None => config.site_url.clone(),
        };

        Ok(Self {
            config,
            origin,
            state_dir: options.state_dir,
        })
    }

    /// Opens the session file for `origin`.
    ///
    /// # Errors
    /// Returns an error if the state directory or file cannot be read.
    pub fn store_for(&self, origin: &Url) -> Result<FileStore> {
        FileStore::open(&self.state_dir, origin)
            .with_context(|| format!("failed to open session storage in {}", self.state_dir.display()))
    }
}
