//! Registration and login orchestration.
//!
//! The orchestrator owns the modal surface state and one in-flight token per
//! submitting workflow. It validates form input, caches the pending
//! registration before the backend is contacted, and hands a successful
//! registration over to the [`VerificationController`]. A successful login
//! writes the session locally and redirects to the other origin with the
//! `logged=true` marker.

use super::{
    config::Config,
    errors::WorkflowError,
    gateway::Gateway,
    handoff::{self, Marker},
    inflight::InFlight,
    store::{Session, SessionStore},
    types::{AuthenticateRequest, LoginForm, RegistrationForm},
    validation::{validate_login, validate_registration},
    verification::VerificationController,
    view::{Form, NavState, Surface, View},
};
use secrecy::ExposeSecret;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, instrument, warn};
use url::Url;

const REGISTRATION_FAILED: &str = "We could not create your account. Please try again.";
const LOGIN_FAILED: &str = "Invalid email or password.";
const NETWORK_FAILED: &str = "We could not reach the server. Please try again.";
const SESSION_FAILED: &str = "We could not save your session. Please try again.";

/// Result of processing a page load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLoad {
    /// The visible location after any marker was stripped.
    pub url: Url,
    pub nav: NavState,
    pub show_login: bool,
}

pub struct Orchestrator<G, S> {
    config: Arc<Config>,
    gateway: Arc<G>,
    session: Session<S>,
    view: Arc<dyn View>,
    registration: InFlight,
    login: InFlight,
    surface: Mutex<Surface>,
    verification: VerificationController<G, S>,
}

impl<G: Gateway, S: SessionStore> Orchestrator<G, S> {
    pub fn new(config: Arc<Config>, gateway: Arc<G>, store: Arc<S>, view: Arc<dyn View>) -> Self {
        let session = Session::new(store);
        let verification = VerificationController::new(
            Arc::clone(&config),
            Arc::clone(&gateway),
            session.clone(),
            Arc::clone(&view),
        );
        Self {
            config,
            gateway,
            session,
            view,
            registration: InFlight::new("registration"),
            login: InFlight::new("login"),
            surface: Mutex::new(Surface::Closed),
            verification,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn verification(&self) -> &VerificationController<G, S> {
        &self.verification
    }

    pub fn surface(&self) -> Surface {
        *self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_surface(&self, surface: Surface) {
        *self.surface.lock().unwrap_or_else(PoisonError::into_inner) = surface;
        self.view.show_surface(surface);
    }

    /// Shows a surface immediately, replacing whatever is open.
    pub fn open(&self, surface: Surface) {
        debug!(?surface, "open surface");
        self.set_surface(surface);
    }

    /// Closes the current surface and opens `surface` after the modal switch
    /// delay.
    pub async fn switch_to(&self, surface: Surface) {
        self.close_for_switch().await;
        self.open(surface);
    }

    async fn close_for_switch(&self) {
        if self.surface() != Surface::Closed {
            self.set_surface(Surface::Closed);
            tokio::time::sleep(self.config.modal_switch_delay).await;
        }
    }

    /// Submits a registration. The pending registration is stored before the
    /// backend is called, so a resend can reuse it even if this call fails.
    ///
    /// # Errors
    /// Validation failures and an outstanding registration are rejected
    /// locally. Backend and transport failures leave the registration surface
    /// open.
    #[instrument(skip_all)]
    pub async fn register(&self, form: &RegistrationForm) -> Result<Surface, WorkflowError> {
        let Some(token) = self.registration.try_acquire() else {
            return Err(WorkflowError::Busy);
        };

        let pending = validate_registration(form)
            .inspect_err(|err| self.view.show_error(Form::Registration, &err.to_string()))?;
        self.session.save_pending(&pending)?;
        debug!(token = %token.token(), "pending registration stored");

        self.view.set_submit_enabled(Form::Registration, false);
        let result = self.gateway.create_account(&pending.to_request()).await;
        self.view.set_submit_enabled(Form::Registration, true);

        match result {
            Ok(reply) if reply.success => {
                info!("account created, awaiting verification code");
                self.close_for_switch().await;
                *self.surface.lock().unwrap_or_else(PoisonError::into_inner) =
                    Surface::Verification;
                self.verification.enter();
                Ok(Surface::Verification)
            }
            Ok(reply) => {
                let message = reply
                    .message
                    .unwrap_or_else(|| REGISTRATION_FAILED.to_string());
                warn!("registration rejected");
                self.view.show_error(Form::Registration, &message);
                Err(WorkflowError::Rejected(message))
            }
            Err(err) => {
                warn!("registration request failed: {err}");
                self.view.show_error(Form::Registration, NETWORK_FAILED);
                Err(WorkflowError::Network(NETWORK_FAILED.to_string()))
            }
        }
    }

    /// Authenticates and, on success, redirects to the login redirect URL with
    /// the `logged=true` marker after the redirect delay. Returns the target.
    ///
    /// # Errors
    /// Validation failures and an outstanding login are rejected locally; a
    /// rejected login carries the backend message or a default one.
    #[instrument(skip_all)]
    pub async fn login(&self, form: &LoginForm) -> Result<Url, WorkflowError> {
        let Some(token) = self.login.try_acquire() else {
            return Err(WorkflowError::Busy);
        };

        let email = validate_login(form)
            .inspect_err(|err| self.view.show_error(Form::Login, &err.to_string()))?;
        let request = AuthenticateRequest {
            email: email.clone(),
            password: form.password.expose_secret().to_string(),
        };

        self.view.set_submit_enabled(Form::Login, false);
        let result = self.gateway.authenticate(&request).await;

        match result {
            Ok(reply) if reply.success => {
                if let Err(err) = self.record_sign_in(&email, reply.user.as_ref()) {
                    self.view.set_submit_enabled(Form::Login, true);
                    warn!("could not record session: {err}");
                    self.view.show_error(Form::Login, SESSION_FAILED);
                    return Err(err);
                }
                info!(token = %token.token(), "signed in");
                self.view.show_notice("Welcome back!");

                tokio::time::sleep(self.config.redirect_delay).await;
                let target = handoff::attach(&self.config.login_redirect_url, Marker::LoggedIn);
                self.view.redirect(&target);
                Ok(target)
            }
            Ok(reply) => {
                self.view.set_submit_enabled(Form::Login, true);
                let message = reply.message.unwrap_or_else(|| LOGIN_FAILED.to_string());
                warn!("login rejected");
                self.view.show_error(Form::Login, &message);
                Err(WorkflowError::Rejected(message))
            }
            Err(err) => {
                self.view.set_submit_enabled(Form::Login, true);
                warn!("login request failed: {err}");
                self.view.show_error(Form::Login, NETWORK_FAILED);
                Err(WorkflowError::Network(NETWORK_FAILED.to_string()))
            }
        }
    }

    fn record_sign_in(
        &self,
        email: &str,
        user: Option<&serde_json::Value>,
    ) -> Result<NavState, WorkflowError> {
        self.session.sign_in(email, user)?;
        self.render_nav()
    }

    /// Processes a page load at `location`: consumes handoff markers, rewrites
    /// the visible URL once, renders navigation from the stored session and
    /// opens the login surface when asked to.
    ///
    /// # Errors
    /// Returns an error if the session store cannot be read or written.
    pub fn load_page(&self, location: &Url) -> Result<PageLoad, WorkflowError> {
        let arrival = handoff::inspect(location);

        if arrival.logged_in {
            self.session.mark_logged_in()?;
            info!("session handed over from another origin");
        }
        if arrival.consumed_marker() {
            self.view.replace_url(&arrival.url);
        }

        let nav = self.render_nav()?;
        if arrival.show_login && !nav.logged_in {
            self.open(Surface::Login);
        }

        Ok(PageLoad {
            url: arrival.url,
            nav,
            show_login: arrival.show_login,
        })
    }

    /// Clears the session and re-renders the signed-out navigation.
    ///
    /// # Errors
    /// Returns an error if the session store cannot be written.
    pub fn logout(&self) -> Result<NavState, WorkflowError> {
        self.session.sign_out()?;
        info!("signed out");
        self.render_nav()
    }

    /// # Errors
    /// Returns an error if the session store cannot be read.
    pub fn nav(&self) -> Result<NavState, WorkflowError> {
        let logged_in = self.session.is_logged_in()?;
        let email = if logged_in {
            self.session.current_user_email()?
        } else {
            None
        };
        Ok(NavState { logged_in, email })
    }

    fn render_nav(&self) -> Result<NavState, WorkflowError> {
        let nav = self.nav()?;
        self.view.render_nav(&nav);
        Ok(nav)
    }
}
