//! Verification controller: six single-character code cells, submission of the
//! assembled code, and the resend cooldown.
//!
//! State machine: `Idle -> CodeEntry -> Verifying -> Verified`, with a failed
//! verification returning to `CodeEntry` (cells are kept). Resend runs beside
//! it as `ResendLocked(n) -> ResendAvailable`.

use super::{
    config::Config,
    cooldown::ResendCooldown,
    errors::WorkflowError,
    gateway::Gateway,
    handoff::{self, Marker},
    store::{Session, SessionStore},
    types::VerifyCodeRequest,
    view::{Form, Surface, View},
};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};
use url::Url;

pub const CODE_LENGTH: usize = 6;

const INCOMPLETE_CODE: &str = "Enter the full 6-character code.";
const NO_PENDING_EMAIL: &str = "No registration is waiting for verification.";
const INVALID_CODE: &str = "The code is not valid. Check it and try again.";
const GENERIC_FAILURE: &str = "We could not reach the server. Please try again.";
const STORAGE_FAILURE: &str = "We could not update this device. Please try again.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerificationState {
    Idle,
    CodeEntry,
    Verifying,
    Verified,
}

/// The six input cells and the focused index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeCells {
    cells: [String; CODE_LENGTH],
    focus: usize,
}

impl CodeCells {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Sets a cell's content (at most one character, like `maxlength=1`) and
    /// returns the new focus. Exactly one character advances to the next cell,
    /// except on the last one.
    pub fn input(&mut self, index: usize, value: &str) -> usize {
        let Some(cell) = self.cells.get_mut(index) else {
            return self.focus;
        };
        *cell = value.chars().next().map(String::from).unwrap_or_default();

        self.focus = if cell.chars().count() == 1 && index + 1 < CODE_LENGTH {
            index + 1
        } else {
            index
        };
        self.focus
    }

    /// Backspace in an empty cell moves focus back one cell.
    pub fn backspace(&mut self, index: usize) -> usize {
        let Some(cell) = self.cells.get_mut(index) else {
            return self.focus;
        };
        if cell.is_empty() {
            self.focus = index.saturating_sub(1);
        } else {
            cell.clear();
            self.focus = index;
        }
        self.focus
    }

    /// Spreads `code` over the cells from the first one, as a paste would.
    pub fn fill(&mut self, code: &str) -> usize {
        for (index, ch) in code.chars().take(CODE_LENGTH).enumerate() {
            self.input(index, &ch.to_string());
        }
        self.focus
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Cells concatenated in index order, or `None` unless all six are filled.
    #[must_use]
    pub fn code(&self) -> Option<String> {
        let code: String = self.cells.concat();
        (code.chars().count() == CODE_LENGTH).then_some(code)
    }
}

pub struct VerificationController<G, S> {
    config: Arc<Config>,
    gateway: Arc<G>,
    session: Session<S>,
    view: Arc<dyn View>,
    cells: Mutex<CodeCells>,
    state: Mutex<VerificationState>,
    cooldown: ResendCooldown,
}

impl<G: Gateway, S: SessionStore> VerificationController<G, S> {
    pub fn new(
        config: Arc<Config>,
        gateway: Arc<G>,
        session: Session<S>,
        view: Arc<dyn View>,
    ) -> Self {
        let cooldown = ResendCooldown::new(config.resend_cooldown);
        Self {
            config,
            gateway,
            session,
            view,
            cells: Mutex::new(CodeCells::new()),
            state: Mutex::new(VerificationState::Idle),
            cooldown,
        }
    }

    pub fn state(&self) -> VerificationState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: VerificationState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        debug!(?state, "verification state");
    }

    pub fn cells(&self) -> CodeCells {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cooldown(&self) -> &ResendCooldown {
        &self.cooldown
    }

    /// Shows the code entry surface with empty cells and focuses the first one.
    pub fn enter(&self) {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.set_state(VerificationState::CodeEntry);
        self.view.show_surface(Surface::Verification);
        self.view.focus_cell(0);
    }

    pub fn input(&self, index: usize, value: &str) {
        let focus = self
            .cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .input(index, value);
        self.view.focus_cell(focus);
    }

    pub fn backspace(&self, index: usize) {
        let focus = self
            .cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .backspace(index);
        self.view.focus_cell(focus);
    }

    pub fn fill(&self, code: &str) {
        let focus = self
            .cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill(code);
        self.view.focus_cell(focus);
    }

    /// Submits the assembled code. On success the pending registration is
    /// cleared and, after the configured delay, the view is redirected to the
    /// login surface URL, which is returned.
    ///
    /// # Errors
    /// Rejects locally (no network call) when the code is incomplete, no email
    /// is pending, or a verification is already in flight. Backend and
    /// transport failures return to code entry.
    pub async fn submit(&self) -> Result<Url, WorkflowError> {
        let request = self.begin_submit()?;
        self.view.set_submit_enabled(Form::Verification, false);
        self.verify(request).await
    }

    /// Moves `CodeEntry` to `Verifying` and builds the request, or rejects.
    fn begin_submit(&self) -> Result<VerifyCodeRequest, WorkflowError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            VerificationState::Verifying => return Err(WorkflowError::Busy),
            VerificationState::Verified => {
                return Err(WorkflowError::LocalState(
                    "This registration is already verified.".to_string(),
                ))
            }
            VerificationState::Idle | VerificationState::CodeEntry => {}
        }

        let Some(codigo) = self.cells().code() else {
            return Err(self.reject_locally(INCOMPLETE_CODE));
        };
        let Some(correo) = self.session.pending_email()? else {
            return Err(self.reject_locally(NO_PENDING_EMAIL));
        };

        *state = VerificationState::Verifying;
        debug!("verification state Verifying");
        Ok(VerifyCodeRequest { correo, codigo })
    }

    async fn verify(&self, request: VerifyCodeRequest) -> Result<Url, WorkflowError> {
        let result = self.gateway.verify_code(&request).await;
        self.view.set_submit_enabled(Form::Verification, true);

        match result {
            Ok(reply) if reply.success => {
                if let Err(err) = self.session.clear_pending() {
                    self.set_state(VerificationState::CodeEntry);
                    warn!("could not clear pending registration: {err}");
                    self.view.show_error(Form::Verification, STORAGE_FAILURE);
                    return Err(err.into());
                }
                self.set_state(VerificationState::Verified);
                self.cooldown.cancel();
                info!("registration verified");
                self.view
                    .show_notice("Your account is verified. You can sign in now.");

                tokio::time::sleep(self.config.redirect_delay).await;
                let target = handoff::attach(&self.config.show_login_url, Marker::ShowLogin);
                self.view.redirect(&target);
                Ok(target)
            }
            Ok(reply) => {
                self.set_state(VerificationState::CodeEntry);
                let message = reply.message.unwrap_or_else(|| INVALID_CODE.to_string());
                warn!("verification code rejected");
                self.view.show_error(Form::Verification, &message);
                Err(WorkflowError::Rejected(message))
            }
            Err(err) => {
                self.set_state(VerificationState::CodeEntry);
                warn!("verification request failed: {err}");
                self.view.show_error(Form::Verification, GENERIC_FAILURE);
                Err(WorkflowError::Network(GENERIC_FAILURE.to_string()))
            }
        }
    }

    fn reject_locally(&self, message: &str) -> WorkflowError {
        self.view.show_error(Form::Verification, message);
        WorkflowError::LocalState(message.to_string())
    }

    /// Sends the cached registration again and locks resends for the cooldown.
    ///
    /// # Errors
    /// Returns [`WorkflowError::ResendLocked`] without any call while the
    /// cooldown runs, [`WorkflowError::LocalState`] when nothing is pending, and
    /// the backend or transport failure otherwise. The lock stays in place
    /// after a failed call.
    pub async fn resend(&self) -> Result<(), WorkflowError> {
        let remaining = self.cooldown.remaining();
        if remaining > 0 {
            debug!(remaining, "resend ignored while locked");
            return Err(WorkflowError::ResendLocked(remaining));
        }

        let Some(pending) = self.session.pending_registration()? else {
            self.view.show_error(Form::Verification, NO_PENDING_EMAIL);
            return Err(WorkflowError::LocalState(NO_PENDING_EMAIL.to_string()));
        };

        self.cooldown.lock(Arc::clone(&self.view));

        match self.gateway.create_account(&pending.to_request()).await {
            Ok(reply) if reply.success => {
                info!("verification code resent");
                self.view.show_notice("A new code is on its way.");
                Ok(())
            }
            Ok(reply) => {
                let message = reply
                    .message
                    .unwrap_or_else(|| "The code could not be resent.".to_string());
                self.view.show_error(Form::Verification, &message);
                Err(WorkflowError::Rejected(message))
            }
            Err(err) => {
                warn!("resend request failed: {err}");
                self.view.show_error(Form::Verification, GENERIC_FAILURE);
                Err(WorkflowError::Network(GENERIC_FAILURE.to_string()))
            }
        }
    }
}
