//! In-memory doubles shared by the unit tests.

use super::{
    errors::{GatewayError, StoreError},
    gateway::Gateway,
    store::{Key, MemoryStore, SessionStore},
    types::{
        AuthenticateReply, AuthenticateRequest, BackendReply, CreateAccountRequest,
        VerifyCodeRequest,
    },
    view::{Form, NavState, Surface, View},
};
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Surface(Surface),
    Focus(usize),
    Submit(Form, bool),
    Error(Form, String),
    Notice(String),
    Countdown(u32),
    ReplaceUrl(String),
    Redirect(String),
    Nav(NavState),
}

#[derive(Debug, Default)]
pub struct RecordingView {
    effects: Mutex<Vec<Effect>>,
}

impl RecordingView {
    fn push(&self, effect: Effect) {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }

    pub fn effects(&self) -> Vec<Effect> {
        self.effects
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn countdowns(&self) -> Vec<u32> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Countdown(left) => Some(left),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<(Form, String)> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Error(form, message) => Some((form, message)),
                _ => None,
            })
            .collect()
    }

    pub fn redirects(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Redirect(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn last_surface(&self) -> Option<Surface> {
        self.effects().into_iter().rev().find_map(|effect| match effect {
            Effect::Surface(surface) => Some(surface),
            _ => None,
        })
    }
}

impl View for RecordingView {
    fn show_surface(&self, surface: Surface) {
        self.push(Effect::Surface(surface));
    }

    fn focus_cell(&self, index: usize) {
        self.push(Effect::Focus(index));
    }

    fn set_submit_enabled(&self, form: Form, enabled: bool) {
        self.push(Effect::Submit(form, enabled));
    }

    fn show_error(&self, form: Form, message: &str) {
        self.push(Effect::Error(form, message.to_string()));
    }

    fn show_notice(&self, message: &str) {
        self.push(Effect::Notice(message.to_string()));
    }

    fn resend_countdown(&self, remaining: u32) {
        self.push(Effect::Countdown(remaining));
    }

    fn replace_url(&self, url: &Url) {
        self.push(Effect::ReplaceUrl(url.to_string()));
    }

    fn redirect(&self, url: &Url) {
        self.push(Effect::Redirect(url.to_string()));
    }

    fn render_nav(&self, nav: &NavState) {
        self.push(Effect::Nav(nav.clone()));
    }
}

/// Store whose writes to the listed keys fail, as a full disk would. Reads and
/// other writes go to the wrapped [`MemoryStore`].
#[derive(Debug)]
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    failing: Vec<Key>,
}

impl FailingStore {
    pub fn new(inner: Arc<MemoryStore>, failing: &[Key]) -> Self {
        Self {
            inner,
            failing: failing.to_vec(),
        }
    }

    fn check(&self, key: Key) -> Result<(), StoreError> {
        if self.failing.contains(&key) {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl SessionStore for FailingStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: Key, value: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: Key) -> Result<(), StoreError> {
        self.check(key)?;
        self.inner.remove(key)
    }
}

/// A recorded gateway call, with the pending email stored at the moment the
/// call was issued.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Create {
        correo: String,
        pending_email_at_call: Option<String>,
    },
    Verify(VerifyCodeRequest),
    Authenticate { email: String },
}

/// Scripted gateway. Replies are consumed in order; when a queue is empty the
/// call succeeds. An optional delay keeps calls in flight long enough to
/// overlap.
#[derive(Debug)]
pub struct FakeGateway {
    store: Arc<MemoryStore>,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
    create_replies: Mutex<VecDeque<Result<BackendReply, GatewayError>>>,
    verify_replies: Mutex<VecDeque<Result<BackendReply, GatewayError>>>,
    auth_replies: Mutex<VecDeque<Result<AuthenticateReply, GatewayError>>>,
}

impl FakeGateway {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self {
            store,
            delay: Duration::ZERO,
            calls: Mutex::default(),
            create_replies: Mutex::default(),
            verify_replies: Mutex::default(),
            auth_replies: Mutex::default(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Create { .. }))
            .count()
    }

    pub fn push_create(&self, reply: Result<BackendReply, GatewayError>) {
        self.create_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    pub fn push_verify(&self, reply: Result<BackendReply, GatewayError>) {
        self.verify_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    pub fn push_auth(&self, reply: Result<AuthenticateReply, GatewayError>) {
        self.auth_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    fn record(&self, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

pub fn ok_reply() -> BackendReply {
    BackendReply {
        success: true,
        message: None,
    }
}

pub fn failed_reply(message: Option<&str>) -> BackendReply {
    BackendReply {
        success: false,
        message: message.map(ToString::to_string),
    }
}

impl Gateway for FakeGateway {
    async fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> Result<BackendReply, GatewayError> {
        let pending_email_at_call = self
            .store
            .get(Key::PendingVerificationEmail)
            .ok()
            .flatten();
        self.record(Call::Create {
            correo: request.correo.clone(),
            pending_email_at_call,
        });
        self.pause().await;
        let next = self
            .create_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        next.unwrap_or_else(|| Ok(ok_reply()))
    }

    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<BackendReply, GatewayError> {
        self.record(Call::Verify(request.clone()));
        self.pause().await;
        let next = self
            .verify_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        next.unwrap_or_else(|| Ok(ok_reply()))
    }

    async fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<AuthenticateReply, GatewayError> {
        self.record(Call::Authenticate {
            email: request.email.clone(),
        });
        self.pause().await;
        let next = self
            .auth_replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        next.unwrap_or_else(|| {
            Ok(AuthenticateReply {
                success: true,
                message: None,
                user: None,
            })
        })
    }
}
