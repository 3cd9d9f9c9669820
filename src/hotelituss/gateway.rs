//! Backend gateway for the three account operations. Each call is a single
//! request/response exchange: no retries, no timeout policy, no
//! de-duplication of concurrent calls. Request bodies may carry passwords and
//! codes, so they are never logged.

use super::{
    config::Config,
    errors::GatewayError,
    types::{
        AuthenticateReply, AuthenticateRequest, BackendReply, CreateAccountRequest,
        VerifyCodeRequest,
    },
};
use crate::APP_USER_AGENT;
use reqwest::Client;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, instrument, warn};
use url::Url;

pub const CREATE_PATH: &str = "/create";
pub const VERIFY_CODE_PATH: &str = "/verify-code";
pub const SESSION_PATH: &str = "/sesion";

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Remote account operations. Every returned future resolves exactly once.
pub trait Gateway: Send + Sync {
    /// Provisions a pending account and dispatches a one-time code to `correo`.
    fn create_account(
        &self,
        request: &CreateAccountRequest,
    ) -> impl Future<Output = Result<BackendReply, GatewayError>> + Send;

    /// Confirms the code issued for `correo`.
    fn verify_code(
        &self,
        request: &VerifyCodeRequest,
    ) -> impl Future<Output = Result<BackendReply, GatewayError>> + Send;

    /// Checks credentials; on success the reply carries the user profile.
    fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> impl Future<Output = Result<AuthenticateReply, GatewayError>> + Send;
}

/// Replies that carry a `success` flag.
trait Reply: DeserializeOwned {
    fn succeeded(&self) -> bool;
}

impl Reply for BackendReply {
    fn succeeded(&self) -> bool {
        self.success
    }
}

impl Reply for AuthenticateReply {
    fn succeeded(&self) -> bool {
        self.success
    }
}

/// JSON-over-HTTPS gateway bound to the configured base URL.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .map_err(|err| GatewayError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn post_json<B: Serialize, T: Reply>(&self, path: &str, body: &B) -> Result<T, GatewayError> {
        let url = build_url_with_base(self.base_url.as_str(), path);
        let payload = serde_json::to_vec(body)
            .map_err(|err| GatewayError::Serialization(format!("Failed to encode request: {err}")))?;

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|err| GatewayError::Network(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::Network(format!("Failed to read response: {err}")))?;

        debug!(status = status.as_u16(), "backend responded");

        if status.is_success() {
            return serde_json::from_str(&body)
                .map_err(|err| GatewayError::Parse(format!("Failed to decode response: {err}")));
        }

        // A refusal that still follows the reply shape is a logical failure,
        // not a transport one, so its message can reach the user.
        match serde_json::from_str::<T>(&body) {
            Ok(reply) if !reply.succeeded() => Ok(reply),
            _ => {
                warn!(status = status.as_u16(), "backend request failed");
                Err(GatewayError::Http {
                    status: status.as_u16(),
                    message: sanitize_body(&body),
                })
            }
        }
    }
}

impl Gateway for HttpGateway {
    #[instrument(skip_all, fields(path = CREATE_PATH))]
    async fn create_account(&self, request: &CreateAccountRequest) -> Result<BackendReply, GatewayError> {
        self.post_json(CREATE_PATH, request).await
    }

    #[instrument(skip_all, fields(path = VERIFY_CODE_PATH))]
    async fn verify_code(&self, request: &VerifyCodeRequest) -> Result<BackendReply, GatewayError> {
        self.post_json(VERIFY_CODE_PATH, request).await
    }

    #[instrument(skip_all, fields(path = SESSION_PATH))]
    async fn authenticate(
        &self,
        request: &AuthenticateRequest,
    ) -> Result<AuthenticateReply, GatewayError> {
        self.post_json(SESSION_PATH, request).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Trims and truncates error bodies before they reach the UI.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}
