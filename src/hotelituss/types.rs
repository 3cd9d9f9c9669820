//! Request and response types for the backend plus the form data that flows
//! through the workflow. Payloads that carry a password must never be logged;
//! their `Debug` output redacts it.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /create`. The same shape is cached as `pendingUserData`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub nombre: String,
    pub correo: String,
    pub telefono: String,
    pub password: String,
}

impl fmt::Debug for CreateAccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateAccountRequest")
            .field("nombre", &self.nombre)
            .field("correo", &self.correo)
            .field("telefono", &self.telefono)
            .field("password", &"***")
            .finish()
    }
}

/// Body of `POST /verify-code`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyCodeRequest {
    pub correo: String,
    pub codigo: String,
}

/// Body of `POST /sesion`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticateRequest {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for AuthenticateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticateRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Reply of `/create` and `/verify-code`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Reply of `/sesion`. `user` is an opaque profile cached as `currentUserData`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticateReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// Raw registration form input, before stripping and validation.
#[derive(Clone, Debug)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
}

/// Raw login form input.
#[derive(Clone, Debug)]
pub struct LoginForm {
    pub email: String,
    pub password: SecretString,
}

/// Validated registration data held between account creation and code
/// verification. At most one exists per origin; a new submission replaces it.
#[derive(Clone, Debug)]
pub struct PendingRegistration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: SecretString,
}

impl PendingRegistration {
    #[must_use]
    pub fn to_request(&self) -> CreateAccountRequest {
        CreateAccountRequest {
            nombre: self.name.clone(),
            correo: self.email.clone(),
            telefono: self.phone.clone(),
            password: self.password.expose_secret().to_string(),
        }
    }
}

impl From<CreateAccountRequest> for PendingRegistration {
    fn from(request: CreateAccountRequest) -> Self {
        Self {
            name: request.nombre,
            email: request.correo,
            phone: request.telefono,
            password: SecretString::from(request.password),
        }
    }
}
