#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use hotelituss::hotelituss::{Form, NavState, Surface, View};
use serde_json::{Value, json};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};
use url::Url;

pub const KNOWN_CODE: &str = "654321";
pub const TAKEN_EMAIL: &str = "taken@example.com";

/// Requests received by the fake backend, as `(path, body)`.
#[derive(Clone, Default)]
pub struct Recorded(Arc<Mutex<Vec<(String, Value)>>>);

impl Recorded {
    fn push(&self, path: &str, body: &Value) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((path.to_string(), body.clone()));
    }

    pub fn all(&self) -> Vec<(String, Value)> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.all().into_iter().map(|(path, _)| path).collect()
    }
}

async fn create(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    recorded.push("/create", &body);
    if body["correo"] == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({"success": false, "message": "El correo ya está registrado"})),
        )
            .into_response();
    }
    Json(json!({"success": true, "message": "Código enviado"})).into_response()
}

async fn verify_code(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    recorded.push("/verify-code", &body);
    Json(json!({"success": body["codigo"] == KNOWN_CODE})).into_response()
}

async fn sesion(State(recorded): State<Recorded>, Json(body): Json<Value>) -> Response {
    recorded.push("/sesion", &body);
    match body["password"].as_str() {
        Some("x") => Json(json!({
            "success": true,
            "user": {"id": 7, "nombre": "Ana", "correo": body["email"]}
        }))
        .into_response(),
        Some("boom") => (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Credenciales inválidas"})),
        )
            .into_response(),
    }
}

async fn not_json() -> Response {
    (StatusCode::OK, "<html>maintenance</html>").into_response()
}

/// An in-process account backend on an ephemeral port.
pub struct FakeBackend {
    pub base_url: String,
    pub recorded: Recorded,
}

impl FakeBackend {
    pub async fn start() -> anyhow::Result<Self> {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/create", post(create))
            .route("/verify-code", post(verify_code))
            .route("/sesion", post(sesion))
            .route("/broken/create", post(not_json))
            .route("/broken/verify-code", post(not_json))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            recorded,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    Surface(Surface),
    Error(Form, String),
    Notice(String),
    Countdown(u32),
    ReplaceUrl(String),
    Redirect(String),
    Nav(NavState),
}

/// Records the effects the workflow asks for.
#[derive(Default)]
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

    pub fn replaced_urls(&self) -> Vec<String> {
        self.effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::ReplaceUrl(url) => Some(url),
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
}

impl View for RecordingView {
    fn show_surface(&self, surface: Surface) {
        self.push(Effect::Surface(surface));
    }

    fn focus_cell(&self, _index: usize) {}

    fn set_submit_enabled(&self, _form: Form, _enabled: bool) {}

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

/// A scratch directory removed on drop.
pub struct TempDir(pub PathBuf);

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        Self(std::env::temp_dir().join(format!("{prefix}-{}", ulid::Ulid::new())))
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}
