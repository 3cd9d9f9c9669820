//! # Hotelituss (account registration and session handoff)
//!
//! `hotelituss` drives the account workflow of the Hotelituss booking site: a
//! guest registers, receives a one-time code by email, confirms it, and signs
//! in. The signed-in state must then survive a redirect between two web origins
//! that do not share client-side storage.
//!
//! ## Workflow
//!
//! 1. **Register:** form input is validated locally, cached as a pending
//!    registration, and sent to `POST /create`.
//! 2. **Verify:** the six-cell code entry is assembled and sent to
//!    `POST /verify-code`. Success clears the pending data and redirects to the
//!    login surface (`?showLogin=true`).
//! 3. **Login:** credentials go to `POST /sesion`; the session flag is written
//!    locally and the browser is redirected to the other origin with
//!    `?logged=true`.
//! 4. **Arrival:** the receiving page consumes the marker once, writes its own
//!    session flag and strips the marker from the visible URL.
//!
//! The handoff marker is an assertion, not a credential. Anyone can craft
//! `?logged=true`; the backend does not issue a token that could be verified.

pub mod cli;
pub mod hotelituss;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
