//! Account workflow for the Hotelituss site.
//!
//! The modules are layered leaves first: the session store and backend gateway
//! know nothing about each other, the verification controller and orchestrator
//! compose them, and the handoff module is pure URL manipulation. All UI side
//! effects go through [`view::View`] so the workflow can run headless.

pub mod config;
pub mod cooldown;
pub mod errors;
pub mod gateway;
pub mod handoff;
pub mod inflight;
pub mod orchestrator;
pub mod store;
pub mod types;
pub mod validation;
pub mod verification;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, Overrides};
pub use errors::{ConfigError, GatewayError, StoreError, WorkflowError};
pub use gateway::{Gateway, HttpGateway};
pub use orchestrator::Orchestrator;
pub use store::{FileStore, Key, MemoryStore, Session, SessionStore};
pub use view::{Form, NavState, Surface, View};
