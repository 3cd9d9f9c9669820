//! Durable, origin-scoped key/value state. Every value is a string; structured
//! values are serialized to JSON at this boundary so callers never store raw
//! objects. Each `set`/`remove` is durable immediately and is never visible to
//! another origin.

use super::{errors::StoreError, types::CreateAccountRequest, types::PendingRegistration};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};
use tracing::{debug, instrument};
use url::Url;

/// Value written under [`Key::UserLoggedIn`] while signed in.
const LOGGED_IN: &str = "true";

/// Storage keys shared with the site's existing pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    UserLoggedIn,
    CurrentUserEmail,
    CurrentUserData,
    PendingUserData,
    PendingVerificationEmail,
}

impl Key {
    pub const ALL: [Self; 5] = [
        Self::UserLoggedIn,
        Self::CurrentUserEmail,
        Self::CurrentUserData,
        Self::PendingUserData,
        Self::PendingVerificationEmail,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserLoggedIn => "userLoggedIn",
            Self::CurrentUserEmail => "currentUserEmail",
            Self::CurrentUserData => "currentUserData",
            Self::PendingUserData => "pendingUserData",
            Self::PendingVerificationEmail => "pendingVerificationEmail",
        }
    }
}

pub trait SessionStore: Send + Sync {
    /// # Errors
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: Key) -> Result<Option<String>, StoreError>;

    /// # Errors
    /// Returns an error if the write cannot be made durable.
    fn set(&self, key: Key, value: &str) -> Result<(), StoreError>;

    /// # Errors
    /// Returns an error if the removal cannot be made durable.
    fn remove(&self, key: Key) -> Result<(), StoreError>;
}

/// Store that lives as long as the process; one instance per origin.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key.as_str()).cloned())
    }

    fn set(&self, key: Key, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.as_str().to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: Key) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        values.remove(key.as_str());
        Ok(())
    }
}

/// JSON file per origin. The whole map is rewritten through a temporary file
/// and renamed into place on every mutation.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store for `origin` under `dir`, creating the directory if needed.
    ///
    /// # Errors
    /// Returns an error for an opaque origin (`file:`, `data:`), which has no
    /// storage of its own, or if the directory cannot be created or an
    /// existing file cannot be read or parsed.
    #[instrument(skip_all, fields(origin = %origin.origin().ascii_serialization()))]
    pub fn open(dir: &Path, origin: &Url) -> Result<Self, StoreError> {
        if !origin.origin().is_tuple() {
            return Err(StoreError::OpaqueOrigin(origin.to_string()));
        }
        fs::create_dir_all(dir)?;
        let path = dir.join(origin_file_name(origin));

        let values = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        debug!("opened session store at {}", path.display());

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: Key) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key.as_str()).cloned())
    }

    fn set(&self, key: Key, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        let mut next = values.clone();
        next.insert(key.as_str().to_string(), value.to_string());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }

    fn remove(&self, key: Key) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        if !values.contains_key(key.as_str()) {
            return Ok(());
        }
        let mut next = values.clone();
        next.remove(key.as_str());
        self.persist(&next)?;
        *values = next;
        Ok(())
    }
}

/// Maps an origin (scheme, host, port) to a file name; paths and queries of
/// the URL do not matter.
#[must_use]
pub fn origin_file_name(origin: &Url) -> String {
    let serialized = origin.origin().ascii_serialization();
    let name: String = serialized
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();
    format!("{name}.json")
}

/// Typed view over a [`SessionStore`] for the workflow's entities.
pub struct Session<S> {
    store: Arc<S>,
}

impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SessionStore> Session<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn is_logged_in(&self) -> Result<bool, StoreError> {
        Ok(self.store.get(Key::UserLoggedIn)?.as_deref() == Some(LOGGED_IN))
    }

    /// Writes only the session flag, as done on arrival from another origin.
    ///
    /// # Errors
    /// Returns an error if the write fails.
    pub fn mark_logged_in(&self) -> Result<(), StoreError> {
        self.store.set(Key::UserLoggedIn, LOGGED_IN)
    }

    /// Records a successful authentication.
    ///
    /// # Errors
    /// Returns an error if any write fails.
    pub fn sign_in(&self, email: &str, user: Option<&Value>) -> Result<(), StoreError> {
        self.store.set(Key::UserLoggedIn, LOGGED_IN)?;
        self.store.set(Key::CurrentUserEmail, email)?;
        match user {
            Some(user) => self
                .store
                .set(Key::CurrentUserData, &serde_json::to_string(user)?),
            None => self.store.remove(Key::CurrentUserData),
        }
    }

    /// # Errors
    /// Returns an error if any removal fails.
    pub fn sign_out(&self) -> Result<(), StoreError> {
        self.store.remove(Key::UserLoggedIn)?;
        self.store.remove(Key::CurrentUserEmail)?;
        self.store.remove(Key::CurrentUserData)
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn current_user_email(&self) -> Result<Option<String>, StoreError> {
        self.store.get(Key::CurrentUserEmail)
    }

    /// # Errors
    /// Returns an error if the store cannot be read or holds invalid JSON.
    pub fn current_user_data(&self) -> Result<Option<Value>, StoreError> {
        self.store
            .get(Key::CurrentUserData)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Caches a registration and its email, replacing any previous one.
    ///
    /// # Errors
    /// Returns an error if either write fails.
    pub fn save_pending(&self, pending: &PendingRegistration) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&pending.to_request())?;
        self.store.set(Key::PendingUserData, &serialized)?;
        self.store.set(Key::PendingVerificationEmail, &pending.email)
    }

    /// # Errors
    /// Returns an error if the store cannot be read or holds invalid JSON.
    pub fn pending_registration(&self) -> Result<Option<PendingRegistration>, StoreError> {
        let Some(raw) = self.store.get(Key::PendingUserData)? else {
            return Ok(None);
        };
        let request: CreateAccountRequest = serde_json::from_str(&raw)?;
        Ok(Some(request.into()))
    }

    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn pending_email(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(Key::PendingVerificationEmail)?
            .filter(|email| !email.trim().is_empty()))
    }

    /// # Errors
    /// Returns an error if either removal fails.
    pub fn clear_pending(&self) -> Result<(), StoreError> {
        self.store.remove(Key::PendingUserData)?;
        self.store.remove(Key::PendingVerificationEmail)
    }
}
