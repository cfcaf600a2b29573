//! Durable credential storage.
//!
//! Two independent credential values coexist: the end-user bearer JWT and
//! the separately-scoped administrator token. Storage can fail (missing
//! file, permissions, corrupt content) - every operation degrades to a
//! no-op plus a logged warning rather than surfacing an error, so a broken
//! store behaves exactly like an empty one.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Discriminator between the two independently-held credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// End-user session token (a bearer JWT).
    User,
    /// Administrator token, either `Bearer <jwt>` or a raw token string.
    Admin,
}

impl CredentialKind {
    /// Storage key, shared with the original web client so credentials
    /// survive a migration between shells.
    pub fn storage_key(&self) -> &'static str {
        match self {
            CredentialKind::User => "token",
            CredentialKind::Admin => "medtriage_admin_token",
        }
    }
}

/// Key-value persistence for credentials.
///
/// Writing a value overwrites the prior one for that kind; at most one
/// value per kind exists at a time. Implementations must not panic on
/// storage failure.
pub trait CredentialStore: Send + Sync {
    fn get(&self, kind: CredentialKind) -> Option<String>;
    fn set(&self, kind: CredentialKind, value: &str);
    fn clear(&self, kind: CredentialKind);
}

/// File-backed store: a flat JSON object at a configured path.
///
/// The file is re-read on every `get` so that concurrent shells sharing
/// the path observe each other's logins/logouts; the last write wins.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_all(&self) -> HashMap<String, String> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                tracing::warn!("Failed to read credential store {:?}: {}", self.path, err);
                return HashMap::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(err) => {
                tracing::warn!("Corrupt credential store {:?}: {}", self.path, err);
                HashMap::new()
            }
        }
    }

    fn write_all(&self, map: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(map) {
            Ok(s) => s,
            Err(err) => {
                tracing::warn!("Failed to serialize credential store: {}", err);
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, serialized) {
            tracing::warn!("Failed to write credential store {:?}: {}", self.path, err);
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.read_all().remove(kind.storage_key())
    }

    fn set(&self, kind: CredentialKind, value: &str) {
        let mut map = self.read_all();
        map.insert(kind.storage_key().to_string(), value.to_string());
        self.write_all(&map);
    }

    fn clear(&self, kind: CredentialKind) {
        let mut map = self.read_all();
        if map.remove(kind.storage_key()).is_some() {
            self.write_all(&map);
        }
    }
}

/// In-memory store for tests and ephemeral shells.
#[derive(Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<CredentialKind, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        match self.values.read() {
            Ok(values) => values.get(&kind).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, kind: CredentialKind, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(kind, value.to_string());
        }
    }

    fn clear(&self, kind: CredentialKind) {
        if let Ok(mut values) = self.values.write() {
            values.remove(&kind);
        }
    }
}

/// Admin credential with its header-construction rule.
///
/// The stored admin value is either `Bearer <jwt>` or a raw token. Instead
/// of prefix-sniffing at every call site, the value is parsed once into
/// this type; each variant knows which header it becomes. Exactly one of
/// the two headers is ever sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCredential {
    /// JWT sent as `Authorization: Bearer <token>`.
    Bearer(String),
    /// Legacy shared secret sent as `X-Admin-Token: <token>`.
    Raw(String),
}

impl AdminCredential {
    const BEARER_PREFIX: &'static str = "Bearer ";

    /// Parse the stored admin value into its discriminated form.
    pub fn parse(stored: &str) -> Self {
        match stored.strip_prefix(Self::BEARER_PREFIX) {
            Some(token) => AdminCredential::Bearer(token.to_string()),
            None => AdminCredential::Raw(stored.to_string()),
        }
    }

    /// Load and parse the admin credential from a store, if present.
    pub fn load(store: &dyn CredentialStore) -> Option<Self> {
        store.get(CredentialKind::Admin).map(|v| Self::parse(&v))
    }

    /// The stored string form, as written at login time.
    pub fn to_stored(&self) -> String {
        match self {
            AdminCredential::Bearer(token) => format!("{}{token}", Self::BEARER_PREFIX),
            AdminCredential::Raw(token) => token.clone(),
        }
    }

    /// Apply this credential to an outgoing request.
    pub fn apply(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self {
            AdminCredential::Bearer(token) => request.bearer_auth(token),
            AdminCredential::Raw(token) => request.header("X-Admin-Token", token),
        }
    }
}
