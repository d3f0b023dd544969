//! Key-value persistence boundary.
//!
//! The core never touches storage directly; it is handed something that
//! implements [`KeyValueStore`]. Reads are forgiving: a missing key, a
//! backend failure or a malformed value all come back as the default state.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::warn;

/// String-valued store with `get`/`set`/`remove`, the shape of browser local
/// storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io failure at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Logical datasets kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Profile,
    Diagnostic,
    Carbon,
    Kpis,
    Risks,
    ActionPlan,
}

impl StoreKey {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Profile,
            Self::Diagnostic,
            Self::Carbon,
            Self::Kpis,
            Self::Risks,
            Self::ActionPlan,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "auditor_profile",
            Self::Diagnostic => "auditor_diagnostic",
            Self::Carbon => "auditor_carbon",
            Self::Kpis => "auditor_kpis",
            Self::Risks => "auditor_risks",
            Self::ActionPlan => "auditor_plan",
        }
    }

    /// Keys dropped when the user signs out. The registers survive.
    pub const fn session_scoped() -> [Self; 3] {
        [Self::Profile, Self::Diagnostic, Self::Carbon]
    }
}

fn read_raw<S>(store: &S, key: StoreKey) -> Option<String>
where
    S: KeyValueStore + ?Sized,
{
    match store.get(key.as_str()) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key = key.as_str(), error = %err, "store read failed; using default state");
            None
        }
    }
}

/// Loads one JSON document, falling back to `T::default()`.
pub fn load_or_default<S, T>(store: &S, key: StoreKey) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let Some(raw) = read_raw(store, key) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            warn!(key = key.as_str(), error = %err, "malformed stored value; using default state");
            T::default()
        }
    }
}

/// Loads a JSON array, keeping every element that parses. A value that is not
/// an array at all loads as empty.
pub fn load_collection<S, T>(store: &S, key: StoreKey) -> Vec<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = read_raw(store, key) else {
        return Vec::new();
    };

    let items = match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!(key = key.as_str(), "stored collection is not an array; using empty collection");
            return Vec::new();
        }
        Err(err) => {
            warn!(key = key.as_str(), error = %err, "malformed stored collection; using empty collection");
            return Vec::new();
        }
    };

    let total = items.len();
    let parsed: Vec<T> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if parsed.len() < total {
        warn!(
            key = key.as_str(),
            dropped = total - parsed.len(),
            "skipping malformed collection entries"
        );
    }

    parsed
}

pub fn save<S, T>(store: &S, key: StoreKey, value: &T) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.as_str().to_string(),
        source,
    })?;
    store.set(key.as_str(), encoded)
}

pub fn clear<S>(store: &S, key: StoreKey) -> Result<(), StoreError>
where
    S: KeyValueStore + ?Sized,
{
    store.remove(key.as_str())
}
