use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use keyring::Entry;

/// Default keychain service name
pub const DEFAULT_SERVICE_NAME: &str = "foodtales";

/// Persistent key-value storage with encryption at rest.
///
/// Implementations are blocking; async callers should run them on a
/// blocking thread.
pub trait SecureStore: Send + Sync + 'static {
    /// Read a value. A missing key is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Create or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

/// OS keychain backed store, one keyring entry per key.
#[derive(Debug, Clone)]
pub struct KeyringStore {
    service: String,
}

impl KeyringStore {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn entry(&self, key: &str) -> Result<Entry> {
        Entry::new(&self.service, key).context("Failed to create keyring entry")
    }
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl SecureStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {} from keychain", key)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entry(key)?
            .set_password(value)
            .with_context(|| format!("Failed to store {} in keychain", key))
    }

    fn delete(&self, key: &str) -> Result<()> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {} from keychain", key)),
        }
    }
}

/// In-process store for tests and ephemeral sessions.
///
/// Reads and writes can be made to fail on demand to exercise the
/// recovery paths of the session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.entries.lock() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current raw value for `key`, bypassing failure injection.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.entries.lock().ok().and_then(|map| map.get(key).cloned())
    }

    fn check(&self, flag: &AtomicBool, op: &str) -> Result<()> {
        if flag.load(Ordering::SeqCst) {
            Err(anyhow!("Secure storage unavailable ({})", op))
        } else {
            Ok(())
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Secure storage lock poisoned"))
    }
}

impl SecureStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check(&self.fail_reads, "read")?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check(&self.fail_writes, "write")?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.check(&self.fail_writes, "delete")?;
        self.lock()?.remove(key);
        Ok(())
    }
}

impl<S: SecureStore + ?Sized> SecureStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("authToken").unwrap(), None);

        store.set("authToken", "abc").unwrap();
        assert_eq!(store.get("authToken").unwrap().as_deref(), Some("abc"));

        store.delete("authToken").unwrap();
        assert_eq!(store.get("authToken").unwrap(), None);
        // Deleting again is fine
        store.delete("authToken").unwrap();
    }

    #[test]
    fn test_memory_store_failure_injection() {
        let store = MemoryStore::with_entries([("authToken", "abc")]);
        store.set_fail_reads(true);
        assert!(store.get("authToken").is_err());
        store.set_fail_reads(false);

        store.set_fail_writes(true);
        assert!(store.set("authToken", "xyz").is_err());
        assert!(store.delete("authToken").is_err());
        assert_eq!(store.peek("authToken").as_deref(), Some("abc"));
    }

    #[test]
    fn test_keyring_store_default_service() {
        assert_eq!(KeyringStore::default().service(), DEFAULT_SERVICE_NAME);
    }
}
