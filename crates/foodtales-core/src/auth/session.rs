use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, warn};

use super::credentials::SecureStore;
use crate::models::UserProfile;

/// Credential store key holding the raw bearer token
pub const TOKEN_KEY: &str = "authToken";

/// Credential store key holding the JSON snapshot of the user profile
pub const USER_KEY: &str = "authUser";

/// In-memory session state as seen by the rest of the app.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    /// True until the stored session has been read once.
    pub loading: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Bootstrapping,
    Unauthenticated,
    Authenticated,
}

impl SessionState {
    fn bootstrapping() -> Self {
        Self {
            token: None,
            user: None,
            loading: true,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Bootstrapping
        } else if self.token.is_some() && self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user.as_ref().map(|u| &u.user_id))
            .field("loading", &self.loading)
            .finish()
    }
}

/// A complete session, set or cleared as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated { token: String, user: UserProfile },
    Unauthenticated,
}

enum Command {
    Persist {
        key: &'static str,
        value: Option<String>,
    },
    Flush(oneshot::Sender<()>),
}

struct Shared {
    state: watch::Sender<SessionState>,
    /// Set by any setter; a bootstrap result arriving afterwards is dropped.
    modified: AtomicBool,
}

/// Process-wide authentication session backed by a [`SecureStore`].
///
/// Reads are synchronous snapshots. Setters update memory immediately and
/// hand persistence to a single background worker, so they never block and
/// never fail. The worker applies writes in the order they were made, which
/// makes the last write to a key the one that sticks.
///
/// Clone is cheap; all clones share the same state and worker.
#[derive(Clone)]
pub struct SessionStore {
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionStore {
    /// Create the store and start loading the persisted session.
    ///
    /// Must be called from within a tokio runtime. The returned store starts
    /// in the bootstrapping phase; see [`SessionStore::wait_until_loaded`].
    pub fn open<S: SecureStore>(store: S) -> Result<Self> {
        let runtime = tokio::runtime::Handle::try_current()
            .context("SessionStore must be opened inside a tokio runtime")?;

        let (state, _) = watch::channel(SessionState::bootstrapping());
        let shared = Arc::new(Shared {
            state,
            modified: AtomicBool::new(false),
        });
        let (commands, rx) = mpsc::unbounded_channel();

        let store: Arc<dyn SecureStore> = Arc::new(store);
        runtime.spawn(run_worker(store, Arc::clone(&shared), rx));

        Ok(Self { shared, commands })
    }

    /// Snapshot of the current in-memory state.
    pub fn state(&self) -> SessionState {
        self.shared.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.shared.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.shared.state.borrow().user.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.shared.state.borrow().loading
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.shared.state.subscribe()
    }

    /// Wait for the initial load to finish and return the resulting state.
    pub async fn wait_until_loaded(&self) -> SessionState {
        let mut rx = self.subscribe();
        let loaded = rx.wait_for(|state| !state.loading).await.map(|state| state.clone());
        match loaded {
            Ok(state) => state,
            Err(_) => self.state(),
        }
    }

    /// Replace the token. An empty token counts as absent.
    pub fn set_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        self.update(|state| state.token = token.clone());
        self.persist(TOKEN_KEY, token);
    }

    /// Replace the cached user profile.
    pub fn set_user(&self, user: Option<UserProfile>) {
        let snapshot = user.as_ref().map(serialize_user);
        self.update(|state| state.user = user);
        match snapshot {
            None => self.persist(USER_KEY, None),
            Some(Some(json)) => self.persist(USER_KEY, Some(json)),
            // Serialization failed; memory is updated, storage keeps the old value
            Some(None) => {}
        }
    }

    /// Set or clear token and user together. An empty token counts as
    /// absent, so it signs the session out.
    pub fn set_session(&self, session: Session) {
        match session {
            Session::Authenticated { token, .. } if token.is_empty() => {
                warn!("Sign-in without a token; clearing session instead");
                self.set_session(Session::Unauthenticated);
            }
            Session::Authenticated { token, user } => {
                let snapshot = serialize_user(&user);
                info!(user_id = %user.user_id, "Signing in");
                let persisted_token = token.clone();
                self.update(|state| {
                    state.token = Some(token);
                    state.user = Some(user);
                });
                self.persist(TOKEN_KEY, Some(persisted_token));
                if let Some(json) = snapshot {
                    self.persist(USER_KEY, Some(json));
                }
            }
            Session::Unauthenticated => {
                info!("Signing out");
                self.update(|state| {
                    state.token = None;
                    state.user = None;
                });
                self.persist(TOKEN_KEY, None);
                self.persist(USER_KEY, None);
            }
        }
    }

    pub fn sign_in(&self, token: impl Into<String>, user: UserProfile) {
        self.set_session(Session::Authenticated {
            token: token.into(),
            user,
        });
    }

    pub fn sign_out(&self) {
        self.set_session(Session::Unauthenticated);
    }

    /// Wait until every write requested before this call has been applied
    /// (or has failed and been logged).
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.commands.send(Command::Flush(done)).is_ok() {
            let _ = wait.await;
        }
    }

    fn update(&self, apply: impl FnOnce(&mut SessionState)) {
        let shared = &self.shared;
        shared.state.send_modify(|state| {
            shared.modified.store(true, Ordering::SeqCst);
            apply(state);
        });
    }

    fn persist(&self, key: &'static str, value: Option<String>) {
        if self.commands.send(Command::Persist { key, value }).is_err() {
            warn!(key, "Session persistence worker stopped; change kept in memory only");
        }
    }
}

fn serialize_user(user: &UserProfile) -> Option<String> {
    match serde_json::to_string(user) {
        Ok(json) => Some(json),
        Err(e) => {
            warn!(error = %e, "Failed to serialize user profile; not persisting it");
            None
        }
    }
}

async fn run_worker(
    store: Arc<dyn SecureStore>,
    shared: Arc<Shared>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let loaded = load_session(&store).await;
    shared.state.send_modify(|state| {
        if shared.modified.load(Ordering::SeqCst) {
            debug!("Session changed while loading; keeping in-memory state");
        } else if let Session::Authenticated { token, user } = loaded {
            state.token = Some(token);
            state.user = Some(user);
        }
        state.loading = false;
    });

    while let Some(command) = rx.recv().await {
        match command {
            Command::Persist { key, value } => write_entry(&store, key, value).await,
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Session persistence worker finished");
}

/// Read the stored pair. Anything short of a present token plus a parseable
/// user yields `Unauthenticated`.
async fn load_session(store: &Arc<dyn SecureStore>) -> Session {
    let reader = Arc::clone(store);
    let read = tokio::task::spawn_blocking(move || -> Result<(Option<String>, Option<String>)> {
        let token = reader.get(TOKEN_KEY)?;
        let user = reader.get(USER_KEY)?;
        Ok((token, user))
    })
    .await;

    let (token, user_json) = match read {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => {
            error!(error = %e, "Failed to load stored session");
            return Session::Unauthenticated;
        }
        Err(e) => {
            error!(error = %e, "Session load task failed");
            return Session::Unauthenticated;
        }
    };

    match (token.filter(|t| !t.is_empty()), user_json) {
        (Some(token), Some(user_json)) => match serde_json::from_str::<UserProfile>(&user_json) {
            Ok(user) => {
                info!(user_id = %user.user_id, "Restored stored session");
                Session::Authenticated { token, user }
            }
            Err(e) => {
                warn!(error = %e, "Stored user profile is unreadable; starting signed out");
                Session::Unauthenticated
            }
        },
        (None, None) => {
            debug!("No stored session");
            Session::Unauthenticated
        }
        (token, user) => {
            warn!(
                has_token = token.is_some(),
                has_user = user.is_some(),
                "Incomplete stored session; starting signed out"
            );
            Session::Unauthenticated
        }
    }
}

async fn write_entry(store: &Arc<dyn SecureStore>, key: &'static str, value: Option<String>) {
    let writer = Arc::clone(store);
    let result = tokio::task::spawn_blocking(move || match value {
        Some(value) => writer.set(key, &value),
        None => writer.delete(key),
    })
    .await;

    match result {
        Ok(Ok(())) => debug!(key, "Persisted session entry"),
        Ok(Err(e)) => warn!(key, error = %e, "Failed to persist session entry"),
        Err(e) => error!(key, error = %e, "Session write task failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryStore;
    use crate::models::UserType;

    const STORED_USER: &str = r#"{"userId":"1","email":"a@b.com","name":"A","bio":"","userType":"CONSUMER","profilePicture":"","createdAt":"","updatedAt":""}"#;

    fn sample_user() -> UserProfile {
        UserProfile {
            user_id: "42".to_string(),
            email: "chef@foodtales.app".to_string(),
            name: "Chef".to_string(),
            bio: "Street tacos and \"mole\" \u{1F32E}".to_string(),
            user_type: UserType::Influencer,
            profile_picture: "https://cdn.example/chef.jpg".to_string(),
            created_at: "2024-11-20T10:00:00".to_string(),
            updated_at: "2024-11-21T08:30:00".to_string(),
        }
    }

    async fn open_loaded(store: Arc<MemoryStore>) -> SessionStore {
        let session = SessionStore::open(store).unwrap();
        session.wait_until_loaded().await;
        session
    }

    #[tokio::test]
    async fn test_fresh_install_is_unauthenticated() {
        let session = SessionStore::open(MemoryStore::new()).unwrap();
        assert_eq!(session.state().phase(), SessionPhase::Bootstrapping);

        let state = session.wait_until_loaded().await;
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);
        assert!(!state.loading);
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_restores_stored_session() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, STORED_USER)]);
        let session = open_loaded(Arc::new(store)).await;

        let state = session.state();
        assert!(state.is_authenticated());
        assert_eq!(state.token.as_deref(), Some("abc123"));
        assert_eq!(state.user.map(|u| u.name).as_deref(), Some("A"));
    }

    #[tokio::test]
    async fn test_corrupt_user_resets_whole_session() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, "{not json")]);
        let session = open_loaded(Arc::new(store)).await;

        let state = session.state();
        assert!(!state.loading);
        assert_eq!(state.user, None);
        assert_eq!(state.token, None);
    }

    #[tokio::test]
    async fn test_partial_pair_is_unauthenticated() {
        let only_token = MemoryStore::with_entries([(TOKEN_KEY, "abc123")]);
        let session = open_loaded(Arc::new(only_token)).await;
        assert_eq!(session.state().phase(), SessionPhase::Unauthenticated);
        assert_eq!(session.token(), None);

        let only_user = MemoryStore::with_entries([(USER_KEY, STORED_USER)]);
        let session = open_loaded(Arc::new(only_user)).await;
        assert_eq!(session.state().phase(), SessionPhase::Unauthenticated);
        assert_eq!(session.user(), None);
    }

    #[tokio::test]
    async fn test_read_failure_falls_back_to_unauthenticated() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, STORED_USER)]));
        store.set_fail_reads(true);
        let session = open_loaded(Arc::clone(&store)).await;

        assert!(!session.is_loading());
        assert!(!session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_set_token_is_visible_immediately() {
        let store = Arc::new(MemoryStore::new());
        let session = open_loaded(Arc::clone(&store)).await;

        session.set_token(Some("t1".to_string()));
        assert_eq!(session.token().as_deref(), Some("t1"));

        session.flush().await;
        assert_eq!(store.peek(TOKEN_KEY).as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_rapid_token_changes_last_write_wins() {
        let store = Arc::new(MemoryStore::new());
        let session = open_loaded(Arc::clone(&store)).await;

        session.set_token(Some("xyz".to_string()));
        session.set_token(None);
        session.flush().await;

        assert_eq!(session.token(), None);
        assert_eq!(store.peek(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_user_survives_restart() {
        let store = Arc::new(MemoryStore::new());
        let session = open_loaded(Arc::clone(&store)).await;
        let user = sample_user();

        session.sign_in("tok", user.clone());
        session.flush().await;
        drop(session);

        let restarted = open_loaded(Arc::clone(&store)).await;
        assert_eq!(restarted.user(), Some(user));
        assert_eq!(restarted.token().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_set_user_twice_converges() {
        let store = Arc::new(MemoryStore::new());
        let session = open_loaded(Arc::clone(&store)).await;
        let user = sample_user();

        session.set_user(Some(user.clone()));
        session.set_user(Some(user.clone()));
        session.flush().await;

        assert_eq!(session.user(), Some(user.clone()));
        let stored = store.peek(USER_KEY).expect("user persisted");
        assert_eq!(serde_json::from_str::<UserProfile>(&stored).unwrap(), user);
    }

    #[tokio::test]
    async fn test_sign_out_clears_memory_and_storage() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, STORED_USER)]));
        let session = open_loaded(Arc::clone(&store)).await;
        assert!(session.state().is_authenticated());

        session.sign_out();
        assert_eq!(session.state().phase(), SessionPhase::Unauthenticated);

        session.flush().await;
        assert_eq!(store.peek(TOKEN_KEY), None);
        assert_eq!(store.peek(USER_KEY), None);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_change() {
        let store = Arc::new(MemoryStore::new());
        let session = open_loaded(Arc::clone(&store)).await;
        store.set_fail_writes(true);

        session.sign_in("tok", sample_user());
        session.flush().await;

        assert!(session.state().is_authenticated());
        assert_eq!(store.peek(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_change_during_loading_wins_over_stored_session() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, STORED_USER)]));
        let session = SessionStore::open(Arc::clone(&store)).unwrap();

        // The worker has not run yet on the current-thread runtime
        session.sign_out();
        let state = session.wait_until_loaded().await;
        assert!(!state.loading);
        assert_eq!(state.token, None);

        session.flush().await;
        assert_eq!(store.peek(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_empty_token_counts_as_absent() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "old")]));
        let session = open_loaded(Arc::clone(&store)).await;

        session.set_token(Some(String::new()));
        session.flush().await;
        assert_eq!(session.token(), None);
        assert_eq!(store.peek(TOKEN_KEY), None);
    }

    #[tokio::test]
    async fn test_sign_in_with_empty_token_clears_session() {
        let store = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "abc123"), (USER_KEY, STORED_USER)]));
        let session = open_loaded(Arc::clone(&store)).await;

        session.sign_in("", sample_user());
        let state = session.state();
        assert_eq!(state.phase(), SessionPhase::Unauthenticated);
        assert_eq!(state.token, None);
        assert_eq!(state.user, None);

        session.flush().await;
        assert_eq!(store.peek(TOKEN_KEY), None);
        assert_eq!(store.peek(USER_KEY), None);

        drop(session);
        let restarted = open_loaded(Arc::clone(&store)).await;
        assert_eq!(restarted.state().phase(), SessionPhase::Unauthenticated);
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = open_loaded(Arc::new(MemoryStore::new())).await;
        let mut rx = session.subscribe();

        session.sign_in("tok", sample_user());
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_authenticated());
    }

    #[test]
    fn test_open_outside_runtime_fails() {
        assert!(SessionStore::open(MemoryStore::new()).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let state = SessionState {
            token: Some("secret-token".to_string()),
            user: None,
            loading: false,
        };
        assert!(!format!("{:?}", state).contains("secret-token"));
    }
}
