//! Authentication module for managing the user session and credentials.
//!
//! This module provides:
//! - `SessionStore`: in-memory session state with write-through persistence
//! - `SecureStore`: the credential storage seam, with an OS keychain
//!   implementation (`KeyringStore`) and an in-process one (`MemoryStore`)
//!
//! The session survives restarts as two keychain entries, `authToken` and
//! `authUser`.

pub mod credentials;
pub mod session;

pub use credentials::{KeyringStore, MemoryStore, SecureStore, DEFAULT_SERVICE_NAME};
pub use session::{Session, SessionPhase, SessionState, SessionStore, TOKEN_KEY, USER_KEY};
