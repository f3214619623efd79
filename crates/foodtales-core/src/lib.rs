//! FoodTales client core.
//!
//! A typed client for the FoodTales food social network backend, together
//! with the authentication session store that keeps the user signed in
//! across restarts.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use foodtales_core::{ApiClient, Config, KeyringStore, LoginRequest, SessionStore};
//!
//! let config = Config::load()?;
//! let session = SessionStore::open(KeyringStore::new(&config.keyring_service))?;
//! session.wait_until_loaded().await;
//!
//! let api = ApiClient::new(&config)?.with_session(session.clone());
//! if !session.state().is_authenticated() {
//!     api.login_into(&session, &LoginRequest::new("ana@example.com", "secret")).await?;
//! }
//! let posts = api.get_all_posts().await?;
//! # let _ = posts;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ApiResult, ImageUpload};
pub use auth::{KeyringStore, MemoryStore, SecureStore, Session, SessionPhase, SessionState, SessionStore};
pub use config::Config;
pub use models::*;
