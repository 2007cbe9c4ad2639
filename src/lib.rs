//! Core library for the newsroom web client.
//!
//! Bridges the remote CMS to the shapes the UI consumes:
//!
//! - `api`: authenticated HTTP client and the error taxonomy
//! - `models`: wire records and their flat, UI-ready counterparts
//! - `content`: the service exposing list/fetch/create verbs
//! - `auth`: session state machine and credential persistence
//! - `config`: API endpoint and storage locations
//!
//! Typical wiring, once per process:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use newsroom_core::{ApiClient, Config, ContentService, FileSessionStore, SessionManager};
//!
//! # async fn wire() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let api = ApiClient::new(config.api_base_url.clone())?;
//! let content = Arc::new(ContentService::new(api));
//! let sessions = SessionManager::new(
//!     content.clone(),
//!     Arc::new(FileSessionStore::new(Config::storage_dir()?)),
//! );
//!
//! // Decide Authenticated/Anonymous from the persisted credential before
//! // rendering anything gated.
//! sessions.restore().await;
//!
//! let latest = content.list_articles(&Default::default()).await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod content;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{
    Credential, FileSessionStore, KeyringSessionStore, MemorySessionStore, SessionManager,
    SessionState, SessionStore,
};
pub use config::Config;
pub use content::ContentService;
pub use models::{
    Article, ArticleQuery, ArticleSort, AuthSession, Category, NewArticle, NewCategory, RecordId,
    UploadedImage, UserIdentity,
};
