//! Session lifecycle: the authentication state machine.
//!
//! A `SessionManager` is constructed once per process with its storage and
//! content-service dependencies injected. UI consumers observe state through
//! `subscribe()`; `Validating` means "not yet decided" and should render as a
//! loading indicator, never as a redirect.
//!
//! Transitions are sequenced with a request-generation counter: an async
//! result commits only if no other transition landed while it was in flight.
//! A stale startup validation can therefore never overwrite a login or
//! logout that resolved first.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiError;
use crate::content::ContentService;
use crate::models::UserIdentity;

use super::store::{Credential, SessionStore};

/// Authentication state observed by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Process start, before the restore check has run.
    Unknown,
    /// A persisted credential is being re-validated against the server.
    Validating,
    Authenticated(UserIdentity),
    Anonymous,
}

impl SessionState {
    /// The startup decision is still pending; gate protected views on a
    /// loading indicator while this holds.
    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::Unknown | SessionState::Validating)
    }
}

pub struct SessionManager {
    content: Arc<ContentService>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<SessionState>,
    generation: AtomicU64,
}

impl SessionManager {
    pub fn new(content: Arc<ContentService>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            content,
            store,
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Observe session state. A consumer torn down mid-validation just drops
    /// its receiver; no late result reaches it.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(&*self.state.borrow(), SessionState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<UserIdentity> {
        match &*self.state.borrow() {
            SessionState::Authenticated(identity) => Some(identity.clone()),
            _ => None,
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Commit a transition. With `expected`, the commit lands only if the
    /// generation is unchanged since the caller observed it, so results that
    /// raced with a newer transition are discarded. Without, it always
    /// lands. Returns the new generation on success.
    fn commit(&self, expected: Option<u64>, next: SessionState) -> Option<u64> {
        let generation = match expected {
            Some(seen) => {
                match self.generation.compare_exchange(
                    seen,
                    seen + 1,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => seen + 1,
                    Err(current) => {
                        debug!(seen, current, "discarding stale session transition");
                        return None;
                    }
                }
            }
            None => self.generation.fetch_add(1, Ordering::AcqRel) + 1,
        };
        self.state.send_replace(next);
        Some(generation)
    }

    /// Startup restore: decide `Authenticated` or `Anonymous` from the
    /// persisted credential, re-validated against the server. No persisted
    /// credential means `Anonymous` without a network call. A rejected
    /// credential is cleared so a stale token cannot leak into later
    /// requests.
    pub async fn restore(&self) {
        let seen = self.generation();
        let credential = match self.store.load() {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                self.commit(Some(seen), SessionState::Anonymous);
                return;
            }
            Err(e) => {
                warn!(error = %e, "failed to read persisted session");
                if self.commit(Some(seen), SessionState::Anonymous).is_some() {
                    if let Err(e) = self.store.clear() {
                        warn!(error = %e, "failed to clear unreadable session");
                    }
                }
                return;
            }
        };

        let Some(seen) = self.commit(Some(seen), SessionState::Validating) else {
            return;
        };
        self.content.set_token(Some(credential.token.clone()));

        if self.content.validate_session().await {
            if self
                .commit(Some(seen), SessionState::Authenticated(credential.identity.clone()))
                .is_some()
            {
                info!(username = %credential.identity.username, "session restored");
            }
        } else if self.commit(Some(seen), SessionState::Anonymous).is_some() {
            self.content.set_token(None);
            if let Err(e) = self.store.clear() {
                warn!(error = %e, "failed to clear rejected session");
            }
            info!("persisted session rejected, cleared");
        }
    }

    /// Exchange credentials for a session. On success the credential is
    /// persisted and the state becomes `Authenticated`; on failure the state
    /// is left untouched and the typed error is surfaced to the caller.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<UserIdentity, ApiError> {
        let session = self.content.login(identifier, password).await?;
        let identity = session.user.clone();

        self.commit(None, SessionState::Authenticated(identity.clone()));
        self.content.set_token(Some(session.token.clone()));
        if let Err(e) = self
            .store
            .save(&Credential::new(session.token, session.user))
        {
            // The in-memory session is still good; it just will not survive
            // a reload.
            warn!(error = %e, "failed to persist session");
        }

        info!(username = %identity.username, "logged in");
        Ok(identity)
    }

    /// Drop the session unconditionally: clear the persisted credential and
    /// become `Anonymous`. No server round-trip; never fails.
    pub fn logout(&self) {
        self.commit(None, SessionState::Anonymous);
        self.content.set_token(None);
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear persisted session");
        }
        info!("logged out");
    }
}
