// ABOUTME: In-memory session context shared by every component that needs the current token
// ABOUTME: Single writer (sign-in/sign-out paths), many readers notified through a watch channel

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{store::TokenStore, types::SessionToken};

/// Current session token for this process
///
/// Cloning is cheap and every clone observes the same state. Construct once
/// at startup and pass it to the fetcher, manager and detector.
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<Inner>,
}

struct Inner {
    tx: watch::Sender<Option<SessionToken>>,
    generation: AtomicU64,
    /// Held across a store write and the matching context update
    writes: Mutex<()>,
}

impl SessionContext {
    pub fn new(initial: Option<SessionToken>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                tx,
                generation: AtomicU64::new(0),
                writes: Mutex::new(()),
            }),
        }
    }

    /// Start from whatever token survived the last run
    ///
    /// A store read failure starts signed out rather than failing startup.
    pub async fn load(store: &dyn TokenStore) -> Self {
        let initial = match store.get().await {
            Ok(token) => {
                debug!(restored = token.is_some(), "Loaded persisted session");
                token
            }
            Err(e) => {
                warn!("Failed to read persisted session, starting signed out: {}", e);
                None
            }
        };
        Self::new(initial)
    }

    pub fn current(&self) -> Option<SessionToken> {
        self.inner.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.tx.borrow().is_some()
    }

    /// Receiver that wakes on every token change
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionToken>> {
        self.inner.tx.subscribe()
    }

    /// Bumped on each write; data layers re-key their caches on change
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Serializes store-plus-context updates between sign-in and sign-out paths
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.inner.writes.lock().await
    }

    pub(crate) fn set(&self, token: Option<SessionToken>) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.inner.tx.send_replace(token);
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("authenticated", &self.is_authenticated())
            .field("generation", &self.generation())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;

    #[tokio::test]
    async fn test_load_restores_persisted_token() {
        let store = MemoryTokenStore::with_token(SessionToken::new("persisted"));
        let session = SessionContext::load(&store).await;
        assert_eq!(session.current(), Some(SessionToken::new("persisted")));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = SessionContext::new(None);
        let mut rx = session.subscribe();

        session.set(Some(SessionToken::new("t1")));
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(SessionToken::new("t1")));
        assert_eq!(session.generation(), 1);

        let clone = session.clone();
        clone.set(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert!(!session.is_authenticated());
    }
}
