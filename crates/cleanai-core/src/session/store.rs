//! Revisioned owner of the active session.

use tokio::sync::watch;

use super::model::Session;
use super::page::PageId;
use crate::error::Result;

/// Change notification published after every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Revision {
    /// Monotonic counter, bumped once per mutation.
    pub number: u64,
    /// Page active after the mutation.
    pub page: PageId,
}

/// Holds the session and tells subscribers when it needs re-rendering.
///
/// The store is not shared: its single owner (the application controller)
/// serializes every mutation, so no lock guards the session.
#[derive(Debug)]
pub struct SessionStore {
    session: Session,
    revision: u64,
    notifier: watch::Sender<Revision>,
}

impl SessionStore {
    pub fn new(session: Session) -> Self {
        let (notifier, _) = watch::channel(Revision {
            number: 0,
            page: session.page.clone(),
        });
        Self {
            session,
            revision: 0,
            notifier,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Session {
        self.session.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Revision> {
        self.notifier.subscribe()
    }

    /// Applies a mutation and notifies subscribers when it succeeds.
    ///
    /// Mutators must leave the session untouched when they return an error;
    /// a failed update publishes nothing.
    pub fn update<T, F>(&mut self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut Session) -> Result<T>,
    {
        let output = mutate(&mut self.session)?;
        self.revision += 1;
        self.notifier.send_replace(Revision {
            number: self.revision,
            page: self.session.page.clone(),
        });
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanAiError;

    #[test]
    fn test_update_bumps_revision_and_notifies() {
        let mut store = SessionStore::new(Session::default());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store
            .update(|session| {
                session.page = PageId::Upload;
                Ok(())
            })
            .unwrap();

        assert_eq!(store.revision(), 1);
        assert!(rx.has_changed().unwrap());
        let revision = rx.borrow_and_update().clone();
        assert_eq!(revision.number, 1);
        assert_eq!(revision.page, PageId::Upload);
    }

    #[test]
    fn test_failed_update_publishes_nothing() {
        let mut store = SessionStore::new(Session::default());
        let rx = store.subscribe();

        let result: Result<()> = store.update(|_| Err(CleanAiError::internal("nope")));

        assert!(result.is_err());
        assert_eq!(store.revision(), 0);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut store = SessionStore::new(Session::default());
        let before = store.snapshot();
        store
            .update(|session| {
                session.page = PageId::Chat;
                Ok(())
            })
            .unwrap();
        assert_eq!(before.page, PageId::Home);
        assert_eq!(store.session().page, PageId::Chat);
    }
}
