//! Application context bundling the session gate and the synchronizer.
//!
//! Owned by the application root and handed to every view, usually behind an
//! `Arc`. There is no ambient global: two contexts are fully independent.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::error::SyncError;
use super::menu::MenuSnapshot;
use super::ports::MenuStore;
use super::session::SessionGate;
use super::synchronizer::{MenuSynchronizer, SyncPolicy, SyncState, SyncStatus};

/// Gated entry point views use to read and mutate the menu.
pub struct MenuAdmin<S: ?Sized> {
    session: SessionGate,
    menu: MenuSynchronizer<S>,
}

impl<S: ?Sized> MenuAdmin<S> {
    /// Create an unauthenticated context over `store`.
    #[must_use]
    pub fn new(store: Arc<S>, policy: SyncPolicy) -> Self {
        Self {
            session: SessionGate::new(),
            menu: MenuSynchronizer::with_policy(store, policy),
        }
    }

    /// Return whether the session gate has been passed.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Access the synchronizer once authenticated.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Unauthenticated`] before [`Self::authenticate`].
    pub fn menu(&self) -> Result<&MenuSynchronizer<S>, SyncError> {
        if self.session.is_authenticated() {
            Ok(&self.menu)
        } else {
            Err(SyncError::Unauthenticated)
        }
    }

    /// Current snapshot, readable in any state.
    #[must_use]
    pub fn snapshot(&self) -> MenuSnapshot {
        self.menu.snapshot()
    }

    /// Current synchronizer status, readable in any state.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.menu.status()
    }

    /// Watch snapshot and status changes, in any state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.menu.subscribe()
    }
}

impl<S> MenuAdmin<S>
where
    S: MenuStore + ?Sized,
{
    /// Pass the session gate.
    ///
    /// The call that performs the transition also runs the initial load and
    /// returns its result; the session stays authenticated when that load
    /// fails. Calls on an authenticated session do nothing.
    ///
    /// # Errors
    ///
    /// Returns the initial load failure.
    pub async fn authenticate(&self) -> Result<(), SyncError> {
        if !self.session.authenticate() {
            return Ok(());
        }
        info!("session authenticated; loading menu");
        self.menu.load_menu().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MenuStoreError, MockMenuStore};
    use crate::domain::{Ingredient, MenuAggregate};

    fn admin_over(store: MockMenuStore) -> MenuAdmin<MockMenuStore> {
        MenuAdmin::new(Arc::new(store), SyncPolicy::default())
    }

    #[test]
    fn menu_is_gated_until_authenticated() {
        let admin = admin_over(MockMenuStore::new());

        assert!(!admin.is_authenticated());
        assert!(matches!(admin.menu(), Err(SyncError::Unauthenticated)));
        assert_eq!(admin.snapshot(), MenuSnapshot::default());
        assert_eq!(admin.status(), SyncStatus::Unloaded);
    }

    #[tokio::test]
    async fn authentication_loads_the_menu_exactly_once() {
        let mut store = MockMenuStore::new();
        store.expect_fetch_menu().times(1).returning(|| {
            Ok(MenuAggregate::new(
                vec![Ingredient::new(1, "Salt")],
                Vec::new(),
            ))
        });
        let admin = admin_over(store);

        admin.authenticate().await.expect("initial load");
        admin.authenticate().await.expect("second call is a no-op");

        assert!(admin.is_authenticated());
        assert_eq!(admin.status(), SyncStatus::Loaded);
        assert_eq!(admin.snapshot().ingredients, vec![Ingredient::new(1, "Salt")]);
    }

    #[tokio::test]
    async fn failed_initial_load_keeps_the_session_open() {
        let mut store = MockMenuStore::new();
        store
            .expect_fetch_menu()
            .times(2)
            .returning(|| Err(MenuStoreError::transport("connection refused")));
        let admin = admin_over(store);

        let error = admin.authenticate().await.expect_err("load fails");
        assert!(error.is_transport());
        assert!(admin.is_authenticated());
        assert_eq!(admin.status(), SyncStatus::Unloaded);

        let menu = admin.menu().expect("gate passed");
        assert!(menu.load_menu().await.is_err(), "views may retry manually");
    }
}
