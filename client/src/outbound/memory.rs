//! Process-local menu store.
//!
//! Holds one aggregate in memory with the same whole-document semantics as
//! the HTTP backend. Useful for offline runs and for driving the synchronizer
//! in behaviour tests: it counts reads and writes and can fail the next read
//! or write once.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::MenuAggregate;
use crate::domain::ports::{MenuStore, MenuStoreError};

/// In-memory [`MenuStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryMenuStore {
    menu: Mutex<MenuAggregate>,
    pending_fetch_failure: Mutex<Option<MenuStoreError>>,
    pending_replace_failure: Mutex<Option<MenuStoreError>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryMenuStore {
    /// Create a store already holding `menu`.
    #[must_use]
    pub fn with_menu(menu: MenuAggregate) -> Self {
        Self {
            menu: Mutex::new(menu),
            ..Self::default()
        }
    }

    /// Copy of the stored aggregate.
    pub async fn menu(&self) -> MenuAggregate {
        self.menu.lock().await.clone()
    }

    /// Overwrite the stored aggregate, as another writer would.
    pub async fn set_menu(&self, menu: MenuAggregate) {
        *self.menu.lock().await = menu;
    }

    /// Make the next [`MenuStore::fetch_menu`] call fail with `error`.
    pub async fn fail_next_fetch(&self, error: MenuStoreError) {
        *self.pending_fetch_failure.lock().await = Some(error);
    }

    /// Make the next [`MenuStore::replace_menu`] call fail with `error`.
    pub async fn fail_next_replace(&self, error: MenuStoreError) {
        *self.pending_replace_failure.lock().await = Some(error);
    }

    /// Number of reads served or failed so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Acquire)
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }
}

#[async_trait]
impl MenuStore for InMemoryMenuStore {
    async fn fetch_menu(&self) -> Result<MenuAggregate, MenuStoreError> {
        self.reads.fetch_add(1, Ordering::AcqRel);
        if let Some(error) = self.pending_fetch_failure.lock().await.take() {
            return Err(error);
        }
        let menu = self.menu.lock().await.clone();
        // Let other tasks run between the read and the caller's write, the
        // way a network round trip would.
        tokio::task::yield_now().await;
        Ok(menu)
    }

    async fn replace_menu(&self, menu: &MenuAggregate) -> Result<(), MenuStoreError> {
        if let Some(error) = self.pending_replace_failure.lock().await.take() {
            return Err(error);
        }
        tokio::task::yield_now().await;
        *self.menu.lock().await = menu.clone();
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Ingredient};

    #[tokio::test]
    async fn replace_overwrites_the_whole_document() {
        let store = InMemoryMenuStore::with_menu(MenuAggregate::new(
            vec![Ingredient::new(1, "Salt")],
            vec![Category::new(1, "Starters")],
        ));
        let replacement = MenuAggregate::new(vec![Ingredient::new(2, "Pepper")], Vec::new());

        store.replace_menu(&replacement).await.expect("write");

        assert_eq!(store.menu().await, replacement);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn injected_failures_fire_once() {
        let store = InMemoryMenuStore::default();
        store
            .fail_next_fetch(MenuStoreError::transport("offline"))
            .await;
        store
            .fail_next_replace(MenuStoreError::transport("read-only"))
            .await;

        assert!(store.fetch_menu().await.is_err());
        assert!(store.fetch_menu().await.is_ok());
        assert!(store.replace_menu(&MenuAggregate::default()).await.is_err());
        assert!(store.replace_menu(&MenuAggregate::default()).await.is_ok());
        assert_eq!(store.reads(), 2);
        assert_eq!(store.writes(), 1);
    }
}
