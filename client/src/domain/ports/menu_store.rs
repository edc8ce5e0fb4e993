//! Driven port for the remote menu aggregate.
//!
//! The backend exposes the menu only as a whole document, so the contract is
//! exactly one read and one full replace. Adapters own transport concerns and
//! must not retry: failures propagate verbatim to the synchronizer.

use async_trait::async_trait;

use crate::domain::MenuAggregate;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced by menu store adapters.
    pub enum MenuStoreError {
        /// Network failure or a non-success status from the backend.
        Transport {
            /// Reqwest failure text or `status N[: body preview]`.
            message: String,
        } => "menu store transport failed: {message}",
        /// The response body could not be decoded into a menu aggregate.
        Decode {
            /// Serde failure text.
            message: String,
        } => "menu store response decode failed: {message}",
    }
}

/// Port for reading and replacing the whole menu aggregate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Fetch the current aggregate.
    ///
    /// # Examples
    ///
    /// ```
    /// use menu_admin::domain::ports::{FixtureMenuStore, MenuStore};
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let menu = FixtureMenuStore.fetch_menu().await?;
    /// assert!(menu.ingredients.is_empty());
    /// # Ok::<(), menu_admin::domain::ports::MenuStoreError>(())
    /// # }).unwrap();
    /// ```
    async fn fetch_menu(&self) -> Result<MenuAggregate, MenuStoreError>;

    /// Replace the stored aggregate with `menu` in full.
    async fn replace_menu(&self, menu: &MenuAggregate) -> Result<(), MenuStoreError>;
}

/// Fixture implementation returning an empty menu and discarding writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMenuStore;

#[async_trait]
impl MenuStore for FixtureMenuStore {
    async fn fetch_menu(&self) -> Result<MenuAggregate, MenuStoreError> {
        Ok(MenuAggregate::default())
    }

    async fn replace_menu(&self, _menu: &MenuAggregate) -> Result<(), MenuStoreError> {
        Ok(())
    }
}
