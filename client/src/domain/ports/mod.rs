//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod menu_store;

#[cfg(test)]
pub use menu_store::MockMenuStore;
pub use menu_store::{FixtureMenuStore, MenuStore, MenuStoreError};
