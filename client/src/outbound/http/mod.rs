//! HTTP adapters for the remote menu resource.
//!
//! This module provides a thin reqwest implementation of the `MenuStore`
//! port.

mod menu_store;

pub use menu_store::HttpMenuStore;
