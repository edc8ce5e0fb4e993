//! Session-gated menu administration client.
//!
//! The remote menu is a single JSON document exposing only whole-document
//! `GET` and `PUT`. Every ingredient, category, and dish mutation is therefore
//! a read-modify-write cycle against the full aggregate, after which the local
//! snapshot collection for the touched entity kind is replaced.
//!
//! # Layout
//!
//! - [`domain`]: entities, the [`domain::MenuSynchronizer`] core, the session
//!   gate, and the [`domain::ports::MenuStore`] port.
//! - [`outbound`]: store adapters (reqwest over HTTP, in-memory).
//! - [`inbound`]: the routing contract views use to reach the core.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use menu_admin::domain::{Ingredient, MenuAdmin, SyncPolicy};
//! use menu_admin::outbound::memory::InMemoryMenuStore;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let store = Arc::new(InMemoryMenuStore::default());
//! let admin = MenuAdmin::new(store, SyncPolicy::default());
//!
//! admin.authenticate().await.expect("initial load");
//! admin
//!     .menu()
//!     .expect("authenticated")
//!     .add_ingredient(Ingredient::new(1, "Salt"))
//!     .await
//!     .expect("add succeeds");
//! assert_eq!(admin.snapshot().ingredients.len(), 1);
//! # });
//! ```

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod telemetry;

pub use config::ClientSettings;
