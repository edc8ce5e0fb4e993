//! Domain primitives, ports, and the menu synchronisation services.
//!
//! Purpose: keep the read-modify-write discipline independent of transport.
//! Adapters live under `outbound`; nothing in here knows about HTTP.
//!
//! Public surface:
//! - [`MenuAggregate`], [`MenuSnapshot`] and the entity types.
//! - [`Mutation`] and [`MenuEntity`], the generic mutation protocol.
//! - [`MenuSynchronizer`], the read-modify-write core.
//! - [`SessionGate`] and [`MenuAdmin`], the gated application context.
//! - [`SyncError`], the error surfaced to callers.

pub mod error;
pub mod menu;
pub mod menu_admin;
pub mod mutation;
pub mod ports;
pub mod session;
pub mod synchronizer;

pub use self::error::SyncError;
pub use self::menu::{
    Category, Dish, EntityId, Ingredient, MenuAggregate, MenuSnapshot, MenuSummary,
};
pub use self::menu_admin::MenuAdmin;
pub use self::mutation::{EntityKind, MenuEntity, Mutation, MutationOutcome};
pub use self::session::SessionGate;
pub use self::synchronizer::{
    MenuSynchronizer, MissingTargetPolicy, SyncPolicy, SyncState, SyncStatus, WriteOrdering,
};
