//! Inbound adapters: how views reach the menu core.
//!
//! Rendering is external. This module fixes the call contract: which view a
//! path selects and whether the session gate lets it through.

pub mod routes;

pub use routes::{Navigation, View, resolve};
