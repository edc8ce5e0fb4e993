//! Outbound adapters implementing domain ports.

pub mod http;
pub mod memory;
