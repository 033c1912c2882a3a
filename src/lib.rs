//! Client core for the department portal: REST access, searchable
//! collections, admin managers with dialogs, the cookie session and
//! polling public feeds.

pub mod api;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod directory;
pub mod domain;
pub mod error;
pub mod feed;
pub mod form;
pub mod manager;
pub mod poll;
pub mod search;
pub mod session;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use context::PortalContext;
pub use error::{PortalError, Result};
