//! jar-core
//!
//! Allocation, store, and chart logic for jar budgeting.
//! Depends on jar-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod allocation_service;
pub mod arc_service;
pub mod error;
pub mod public_api;
pub mod store;
pub mod sync_service;

pub use allocation_service::*;
pub use arc_service::*;
pub use error::{CoreError, RemoteError};
pub use public_api::*;
pub use store::*;
pub use sync_service::*;

#[cfg(test)]
mod tests;
