//! jar-domain
//!
//! Pure domain models for jar budgeting (categories, jars, chart geometry,
//! remote payloads). No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod chart;
pub mod jar;
pub mod remote;

pub use category::*;
pub use chart::*;
pub use jar::*;
pub use remote::*;
