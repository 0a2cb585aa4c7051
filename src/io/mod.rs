//! Input/output helpers.
//!
//! - glob expansion of the invocation arguments (`discover`)
//! - CSV ingest + validation (`ingest`)
//! - output naming and the aggregate table (`export`)

pub mod discover;
pub mod export;
pub mod ingest;

pub use discover::*;
pub use export::*;
pub use ingest::*;
