//! `csvfit` library crate.
//!
//! The binary (`csvfit`) is a thin wrapper around this library so that:
//!
//! - the batch pipeline is testable without spawning processes
//! - configurations other than the built-in default can be run from code

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
