//! Fit models.
//!
//! Models are plain values (function + parameter names) so the fitting and
//! plotting code can stay generic over whatever the batch is configured with.

pub mod model;

pub use model::*;
