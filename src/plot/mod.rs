//! Plot rendering (Plotters bitmap backend).

pub mod figure;
pub mod text_safe;

pub use figure::*;
pub use text_safe::*;
