//! Fitting orchestration.
//!
//! Responsibilities:
//!
//! - public entry points for linear / power / polynomial fits (`fitter`)
//! - fitting every series of a source in parallel (`batch`)

pub mod batch;
pub mod fitter;

pub use batch::*;
pub use fitter::*;
