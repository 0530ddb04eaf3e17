//! Fitted model implementations.
//!
//! Models are implemented as small, pure functions so that fitting, reporting
//! and plotting code can stay generic.

pub mod model;

pub use model::*;
