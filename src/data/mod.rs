//! Data access: series sources, sample extraction, range search and
//! synthetic samples.

pub mod extract;
pub mod range;
pub mod sample;
pub mod source;

pub use extract::*;
pub use range::*;
pub use sample::*;
pub use source::*;
