//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - residual / sample CSV exports (`export`)
//! - fit JSON read/write (`fitfile`)

pub mod export;
pub mod fitfile;
pub mod ingest;

pub use export::*;
pub use fitfile::*;
pub use ingest::*;
