//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - samples (`Observation`) and model selection (`ModelKind`, `ModelSpec`)
//! - typed fit outputs (`LinearFit`, `PowerFit`, `PolynomialFit`, `FitResult`)
//! - run configuration and the saved fit file schema

pub mod types;

pub use types::*;
