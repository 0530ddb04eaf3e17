//! `trend-fit` library crate.
//!
//! Least-squares regression over `(x, y)` series: ordinary linear, power law
//! and polynomial fits, plus the surrounding tooling (CSV ingest, reports,
//! plots, exports).
//!
//! The binary (`trendfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitting routines are reusable from other code

pub mod app;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
