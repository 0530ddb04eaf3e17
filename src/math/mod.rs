//! Numerical building blocks: closed-form OLS sums, normal equations, and the
//! row reduction that solves them.

pub mod elimination;
pub mod normal;
pub mod ols;

pub use elimination::*;
pub use normal::*;
pub use ols::*;
