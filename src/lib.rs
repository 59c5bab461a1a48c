//! Compound interest simulator.
//!
//! [`core`] holds the calculation engine: rate and period normalization, the
//! month-by-month projection, and the two inverse solvers (time to target and
//! monthly contribution for a target). [`api`] wraps it in a command line
//! interface and an HTTP JSON API.

pub mod api;
pub mod core;
